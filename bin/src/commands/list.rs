//! List command implementation.
//!
//! This module handles listing roster members with optional search filtering.

use std::io::Write;

use anyhow::Result;
use canteras_lib::prelude::*;

use super::Context;
use crate::display::OutputFormat;

/// List members ordered by membership number, optionally filtered.
pub(crate) async fn list_members(
    ctx: &Context,
    field: SearchField,
    search: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let (collection, _) = ctx.fetch_roster().await?;
    let roster = Roster::from_collection(&collection);
    let members: Vec<&Member> = roster.search(field, search.unwrap_or_default()).collect();

    if roster.skipped() > 0 {
        tracing::warn!(skipped = roster.skipped(), "some documents are not valid members");
    }

    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&members)?)?;
        return Ok(());
    }

    writeln!(out, "Members of Las Canteras - {}", chrono::Local::now().format("%d/%m/%Y"))?;

    if members.is_empty() {
        writeln!(out, "No members found.")?;
        return Ok(());
    }

    writeln!(out, "{:>8} {:<12} {:<40}", "NUMBER", "NIF", "NAME")?;
    writeln!(out, "{}", "-".repeat(62))?;

    for member in &members {
        writeln!(out, "{:>8} {:<12} {:<40}", member.number_text(), member.dni, member.name)?;
    }

    let usage = display_percentage(Estimator::default().estimate_collection(&collection).total_bytes);
    writeln!(
        out,
        "\nTotal: {} of {} members | Storage used: {:.2}%",
        members.len(),
        roster.len(),
        usage
    )?;
    Ok(())
}
