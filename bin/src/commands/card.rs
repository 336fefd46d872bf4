//! Card command implementation.

use std::io::Write;

use anyhow::{Context as _, Result, bail};
use canteras_lib::prelude::*;

use super::Context;
use crate::display::spinner;

/// Show the virtual membership card of the member with the given NIF.
pub(crate) async fn show_card(ctx: &Context, dni: &str, out: &mut impl Write) -> Result<()> {
    let source = ctx.source()?;
    let collection = &ctx.settings().collection;
    let dni = dni.trim();

    let pb = spinner(ctx.quiet(), format!("Looking up {dni}"));
    let document = source.fetch_document(collection, dni).await;
    pb.finish_and_clear();

    let Some(document) = document.with_context(|| format!("Could not read member {dni}"))? else {
        bail!("No member with NIF {dni}");
    };
    let member = Member::from_document(&document)?;

    let width = member.name.chars().count().max(24) + 4;
    let inner = width - 2;
    writeln!(out, "+{}+", "-".repeat(width))?;
    writeln!(out, "| {:<inner$} |", "LAS CANTERAS")?;
    writeln!(out, "| {:<inner$} |", format!("Member no. {}", member.number_text()))?;
    writeln!(out, "| {:<inner$} |", member.name)?;
    writeln!(out, "| {:<inner$} |", format!("NIF {}", member.dni))?;
    writeln!(out, "+{}+", "-".repeat(width))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::roster_context;

    #[tokio::test]
    async fn test_card_shows_member() {
        let (_dir, ctx) = roster_context();
        let mut out = Vec::new();

        show_card(&ctx, " 12345678A ", &mut out).await.unwrap();
        let card = String::from_utf8(out).unwrap();

        assert!(card.contains("Member no. 3"));
        assert!(card.contains("| Ana "));
        assert!(card.contains("NIF 12345678A"));
        assert!(!card.contains("xxx"));
    }

    #[tokio::test]
    async fn test_card_unknown_member() {
        let (_dir, ctx) = roster_context();

        let err = show_card(&ctx, "00000000Z", &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("No member with NIF 00000000Z"));
    }
}
