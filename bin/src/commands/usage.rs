//! Usage command implementation.
//!
//! Estimates how much of the storage quota the roster collection uses and how
//! many more members would fit.

use std::io::Write;

use anyhow::Result;
use canteras_lib::prelude::*;

use super::Context;
use crate::display::{OutputFormat, usage_bar};

/// Estimate and print the storage used by the roster collection.
pub(crate) async fn usage(
    ctx: &Context,
    quota: Option<u64>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let (collection, source) = ctx.fetch_roster().await?;
    let estimator = quota.map_or_else(Estimator::default, Estimator::new);
    let usage = estimator.estimate_collection(&collection);

    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&usage)?)?;
        return Ok(());
    }

    let display_pct = display_percentage(usage.total_bytes);

    writeln!(out, "Collection: {}", usage.collection)?;
    writeln!(out, "Source:     {source}")?;
    writeln!(out, "Documents:  {}", usage.record_count)?;
    writeln!(
        out,
        "Size:       {} ({} bytes, metadata included)",
        Estimator::format_bytes(usage.total_bytes),
        usage.total_bytes
    )?;
    writeln!(out, "Used:       {} {:.2}% of 1 GiB", usage_bar(display_pct, 30), display_pct)?;

    match &usage.max_record_id {
        Some(id) => writeln!(out, "Largest:    {id} ({} bytes)", usage.max_record_size)?,
        None => writeln!(out, "Largest:    -")?,
    }

    writeln!(out, "\nCapacity Estimate:")?;
    writeln!(out, "{:<28} {:>16}", "Quota", usage.quota_bytes)?;
    writeln!(out, "{:<28} {:>15.2}%", "Quota used", usage.percentage_used)?;
    writeln!(out, "{:<28} {:>16}", "Remaining bytes", usage.remaining_bytes())?;
    writeln!(out, "{:<28} {:>16}", "Estimated total documents", usage.estimated_capacity)?;
    writeln!(out, "{:<28} {:>16}", "Room for new documents", usage.additional_records())?;

    writeln!(out, "\nNote: Sizes follow the store's accounting rules and are an approximation.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::roster_context;

    #[tokio::test]
    async fn test_usage_json_with_quota() {
        let (_dir, ctx) = roster_context();
        let mut out = Vec::new();

        usage(&ctx, Some(1000), OutputFormat::Json, &mut out).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["total_bytes"], 484);
        assert_eq!(json["record_count"], 4);
        assert_eq!(json["max_record_id"], "87654321B");
        assert_eq!(json["max_record_size"], 130);
        // floor((1000 - 484) / 130) + 4
        assert_eq!(json["estimated_capacity"], 7);
    }

    #[tokio::test]
    async fn test_usage_table() {
        let (_dir, ctx) = roster_context();
        let mut out = Vec::new();

        usage(&ctx, None, OutputFormat::Table, &mut out).await.unwrap();
        let table = String::from_utf8(out).unwrap();

        assert!(table.contains("Collection: socios"));
        assert!(table.contains("Documents:  4"));
        assert!(table.contains("Size:       484 B (484 bytes, metadata included)"));
        assert!(table.contains("Largest:    87654321B (130 bytes)"));
        assert!(table.contains(&format!("{:<28} {:>16}", "Quota", canteras_lib::STORAGE_QUOTA_BYTES)));
    }
}
