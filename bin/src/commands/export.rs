//! Export command implementation.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use canteras_lib::prelude::*;

use super::Context;

/// Save the roster collection to `<output_dir>/<collection>.json`.
pub(crate) async fn export(ctx: &Context, output_dir: PathBuf) -> Result<()> {
    let (collection, source) = ctx.fetch_roster().await?;
    let target = ExportSource::new(output_dir);

    let path = target
        .save(&collection)
        .await
        .with_context(|| format!("Could not write export to {}", target.dir().display()))?;

    if !ctx.quiet() {
        println!(
            "Exported {} documents from {source} to {}",
            collection.len(),
            path.display()
        );
    }
    Ok(())
}
