//! Config command implementation.

use anyhow::Result;

use super::Context;

/// Print the settings file location and the effective settings.
pub(crate) fn show_config(ctx: &Context) -> Result<()> {
    let path = ctx.settings_path();
    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Settings file: {}{status}", path.display());

    let settings = ctx.settings();
    match settings.resolve_source() {
        Ok(kind) => println!("Source:        {kind}"),
        Err(e) => println!("Source:        none ({e})"),
    }

    println!("\n{}", toml::to_string_pretty(&settings.redacted())?);
    Ok(())
}
