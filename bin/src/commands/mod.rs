//! CLI command implementations.

pub(crate) mod card;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod list;
pub(crate) mod members;
pub(crate) mod usage;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use canteras_lib::prelude::*;

use crate::display::spinner;

/// Settings and flags shared by every command.
pub(crate) struct Context {
    settings: Settings,
    settings_path: PathBuf,
    quiet: bool,
}

impl Context {
    pub(crate) const fn new(settings: Settings, settings_path: PathBuf, quiet: bool) -> Self {
        Self {
            settings,
            settings_path,
            quiet,
        }
    }

    pub(crate) const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub(crate) const fn quiet(&self) -> bool {
        self.quiet
    }

    /// Opens the configured document source.
    pub(crate) fn source(&self) -> Result<Box<dyn DocumentSource>> {
        open_source(&self.settings, ClientConfig::default()).with_context(|| {
            format!(
                "Could not open document source (settings: {})",
                self.settings_path.display()
            )
        })
    }

    /// Fetches the roster collection, showing a spinner meanwhile.
    pub(crate) async fn fetch_roster(&self) -> Result<(Collection, String)> {
        let source = self.source()?;
        let name = &self.settings.collection;
        let description = source.describe();
        tracing::info!(collection = %name, source = %description, "fetching collection");

        let pb = spinner(self.quiet, format!("Reading '{name}' from {description}"));
        let result = source.fetch_collection(name).await;
        pb.finish_and_clear();

        let collection =
            result.with_context(|| format!("Could not read collection '{name}'"))?;
        Ok((collection, description))
    }
}
