//! Display utilities and output formatting for the canteras CLI.

use std::borrow::Cow;
use std::time::Duration;

use canteras_lib::{SearchField, SourceKind};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

/// Output format for command results.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

/// Roster field to search on.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SearchFieldArg {
    Nif,
    Name,
    Number,
}

impl From<SearchFieldArg> for SearchField {
    fn from(arg: SearchFieldArg) -> Self {
        match arg {
            SearchFieldArg::Nif => Self::Nif,
            SearchFieldArg::Name => Self::Name,
            SearchFieldArg::Number => Self::Number,
        }
    }
}

/// Document source selection.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SourceArg {
    Firestore,
    Export,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Firestore => Self::Firestore,
            SourceArg::Export => Self::Export,
        }
    }
}

/// Creates a spinner shown while waiting on the document store.
pub(crate) fn spinner(quiet: bool, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Renders a fixed-width usage bar for a percentage, clamped to 100%.
pub(crate) fn usage_bar(percentage: f64, width: usize) -> String {
    let ratio = (percentage / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage_bar(0.0, 10), "[----------]");
        assert_eq!(usage_bar(50.0, 10), "[#####-----]");
        assert_eq!(usage_bar(250.0, 4), "[####]");
        assert_eq!(usage_bar(-1.0, 4), "[----]");
    }

    #[test]
    fn test_search_field_conversion() {
        assert_eq!(SearchField::from(SearchFieldArg::Name), SearchField::Name);
        assert_eq!(SourceKind::from(SourceArg::Export), SourceKind::Export);
    }
}
