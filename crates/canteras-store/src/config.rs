//! Client configuration and persistent settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// Default collection holding the membership roster.
pub const DEFAULT_COLLECTION: &str = "socios";

/// Default Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

/// Default Firestore database identifier.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// Documents requested per page when listing a collection.
    pub page_size: u32,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 5,
            base_delay_ms: 250,
            max_delay_ms: 10_000,
            page_size: 300,
            user_agent: format!("canteras/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where documents are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The Firestore REST API.
    Firestore,
    /// A local directory of JSON exports.
    Export,
}

impl SourceKind {
    /// Returns the source kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firestore => "firestore",
            Self::Export => "export",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Firestore connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreSettings {
    /// Google Cloud project identifier.
    pub project_id: Option<String>,
    /// Database identifier within the project.
    pub database: String,
    /// Web API key appended to requests, if any.
    pub api_key: Option<String>,
    /// REST endpoint base URL.
    pub base_url: String,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            database: DEFAULT_DATABASE.to_owned(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Local JSON export settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory holding `<collection>.json` files.
    pub dir: Option<PathBuf>,
}

/// Persistent settings read from `config.toml`.
///
/// Every key is optional; missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Collection holding the roster.
    pub collection: String,
    /// Explicit source selection. When unset, Firestore is used if a
    /// project is configured, otherwise the export directory.
    pub source: Option<SourceKind>,
    /// Firestore connection settings.
    pub firestore: FirestoreSettings,
    /// Local export settings.
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_owned(),
            source: None,
            firestore: FirestoreSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Returns the default settings file path.
    ///
    /// - Linux: `~/.config/canteras/config.toml`
    /// - macOS: `~/Library/Application Support/canteras/config.toml`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\canteras\config\config.toml`
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "canteras")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.config_dir().to_path_buf())
            .join("config.toml")
    }

    /// Loads settings from `path`, returning defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(StoreError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        toml::from_str(&contents).map_err(|e| StoreError::ParseSettings {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Returns the source to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a Firestore project nor an export
    /// directory is configured.
    pub fn resolve_source(&self) -> Result<SourceKind> {
        match self.source {
            Some(kind) => Ok(kind),
            None if self.firestore.project_id.is_some() => Ok(SourceKind::Firestore),
            None if self.export.dir.is_some() => Ok(SourceKind::Export),
            None => Err(StoreError::Config(
                "no document source configured: set firestore.project_id or export.dir".into(),
            )),
        }
    }

    /// Returns a copy safe to display, with the API key masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.firestore.api_key.is_some() {
            copy.firestore.api_key = Some("********".to_owned());
        }
        copy
    }
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".canteras")
}
