//! Membership roster tools for the Las Canteras association.
//!
//! This is a facade crate that re-exports functionality from the canteras
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use canteras_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(&Settings::default_path())?;
//!     let source = open_source(&settings, ClientConfig::default())?;
//!
//!     let collection = source.fetch_collection(&settings.collection).await?;
//!     let usage = Estimator::default().estimate_collection(&collection);
//!     println!("{} bytes ({}%)", usage.total_bytes, usage.percentage_used);
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use canteras_types::*;

// Re-export estimation
pub use canteras_estimate::{
    DISPLAY_QUOTA_BYTES, EstimationResult, Estimator, STORAGE_QUOTA_BYTES, display_percentage,
    document_name_size, field_size, record_size, usage_percentage,
};

// Re-export store access
#[cfg(feature = "store")]
pub use canteras_store::{
    ClientConfig, DocumentSource, ExportSource, FirestoreClient, Settings, SourceKind, StoreError,
    open_source,
};

/// Prelude module for convenient imports.
///
/// ```
/// use canteras_lib::prelude::*;
/// ```
pub mod prelude {
    pub use canteras_types::{
        CanterasError, Collection, Document, Member, Record, Result, Roster, SearchField, Value,
    };

    pub use canteras_estimate::{EstimationResult, Estimator, display_percentage};

    #[cfg(feature = "store")]
    pub use canteras_store::{
        ClientConfig, DocumentSource, ExportSource, FirestoreClient, Settings, SourceKind,
        StoreError, open_source,
    };
}
