//! Storage usage estimation for document store collections.
//!
//! The document store does not report per-collection usage, so this crate
//! approximates it from the store's accounting rules:
//!
//! - [`field_size`], [`document_name_size`], [`record_size`] - Per-field and
//!   per-document byte costs
//! - [`Estimator`] - Sums a whole collection against a quota
//! - [`EstimationResult`] - Total usage, largest document and capacity

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod estimator;
mod size;

pub use estimator::{
    DISPLAY_QUOTA_BYTES, EstimationResult, Estimator, STORAGE_QUOTA_BYTES, display_percentage,
    usage_percentage,
};
pub use size::{
    DOCUMENT_METADATA_BYTES, DOCUMENT_NAME_OVERHEAD_BYTES, document_name_size, field_size,
    record_size, string_size,
};
