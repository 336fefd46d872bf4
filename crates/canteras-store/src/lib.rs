//! Document store access for the canteras membership roster tools.
//!
//! This crate fetches collections for the estimator and roster views and
//! writes roster entries back:
//!
//! - [`DocumentSource`] - Source of documents, with single-document writes
//! - [`FirestoreClient`] - Firestore REST client with paging and retries
//! - [`ExportSource`] - Local directory of JSON collection exports
//! - [`Settings`] - Persistent settings loaded from `config.toml`
//! - [`open_source`] - Opens the source selected by the settings

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod decode;
mod error;
mod export;
mod firestore;
mod source;

pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_COLLECTION, DEFAULT_DATABASE, ExportSettings,
    FirestoreSettings, Settings, SourceKind,
};
pub use error::{Result, StoreError};
pub use export::ExportSource;
pub use firestore::FirestoreClient;
pub use source::{DocumentSource, open_source};
