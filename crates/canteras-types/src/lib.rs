//! Core types for the canteras membership roster tools.
//!
//! This crate provides the data model shared by the rest of the workspace:
//!
//! - [`Value`] - A document field value of one of the six supported kinds
//! - [`Record`] - The fields of one stored document
//! - [`Document`] - A record with its identifier
//! - [`Collection`] - An ordered set of documents under one name
//! - [`Member`] - Typed view of a roster entry
//! - [`Roster`] - Members sorted by membership number, with search

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod document;
mod error;
mod member;
mod value;

pub use document::{Collection, Document, Record};
pub use error::{CanterasError, Result};
pub use member::{
    FIELD_DNI, FIELD_NAME, FIELD_NUMBER, FIELD_PASSWORD, Member, Roster, SearchField,
};
pub use value::{Fields, Value, ValueKind};
