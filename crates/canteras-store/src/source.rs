//! The document source abstraction.

use async_trait::async_trait;
use canteras_types::{Collection, Document};

use crate::config::{ClientConfig, Settings, SourceKind};
use crate::{ExportSource, FirestoreClient, Result, StoreError};

/// A source of documents.
///
/// Implementations fetch a whole collection in the order the backend
/// returns it. Estimation and roster views work on the materialized result.
/// Writes address a single document by collection and identifier.
#[async_trait]
pub trait DocumentSource: Send + Sync + std::fmt::Debug {
    /// Fetches every document of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or a document
    /// cannot be decoded.
    async fn fetch_collection(&self, name: &str) -> Result<Collection>;

    /// Fetches a single document, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    async fn fetch_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self.fetch_collection(collection).await?.get(id).cloned())
    }

    /// Stores a document under its identifier, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    async fn put_document(&self, collection: &str, document: &Document) -> Result<()>;

    /// Deletes a document. Deleting a missing document is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the deletion.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    /// Returns a short description of where documents come from.
    fn describe(&self) -> String;
}

/// Opens the document source selected by `settings`.
///
/// # Errors
///
/// Returns an error if the selected source is not fully configured or the
/// HTTP client cannot be created.
pub fn open_source(settings: &Settings, config: ClientConfig) -> Result<Box<dyn DocumentSource>> {
    match settings.resolve_source()? {
        SourceKind::Firestore => {
            let client = FirestoreClient::new(settings.firestore.clone(), config)?;
            Ok(Box::new(client))
        }
        SourceKind::Export => {
            let dir = settings.export.dir.clone().ok_or_else(|| {
                StoreError::Config("export source selected but export.dir is not set".into())
            })?;
            Ok(Box::new(ExportSource::new(dir)))
        }
    }
}
