//! Local JSON exports of collections.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use canteras_types::{Collection, Document};

use crate::{DocumentSource, Result, StoreError};

/// A directory of collection exports.
///
/// Each collection is stored as `<name>.json`, a JSON array of
/// `{"id": ..., "data": {...}}` objects in collection order.
#[derive(Debug, Clone)]
pub struct ExportSource {
    dir: PathBuf,
}

impl ExportSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the export directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of a collection's export file.
    #[must_use]
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Writes a collection export, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, collection: &Collection) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::WriteFile {
                path: self.dir.clone(),
                source: e,
            })?;

        let path = self.collection_path(collection.name());
        let json = serde_json::to_string_pretty(collection.documents())?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::WriteFile {
                path: path.clone(),
                source: e,
            })?;

        tracing::info!(path = %path.display(), count = collection.len(), "saved export");
        Ok(path)
    }

    /// Loads a collection for rewriting; a missing export is an empty one.
    async fn load_for_update(&self, name: &str) -> Result<Collection> {
        match self.fetch_collection(name).await {
            Err(StoreError::CollectionNotFound { .. }) => Ok(Collection::new(name)),
            other => other,
        }
    }
}

#[async_trait]
impl DocumentSource for ExportSource {
    async fn fetch_collection(&self, name: &str) -> Result<Collection> {
        let path = self.collection_path(name);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::CollectionNotFound {
                    name: name.to_owned(),
                    dir: self.dir.clone(),
                });
            }
            Err(e) => return Err(StoreError::ReadFile { path, source: e }),
        };

        let documents: Vec<Document> =
            serde_json::from_str(&contents).map_err(|e| StoreError::ParseJson {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), count = documents.len(), "loaded export");
        Ok(Collection::with_documents(name, documents))
    }

    async fn put_document(&self, collection: &str, document: &Document) -> Result<()> {
        let mut contents = self.load_for_update(collection).await?;
        let replaced = contents.upsert(document.clone());
        self.save(&contents).await?;
        tracing::debug!(collection, id = document.id(), replaced, "stored document");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut contents = self.load_for_update(collection).await?;
        if contents.remove(id).is_some() {
            self.save(&contents).await?;
            tracing::debug!(collection, id, "deleted document");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("export {}", self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteras_types::{Member, Record};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_collection_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("socios.json"),
            r#"[
                {"id": "B", "data": {"DNI": "B", "Nombre": "Bea", "NumeroSocio": 2}},
                {"id": "A", "data": {"DNI": "A", "Nombre": "Ana", "NumeroSocio": 1, "tags": ["x", null]}}
            ]"#,
        )
        .unwrap();

        let source = ExportSource::new(temp_dir.path());
        let collection = source.fetch_collection("socios").await.unwrap();
        let ids: Vec<_> = collection.documents().iter().map(Document::id).collect();

        assert_eq!(collection.name(), "socios");
        assert_eq!(ids, ["B", "A"]);
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let temp_dir = TempDir::new().unwrap();
        let source = ExportSource::new(temp_dir.path());

        let err = source.fetch_collection("socios").await.unwrap_err();
        assert!(matches!(err, StoreError::CollectionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_export() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("socios.json"), r#"[{"id": ""}]"#).unwrap();
        let source = ExportSource::new(temp_dir.path());

        let err = source.fetch_collection("socios").await.unwrap_err();
        assert!(matches!(err, StoreError::ParseJson { .. }));
    }

    #[tokio::test]
    async fn test_save_then_fetch_document() {
        let temp_dir = TempDir::new().unwrap();
        let source = ExportSource::new(temp_dir.path().join("nested"));
        let member = Member::new("12345678A", "Ana", 3, "xxx");
        let collection = Collection::with_documents(
            "socios",
            vec![
                member.to_document().unwrap(),
                Document::new("other", Record::new().with("k", 1u32)).unwrap(),
            ],
        );

        let path = source.save(&collection).await.unwrap();
        assert!(path.ends_with("socios.json"));

        let doc = source.fetch_document("socios", "12345678A").await.unwrap();
        assert_eq!(doc.map(|d| Member::from_document(&d).unwrap()), Some(member));
        assert!(source.fetch_document("socios", "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_and_delete_rewrite_export() {
        let temp_dir = TempDir::new().unwrap();
        let source = ExportSource::new(temp_dir.path());
        let ana = Member::new("A", "Ana", 1, "x").to_document().unwrap();
        let bea = Member::new("B", "Bea", 2, "y").to_document().unwrap();

        source.put_document("socios", &ana).await.unwrap();
        source.put_document("socios", &bea).await.unwrap();
        let renamed = Member::new("A", "Ana María", 1, "x").to_document().unwrap();
        source.put_document("socios", &renamed).await.unwrap();

        let collection = source.fetch_collection("socios").await.unwrap();
        let ids: Vec<_> = collection.documents().iter().map(Document::id).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(collection.get("A"), Some(&renamed));

        source.delete_document("socios", "A").await.unwrap();
        source.delete_document("socios", "nobody").await.unwrap();
        let collection = source.fetch_collection("socios").await.unwrap();
        assert_eq!(collection.len(), 1);
        assert!(collection.get("A").is_none());
    }
}
