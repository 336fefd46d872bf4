//! Records, documents and collections.

use serde::{Deserialize, Serialize};

use crate::{CanterasError, Fields, Result, Value};

/// The fields of a single stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Fields,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Fields::new(),
        }
    }

    /// Sets a field, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Serialized shape of a document in an export file.
#[derive(Debug, Deserialize)]
struct RawDocument {
    id: String,
    #[serde(default)]
    data: Record,
}

/// A record together with the identifier that addresses it in its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    id: String,
    #[serde(rename = "data")]
    record: Record,
}

impl TryFrom<RawDocument> for Document {
    type Error = CanterasError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        Self::new(raw.id, raw.data)
    }
}

impl Document {
    /// Creates a document.
    ///
    /// # Errors
    ///
    /// Returns [`CanterasError::InvalidIdentifier`] if the identifier is empty
    /// or contains a `/`, since it must be a single path segment.
    pub fn new(id: impl Into<String>, record: Record) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains('/') {
            return Err(CanterasError::InvalidIdentifier(id));
        }
        Ok(Self { id, record })
    }

    /// Returns the document identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document fields.
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Returns the address of this document inside `collection`.
    #[must_use]
    pub fn path<'a>(&'a self, collection: &'a str) -> [&'a str; 2] {
        [collection, &self.id]
    }
}

/// An ordered set of documents stored under one collection name.
///
/// Documents keep the order in which the source returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Creates a collection from already ordered documents.
    #[must_use]
    pub fn with_documents(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    /// Appends a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Stores a document, replacing the one with the same identifier in place.
    ///
    /// Returns true if an existing document was replaced.
    pub fn upsert(&mut self, document: Document) -> bool {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => {
                *existing = document;
                true
            }
            None => {
                self.documents.push(document);
                false
            }
        }
    }

    /// Removes and returns the document with the given identifier.
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(index))
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the documents in source order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns the document with the given identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_rejects_bad_identifiers() {
        assert!(matches!(
            Document::new("", Record::new()),
            Err(CanterasError::InvalidIdentifier(_))
        ));
        assert!(Document::new("a/b", Record::new()).is_err());
        assert!(Document::new("12345678A", Record::new()).is_ok());
    }

    #[test]
    fn test_deserialize_document_list_keeps_order() {
        let json = r#"[
            {"id": "b", "data": {"Nombre": "Bea"}},
            {"id": "a", "data": {"Nombre": "Ana", "NumeroSocio": 1}},
            {"id": "c"}
        ]"#;
        let docs: Vec<Document> = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = docs.iter().map(Document::id).collect();

        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(docs[1].record().get("NumeroSocio"), Some(&Value::Number(1.0)));
        assert!(docs[2].record().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_empty_id() {
        let json = r#"[{"id": "", "data": {}}]"#;
        assert!(serde_json::from_str::<Vec<Document>>(json).is_err());
    }

    #[test]
    fn test_document_serializes_as_export_shape() {
        let doc = Document::new("x", Record::new().with("ok", true)).unwrap();
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"id":"x","data":{"ok":true}}"#
        );
    }

    #[test]
    fn test_collection_lookup() {
        let mut collection = Collection::new("socios");
        collection.push(Document::new("1", Record::new()).unwrap());
        collection.push(Document::new("2", Record::new().with("k", 1u32)).unwrap());

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("2").map(|d| d.record().len()), Some(1));
        assert!(collection.get("3").is_none());
        assert_eq!(collection.documents()[0].path("socios"), ["socios", "1"]);
    }

    #[test]
    fn test_collection_upsert_and_remove() {
        let mut collection = Collection::new("socios");
        assert!(!collection.upsert(Document::new("a", Record::new()).unwrap()));
        assert!(!collection.upsert(Document::new("b", Record::new()).unwrap()));
        assert!(collection.upsert(Document::new("a", Record::new().with("k", 1u32)).unwrap()));

        let ids: Vec<_> = collection.documents().iter().map(Document::id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(collection.get("a").map(|d| d.record().len()), Some(1));

        assert_eq!(collection.remove("a").map(|d| d.id), Some("a".to_owned()));
        assert!(collection.remove("a").is_none());
        assert_eq!(collection.len(), 1);
    }
}
