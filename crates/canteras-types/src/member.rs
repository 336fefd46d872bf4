//! Typed view of the membership roster.

use serde::{Deserialize, Serialize};

use crate::{CanterasError, Collection, Document, Record, Result, Value};

/// Field holding the member's national ID (NIF/DNI).
pub const FIELD_DNI: &str = "DNI";
/// Field holding the member's full name.
pub const FIELD_NAME: &str = "Nombre";
/// Field holding the membership number.
pub const FIELD_NUMBER: &str = "NumeroSocio";
/// Field holding the stored password.
pub const FIELD_PASSWORD: &str = "password";

/// A member of the association, as stored in the roster collection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// National ID, also used as the document identifier.
    pub dni: String,
    /// Full name.
    pub name: String,
    /// Membership number, if one has been assigned.
    pub number: Option<u32>,
    /// Stored password, opaque to this crate.
    #[serde(skip_serializing)]
    pub password: String,
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("dni", &self.dni)
            .field("name", &self.name)
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}

impl Member {
    /// Creates a new member. Leading and trailing whitespace is trimmed.
    #[must_use]
    pub fn new(
        dni: impl AsRef<str>,
        name: impl AsRef<str>,
        number: u32,
        password: impl AsRef<str>,
    ) -> Self {
        Self {
            dni: dni.as_ref().trim().to_owned(),
            name: name.as_ref().trim().to_owned(),
            number: Some(number),
            password: password.as_ref().trim().to_owned(),
        }
    }

    /// Builds a member from form input, as entered by an administrator.
    ///
    /// Every field is trimmed and must be non-empty. The membership number
    /// must parse as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`CanterasError::MissingField`] for an empty field and
    /// [`CanterasError::InvalidField`] for a number that does not parse.
    pub fn from_input(dni: &str, name: &str, number: &str, password: &str) -> Result<Self> {
        let dni = dni.trim();
        let required = |field: &'static str, value: &str| {
            if value.trim().is_empty() {
                Err(CanterasError::MissingField {
                    id: dni.to_owned(),
                    field,
                })
            } else {
                Ok(())
            }
        };
        required(FIELD_DNI, dni)?;
        required(FIELD_NAME, name)?;
        required(FIELD_NUMBER, number)?;
        required(FIELD_PASSWORD, password)?;

        let number = number
            .trim()
            .parse()
            .map_err(|_| CanterasError::InvalidField {
                id: dni.to_owned(),
                field: FIELD_NUMBER,
                reason: format!("{number:?} is not a membership number"),
            })?;

        Ok(Self::new(dni, name, number, password))
    }

    /// Reads a member from a roster document.
    ///
    /// Incomplete entries are still members: a missing national ID falls
    /// back to the document identifier, a missing name is empty and a
    /// missing number is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if a field has the wrong kind.
    pub fn from_document(document: &Document) -> Result<Self> {
        let id = document.id();
        let record = document.record();

        let dni = text_field(id, record, FIELD_DNI)?.unwrap_or_else(|| id.to_owned());
        let name = text_field(id, record, FIELD_NAME)?.unwrap_or_default();
        let number = number_field(id, record)?;
        let password = match record.get(FIELD_PASSWORD) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        Ok(Self {
            dni,
            name,
            number,
            password,
        })
    }

    /// Returns the membership number as text, empty if unassigned.
    #[must_use]
    pub fn number_text(&self) -> String {
        self.number.map(|n| n.to_string()).unwrap_or_default()
    }

    /// Converts the member into the record shape written to the roster.
    ///
    /// An unassigned number is left out of the record.
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new()
            .with(FIELD_DNI, self.dni.as_str())
            .with(FIELD_NAME, self.name.as_str());
        if let Some(number) = self.number {
            record.insert(FIELD_NUMBER, number);
        }
        record.with(FIELD_PASSWORD, self.password.as_str())
    }

    /// Converts the member into a document addressed by its national ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the national ID is not a valid identifier.
    pub fn to_document(&self) -> Result<Document> {
        Document::new(self.dni.clone(), self.to_record())
    }

    /// Returns true if the member matches `query` on the given field.
    ///
    /// Matching is case-insensitive. National IDs match by prefix, names and
    /// numbers by substring. An empty query matches every member.
    #[must_use]
    pub fn matches(&self, field: SearchField, query: &str) -> bool {
        let query = query.to_lowercase();
        match field {
            SearchField::Nif => self.dni.to_lowercase().starts_with(&query),
            SearchField::Name => self.name.to_lowercase().contains(&query),
            SearchField::Number => self.number_text().contains(&query),
        }
    }
}

fn text_field(id: &str, record: &Record, field: &'static str) -> Result<Option<String>> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        None | Some(Value::Null) => Ok(None),
        Some(other) => Err(CanterasError::InvalidField {
            id: id.to_owned(),
            field,
            reason: format!("expected string, found {}", other.kind()),
        }),
    }
}

fn number_field(id: &str, record: &Record) -> Result<Option<u32>> {
    let invalid = |reason: String| CanterasError::InvalidField {
        id: id.to_owned(),
        field: FIELD_NUMBER,
        reason,
    };

    match record.get(FIELD_NUMBER) {
        Some(Value::Number(n)) => {
            if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) {
                Ok(Some(*n as u32))
            } else {
                Err(invalid(format!("{n} is not a membership number")))
            }
        }
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(format!("{s:?} is not a membership number"))),
        None | Some(Value::Null) => Ok(None),
        Some(other) => Err(invalid(format!("expected number, found {}", other.kind()))),
    }
}

/// Roster field used when searching for members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// National ID, prefix match.
    #[default]
    Nif,
    /// Full name, substring match.
    Name,
    /// Membership number, substring match.
    Number,
}

impl SearchField {
    /// Returns the search field as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nif => "nif",
            Self::Name => "name",
            Self::Number => "number",
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Members of the association ordered by membership number.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<Member>,
    skipped: usize,
}

impl Roster {
    /// Builds a roster from a collection, sorted by membership number.
    ///
    /// Members without a number sort as number 0; ties keep collection
    /// order. Documents whose fields have the wrong kind are skipped and
    /// counted.
    #[must_use]
    pub fn from_collection(collection: &Collection) -> Self {
        let mut skipped = 0;
        let mut members: Vec<Member> = collection
            .documents()
            .iter()
            .filter_map(|doc| match Member::from_document(doc) {
                Ok(member) => Some(member),
                Err(e) => {
                    tracing::warn!(document = doc.id(), error = %e, "skipping roster entry");
                    skipped += 1;
                    None
                }
            })
            .collect();
        members.sort_by_key(|m| m.number.unwrap_or(0));
        Self { members, skipped }
    }

    /// Returns all members in membership-number order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the members matching `query` on `field`.
    pub fn search<'a>(
        &'a self,
        field: SearchField,
        query: &'a str,
    ) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |m| m.matches(field, query))
    }

    /// Returns the member with the given national ID.
    #[must_use]
    pub fn get(&self, dni: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.dni == dni)
    }

    /// Returns the number of documents that were not valid members.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
