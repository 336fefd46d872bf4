//! Per-field and per-document storage costs.
//!
//! These follow the document store's published accounting rules: every
//! string (field names included) costs its UTF-8 length plus one byte,
//! numbers cost a fixed eight bytes, and each document pays for its full
//! path plus fixed metadata.

use canteras_types::{Record, Value};

/// Fixed overhead added to every document name.
pub const DOCUMENT_NAME_OVERHEAD_BYTES: u64 = 16;

/// Fixed metadata cost of every stored document.
pub const DOCUMENT_METADATA_BYTES: u64 = 32;

/// Returns the stored size of a string: UTF-8 length plus one byte.
#[must_use]
pub const fn string_size(s: &str) -> u64 {
    s.len() as u64 + 1
}

/// Returns the stored size of one field, name included.
///
/// List elements are sized as fields with an empty name, so each element
/// pays one byte of name overhead.
#[must_use]
pub fn field_size(name: &str, value: &Value) -> u64 {
    string_size(name) + value_size(value)
}

fn value_size(value: &Value) -> u64 {
    match value {
        Value::String(s) => string_size(s),
        Value::Boolean(_) | Value::Null => 1,
        Value::Number(_) => 8,
        Value::Array(items) => items.iter().map(|v| field_size("", v)).sum(),
        Value::Map(fields) => fields.iter().map(|(k, v)| field_size(k, v)).sum(),
    }
}

/// Returns the stored size of a document name built from `path` segments.
#[must_use]
pub fn document_name_size<S: AsRef<str>>(path: &[S]) -> u64 {
    path.iter().map(|seg| string_size(seg.as_ref())).sum::<u64>() + DOCUMENT_NAME_OVERHEAD_BYTES
}

/// Returns the stored size of a whole document addressed by `path`.
#[must_use]
pub fn record_size<S: AsRef<str>>(path: &[S], record: &Record) -> u64 {
    let fields: u64 = record.iter().map(|(k, v)| field_size(k, v)).sum();
    document_name_size(path) + fields + DOCUMENT_METADATA_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteras_types::Fields;

    #[test]
    fn test_string_field() {
        // name "Nombre" (6+1) + value "Ana" (3+1)
        assert_eq!(field_size("Nombre", &Value::from("Ana")), 11);
        // multi-byte characters are counted in UTF-8 bytes
        assert_eq!(field_size("ñ", &Value::from("€")), 3 + 4);
    }

    #[test]
    fn test_scalar_fields() {
        assert_eq!(field_size("ok", &Value::Boolean(false)), 3 + 1);
        assert_eq!(field_size("n", &Value::Null), 2 + 1);
        assert_eq!(field_size("x", &Value::Number(1.0)), 2 + 8);
        assert_eq!(field_size("x", &Value::Number(1.0e300)), 2 + 8);
    }

    #[test]
    fn test_name_and_value_costs_are_independent() {
        for value in [Value::Boolean(true), Value::Number(-3.5), Value::Null] {
            let short = field_size("a", &value);
            let long = field_size("abcd", &value);
            assert_eq!(long - short, 3);
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(field_size("", &Value::Array(Vec::new())), 1);
    }

    #[test]
    fn test_list_elements_pay_name_byte() {
        let list = Value::Array(vec![Value::from("ab"), Value::Number(0.0)]);
        // name "l" (2) + element "ab" (1 + 3) + element number (1 + 8)
        assert_eq!(field_size("l", &list), 2 + 4 + 9);
    }

    #[test]
    fn test_nested_map() {
        let inner: Fields = [("b".to_owned(), Value::Number(1.0))].into();
        assert_eq!(field_size("a", &Value::Map(inner)), 12);
    }

    #[test]
    fn test_list_of_maps_sums_members() {
        let m1: Fields = [("x".to_owned(), Value::from("yy"))].into();
        let m2: Fields = [
            ("k".to_owned(), Value::Boolean(true)),
            ("z".to_owned(), Value::Null),
        ]
        .into();
        let list = Value::Array(vec![Value::Map(m1.clone()), Value::Map(m2.clone())]);

        let expected =
            string_size("") + field_size("", &Value::Map(m1)) + field_size("", &Value::Map(m2));
        assert_eq!(field_size("", &list), expected);
    }

    #[test]
    fn test_document_name_size() {
        assert_eq!(document_name_size(&["socios", "12345678A"]), 16 + 7 + 10);
        assert_eq!(document_name_size::<&str>(&[]), 16);
    }

    #[test]
    fn test_reference_member_record() {
        let record = Record::new()
            .with("DNI", "12345678A")
            .with("Nombre", "Ana")
            .with("NumeroSocio", 3u32)
            .with("password", "xxx");

        // path 16 + 7 + 10, fields 14 + 11 + 20 + 13, metadata 32
        assert_eq!(record_size(&["socios", "12345678A"], &record), 123);
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(record_size(&["c", "d"], &Record::new()), 16 + 2 + 2 + 32);
    }
}
