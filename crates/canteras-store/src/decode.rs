//! Decoding and encoding of Firestore REST documents.
//!
//! The REST API wraps every value in a single-key object naming its kind,
//! e.g. `{"integerValue": "3"}`. Only the six kinds of [`Value`] are
//! accepted; timestamps, bytes, references and geo points are rejected.

use std::collections::BTreeMap;

use canteras_types::{CanterasError, Document, Fields, Record, Value};
use serde::Deserialize;
use serde_json::{Map, Value as Json, json};

use crate::{Result, StoreError};

/// A page of a `documents.list` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub(crate) documents: Vec<RestDocument>,
    pub(crate) next_page_token: Option<String>,
}

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
pub(crate) struct RestDocument {
    /// Full resource name, ending in `/documents/{collection}/{id}`.
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) fields: BTreeMap<String, Json>,
}

/// Converts a REST document into a [`Document`].
pub(crate) fn decode_document(raw: RestDocument) -> Result<Document> {
    let id = raw.name.rsplit('/').next().unwrap_or_default().to_owned();
    let mut record = Record::new();
    for (name, value) in &raw.fields {
        record.insert(name.clone(), decode_value(name, value)?);
    }
    Ok(Document::new(id, record)?)
}

/// Converts one typed REST value. `path` names the field for error reporting.
pub(crate) fn decode_value(path: &str, raw: &Json) -> Result<Value> {
    let malformed = |what: &str| StoreError::Decode(format!("field '{path}': {what}"));

    let Some(object) = raw.as_object() else {
        return Err(malformed("expected a typed value object"));
    };
    let mut entries = object.iter();
    let (Some((kind, payload)), None) = (entries.next(), entries.next()) else {
        return Err(malformed("expected exactly one value kind"));
    };

    let value = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Boolean(
            payload
                .as_bool()
                .ok_or_else(|| malformed("booleanValue is not a boolean"))?,
        ),
        "integerValue" => Value::Number(parse_integer(payload).ok_or_else(|| {
            malformed("integerValue is not an integer")
        })?),
        "doubleValue" => Value::Number(
            parse_double(payload).ok_or_else(|| malformed("doubleValue is not a number"))?,
        ),
        "stringValue" => Value::String(
            payload
                .as_str()
                .ok_or_else(|| malformed("stringValue is not a string"))?
                .to_owned(),
        ),
        "arrayValue" => {
            let items: &[Json] = match payload.get("values") {
                Some(Json::Array(items)) => items.as_slice(),
                Some(_) => return Err(malformed("arrayValue.values is not a list")),
                None => &[],
            };
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_value(&format!("{path}[{i}]"), item))
                .collect::<Result<Vec<_>>>()?;
            Value::Array(values)
        }
        "mapValue" => {
            let mut fields = Fields::new();
            match payload.get("fields") {
                Some(Json::Object(entries)) => {
                    for (key, item) in entries {
                        let child = decode_value(&format!("{path}.{key}"), item)?;
                        fields.insert(key.clone(), child);
                    }
                }
                Some(_) => return Err(malformed("mapValue.fields is not a map")),
                None => {}
            }
            Value::Map(fields)
        }
        other => {
            return Err(CanterasError::UnsupportedValue {
                field: path.to_owned(),
                kind: other.to_owned(),
            }
            .into());
        }
    };
    Ok(value)
}

/// Encodes a record as the `{"fields": {...}}` body of a document write.
pub(crate) fn encode_record(record: &Record) -> Json {
    json!({ "fields": encode_fields(record.fields()) })
}

fn encode_fields(fields: &Fields) -> Json {
    Json::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect::<Map<_, _>>(),
    )
}

/// Encodes one value. Whole numbers within `i64` range become
/// `integerValue` so membership numbers stay integers in the store.
pub(crate) fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Boolean(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 => {
            json!({ "integerValue": (*n as i64).to_string() })
        }
        Value::Number(n) if n.is_nan() => json!({ "doubleValue": "NaN" }),
        Value::Number(n) if n.is_infinite() => {
            let text = if *n > 0.0 { "Infinity" } else { "-Infinity" };
            json!({ "doubleValue": text })
        }
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Json> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

// 64-bit integers travel as decimal strings.
fn parse_integer(payload: &Json) -> Option<f64> {
    match payload {
        Json::String(s) => s.parse::<i64>().ok().map(|n| n as f64),
        Json::Number(n) => n.as_i64().map(|n| n as f64),
        _ => None,
    }
}

fn parse_double(payload: &Json) -> Option<f64> {
    match payload {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}
