//! Documents and field paths.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A stored record: a JSON object.
pub type Document = Map<String, Value>;

/// Field holding the record identifier. Generated on insert when absent.
pub const ID_FIELD: &str = "id";

/// Field holding the owning tenant. Written once on insert, never updated.
pub const TENANT_FIELD: &str = "tenant_id";

/// Looks up a dotted path (`"address.city"`) inside a document.
#[must_use]
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = doc.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Writes `value` at a dotted path, creating intermediate objects.
///
/// Returns `true` if the stored value changed. A non-object value in the
/// middle of the path is replaced by an object.
pub fn assign(doc: &mut Document, path: &str, value: Value) -> bool {
    match path.split_once('.') {
        None => {
            let changed = doc.get(path) != Some(&value);
            doc.insert(path.to_owned(), value);
            changed
        }
        Some((head, rest)) => {
            let slot = doc
                .entry(head.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(inner) => assign(inner, rest, value),
                _ => false,
            }
        }
    }
}

/// Removes the value at a dotted path. Returns `true` if something was removed.
pub fn remove(doc: &mut Document, path: &str) -> bool {
    match path.split_once('.') {
        None => doc.remove(path).is_some(),
        Some((head, rest)) => match doc.get_mut(head) {
            Some(Value::Object(inner)) => remove(inner, rest),
            _ => false,
        },
    }
}

/// Returns the document id as a string, if present.
#[must_use]
pub fn id_of(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Converts any serializable record into a document.
///
/// # Errors
/// Returns [`StoreError::Serialization`] if the value does not serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Invalid(format!(
            "record must serialize to an object, got {}",
            kind_name(&other)
        ))),
    }
}

/// Converts a document back into a typed record.
///
/// # Errors
/// Returns [`StoreError::Serialization`] if the document does not match `T`.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn lookup_follows_dotted_paths() {
        let d = doc(json!({ "address": { "city": "Lyon" }, "seats": 5 }));
        assert_eq!(lookup(&d, "address.city"), Some(&json!("Lyon")));
        assert_eq!(lookup(&d, "seats"), Some(&json!(5)));
        assert_eq!(lookup(&d, "address.zip"), None);
        assert_eq!(lookup(&d, "seats.value"), None);
    }

    #[test]
    fn assign_creates_intermediate_objects() {
        let mut d = Document::new();
        assert!(assign(&mut d, "pricing.daily", json!(49)));
        assert!(!assign(&mut d, "pricing.daily", json!(49)));
        assert_eq!(lookup(&d, "pricing.daily"), Some(&json!(49)));
    }

    #[test]
    fn remove_nested_field() {
        let mut d = doc(json!({ "pricing": { "daily": 49, "weekly": 300 } }));
        assert!(remove(&mut d, "pricing.weekly"));
        assert!(!remove(&mut d, "pricing.weekly"));
        assert_eq!(d, doc(json!({ "pricing": { "daily": 49 } })));
    }

    #[test]
    fn to_document_rejects_non_objects() {
        assert!(to_document(&5).is_err());
        assert!(to_document(&json!({ "a": 1 })).is_ok());
    }
}
