//! Untyped records and their canonical identifiers.
//!
//! A [`Record`] is one JSON object of a collection. Its fields are open-ended and kept in
//! the order they were read, so a collection that is loaded and saved without changes is
//! written back unchanged.
//!
//! Collection files in the wild mix numeric and string ids (`1` next to `"1718031234567"`).
//! [`RecordId`] is the single canonical form: ids are always compared as strings, and a
//! stored number is read as its decimal representation.

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use std::{convert::Infallible, fmt, str::FromStr};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the identifier field on every record.
pub const ID_FIELD: &str = "id";

/// Canonical identifier of a record or sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an id out of a stored JSON value.
    ///
    /// Strings are taken as-is and numbers by their decimal form. Any other value has no id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Returns `true` if the stored JSON value denotes this id.
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s == &self.0,
            Value::Number(n) => n.to_string() == self.0,
            _ => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::String(id.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(RecordId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(RecordId(v.to_string()))
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// One JSON object stored in a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a record from a caller payload, placing `id` first.
    ///
    /// Any `id` carried by the payload is discarded.
    pub fn with_id(id: &RecordId, fields: Map<String, Value>) -> Self {
        let mut map = Map::with_capacity(fields.len() + 1);
        map.insert(ID_FIELD.to_string(), id.clone().into());

        for (key, value) in fields {
            if key != ID_FIELD {
                map.insert(key, value);
            }
        }

        Self(map)
    }

    /// Returns this record's canonical id, if it carries one.
    pub fn id(&self) -> Option<RecordId> {
        self.0.get(ID_FIELD).and_then(RecordId::from_value)
    }

    pub fn has_id(&self, id: &RecordId) -> bool {
        self.0.get(ID_FIELD).is_some_and(|v| id.matches(v))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Shallow-merges `fields` onto this record.
    ///
    /// Supplied top-level fields replace existing ones in place, new fields are appended and
    /// everything else is retained. The `id` field is never overwritten.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            if key != ID_FIELD {
                self.0.insert(key, value);
            }
        }
    }

    /// Returns a copy of this record without the named fields.
    pub fn without(&self, fields: &[&str]) -> Self {
        let mut map = self.0.clone();
        map.retain(|key, _| !fields.contains(&key.as_str()));

        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl TryFrom<Value> for Record {
    type Error = DocumentStoreError;

    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentStoreError::Serialization(format!(
                "expected a JSON object, found {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn numeric_and_string_ids_compare_canonically() {
        let id: RecordId = "1".parse().unwrap();

        assert!(record(json!({ "id": 1 })).has_id(&id));
        assert!(record(json!({ "id": "1" })).has_id(&id));
        assert!(!record(json!({ "id": "01" })).has_id(&id));
        assert!(!record(json!({ "name": "no id" })).has_id(&id));
    }

    #[test]
    fn ids_deserialize_from_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([7, "7", "abc"])).unwrap();

        assert_eq!(ids, vec![RecordId::from(7), RecordId::from("7"), RecordId::from("abc")]);
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!("7"));
    }

    #[test]
    fn with_id_puts_id_first_and_drops_caller_id() {
        let fields = json!({ "title": "Lisbon", "id": "mine" });
        let rec = Record::with_id(&RecordId::from("42"), fields.as_object().unwrap().clone());

        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"id":"42","title":"Lisbon"}"#);
    }

    #[test]
    fn merge_is_shallow_and_keeps_id() {
        let mut rec = record(json!({
            "id": 3,
            "bio": "old",
            "socialMedia": { "twitter": "@a", "instagram": "a" },
            "postIds": ["1"]
        }));

        rec.merge(
            json!({ "id": 99, "bio": "new", "socialMedia": { "twitter": "@b" }, "city": "Porto" })
                .as_object()
                .unwrap()
                .clone(),
        );

        assert_eq!(
            Value::from(rec),
            json!({
                "id": 3,
                "bio": "new",
                "socialMedia": { "twitter": "@b" },
                "postIds": ["1"],
                "city": "Porto"
            })
        );
    }

    #[test]
    fn without_preserves_remaining_order() {
        let rec = record(json!({ "id": "1", "password": "x", "username": "ana", "email": "a@x.io" }));

        assert_eq!(
            serde_json::to_string(&rec.without(&["password"])).unwrap(),
            r#"{"id":"1","username":"ana","email":"a@x.io"}"#
        );
    }

    #[test]
    fn non_objects_are_not_records() {
        let err = Record::try_from(json!([1, 2])).unwrap_err();

        assert!(matches!(err, DocumentStoreError::Serialization(_)));
    }
}
