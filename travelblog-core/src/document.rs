//! Core traits for typed documents.
//!
//! Collections store untyped [`Record`]s. A type implementing [`Document`] describes the
//! shape of the records in one collection, and [`DocumentExt`] converts between the two.

use serde::{Deserialize, Serialize};
use serde_json::{from_value, to_value, Value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    record::{Record, RecordId},
};

/// Core trait that all typed documents stored in a document store must implement.
///
/// Every document has a canonical identifier and names the collection it belongs to.
/// Usually derived:
///
/// ```ignore
/// use travelblog_core::prelude::*;
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "users")]
/// pub struct User {
///     pub id: RecordId,
///     pub username: String,
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's identifier.
    fn id(&self) -> &RecordId;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "users", "posts").
    fn collection_name() -> &'static str;

    /// Top-level fields whose values must be unique across the collection.
    ///
    /// Absent and `null` values are not compared.
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Checks type-level invariants before the document is written.
    ///
    /// The default accepts everything.
    fn validate(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Conversion helpers, implemented for every [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a record for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or does not yield a JSON object.
    fn to_record(&self) -> DocumentStoreResult<Record>;

    /// Reads a document from a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Serialization`] if the record does not have this
    /// document's shape.
    fn from_record(record: Record) -> DocumentStoreResult<Self>;

    /// Creates a document from a JSON value supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the value does not have this
    /// document's shape.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_record(&self) -> DocumentStoreResult<Record> {
        Record::try_from(to_value(self)?)
    }

    fn from_record(record: Record) -> DocumentStoreResult<Self> {
        Ok(from_value(Value::from(record))?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        from_value(value).map_err(|e| DocumentStoreError::InvalidDocument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize, travelblog_macros::Document)]
    #[document(collection = "postcards", unique = "city", validate = Postcard::check)]
    struct Postcard {
        id: RecordId,
        city: String,
    }

    impl Postcard {
        fn check(&self) -> DocumentStoreResult<()> {
            if self.city.is_empty() {
                return Err(DocumentStoreError::InvalidDocument("city is required".into()));
            }

            Ok(())
        }
    }

    #[test]
    fn derive_wires_id_collection_and_validation() {
        let card = Postcard::from_json(json!({ "id": 5, "city": "Oslo" })).unwrap();

        assert_eq!(card.id(), &RecordId::from("5"));
        assert_eq!(Postcard::collection_name(), "postcards");
        assert_eq!(Postcard::unique_fields(), &["city"]);
        assert!(card.validate().is_ok());

        let blank = Postcard { id: "6".into(), city: String::new() };
        assert!(matches!(blank.validate(), Err(DocumentStoreError::InvalidDocument(_))));
    }

    #[test]
    fn records_convert_both_ways() {
        let card = Postcard { id: "7".into(), city: "Rome".into() };
        let record = card.to_record().unwrap();

        assert_eq!(Value::from(record.clone()), json!({ "id": "7", "city": "Rome" }));
        assert_eq!(Postcard::from_record(record).unwrap().city, "Rome");
    }

    #[test]
    fn caller_shape_errors_are_invalid_documents() {
        let err = Postcard::from_json(json!({ "id": "1" })).unwrap_err();

        assert!(matches!(err, DocumentStoreError::InvalidDocument(_)));
    }
}
