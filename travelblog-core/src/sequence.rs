//! Id-keyed primitives over an in-memory record sequence.
//!
//! These operate on a collection after it has been loaded and before it is saved. They never
//! touch storage; [`crate::collection::Collection`] composes them with `load` and `save`.

use serde_json::{Map, Value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    id::IdGenerator,
    record::{Record, RecordId},
};

/// Returns the first record with the given id.
pub fn find_by_id<'a>(records: &'a [Record], id: &RecordId) -> Option<&'a Record> {
    records.iter().find(|r| r.has_id(id))
}

/// Returns the position of the first record with the given id.
pub fn position_by_id(records: &[Record], id: &RecordId) -> Option<usize> {
    records.iter().position(|r| r.has_id(id))
}

/// Appends a new record built from `fields` and returns it.
///
/// The id is drawn from `ids` and is guaranteed not to clash with any record already in the
/// sequence. An `id` inside `fields` is ignored.
pub fn insert(records: &mut Vec<Record>, fields: Map<String, Value>, ids: &IdGenerator) -> Record {
    let id = ids.next_unused(|candidate| records.iter().any(|r| r.has_id(candidate)));
    let record = Record::with_id(&id, fields);

    records.push(record.clone());
    record
}

/// Shallow-merges `fields` onto the record with the given id and returns the merged record.
pub fn update(
    records: &mut [Record],
    id: &RecordId,
    fields: Map<String, Value>,
    collection: &str,
) -> DocumentStoreResult<Record> {
    let index = position_by_id(records, id).ok_or_else(|| {
        DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string())
    })?;

    records[index].merge(fields);
    Ok(records[index].clone())
}

/// Removes the first record with the given id, returning whether one was removed.
pub fn delete(records: &mut Vec<Record>, id: &RecordId) -> bool {
    match position_by_id(records, id) {
        Some(index) => {
            records.remove(index);
            true
        }
        None => false,
    }
}
