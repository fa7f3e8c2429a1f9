use serde_json::{Map, Value};

use travelblog_core::prelude::*;

use super::first_duplicate;

const DATE_FIELD: &str = "date";

#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[document(collection = "posts", validate = Post::check)]
pub struct Post {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Record>>,
}

impl Post {
    fn check(&self) -> DocumentStoreResult<()> {
        match first_duplicate(self.comments.iter().flatten().filter_map(Record::id)) {
            Some(id) => Err(DocumentStoreError::InvalidDocument(format!(
                "comments contains id {id} more than once"
            ))),
            None => Ok(()),
        }
    }

    pub fn has_comment(&self, id: &RecordId) -> bool {
        self.comments
            .iter()
            .flatten()
            .any(|comment| comment.has_id(id))
    }

    /// Appends a comment stamped with `id` and `date` and returns it.
    ///
    /// The stamps win over same-named fields in the body.
    pub fn add_comment(&mut self, id: &RecordId, fields: Map<String, Value>, date: String) -> Record {
        let mut comment = Record::with_id(id, fields);
        comment.merge(Map::from_iter([(DATE_FIELD.to_string(), Value::String(date))]));

        self.comments
            .get_or_insert_with(Vec::new)
            .push(comment.clone());

        comment
    }
}
