//! Record schema for users and posts.
//!
//! The typed structs model only the fields the API reasons about (unique keys and nested
//! sub-collections). Everything else a record carries stays in the raw [`Record`] and is
//! stored and returned untouched.

pub mod post;
pub mod user;

use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;

use travelblog_core::record::{Record, RecordId};

pub use post::Post;
pub use user::{Projection, Registration, User};

/// Field that is stored but never returned.
pub const PASSWORD_FIELD: &str = "password";

/// Strips the password from a record about to leave the service.
pub fn redact(record: Record) -> Record {
    record.without(&[PASSWORD_FIELD])
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn first_duplicate(ids: impl IntoIterator<Item = RecordId>) -> Option<RecordId> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(id.clone()))
}
