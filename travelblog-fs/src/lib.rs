//! JSON file backend for travelblog.
//!
//! Each collection lives in one UTF-8 file holding a two-space-indented JSON array of objects.
//! Collections are always read and written whole. Writes go to a temporary file in the same
//! directory which is then renamed over the collection file, so readers never see a partial
//! write.
//!
//! # Example
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//! use travelblog_fs::JsonFileStore;
//!
//! let backend = JsonFileStore::builder("./data")
//!     .with_file("posts", "data.json")
//!     .create_missing(true)
//!     .build()
//!     .await?;
//!
//! let store = DocumentStore::new(backend);
//! ```

#[allow(unused_extern_crates)]
extern crate self as travelblog_fs;

pub mod store;

pub use store::{JsonFileStore, JsonFileStoreBuilder};
