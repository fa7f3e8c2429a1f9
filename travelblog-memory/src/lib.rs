//! In-memory storage backend for travelblog.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is ideal for tests and for running the API without touching the filesystem.
//!
//! # Quick Start
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//! use travelblog_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let backend = InMemoryStore::builder()
//!         .with_collection("users", vec![])
//!         .build()
//!         .await?;
//!     let store = DocumentStore::new(backend);
//!
//!     let user = store
//!         .collection("users")
//!         .insert(serde_json::json!({ "username": "ana" }).as_object().cloned().unwrap_or_default())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as travelblog_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
