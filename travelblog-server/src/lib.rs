//! Travel blog HTTP API over flat JSON document collections.
//!
//! Users and posts live in two collections of a [`travelblog_core`] document store. Every
//! request reads the whole collection, and every write rewrites it under the collection's
//! write lock.
//!
//! - [`config`] - environment configuration
//! - [`model`] - user and post records and their sub-collection rules
//! - [`service`] - the operations behind each route
//! - [`http`] - axum routes, extractors and middleware
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load()?;
//! let service = BlogService::new(open_store(&config).await?, config.delete_policy);
//! let state = AppState::new(service, HeaderIdentity::new(config.demo_user_id.clone()));
//!
//! axum::serve(listener, http::app(state, config.cors_origin.clone())).await?;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod service;
pub mod telemetry;

use travelblog_core::prelude::*;
use travelblog_fs::JsonFileStore;
use travelblog_memory::InMemoryStore;

use config::{BackendKind, Config};
use model::{Post, User};

pub use error::{BlogError, BlogResult};
pub use http::{identity::HeaderIdentity, AppState};
pub use service::BlogService;

/// Opens the document store selected by `config`, with the users and posts collections.
pub async fn open_store(config: &Config) -> DocumentStoreResult<DynDocumentStore> {
    let users = User::collection_name();
    let posts = Post::collection_name();

    let store = match config.backend {
        BackendKind::Fs => {
            let backend = JsonFileStore::builder(&config.data_dir)
                .with_file(users, &config.users_file)
                .with_file(posts, &config.posts_file)
                .create_missing(config.create_missing)
                .build()
                .await?;

            DocumentStore::new(backend).into_dyn()
        }
        BackendKind::Memory => {
            let backend = InMemoryStore::builder()
                .with_collection(users, Vec::new())
                .with_collection(posts, Vec::new())
                .build()
                .await?;

            DocumentStore::new(backend).into_dyn()
        }
    };

    Ok(store)
}
