//! Use cases behind the HTTP routes.
//!
//! Each operation is one store call: a read, or a single locked load-mutate-save cycle over
//! the whole collection. A failing mutation returns before anything is saved. Records leave
//! the service with their password stripped.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use travelblog_core::prelude::*;

use crate::{
    config::DeletePolicy,
    error::{BlogError, BlogResult},
    model::{redact, timestamp, Post, Projection, Registration, User},
};

const USER_NOT_FOUND: &str = "User not found";
const POST_NOT_FOUND: &str = "Post not found";

type Users<'a> = TypedCollection<'a, Box<dyn StoreBackend>, User>;
type Posts<'a> = TypedCollection<'a, Box<dyn StoreBackend>, Post>;

#[derive(Debug, Clone)]
pub struct BlogService {
    store: Arc<DynDocumentStore>,
    delete_policy: DeletePolicy,
}

impl BlogService {
    pub fn new(store: DynDocumentStore, delete_policy: DeletePolicy) -> Self {
        Self {
            store: Arc::new(store),
            delete_policy,
        }
    }

    /// Shuts the store down once no other handle to it is left.
    pub async fn shutdown(self) -> BlogResult<()> {
        match Arc::try_unwrap(self.store) {
            Ok(store) => Ok(store.shutdown().await?),
            Err(_) => {
                warn!("document store still shared, skipping backend shutdown");
                Ok(())
            }
        }
    }

    fn users(&self) -> Users<'_> {
        self.store.typed_collection::<User>()
    }

    fn posts(&self) -> Posts<'_> {
        self.store.typed_collection::<Post>()
    }

    fn check_deleted(&self, deleted: bool, missing: &str) -> BlogResult<()> {
        match (deleted, self.delete_policy) {
            (false, DeletePolicy::Strict) => Err(BlogError::not_found(missing)),
            _ => Ok(()),
        }
    }

    pub async fn list_users(&self) -> BlogResult<Vec<Record>> {
        let users = self.users().untyped().all().await?;

        Ok(users.into_iter().map(redact).collect())
    }

    async fn user_record(&self, id: &RecordId) -> BlogResult<Record> {
        self.users()
            .untyped()
            .get(id)
            .await?
            .ok_or_else(|| BlogError::not_found(USER_NOT_FOUND))
    }

    async fn user(&self, id: &RecordId) -> BlogResult<User> {
        self.users()
            .get(id)
            .await?
            .ok_or_else(|| BlogError::not_found(USER_NOT_FOUND))
    }

    pub async fn get_user(&self, id: &RecordId) -> BlogResult<Record> {
        self.user_record(id).await.map(redact)
    }

    pub async fn user_view(&self, id: &RecordId, projection: Projection) -> BlogResult<Value> {
        let user = self.user_record(id).await?;

        Ok(projection.apply(&user))
    }

    pub async fn create_user(&self, fields: Map<String, Value>) -> BlogResult<Record> {
        let user = self.users().insert(fields).await?;
        info!(id = ?user.id(), "created user");

        Ok(redact(user))
    }

    /// Validates a registration and stores the full default user shape for it.
    pub async fn register(&self, registration: Registration) -> BlogResult<Record> {
        registration.validate()?;

        self.create_user(registration.into_fields(timestamp())).await
    }

    pub async fn update_user(
        &self,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> BlogResult<Record> {
        let user = self.users().update(id, fields).await?;
        debug!(%id, "updated user");

        Ok(redact(user))
    }

    pub async fn delete_user(&self, id: &RecordId) -> BlogResult<()> {
        let deleted = self.users().delete(id).await?;
        info!(%id, deleted, "delete user");

        self.check_deleted(deleted, USER_NOT_FOUND)
    }

    pub async fn add_itinerary(
        &self,
        user_id: &RecordId,
        fields: Map<String, Value>,
    ) -> BlogResult<Record> {
        let ids = self.store.ids();

        self.users()
            .modify(user_id, |user| {
                let id = ids.next_unused(|id| user.has_itinerary(id));
                Ok(user.add_itinerary(&id, fields))
            })
            .await
    }

    pub async fn add_saved_destination(
        &self,
        user_id: &RecordId,
        destination: Value,
    ) -> BlogResult<Vec<Value>> {
        self.users()
            .modify(user_id, |user| {
                user.add_saved_destination(destination);
                Ok(user.saved_destinations().to_vec())
            })
            .await
    }

    pub async fn favorite_post_ids(&self, user_id: &RecordId) -> BlogResult<Vec<Value>> {
        Ok(self.user(user_id).await?.favorites().to_vec())
    }

    pub async fn is_favorite(&self, user_id: &RecordId, post_id: &RecordId) -> BlogResult<bool> {
        Ok(self.user(user_id).await?.is_favorite(post_id))
    }

    pub async fn add_favorite(
        &self,
        user_id: &RecordId,
        post_id: &RecordId,
    ) -> BlogResult<Vec<Value>> {
        self.users()
            .modify(user_id, |user| {
                user.add_favorite(post_id)?;
                Ok(user.favorites().to_vec())
            })
            .await
    }

    pub async fn remove_favorite(
        &self,
        user_id: &RecordId,
        post_id: &RecordId,
    ) -> BlogResult<Vec<Value>> {
        self.users()
            .modify(user_id, |user| {
                user.remove_favorite(post_id)?;
                Ok(user.favorites().to_vec())
            })
            .await
    }

    pub async fn list_posts(&self) -> BlogResult<Vec<Record>> {
        Ok(self.posts().untyped().all().await?)
    }

    pub async fn get_post(&self, id: &RecordId) -> BlogResult<Record> {
        self.posts()
            .untyped()
            .get(id)
            .await?
            .ok_or_else(|| BlogError::not_found(POST_NOT_FOUND))
    }

    pub async fn create_post(&self, fields: Map<String, Value>) -> BlogResult<Record> {
        let post = self.posts().insert(fields).await?;
        info!(id = ?post.id(), "created post");

        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> BlogResult<Record> {
        Ok(self.posts().update(id, fields).await?)
    }

    pub async fn delete_post(&self, id: &RecordId) -> BlogResult<()> {
        let deleted = self.posts().delete(id).await?;
        info!(%id, deleted, "delete post");

        self.check_deleted(deleted, POST_NOT_FOUND)
    }

    /// Appends a comment stamped with a fresh id and the current time.
    pub async fn add_comment(
        &self,
        post_id: &RecordId,
        fields: Map<String, Value>,
    ) -> BlogResult<Record> {
        let ids = self.store.ids();

        self.posts()
            .modify(post_id, |post| {
                let id = ids.next_unused(|id| post.has_comment(id));
                Ok(post.add_comment(&id, fields, timestamp()))
            })
            .await
    }
}
