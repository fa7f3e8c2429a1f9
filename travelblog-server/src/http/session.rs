//! Routes acting on the current user.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use travelblog_core::record::Record;

use super::{extract::Payload, identity::CurrentUser, users::FavoriteBody, AppState};
use crate::error::BlogResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/current-user", get(current_user))
        .route("/api/add-favorite", post(add_favorite))
        .route("/api/remove-favorite", post(remove_favorite))
}

async fn current_user(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
) -> BlogResult<Json<Record>> {
    Ok(Json(state.service.get_user(&id).await?))
}

async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
    Payload(body): Payload<FavoriteBody>,
) -> BlogResult<Json<Value>> {
    state.service.add_favorite(&id, &body.post_id).await?;

    Ok(Json(json!({ "success": true })))
}

async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
    Payload(body): Payload<FavoriteBody>,
) -> BlogResult<Json<Value>> {
    state.service.remove_favorite(&id, &body.post_id).await?;

    Ok(Json(json!({ "success": true })))
}
