use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};

use travelblog_core::record::{Record, RecordId};

use super::{extract::Payload, AppState};
use crate::error::BlogResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/comments", post(add_comment))
}

async fn list_posts(State(state): State<AppState>) -> BlogResult<Json<Vec<Record>>> {
    Ok(Json(state.service.list_posts().await?))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<Record>> {
    Ok(Json(state.service.get_post(&RecordId::new(id)).await?))
}

async fn create_post(
    State(state): State<AppState>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<(StatusCode, Json<Record>)> {
    let post = state.service.create_post(fields).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<Json<Record>> {
    Ok(Json(
        state.service.update_post(&RecordId::new(id), fields).await?,
    ))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<Value>> {
    state.service.delete_post(&RecordId::new(id)).await?;

    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<(StatusCode, Json<Record>)> {
    let comment = state.service.add_comment(&RecordId::new(id), fields).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
