use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use travelblog_core::record::{Record, RecordId};

use super::{extract::Payload, AppState};
use crate::{
    error::{BlogError, BlogResult},
    model::{Projection, Registration},
};

#[derive(Debug, Deserialize)]
struct DestinationBody {
    destination: Value,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteBody {
    #[serde(rename = "postId")]
    pub post_id: RecordId,
}

pub fn routes() -> Router<AppState> {
    let router = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/register", post(register))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/profile", put(update_user))
        .route("/:id/itineraries", post(add_itinerary))
        .route("/:id/savedDestinations", post(add_saved_destination))
        .route("/:id/favoritePostIds", get(favorite_post_ids).post(add_favorite))
        .route(
            "/:id/favoritePostIds/:post_id",
            get(is_favorite).delete(remove_favorite),
        );

    Projection::ALL.into_iter().fold(router, |router, projection| {
        router.route(
            &format!("/:id/{}", projection.segment()),
            get(move |state: State<AppState>, path: Path<String>| {
                user_view(state, path, projection)
            }),
        )
    })
}

async fn list_users(State(state): State<AppState>) -> BlogResult<Json<Vec<Record>>> {
    Ok(Json(state.service.list_users().await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<Record>> {
    Ok(Json(state.service.get_user(&RecordId::new(id)).await?))
}

/// `GET /api/users/:id/<segment>` for the lowercase single-field views.
async fn user_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    projection: Projection,
) -> BlogResult<Json<Value>> {
    let view = state
        .service
        .user_view(&RecordId::new(id), projection)
        .await?;

    Ok(Json(view))
}

async fn create_user(
    State(state): State<AppState>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<(StatusCode, Json<Record>)> {
    let user = state.service.create_user(fields).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn register(
    State(state): State<AppState>,
    Payload(registration): Payload<Registration>,
) -> BlogResult<(StatusCode, Json<Value>)> {
    let user = state.service.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user": user })),
    ))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<Json<Record>> {
    Ok(Json(
        state.service.update_user(&RecordId::new(id), fields).await?,
    ))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<Value>> {
    state.service.delete_user(&RecordId::new(id)).await?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

async fn add_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload<Map<String, Value>>,
) -> BlogResult<(StatusCode, Json<Record>)> {
    let itinerary = state
        .service
        .add_itinerary(&RecordId::new(id), fields)
        .await?;

    Ok((StatusCode::CREATED, Json(itinerary)))
}

async fn add_saved_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<DestinationBody>,
) -> BlogResult<(StatusCode, Json<Vec<Value>>)> {
    if body.destination.is_null() {
        return Err(BlogError::Validation("destination is required".into()));
    }

    let destinations = state
        .service
        .add_saved_destination(&RecordId::new(id), body.destination)
        .await?;

    Ok((StatusCode::CREATED, Json(destinations)))
}

async fn favorite_post_ids(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<Vec<Value>>> {
    Ok(Json(
        state.service.favorite_post_ids(&RecordId::new(id)).await?,
    ))
}

async fn is_favorite(
    State(state): State<AppState>,
    Path((id, post_id)): Path<(String, String)>,
) -> BlogResult<Json<bool>> {
    let favorite = state
        .service
        .is_favorite(&RecordId::new(id), &RecordId::new(post_id))
        .await?;

    Ok(Json(favorite))
}

async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<FavoriteBody>,
) -> BlogResult<(StatusCode, Json<Vec<Value>>)> {
    let favorites = state
        .service
        .add_favorite(&RecordId::new(id), &body.post_id)
        .await?;

    Ok((StatusCode::CREATED, Json(favorites)))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Path((id, post_id)): Path<(String, String)>,
) -> BlogResult<Json<Vec<Value>>> {
    let favorites = state
        .service
        .remove_favorite(&RecordId::new(id), &RecordId::new(post_id))
        .await?;

    Ok(Json(favorites))
}
