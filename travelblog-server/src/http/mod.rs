//! HTTP surface: routes, extractors and the middleware stack.
//!
//! All bodies are JSON. Errors render as `{ "error": ... }` with the status of their kind;
//! unmatched routes answer a plain-text `404 Route not found`.

pub mod extract;
pub mod identity;
pub mod posts;
pub mod session;
pub mod users;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::service::BlogService;
use identity::{HeaderIdentity, IdentityProvider};

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: BlogService,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(service: BlogService, identity: impl IdentityProvider + 'static) -> Self {
        Self {
            service,
            identity: Arc::new(identity),
        }
    }
}

/// Routes only, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .nest("/api/users", users::routes())
        .nest("/api/posts", posts::routes())
        .merge(session::routes())
        .fallback(fallback)
        .with_state(state)
}

/// Routes wrapped in CORS and request tracing.
///
/// With an `origin`, CORS only admits that origin; otherwise any origin is allowed.
pub fn app(state: AppState, origin: Option<HeaderValue>) -> Router {
    router(state)
        .layer(cors(origin))
        .layer(TraceLayer::new_for_http())
}

fn cors(origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(HeaderIdentity::DEFAULT_HEADER),
        ]);

    match origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Travel Blog API" }))
}

async fn fallback(method: Method, uri: Uri) -> impl IntoResponse {
    info!(%method, %uri, "route not found");
    (StatusCode::NOT_FOUND, "Route not found")
}
