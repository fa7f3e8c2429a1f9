//! Resolution of the user a request acts as.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName},
};
use std::fmt::Debug;

use travelblog_core::record::RecordId;

use super::AppState;
use crate::error::BlogError;

/// Resolves the identity of the caller from request metadata.
pub trait IdentityProvider: Send + Sync + Debug {
    fn identify(&self, parts: &Parts) -> Option<RecordId>;
}

/// Reads the user id from a request header, falling back to a fixed id if configured.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
    fallback: Option<RecordId>,
}

impl HeaderIdentity {
    pub const DEFAULT_HEADER: &'static str = "x-user-id";

    pub fn new(fallback: Option<RecordId>) -> Self {
        Self {
            header: HeaderName::from_static(Self::DEFAULT_HEADER),
            fallback,
        }
    }

    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }
}

impl IdentityProvider for HeaderIdentity {
    fn identify(&self, parts: &Parts) -> Option<RecordId> {
        parts
            .headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(RecordId::from)
            .or_else(|| self.fallback.clone())
    }
}

/// The user a request acts as. Rejects with 401 when no identity resolves.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RecordId);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BlogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity
            .identify(parts)
            .map(Self)
            .ok_or(BlogError::Unauthorized)
    }
}
