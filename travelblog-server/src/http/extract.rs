use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::error::BlogError;

/// JSON request body whose rejections render as validation errors.
///
/// Malformed JSON, a missing JSON content type and bodies of the wrong shape (an array where
/// an object is expected) all answer 400 with the usual `{ "error": ... }` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = BlogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| BlogError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}
