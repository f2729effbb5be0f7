//! JSON body extractor whose rejections use the API error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Drop-in for [`axum::Json`] in handler arguments.
///
/// A missing content type, malformed JSON, or a body of the wrong shape
/// becomes a 400 `BAD_REQUEST` `{error, code}` response instead of axum's
/// plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection)),
        }
    }
}

fn rejected(rejection: JsonRejection) -> AppError {
    tracing::debug!(status = %rejection.status(), error = %rejection, "Rejected JSON body");
    AppError::BadRequest(rejection.body_text())
}
