//! Common extractors for API handlers.
//!
//! Request bodies and path ids are turned into [`ApiError`]s here so every
//! rejection shares the structured error format.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts},
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// Request body that has been deserialized and passed `validator` checks.
///
/// `application/x-www-form-urlencoded` bodies are read as forms; anything
/// else goes through the JSON extractor. Forms carry scalar fields only, so
/// list fields such as `students` must be sent as JSON.
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        };
        value.validate()?;
        Ok(ValidatedBody(value))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Integer resource id from the path.
///
/// A non-integer id cannot name a stored resource, so it is reported as
/// `NotFound` rather than as a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl ResourceId {
    pub fn parse(raw: &str) -> Result<i64, ApiError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| ApiError::NotFound(format!("No resource with id '{}'", raw)))
    }
}

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        ResourceId::parse(&raw).map(ResourceId)
    }
}
