//! Custom Axum extractors
//!
//! Wrappers over axum's `Json`, `Query` and `Path` whose rejections render
//! as the response envelope instead of axum's plain-text bodies.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body whose rejections become 400 envelopes.
///
/// Covers syntax errors, shape mismatches, oversized bodies, and a missing
/// or wrong `Content-Type`; none of them should ever surface as a server error.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::Validation(ValidationError::BodyTooLarge)
                } else {
                    ApiError::Validation(ValidationError::malformed(rejection.body_text()))
                }
            })?;

        Ok(Self(value))
    }
}

/// Query string extractor with envelope rejections
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                ApiError::Validation(ValidationError::invalid_parameter(rejection.body_text()))
            })?;

        Ok(Self(value))
    }
}

/// Path parameter extractor with envelope rejections
///
/// Percent-decoding failures (e.g. `%FF`) land here.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                ApiError::Validation(ValidationError::invalid_parameter(rejection.body_text()))
            })?;

        Ok(Self(value))
    }
}

/// First value of a repeated query parameter, as `?k=a&k=b` yields `a`
pub fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_param_wins() {
        let params = vec![
            ("other".to_string(), "x".to_string()),
            ("sourceDB".to_string(), "Neo4j".to_string()),
            ("sourceDB".to_string(), "IndexedDB".to_string()),
        ];
        assert_eq!(first_param(&params, "sourceDB"), Some("Neo4j"));
        assert_eq!(first_param(&params, "missing"), None);
    }
}
