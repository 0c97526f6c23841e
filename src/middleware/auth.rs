//! API token check for invocation endpoints
//!
//! Compares the `X-Api-Token` header against a fixed expected value.
//! When no token is configured the check passes every request, so a
//! bare development gateway needs no setup.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Header carrying the token
pub const TOKEN_HEADER: &str = "x-api-token";

/// Expected token value, injected per gateway via `Extension`.
/// `None` disables the check.
#[derive(Debug, Clone)]
pub struct ExpectedToken(pub Option<String>);

/// Rejection for a missing or mismatched token
pub struct TokenRejection;

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid or missing API token"})),
        )
            .into_response()
    }
}

/// Axum extractor that enforces the token check.
pub struct RequireToken;

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = TokenRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let expected = parts
            .extensions
            .get::<Arc<ExpectedToken>>()
            .and_then(|t| t.0.clone());

        let Some(expected) = expected else {
            return Ok(RequireToken);
        };

        let presented = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        match presented {
            Some(token) if token == expected => Ok(RequireToken),
            _ => Err(TokenRejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(expected: Option<&str>, presented: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/query");
        if let Some(token) = presented {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let mut request = builder.body(()).unwrap();
        request
            .extensions_mut()
            .insert(Arc::new(ExpectedToken(expected.map(String::from))));
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_no_expected_token_passes() {
        let mut parts = parts_with(None, None);
        assert!(RequireToken::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_matching_token_passes() {
        let mut parts = parts_with(Some("secret"), Some("secret"));
        assert!(RequireToken::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let mut parts = parts_with(Some("secret"), None);
        assert!(RequireToken::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let mut parts = parts_with(Some("secret"), Some("other"));
        assert!(RequireToken::from_request_parts(&mut parts, &()).await.is_err());
    }
}
