//! Operator Extractor
//!
//! The auth gateway in front of the edge server authenticates the session
//! and forwards the operator id in `X-Operator-Id`. Handlers that mutate
//! orders take [`CurrentOperator`] and pass the id down explicitly.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::utils::AppError;

/// Header set by the auth gateway
pub const OPERATOR_HEADER: &str = "x-operator-id";

/// Operator performing the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOperator {
    pub id: i64,
}

impl<S> FromRequestParts<S> for CurrentOperator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(op) = parts.extensions.get::<CurrentOperator>() {
            return Ok(*op);
        }

        let Some(raw) = parts.headers.get(OPERATOR_HEADER) else {
            tracing::warn!(target: "security", uri = %parts.uri, "Request without operator id");
            return Err(AppError::not_authenticated());
        };

        let id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                tracing::warn!(target: "security", uri = %parts.uri, "Malformed operator id");
                AppError::not_authenticated().with_detail("header", OPERATOR_HEADER)
            })?;

        let op = CurrentOperator { id };
        parts.extensions.insert(op);
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    async fn extract(header: Option<&str>) -> Result<CurrentOperator, AppError> {
        let mut builder = http::Request::builder().uri("/api/orders");
        if let Some(v) = header {
            builder = builder.header(OPERATOR_HEADER, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentOperator::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_operator_id() {
        assert_eq!(extract(Some(" 42 ")).await.unwrap(), CurrentOperator { id: 42 });
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_header() {
        for header in [None, Some("abc"), Some("0"), Some("-3")] {
            let err = extract(header).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::NotAuthenticated);
        }
    }
}
