// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::refresh::RefreshError;
use crate::upstream::UpstreamError;

/// Errors returned by HTTP handlers, rendered as a JSON `{error, details}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One of the external data sources failed or returned a non-success status.
    #[error("External data source unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Upstream(e) => AppError::UpstreamUnavailable(e),
            RefreshError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::UpstreamUnavailable(e) => {
                tracing::warn!(source = e.source_name, reason = %e.reason, "Upstream unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "External data source unavailable",
                        "details": format!("Could not fetch data from {}", e.source_name),
                    }),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "details": format!("{e:#}"),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let upstream = AppError::from(UpstreamError {
            source_name: "exchange rate API",
            reason: "timed out".to_string(),
        });
        assert_eq!(upstream.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let missing = AppError::NotFound("Country not found".to_string());
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let internal = AppError::from(anyhow::anyhow!("disk full"));
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_body_carries_details() {
        let err = AppError::from(anyhow::anyhow!("disk full").context("Failed to commit refresh"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["details"], "Failed to commit refresh: disk full");
    }

    #[test]
    fn test_refresh_error_mapping() {
        let err: AppError = RefreshError::Internal(anyhow::anyhow!("boom")).into();
        assert!(matches!(err, AppError::Internal(_)));

        let err: AppError = RefreshError::Upstream(UpstreamError {
            source_name: "countries API",
            reason: "503".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }
}
