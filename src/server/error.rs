//! Request failures and their HTTP representation.
//!
//! Bodies are plain text meant for humans. The cache endpoint never puts
//! detail in a body; backup failures embed the underlying error because the
//! server is only reachable from the same pod.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::backup::BackupError;
use crate::cache::CacheError;
use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum WebError {
    /// Unknown cache key or cache miss; the two are indistinguishable to callers.
    #[error("not found")]
    NotFound,

    /// The cache store failed or the value could not be encoded.
    #[error("cache failure: {0}")]
    Cache(String),

    #[error("Missing backup name parameter")]
    MissingBackupName,

    #[error("error while getting cluster: {0}")]
    ClusterFetch(#[source] ClientError),

    #[error("error while getting backup: {0}")]
    BackupFetch(#[source] ClientError),

    #[error("Backup not configured in the cluster")]
    BackupNotConfigured,

    #[error("error while starting backup: {0}")]
    BackupStart(#[source] BackupError),
}

impl From<CacheError> for WebError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Miss => WebError::NotFound,
            other => WebError::Cache(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        WebError::Cache(format!("encoding cached value: {}", err))
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::MissingBackupName => StatusCode::BAD_REQUEST,
            WebError::ClusterFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::BackupFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::BackupNotConfigured => StatusCode::CONFLICT,
            WebError::BackupStart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is on this side rather than in the request.
    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Whether the message may be shown to the caller.
    fn exposes_detail(&self) -> bool {
        !matches!(self, WebError::NotFound | WebError::Cache(_))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !self.exposes_detail() {
            return status.into_response();
        }
        (
            status,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from(self.to_string()),
        )
            .into_response()
    }
}
