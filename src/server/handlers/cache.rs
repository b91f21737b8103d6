use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::cache::{CacheError, CacheKey};
use crate::server::error::WebError;
use crate::server::state::AppState;

/// Serves a cached status snapshot as JSON.
pub async fn serve_cache(State(state): State<AppState>, Path(requested): Path<String>) -> Response {
    tracing::debug!(object = %requested, "Cached object request received");

    match load_cached(&state, &requested) {
        Ok(json) => ([(CONTENT_TYPE, "application/json")], json).into_response(),
        Err(err) => err.into_response(),
    }
}

fn load_cached(state: &AppState, requested: &str) -> Result<Vec<u8>, WebError> {
    let Ok(key) = requested.parse::<CacheKey>() else {
        tracing::debug!(object = %requested, "Unsupported cached object type");
        return Err(WebError::NotFound);
    };

    let value = state.cache.load(key).map_err(|err| {
        if !matches!(err, CacheError::Miss) {
            tracing::error!(error = %err, %key, "while loading cached object");
        }
        WebError::from(err)
    })?;

    serde_json::to_vec(&value).map_err(|err| {
        tracing::error!(error = %err, %key, "while encoding cached object");
        WebError::from(err)
    })
}
