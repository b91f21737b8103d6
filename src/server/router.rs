use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::server::handlers::{request_backup, serve_cache};
use crate::server::state::AppState;

/// Prefix of the cached object endpoint; the rest of the path is the key.
pub const PATH_CACHE: &str = "/cache/";
/// Backup trigger endpoint.
pub const PATH_PG_BACKUP: &str = "/pg/backup";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(&format!("{PATH_CACHE}{{*key}}"), get(serve_cache))
        .route(PATH_PG_BACKUP, get(request_backup).post(request_backup))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}
