use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};

use crate::server::error::WebError;
use crate::server::state::AppState;

/// Query parameters of a backup request.
///
/// Built from the raw pairs so a repeated `name` resolves to its first value
/// instead of failing extraction.
#[derive(Debug)]
struct BackupParams {
    name: Option<String>,
}

impl BackupParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value);
        Self { name }
    }
}

/// Starts the backup named by the `name` query parameter.
///
/// Answers `OK` once the backup has been initiated, not when it completes.
pub async fn request_backup(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match start_backup(&state, BackupParams::from_pairs(pairs)).await {
        Ok(()) => "OK".into_response(),
        Err(err) => {
            if err.is_server_fault() {
                tracing::warn!(error = %err, "backup request failed");
            } else {
                tracing::debug!(error = %err, "backup request rejected");
            }
            err.into_response()
        }
    }
}

async fn start_backup(state: &AppState, params: BackupParams) -> Result<(), WebError> {
    let backup_name = params
        .name
        .filter(|name| !name.is_empty())
        .ok_or(WebError::MissingBackupName)?;
    let namespace = state.instance.namespace();

    let cluster = state
        .client
        .get_cluster(namespace, state.instance.cluster_name())
        .await
        .map_err(WebError::ClusterFetch)?;

    let backup = state
        .client
        .get_backup(namespace, &backup_name)
        .await
        .map_err(WebError::BackupFetch)?;

    if cluster.object_store().is_none() {
        return Err(WebError::BackupNotConfigured);
    }

    let span = tracing::info_span!(
        "backup",
        backup_name = %backup.metadata.name,
        backup_namespace = %backup.metadata.namespace,
    );
    let command = state.launcher.new_command(
        cluster,
        backup,
        state.client.clone(),
        state.recorder.clone(),
        span,
    );
    command.start().await.map_err(WebError::BackupStart)
}
