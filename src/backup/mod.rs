//! Backup commands started on behalf of a `Backup` resource.
//!
//! Starting a backup is split in two: [`BackupCommand::start`] records that
//! the backup has begun and hands the physical work to a detached task, then
//! returns. Everything after that point is tracked only through the
//! `Backup` resource's status.

mod barman;

pub use barman::{BarmanBackupCommand, BarmanBackupLauncher};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::Span;

use crate::api::{Backup, Cluster};
use crate::client::{ClientError, ResourceClient};
use crate::events::EventRecorder;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup not configured in cluster \"{cluster}\"")]
    NotConfigured { cluster: String },

    #[error("while updating backup status: {0}")]
    Status(#[from] ClientError),
}

#[async_trait]
pub trait BackupCommand: Send {
    /// Initiate the backup.
    ///
    /// Returns once the backup has been marked as started; it does not wait
    /// for the backup to finish.
    async fn start(self: Box<Self>) -> Result<(), BackupError>;
}

/// Builds backup commands.
pub trait BackupLauncher: Send + Sync {
    /// `span` is the logging context the backup runs in.
    fn new_command(
        &self,
        cluster: Cluster,
        backup: Backup,
        client: Arc<dyn ResourceClient>,
        recorder: Arc<dyn EventRecorder>,
        span: Span,
    ) -> Box<dyn BackupCommand>;
}
