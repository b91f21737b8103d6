//! Typed access to `Cluster` and `Backup` resources.

mod api;
mod error;

pub use api::ApiResourceClient;
pub use error::ClientError;

use async_trait::async_trait;

use crate::api::{Backup, Cluster};

/// Reads and updates the resources the instance manager works with.
///
/// Implementations carry their own transport, timeouts and retries and must
/// be safe to share across request tasks.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Cluster, ClientError>;

    async fn get_backup(&self, namespace: &str, name: &str) -> Result<Backup, ClientError>;

    /// Persist `backup.status`, returning the stored object.
    async fn update_backup_status(&self, backup: &Backup) -> Result<Backup, ClientError>;
}
