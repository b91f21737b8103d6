//! Base backups taken with the barman cloud tooling.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{Instrument, Span};

use crate::api::{Backup, BackupPhase, BarmanObjectStoreConfiguration, Cluster};
use crate::backup::{BackupCommand, BackupError, BackupLauncher};
use crate::client::ResourceClient;
use crate::config::BackupConfig;
use crate::events::{EventRecorder, EventType};
use crate::instance::InstanceIdentity;

/// Launches [`BarmanBackupCommand`]s for the local instance.
#[derive(Debug, Clone)]
pub struct BarmanBackupLauncher {
    config: BackupConfig,
    instance: InstanceIdentity,
}

impl BarmanBackupLauncher {
    pub fn new(config: BackupConfig, instance: InstanceIdentity) -> Self {
        Self { config, instance }
    }
}

impl BackupLauncher for BarmanBackupLauncher {
    fn new_command(
        &self,
        cluster: Cluster,
        backup: Backup,
        client: Arc<dyn ResourceClient>,
        recorder: Arc<dyn EventRecorder>,
        span: Span,
    ) -> Box<dyn BackupCommand> {
        Box::new(BarmanBackupCommand {
            config: self.config.clone(),
            instance: self.instance.clone(),
            cluster,
            backup,
            client,
            recorder,
            span,
        })
    }
}

pub struct BarmanBackupCommand {
    config: BackupConfig,
    instance: InstanceIdentity,
    cluster: Cluster,
    backup: Backup,
    client: Arc<dyn ResourceClient>,
    recorder: Arc<dyn EventRecorder>,
    span: Span,
}

impl BarmanBackupCommand {
    /// Arguments passed to the backup executable.
    pub fn arguments(&self, store: &BarmanObjectStoreConfiguration) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        if let Some(endpoint) = &store.endpoint_url {
            args.push("--endpoint-url".to_string());
            args.push(endpoint.clone());
        }
        args.push(store.destination_path.clone());
        args.push(server_name(&self.cluster, store));
        args
    }
}

fn server_name(cluster: &Cluster, store: &BarmanObjectStoreConfiguration) -> String {
    store
        .server_name
        .clone()
        .unwrap_or_else(|| cluster.metadata.name.clone())
}

#[async_trait]
impl BackupCommand for BarmanBackupCommand {
    async fn start(self: Box<Self>) -> Result<(), BackupError> {
        let span = self.span.clone();
        self.start_inner().instrument(span).await
    }
}

impl BarmanBackupCommand {
    async fn start_inner(mut self: Box<Self>) -> Result<(), BackupError> {
        let store = self
            .cluster
            .object_store()
            .cloned()
            .ok_or_else(|| BackupError::NotConfigured {
                cluster: self.cluster.metadata.name.clone(),
            })?;
        let args = self.arguments(&store);
        let server = server_name(&self.cluster, &store);
        let instance_id = self.instance.pod_name().to_string();

        let status = &mut self.backup.status;
        status.phase = BackupPhase::Started;
        status.started_at = Some(Utc::now());
        status.stopped_at = None;
        status.error = None;
        status.destination_path = Some(store.destination_path.clone());
        status.server_name = Some(server);
        status.instance_id = Some(instance_id);

        self.backup = self.client.update_backup_status(&self.backup).await?;
        tracing::info!(destination = %store.destination_path, "backup started");
        self.recorder.record(
            &self.backup.object_reference(),
            EventType::Normal,
            "Starting",
            "Backup started",
        );

        let span = self.span.clone();
        tokio::spawn(self.run(args).instrument(span));
        Ok(())
    }

    /// Runs the backup to completion and records the outcome.
    async fn run(mut self: Box<Self>, args: Vec<String>) {
        self.backup.status.phase = BackupPhase::Running;
        match self.client.update_backup_status(&self.backup).await {
            Ok(stored) => self.backup = stored,
            Err(e) => tracing::warn!(error = %e, "could not mark backup as running"),
        }

        let outcome = self.execute(&args).await;

        let status = &mut self.backup.status;
        status.stopped_at = Some(Utc::now());
        let (event_type, reason, message) = match &outcome {
            Ok(()) => {
                status.phase = BackupPhase::Completed;
                tracing::info!("backup completed");
                (EventType::Normal, "Completed", "Backup completed".to_string())
            }
            Err(error) => {
                status.phase = BackupPhase::Failed;
                status.error = Some(error.clone());
                tracing::error!(%error, "backup failed");
                (EventType::Warning, "Failed", format!("Backup failed: {}", error))
            }
        };

        if let Err(e) = self.client.update_backup_status(&self.backup).await {
            tracing::error!(error = %e, "could not record final backup status");
        }
        self.recorder
            .record(&self.backup.object_reference(), event_type, reason, &message);
    }

    async fn execute(&self, args: &[String]) -> Result<(), String> {
        tracing::debug!(executable = %self.config.executable, ?args, "running backup");
        let output = Command::new(&self.config.executable)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.config.executable, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        if detail.is_empty() {
            Err(format!("{} exited with {}", self.config.executable, output.status))
        } else {
            Err(format!(
                "{} exited with {}: {}",
                self.config.executable, output.status, detail
            ))
        }
    }
}
