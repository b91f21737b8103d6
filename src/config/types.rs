use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::instance::InstanceIdentity;
use crate::server::LOCAL_PORT;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub instance: InstanceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Local web server settings.
///
/// There is no bind host: the server only ever listens on 127.0.0.1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Loopback port (default: 8010).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for open connections on shutdown (default: 10).
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
}

/// Identity of the PostgreSQL instance this manager runs next to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceConfig {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub cluster_name: String,
    /// Pod name; falls back to `$HOSTNAME` when empty.
    #[serde(default)]
    pub pod_name: String,
}

/// Orchestration API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_server")]
    pub server_url: String,
    /// Bearer token file; requests are unauthenticated when it does not exist.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// Extra PEM root certificate to trust.
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

/// Physical backup execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Program invoked to take the base backup.
    #[serde(default = "default_backup_executable")]
    pub executable: String,
    /// Arguments placed before the destination and server name.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Cache population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How often the cluster snapshot is refreshed (default: 30).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Variables copied from the process environment into the WAL restore entry.
    #[serde(default)]
    pub wal_restore_env: Vec<String>,
    /// Variables copied from the process environment into the WAL archive entry.
    #[serde(default)]
    pub wal_archive_env: Vec<String>,
}

fn default_port() -> u16 {
    LOCAL_PORT
}

fn default_drain_timeout() -> u64 {
    10
}

fn default_api_server() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token")
}

fn default_api_timeout() -> u64 {
    30
}

fn default_backup_executable() -> String {
    "barman-cloud-backup".to_string()
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            drain_timeout_seconds: default_drain_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: default_api_server(),
            token_path: default_token_path(),
            ca_cert_path: None,
            timeout_seconds: default_api_timeout(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            executable: default_backup_executable(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval(),
            wal_restore_env: Vec::new(),
            wal_archive_env: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_seconds)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CacheConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

impl InstanceConfig {
    pub fn identity(&self) -> InstanceIdentity {
        let pod_name = if self.pod_name.is_empty() {
            std::env::var("HOSTNAME").unwrap_or_default()
        } else {
            self.pod_name.clone()
        };
        InstanceIdentity::new(&self.namespace, &self.cluster_name, pod_name)
    }
}
