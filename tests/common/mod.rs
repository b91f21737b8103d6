//! Shared test utilities and fake collaborators.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use instance_webserver::api::{
    Backup, BackupConfiguration, BarmanObjectStoreConfiguration, Cluster, ObjectReference,
};
use instance_webserver::backup::{BackupCommand, BackupError, BackupLauncher};
use instance_webserver::cache::{CacheError, CacheKey, CacheStore, CachedValue, InMemoryCache};
use instance_webserver::client::{ClientError, ResourceClient};
use instance_webserver::events::{EventRecorder, EventType};
use instance_webserver::instance::InstanceIdentity;
use instance_webserver::server::{AppState, LocalWebServer, LocalWebServerHandle};
use parking_lot::Mutex;
use tracing::Span;

pub const NAMESPACE: &str = "db";
pub const CLUSTER: &str = "pg";
pub const POD: &str = "pg-1";

pub fn instance() -> InstanceIdentity {
    InstanceIdentity::new(NAMESPACE, CLUSTER, POD)
}

/// Cluster with an object store, so backups are allowed.
pub fn backup_ready_cluster() -> Cluster {
    let mut cluster = Cluster::new(NAMESPACE, CLUSTER);
    cluster.spec.instances = 3;
    cluster.spec.backup = Some(BackupConfiguration {
        barman_object_store: Some(BarmanObjectStoreConfiguration {
            destination_path: "s3://backups/pg".to_string(),
            endpoint_url: None,
            server_name: None,
        }),
    });
    cluster
}

// -- Resource client ----------------------------------------------------------

/// In-memory resource client with injectable failures.
#[derive(Default)]
pub struct FakeClient {
    clusters: Mutex<HashMap<(String, String), Cluster>>,
    backups: Mutex<HashMap<(String, String), Backup>>,
    cluster_error: Mutex<Option<String>>,
    status_updates: Mutex<Vec<Backup>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(self, cluster: Cluster) -> Self {
        let key = (cluster.metadata.namespace.clone(), cluster.metadata.name.clone());
        self.clusters.lock().insert(key, cluster);
        self
    }

    pub fn with_backup(self, backup: Backup) -> Self {
        let key = (backup.metadata.namespace.clone(), backup.metadata.name.clone());
        self.backups.lock().insert(key, backup);
        self
    }

    /// Make every cluster lookup fail with a transport-style error.
    pub fn fail_cluster_lookups(&self, message: &str) {
        *self.cluster_error.lock() = Some(message.to_string());
    }

    pub fn status_updates(&self) -> Vec<Backup> {
        self.status_updates.lock().clone()
    }
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Cluster, ClientError> {
        if let Some(message) = self.cluster_error.lock().clone() {
            return Err(ClientError::Status {
                status: 503,
                message,
            });
        }
        self.clusters
            .lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind: "Cluster",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn get_backup(&self, namespace: &str, name: &str) -> Result<Backup, ClientError> {
        self.backups
            .lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind: "Backup",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn update_backup_status(&self, backup: &Backup) -> Result<Backup, ClientError> {
        self.status_updates.lock().push(backup.clone());
        let key = (backup.metadata.namespace.clone(), backup.metadata.name.clone());
        self.backups.lock().insert(key, backup.clone());
        Ok(backup.clone())
    }
}

// -- Cache ---------------------------------------------------------------------

/// Cache whose every load fails with a storage error.
pub struct BrokenCache;

impl CacheStore for BrokenCache {
    fn load(&self, _key: CacheKey) -> Result<CachedValue, CacheError> {
        Err(CacheError::Storage("disk on fire at /var/lib/secret".to_string()))
    }

    fn store(&self, _key: CacheKey, _value: CachedValue) -> Result<(), CacheError> {
        Err(CacheError::Storage("read-only".to_string()))
    }
}

// -- Backup launcher -------------------------------------------------------------

/// One observed `start()` call.
#[derive(Debug, Clone)]
pub struct StartedBackup {
    pub cluster: Cluster,
    pub backup: Backup,
}

/// Launcher that records started commands instead of running anything.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    started: Arc<Mutex<Vec<StartedBackup>>>,
    created: Arc<Mutex<usize>>,
    start_error: Arc<Mutex<Option<String>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_starts(&self, message: &str) {
        *self.start_error.lock() = Some(message.to_string());
    }

    pub fn started(&self) -> Vec<StartedBackup> {
        self.started.lock().clone()
    }

    pub fn created(&self) -> usize {
        *self.created.lock()
    }
}

struct RecordingCommand {
    cluster: Cluster,
    backup: Backup,
    started: Arc<Mutex<Vec<StartedBackup>>>,
    start_error: Option<String>,
}

#[async_trait]
impl BackupCommand for RecordingCommand {
    async fn start(self: Box<Self>) -> Result<(), BackupError> {
        self.started.lock().push(StartedBackup {
            cluster: self.cluster.clone(),
            backup: self.backup.clone(),
        });
        match self.start_error {
            Some(message) => Err(BackupError::Status(ClientError::Status {
                status: 500,
                message,
            })),
            None => Ok(()),
        }
    }
}

impl BackupLauncher for RecordingLauncher {
    fn new_command(
        &self,
        cluster: Cluster,
        backup: Backup,
        _client: Arc<dyn ResourceClient>,
        _recorder: Arc<dyn EventRecorder>,
        _span: Span,
    ) -> Box<dyn BackupCommand> {
        *self.created.lock() += 1;
        Box::new(RecordingCommand {
            cluster,
            backup,
            started: self.started.clone(),
            start_error: self.start_error.lock().clone(),
        })
    }
}

// -- Events --------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub object: String,
    pub event_type: EventType,
    pub reason: String,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }
}

impl EventRecorder for RecordingEvents {
    fn record(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        self.events.lock().push(RecordedEvent {
            object: format!("{}/{}", object.kind, object.name),
            event_type,
            reason: reason.to_string(),
            message: message.to_string(),
        });
    }
}

// -- Server --------------------------------------------------------------------

pub struct Harness {
    pub cache: Arc<InMemoryCache>,
    pub client: Arc<FakeClient>,
    pub launcher: RecordingLauncher,
    pub events: RecordingEvents,
}

impl Harness {
    pub fn new(client: FakeClient) -> Self {
        Self {
            cache: Arc::new(InMemoryCache::new()),
            client: Arc::new(client),
            launcher: RecordingLauncher::new(),
            events: RecordingEvents::default(),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            cache: self.cache.clone(),
            client: self.client.clone(),
            recorder: Arc::new(self.events.clone()),
            launcher: Arc::new(self.launcher.clone()),
            instance: instance(),
        }
    }
}

/// Bind a server on an ephemeral loopback port and run it in the background.
pub async fn spawn_server(state: AppState) -> (SocketAddr, LocalWebServerHandle) {
    let mut server = LocalWebServer::new(0, state).with_drain_timeout(Duration::from_secs(1));
    let addr = server.try_bind().await.expect("Failed to bind");
    let handle = server.handle();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    (addr, handle)
}
