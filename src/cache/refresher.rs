//! Keeps the cache populated in the background.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, CacheStore, CachedValue};
use crate::client::ResourceClient;
use crate::config::CacheConfig;
use crate::instance::InstanceIdentity;
use crate::server::ShutdownManager;

/// Polls the instance's cluster and stores each snapshot under
/// [`CacheKey::Cluster`]. The WAL environments are captured once.
pub struct CacheRefresher {
    cache: Arc<dyn CacheStore>,
    client: Arc<dyn ResourceClient>,
    instance: InstanceIdentity,
    interval: Duration,
}

impl CacheRefresher {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        client: Arc<dyn ResourceClient>,
        instance: InstanceIdentity,
        interval: Duration,
    ) -> Self {
        Self {
            cache,
            client,
            instance,
            interval,
        }
    }

    /// Store the configured WAL environments, read from `lookup`.
    ///
    /// Variables that `lookup` cannot resolve are left out.
    pub fn store_environments<F>(&self, config: &CacheConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let entries = [
            (CacheKey::WalRestore, &config.wal_restore_env),
            (CacheKey::WalArchive, &config.wal_archive_env),
        ];
        for (key, names) in entries {
            let env = names
                .iter()
                .filter_map(|name| lookup(name).map(|value| format!("{}={}", name, value)))
                .collect();
            if let Err(e) = self.cache.store(key, CachedValue::Env(env)) {
                tracing::error!(error = %e, %key, "failed to cache environment");
            }
        }
    }

    /// Fetch the cluster once and cache it. Failures keep the previous snapshot.
    pub async fn refresh(&self) {
        let result = self
            .client
            .get_cluster(self.instance.namespace(), self.instance.cluster_name())
            .await;
        match result {
            Ok(cluster) => {
                if let Err(e) = self
                    .cache
                    .store(CacheKey::Cluster, CachedValue::Cluster(Box::new(cluster)))
                {
                    tracing::error!(error = %e, "failed to cache cluster");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to refresh cached cluster"),
        }
    }

    /// Refresh on every tick until shutdown is signalled.
    pub async fn run(self, shutdown: Arc<ShutdownManager>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => self.refresh().await,
            }
        }
        tracing::debug!("cache refresher stopped");
    }
}
