use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use instance_webserver::backup::BarmanBackupLauncher;
use instance_webserver::cache::{CacheRefresher, InMemoryCache};
use instance_webserver::client::ApiResourceClient;
use instance_webserver::config::Config;
use instance_webserver::events::ApiEventRecorder;
use instance_webserver::logging::init_tracing;
use instance_webserver::server::{AppState, LocalWebServer, ShutdownManager};

/// Loopback web server for a PostgreSQL instance manager.
#[derive(Debug, Parser)]
#[command(name = "instance-webserver", version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the instance namespace.
    #[arg(long)]
    namespace: Option<String>,

    /// Override the name of the instance's cluster.
    #[arg(long)]
    cluster_name: Option<String>,

    /// Override the pod name reported on backups and events.
    #[arg(long)]
    pod_name: Option<String>,

    /// Override the loopback port.
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(namespace) = self.namespace {
            config.instance.namespace = namespace;
        }
        if let Some(cluster_name) = self.cluster_name {
            config.instance.cluster_name = cluster_name;
        }
        if let Some(pod_name) = self.pod_name {
            config.instance.pod_name = pod_name;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    cli.apply(&mut config);
    config.validate()?;

    let instance = config.instance.identity();
    tracing::info!(
        namespace = instance.namespace(),
        cluster = instance.cluster_name(),
        pod = instance.pod_name(),
        "starting instance web server"
    );

    let api_client =
        ApiResourceClient::new(&config.api).context("creating orchestration API client")?;
    let recorder = Arc::new(ApiEventRecorder::new(
        api_client.clone(),
        instance.pod_name(),
    ));
    let client = Arc::new(api_client);
    let cache = Arc::new(InMemoryCache::new());
    let shutdown = Arc::new(ShutdownManager::new());

    let refresher = CacheRefresher::new(
        cache.clone(),
        client.clone(),
        instance.clone(),
        config.cache.refresh_interval(),
    );
    refresher.store_environments(&config.cache, |name| std::env::var(name).ok());
    tokio::spawn(refresher.run(shutdown.clone()));

    let state = AppState {
        cache,
        client,
        recorder,
        launcher: Arc::new(BarmanBackupLauncher::new(
            config.backup.clone(),
            instance.clone(),
        )),
        instance,
    };

    let mut server = LocalWebServer::new(config.server.port, state)
        .with_drain_timeout(config.server.drain_timeout())
        .with_shutdown(shutdown);
    server
        .try_bind()
        .await
        .with_context(|| format!("binding 127.0.0.1:{}", config.server.port))?;
    server.run().await?;

    Ok(())
}
