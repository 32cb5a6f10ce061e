//! Process bootstrap: config, logging, registry, both listeners.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wiregate::config::load_config;
use wiregate::lifecycle::{self, Shutdown};
use wiregate::manager::ManagerServer;
use wiregate::proxy::{ProxyServer, ProxyState};
use wiregate::schema::SchemaRegistry;

#[derive(Debug, Parser)]
#[command(name = "wiregate", about = "JSON <-> wire transcoding HTTP gateway")]
struct Cli {
    /// Config file path.
    #[arg(short = 'C', long, default_value = "./config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wiregate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    tracing::info!(
        import_path = %config.import_path,
        schema_folder = %config.schema_folder,
        reload_interval_secs = config.reload_interval_secs,
        "configuration loaded"
    );

    let forward_content_type = if config.forward_content_type.is_empty() {
        None
    } else {
        Some(HeaderValue::from_str(&config.forward_content_type)?)
    };

    let registry = Arc::new(SchemaRegistry::new(
        config.import_path.clone(),
        config.schema_folder.clone(),
    ));
    // A failed initial load is not fatal: the registry stays empty and the
    // manager surface can be used to fix the schema set.
    if let Err(err) = registry.load() {
        tracing::warn!(error = %err, "initial schema load failed");
    }

    let shutdown = Shutdown::new();
    let reload_task = registry.spawn_auto_reload(
        Duration::from_secs(config.reload_interval_secs),
        shutdown.subscribe(),
    );

    let proxy_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.proxy_port));
    let manager_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.manager_port));
    let proxy_listener = TcpListener::bind(proxy_addr).await?;
    let manager_listener = TcpListener::bind(manager_addr).await?;

    let proxy = ProxyServer::new(ProxyState::new(Arc::clone(&registry), forward_content_type));
    let manager = ManagerServer::new(Arc::clone(&registry));

    let proxy_task = tokio::spawn(proxy.run(proxy_listener, shutdown.subscribe()));
    let manager_task = tokio::spawn(manager.run(manager_listener, shutdown.subscribe()));

    lifecycle::wait_for_interrupt().await;
    tracing::info!("shutting down");
    shutdown.trigger();

    proxy_task.await??;
    manager_task.await??;
    if let Some(task) = reload_task {
        task.await?;
    }

    tracing::info!("shutdown complete");
    Ok(())
}
