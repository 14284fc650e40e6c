mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use snip_core::Store;
use snip_gateway::{App, AppState, GatewayConfig};
use snip_storage::{InMemoryStore, RedisStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_json);

    info!(
        port = config.port,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        request_timeout = ?config.request_timeout,
        rate_limit_per_minute = %config.rate_limit_per_minute,
        "starting gateway"
    );

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let gateway_config = config.gateway_config();

    match config.storage {
        StorageBackendArg::Memory => {
            let store = Arc::new(InMemoryStore::new());
            run_server(listen_addr, store, &config, &gateway_config).await?;
        }
        StorageBackendArg::Redis => {
            let store = RedisStore::connect(&config.redis_url)
                .await
                .with_context(|| format!("failed to connect to Redis at {}", config.redis_url))?;
            let store = Arc::new(store);

            let result = run_server(listen_addr, store.clone(), &config, &gateway_config).await;
            store.close();
            result?;
        }
    }

    info!("gateway exited");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(
    listen_addr: SocketAddr,
    store: Arc<dyn Store>,
    cli: &CLI,
    gateway_config: &GatewayConfig,
) -> anyhow::Result<()> {
    let app = App::router(AppState::new(store, cli.base_url.clone()), gateway_config);

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut server => return Ok(joined??),
        () = shutdown_signal() => {}
    }

    info!(timeout = ?cli.shutdown_timeout, "shutting down, draining in-flight requests");
    let _ = stop_tx.send(());
    drain(server, cli.shutdown_timeout).await
}

async fn drain(
    server: tokio::task::JoinHandle<std::io::Result<()>>,
    timeout: Duration,
) -> anyhow::Result<()> {
    match tokio::time::timeout(timeout, server).await {
        Ok(joined) => Ok(joined??),
        Err(_) => {
            warn!(?timeout, "graceful shutdown timed out, dropping open connections");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
