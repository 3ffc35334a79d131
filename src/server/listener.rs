use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::server::shutdown::Shutdown;
use crate::site::Site;

pub async fn run(cfg: &Config, site: Arc<Site>, shutdown: Shutdown) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, site, ConnectionSettings::from_config(cfg), shutdown).await
}

/// Accepts connections until `shutdown` fires, then waits for every
/// connection task to finish. The listening socket is dropped before the
/// drain so no new clients are admitted.
pub async fn serve(
    listener: TcpListener,
    site: Arc<Site>,
    settings: ConnectionSettings,
    mut shutdown: Shutdown,
) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                info!(in_flight = tasks.len(), "Shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (socket, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("Accept error: {}", e);
                        continue;
                    }
                };
                info!("Accepted connection from {}", peer);

                let site = Arc::clone(&site);
                let shutdown = shutdown.clone();
                tasks.spawn(async move {
                    let mut conn = Connection::new(socket, site, settings, shutdown);
                    if let Err(e) = conn.run().await {
                        warn!("Connection error from {}: {}", peer, e);
                    }
                    info!("Connection from {} closed", peer);
                });
            }

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    drop(listener);
    while tasks.join_next().await.is_some() {}

    info!("Server stopped");
    Ok(())
}
