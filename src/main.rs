use std::sync::Arc;

use warden::config::Config;
use warden::server::{listener, shutdown};
use warden::site::Site;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level()?)
        .init();

    let site = Arc::new(Site::load(&cfg)?);
    let (trigger, shutdown) = shutdown::channel();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            trigger.trigger();
        }
    });

    listener::run(&cfg, site, shutdown).await
}
