use std::net::SocketAddr;

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remote_ip::envs::{LISTEN_HOST, TRUST_FORWARDED};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        "remote-ip {} (trust forwarded headers: {})",
        env!("CARGO_PKG_VERSION"),
        *TRUST_FORWARDED
    );
    let listener = tokio::net::TcpListener::bind(LISTEN_HOST.as_str()).await?;
    info!("Listening on {}", LISTEN_HOST.as_str());
    axum::serve(
        listener,
        remote_ip::app().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}
