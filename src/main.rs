use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use registra::config::Configuration;
use registra::{AppState, MemoryUserRepository, UserService, app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Read configuration file. Let it in memory.
    let config = Configuration::default().read();
    let port = config.port();

    let repository = Arc::new(MemoryUserRepository::new());
    let state = AppState {
        config,
        service: UserService::new(repository),
    };

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            // The listening socket is the only unrecoverable failure.
            tracing::error!(error = %err, %addr, "cannot bind listening socket");
            std::process::exit(1);
        },
    };

    tracing::info!(%addr, "server started");

    if let Err(err) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server stopped unexpectedly");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot install ctrl-c handler");
    }
}
