use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::chain::IndexerClient;
use crate::config::ServiceConfig;
use crate::send::SendService;

pub async fn start_server(addr: &str) -> anyhow::Result<()> {
    let config = ServiceConfig::from_env();
    let chain = Arc::new(IndexerClient::new(
        config.indexer_url.clone(),
        config.relay_url.clone(),
    ));
    let service = Arc::new(SendService::new(config, chain));

    // Configure CORS based on environment.
    // Set ALLOWED_ORIGINS="https://app.example.com" for production; if not
    // set, any origin is allowed (development mode).
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = Router::new()
        .route("/", get(handlers::generate_wallet_handler))
        .route(
            "/depositrvn/:private_key/:address",
            get(handlers::deposit_handler),
        )
        .route(
            "/sendrvn/:private_key/:address/:amount",
            get(handlers::send_handler),
        )
        .route(
            "/sendrvn/:private_key/:address/:amount/:my_address",
            get(handlers::send_from_handler),
        )
        .layer(cors)
        .with_state(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
