/// SSO Service Main Entry Point
///
/// Starts:
/// - PostgreSQL connection pool (with migrations)
/// - gRPC Auth server with health reporting
/// - HTTP server for /health and /metrics
use anyhow::{Context, Result};
use sso_service::{
    config::Settings,
    grpc::{correlation_interceptor, proto::auth_server::AuthServer, AuthGrpcServer},
    http,
    services::{AuthService, AuthServiceConfig},
    storage::PgStorage,
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    telemetry::init_tracing(settings.env);
    info!(env = ?settings.env, "Starting SSO Service");

    // Initialize database connection pool
    let storage = PgStorage::connect(&settings.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if settings.database.run_migrations {
        storage
            .migrate()
            .await
            .context("Failed to run database migrations")?;
    }

    let auth = AuthService::new(AuthServiceConfig::from_store(
        Arc::new(storage),
        settings.auth.token_ttl,
    ));
    let grpc_server = AuthGrpcServer::new(Arc::new(auth));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServer<AuthGrpcServer>>()
        .await;

    let grpc_addr: SocketAddr = format!("{}:{}", settings.grpc.host, settings.grpc.port)
        .parse()
        .context("Invalid gRPC server address")?;
    let http_addr = SocketAddr::from(([0, 0, 0, 0], settings.http.port));

    // Fan one shutdown signal out to both servers
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let http_task = tokio::spawn(http::serve(http_addr, wait_for(shutdown_rx.clone())));

    info!("Starting gRPC server on {}", grpc_addr);

    Server::builder()
        .timeout(settings.grpc.timeout)
        .add_service(health_service)
        .add_service(AuthServer::with_interceptor(
            grpc_server,
            correlation_interceptor,
        ))
        .serve_with_shutdown(grpc_addr, wait_for(shutdown_rx))
        .await
        .context("gRPC server error")?;

    match http_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("HTTP server error: {:#}", e),
        Err(e) => error!("HTTP server task failed: {}", e),
    }

    info!("SSO service shutdown complete");

    Ok(())
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
