use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use thumbnail_worker::health;
use thumbnail_worker::types::environment::Environment;
use thumbnail_worker::worker::ThumbnailWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for staging/production, regular format for development;
    // RUST_LOG overrides the environment's default level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.tracing_level().to_string()));
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    info!("Starting thumbnail worker in {:?} environment", environment);

    let worker = ThumbnailWorker::new(&environment).await;

    // Get shutdown token for signal handling
    let shutdown_token = worker.shutdown_token();

    // Start health check server
    let health_shutdown = shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_shutdown).await {
            error!("Health server error: {}", e);
        }
    });

    // Spawn signal handler
    let signal_shutdown = shutdown_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
                signal_shutdown.cancel();
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    // Run the worker
    if let Err(e) = worker.start().await {
        error!("Worker error: {}", e);
        return Err(e);
    }

    info!("Thumbnail worker stopped");
    Ok(())
}
