use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use axum::Router;
use clap::Parser;

use facewatch_core::broadcast::group_registry::GroupRegistry;
use facewatch_server::config::ServerConfig;
use facewatch_server::{build_pipeline, build_router, AppState};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    config.validate()?;

    let registry = Arc::new(GroupRegistry::new());
    let pipeline = build_pipeline(&config, registry)?;
    let router = build_router(
        AppState::new(pipeline),
        &config.media_root,
        config.max_upload_bytes,
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(router, config.bind))
}

async fn serve(router: Router, bind: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
