use std::net::SocketAddr;

use stderrlog::{self, Timestamp};
use tokio::signal;

use report_ingest::app_state::AppState;
use report_ingest::{config, create_router, database};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("FATAL ERROR: {}", e);
        eprintln!("Error details: {:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Initialize stderrlog FIRST - before anything else
    stderrlog::new()
        .verbosity(log::Level::Info)
        .timestamp(Timestamp::Millisecond)
        .show_module_names(true)
        .init()
        .unwrap();

    log::info!("=== Report Ingest Service Starting ===");
    log::info!("Process ID: {}", std::process::id());

    match dotenvy::dotenv() {
        Ok(_) => log::info!("Environment variables loaded from .env file"),
        Err(_) => log::info!("No .env file found, using system environment variables"),
    }

    let config = config::Config::load()?;
    log::info!("Configuration loaded successfully");
    match &config.db_host {
        Some(host) => log::info!("Database mode: TCP via {}", host),
        None => log::info!(
            "Database mode: unix socket under {}",
            config.db_socket_path
        ),
    }
    log::info!("Database name: {}", config.db_name);
    log::info!("Server port: {}", config.port);

    log::info!("Creating database connection pool...");
    let pool = database::create_pool(&config).await?;
    log::info!("Database connection pool created successfully");

    log::info!("Initializing database schema...");
    database::schema::initialize_schema(&pool, config.db_reset_on_start).await?;
    log::info!("Database schema initialized successfully");

    let app_state = AppState { pool };
    let app = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Binding to address: {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on {}", addr);
    log::info!("=== Report Ingest Service Ready ===");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
