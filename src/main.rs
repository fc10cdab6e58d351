//! OpenAttendance server
//!
//! Main application entry point

use tracing::info;

use openattendance::{
    config::Settings,
    database::{self, DatabaseService},
    handlers, jobs,
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the server
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", openattendance::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::DatabaseConfig::from(&settings.database);
    let pool = database::create_pool(&db_config).await?;

    // Run database migrations
    database::run_migrations(&pool).await?;

    // Assemble shared state
    let database_service = DatabaseService::new(pool);
    let state = AppState::new(settings.clone(), database_service);

    // Spawn background jobs
    jobs::spawn_all(&state);

    // Start the HTTP server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "OpenAttendance server is ready");

    axum::serve(listener, handlers::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("OpenAttendance server has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
