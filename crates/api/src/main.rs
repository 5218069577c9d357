use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wealthlist_api::config::{AppConfig, AppEnv};
use wealthlist_api::mail::SmtpMailer;
use wealthlist_api::router::build_app_router;
use wealthlist_api::state::AppState;
use wealthlist_api::storage::LocalPhotoStorage;
use wealthlist_db::migrations::{self, MigrationDirection};

const DEFAULT_LOG_FILTER: &str = "wealthlist_api=debug,wealthlist_db=info,tower_http=debug";

/// Millionaire catalogue HTTP API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run the schema migration in the given direction (`up` or `down`)
    /// and exit instead of serving.
    #[arg(long, value_name = "DIRECTION")]
    migrate: Option<MigrationDirection>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Configuration ---
    let config = AppConfig::from_env().expect("Invalid configuration");
    init_tracing(config.env);
    tracing::info!(
        env = ?config.env,
        host = %config.server.host,
        port = config.server.port,
        photo_dir = %config.photos.dir,
        "Loaded configuration"
    );
    tracing::debug!(database = ?config.database, smtp = ?config.smtp, "Configuration details");

    // --- Database ---
    let connect_options = config
        .database
        .connect_options()
        .expect("Invalid database connection settings");
    let pool = wealthlist_db::create_pool(connect_options, &config.database.pool_settings())
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    wealthlist_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    if let Some(direction) = cli.migrate {
        migrations::run(&pool, direction)
            .await
            .expect("Migration failed");
        tracing::info!(%direction, "Migration finished");
        return;
    }

    wealthlist_db::migrate_up(&pool)
        .await
        .expect("Failed to apply database schema");

    // --- Services ---
    let mailer = SmtpMailer::new(config.smtp.clone()).expect("Invalid mail settings");
    let storage = LocalPhotoStorage::new(&config.photos.dir);
    tracing::info!(root = %storage.root().display(), "Photo storage ready");

    let addr = SocketAddr::new(
        config.server.host.parse().expect("Invalid SERVER_HOST address"),
        config.server.port,
    );

    let state = AppState::new(config, Arc::new(pool.clone()), Arc::new(storage), Arc::new(mailer));
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Human-readable logs locally, JSON lines in deployed environments.
fn init_tracing(env: AppEnv) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = env == AppEnv::Prod;

    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
