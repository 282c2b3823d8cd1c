use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use widgetboard_api::auth::permissions::RolePermissions;
use widgetboard_api::config::{LogFormat, ServerConfig};
use widgetboard_api::providers::default_resolver;
use widgetboard_api::router::build_app_router;
use widgetboard_api::state::AppState;
use widgetboard_core::translation::CatalogTranslator;
use widgetboard_core::widget_config::ConfigDocument;
use widgetboard_db::PgDashboardStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let (pretty, json) = match LogFormat::from_env() {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "widgetboard_api=debug,widgetboard_core=info,tower_http=debug".into()),
        )
        .with(pretty)
        .with(json)
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Widget configuration ---
    let document = ConfigDocument::from_file(&config.widget_config_path)
        .unwrap_or_else(|e| panic!("Failed to load widget configuration: {e}"));
    let (configs, translations, role_permissions) = document.into_parts();
    tracing::info!(
        path = %config.widget_config_path.display(),
        widgets = configs.len(),
        "Widget configuration loaded"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = widgetboard_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    widgetboard_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    widgetboard_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- App state ---
    let state = AppState {
        store: Arc::new(PgDashboardStore::new(pool.clone())),
        configs: Arc::new(configs),
        resolver: Arc::new(default_resolver()),
        translator: Arc::new(CatalogTranslator::new(translations)),
        role_permissions: Arc::new(RolePermissions::new(role_permissions)),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Shutdown starts draining; the drain is cut off after the configured timeout.
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    let drain_deadline = async move {
        let _ = shutdown_rx.changed().await;
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!("Shutdown timeout elapsed, dropping in-flight requests");
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
