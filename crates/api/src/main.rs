use std::net::SocketAddr;
use std::sync::Arc;

use reelcast_api::config::ServerConfig;
use reelcast_api::router::build_app_router;
use reelcast_api::state::AppState;
use reelcast_cloud::SupabaseStorage;
use reelcast_core::rendering::ManimRenderer;
use reelcast_db::PgVideoCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelcast_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    if config.supabase.is_configured() {
        tracing::info!(bucket = %config.supabase.bucket, "Supabase storage configured");
    } else {
        tracing::warn!("SUPABASE_URL or SUPABASE_ANON_KEY not set, uploads will fail");
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reelcast_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    reelcast_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    reelcast_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Renderer ---
    tokio::fs::create_dir_all(&config.render.work_root)
        .await
        .expect("Failed to create render work root");

    let renderer = Arc::new(ManimRenderer::new(config.render.renderer_settings()));
    if config.render.warm_up {
        match renderer.warm_up(&config.render.work_root).await {
            Ok(()) => tracing::info!("Renderer warm-up complete"),
            Err(e) => tracing::warn!(error = %e, "Renderer warm-up failed"),
        }
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        renderer,
        storage: Arc::new(SupabaseStorage::new(config.supabase.clone())),
        catalog: Arc::new(PgVideoCatalog::new(pool)),
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

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
