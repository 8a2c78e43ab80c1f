//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! This module creates the Axum router, wires the shared [`AppState`],
//! applies middleware, and starts the HTTP server.

// region: --- Imports
use axum::{
    routing::{get, patch, post},
    Router,
};
use lib_core::{core_config, create_pool, init_config, Config, DbPool};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req};
use crate::services::{LocalMediaStore, MediaStore, SessionService};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub session: SessionService,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config, media: Arc<dyn MediaStore>) -> Self {
        let session = SessionService::from_config(db.clone(), &config);
        Self {
            db,
            config,
            session,
            media,
        }
    }
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for SessionService {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn MediaStore> {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            migrations_path: "./migrations",
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server.
///
/// # Errors
///
/// Returns an error if configuration loading or validation fails, the
/// database connection or migrations fail, or the bind address is taken.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_new(&log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global tracing subscriber");

    info!("USER ACCOUNT BACKEND STARTING");
    info!("Log level: {}", log_level);

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    init_config().map_err(|e| anyhow::anyhow!(e))?;
    let app_config = core_config().clone();

    // Ensure data directory exists for the SQLite database
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool().await?;

    info!("Running database migrations from: {}", config.migrations_path);
    let migrator =
        sqlx::migrate::Migrator::new(std::path::Path::new(config.migrations_path)).await?;
    migrator.run(&pool).await?;
    info!("Migrations complete");

    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        &app_config.media_root,
        &app_config.media_base_url,
    ));
    let media_root = app_config.media_root.clone();

    let state = AppState::new(pool, app_config, media);
    let app = create_router(state, &media_root, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("SERVER READY: http://{}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes.
///
/// Public and protected routes are split into sub-routers; the protected
/// set sits behind the access-token gate.
pub fn create_router(state: AppState, media_root: &str, allowed_origins: Vec<String>) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    let public = Router::new()
        .route("/api/users/register", post(handlers::auth::register))
        .route("/api/users/login", post(handlers::auth::login))
        .route("/api/users/refresh-token", post(handlers::auth::refresh));

    let protected = Router::new()
        .route("/api/users/logout", post(handlers::auth::logout))
        .route("/api/users/me", get(handlers::user::me))
        .route("/api/users/update-profile", patch(handlers::user::update_profile))
        .route("/api/users/avatar", patch(handlers::user::update_avatar))
        .route("/api/users/cover-image", patch(handlers::user::update_cover_image))
        .route("/api/users/change-password", post(handlers::user::change_password))
        .route_layer(axum::middleware::from_fn_with_state(
            state.config.clone(),
            require_auth,
        ));

    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .merge(public)
        .merge(protected)
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "Route not found") })
        .with_state(state)
        .nest_service("/media", ServeDir::new(media_root))
        // Request stamping (adds request ID) - must be first
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        .layer(cors)
}
// endregion: --- Server Setup
