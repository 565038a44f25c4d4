//! Wanderblog server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wanderblog_api::{middleware::AppState, router as api_router};
use wanderblog_common::{Config, LocalStorage, StorageBackend};
use wanderblog_core::{
    AccountService, BlogService, CategoryService, Mailer, TokenService,
};
use wanderblog_db::repositories::{
    BlogRepository, CategoryRepository, KeywordRepository, LikeRepository, UserRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Liveness probe.
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "wanderblog",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment from .env first, so it can feed the config loader
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wanderblog=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting wanderblog server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = wanderblog_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    wanderblog_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let blog_repo = BlogRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    // Initialize upload storage
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));

    // Initialize services
    let token_service = TokenService::new(&config.auth.secret_key, config.auth.token_expiry_secs);
    let mailer = Mailer::new(config.mail.as_ref(), &config.server.url)?;
    if !mailer.is_enabled() {
        info!("Mail is not configured, outbound email will only be logged");
    }

    let account_service = AccountService::new(
        user_repo.clone(),
        token_service.clone(),
        mailer,
        Arc::clone(&storage),
    );
    let blog_service = BlogService::new(
        blog_repo,
        category_repo.clone(),
        keyword_repo,
        like_repo,
        user_repo,
        Arc::clone(&storage),
    );
    let category_service = CategoryService::new(category_repo);

    // Create app state
    let state = AppState {
        account_service,
        blog_service,
        category_service,
        token_service,
    };

    // Build router
    let serve_uploads = ServeDir::new(&config.storage.base_path);
    let uploads_path = config.storage.base_url.clone();

    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api_router())
        .nest_service(&uploads_path, serve_uploads)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            wanderblog_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
