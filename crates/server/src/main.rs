//! Examdesk server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use examdesk_api::{AppState, router as api_router, session_middleware};
use examdesk_common::Config;
use examdesk_core::{
    AccountService, ComplaintService, EmailService, NotificationService, PasswordResetService,
    StatsService,
};
use examdesk_db::repositories::{
    ComplaintRepository, NotificationRepository, PasswordResetTokenRepository, ResponseRepository,
    StatsRepository, StatusHistoryRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local development reads .env; missing files are fine.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "examdesk=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting examdesk server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = examdesk_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    examdesk_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let response_repo = ResponseRepository::new(Arc::clone(&db));
    let history_repo = StatusHistoryRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let token_repo = PasswordResetTokenRepository::new(Arc::clone(&db));
    let stats_repo = StatsRepository::new(Arc::clone(&db));

    // Initialize services
    let email_service = EmailService::new(&config)?;
    let notification_service = NotificationService::new(notification_repo, user_repo.clone());
    let account_service = AccountService::new(user_repo.clone());
    let complaint_service = ComplaintService::new(
        complaint_repo,
        response_repo,
        history_repo,
        user_repo.clone(),
        notification_service.clone(),
        email_service.clone(),
    );
    let password_reset_service =
        PasswordResetService::new(user_repo.clone(), token_repo, email_service);
    let stats_service = StatsService::new(stats_repo, user_repo);

    let state = AppState {
        account_service,
        complaint_service,
        notification_service,
        password_reset_service,
        stats_service,
    };

    // Build the router
    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn(session_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The pool closes with the last handle; be explicit about it at shutdown.
    if let Ok(db) = Arc::try_unwrap(db) {
        db.close().await.ok();
    }
    info!("Shutdown complete");

    Ok(())
}
