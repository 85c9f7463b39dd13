//! GitHub Summarizer Service - Main Application Entry Point
//!
//! This is a REST API server providing user accounts, API-key management and
//! an LLM-backed GitHub repository summarization endpoint. Dashboard
//! operations authenticate with session tokens; the summarizer endpoint is
//! gated by API keys with per-key usage quotas.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Sessions**: HS256 JWTs bound to a user's email, 7-day validity
//! - **Summarizer gate**: opaque API keys with an atomic conditional
//!   usage increment
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the shared HTTP client (bounded timeout)
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // One HTTP client shared by GitHub fetches and LLM calls.
    // The timeout bounds every external call; nothing can hang a request.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let server_port = config.server_port;
    let state = AppState::new(pool, http, config);

    // Key management routes require a valid session token
    let session_routes = Router::new()
        .route(
            "/api-keys",
            get(handlers::api_keys::list_keys).post(handlers::api_keys::create_key),
        )
        .route(
            "/api-keys/{id}",
            get(handlers::api_keys::get_key)
                .put(handlers::api_keys::update_key)
                .delete(handlers::api_keys::delete_key),
        )
        // Apply session authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine session-guarded routes with public routes.
    // The summarizer endpoints are "public" at the router level: they carry
    // their own API-key gate inside the handler.
    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/verify", post(handlers::auth::verify))
        .route(
            "/summarize",
            post(handlers::summarize::summarize).get(handlers::summarize::check_key),
        )
        .merge(session_routes)
        // Allow the dashboard frontend to call from another origin
        .layer(CorsLayer::permissive())
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state (pool, HTTP client, config) with all handlers
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
