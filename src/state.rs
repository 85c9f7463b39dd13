//! Shared application state.
//!
//! Everything a handler needs is constructed once at startup and injected
//! through Axum's `State` extractor: the database pool, one HTTP client with
//! a bounded timeout, and the loaded configuration. No global singletons.

use std::sync::Arc;

use crate::{config::Config, db::DbPool};

/// State shared by every route handler and middleware.
///
/// Cloning is cheap: the pool and client are handles, the config is behind
/// an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: DbPool,

    /// Shared HTTP client for GitHub and LLM provider calls.
    ///
    /// Carries a request timeout so no external call can hang a request.
    pub http: reqwest::Client,

    /// Application configuration loaded at startup
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, http: reqwest::Client, config: Config) -> Self {
        Self {
            pool,
            http,
            config: Arc::new(config),
        }
    }
}
