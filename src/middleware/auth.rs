//! Session-token authentication middleware.
//!
//! This middleware intercepts every key-management request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Verify its signature and expiry
//! 3. Resolve the token's email to a user id against the database
//! 4. Inject authentication context into the request
//!
//! It is a gate, not a cache: the user lookup runs on every call, so a user
//! deleted after a token was issued is rejected immediately.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, services::token_service, state::AppState};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user.
    ///
    /// Used to scope key queries so one user can never touch another
    /// user's keys.
    pub user_id: Uuid,
}

/// Session authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Verify the token signature and expiry
/// 3. Look up the user by the token's email
/// 4. If found: inject `AuthContext` into request, call next handler
///
/// # Errors
///
/// - `MissingToken` (401): header absent or not `Bearer `-prefixed
/// - `InvalidToken` (401): signature or expiry verification failed
/// - `UserNotFound` (401): token verified but the user no longer exists
/// - `Database` (500): store lookup failed
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    // Expected format: "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MissingToken)?;

    // Step 2: Verify signature and expiry
    let claims =
        token_service::verify(&state.config.jwt_secret, token).ok_or(AppError::InvalidToken)?;

    // Step 3: Resolve email to user id. Runs on every request by design.
    let user_id: Uuid = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&claims.email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

    // Step 4: Inject context into request extensions
    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(request).await)
}
