//! Authentication HTTP handlers.
//!
//! This module implements the account endpoints:
//! - POST /auth/signup - Create an account, returns user + session token
//! - POST /auth/login - Verify credentials, returns user + session token
//! - POST /auth/verify - Confirm a user id still maps to an account

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    models::user::{
        AuthResponse, LoginRequest, SignupRequest, User, VerifyRequest, VerifyResponse,
    },
    services::{password, token_service},
    state::AppState,
};

const USER_COLUMNS: &str = "id, email, password_hash, name, created_at";

/// Create a new account.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "ada@example.com",
///   "password": "secret1",
///   "name": "Ada"  // optional
/// }
/// ```
///
/// # Validation
///
/// - Email and password are required
/// - Email must look like `local@domain.tld` and is normalized to
///   lowercase/trimmed before any lookup
/// - Password must be at least 6 characters
///
/// # Response
///
/// - **Success (201 Created)**: `{success, user, token}`
/// - **Error (400)**: Missing or malformed input
/// - **Error (409)**: An account with this email already exists
///
/// # Duplicate Handling
///
/// The pre-insert existence check gives a friendly 409 for the common case;
/// the UNIQUE constraint on `email` catches two signups racing past that
/// check, and its violation is mapped to the same 409.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (Some(email), Some(pass)) = (request.email, request.password) else {
        return Err(AppError::InvalidRequest(
            "Email and password are required".to_string(),
        ));
    };

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err(AppError::InvalidRequest("Invalid email format".to_string()));
    }

    if pass.chars().count() < 6 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    // Friendly duplicate check before paying for a password hash
    let existing: Option<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash =
        password::hash_password(&pass).map_err(|err| AppError::Internal(err.to_string()))?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, name)
         VALUES ($1, $2, $3)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&email)
    .bind(&password_hash)
    .bind(&request.name)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        // Two signups raced past the existence check
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::DuplicateEmail
        } else {
            AppError::Database(err)
        }
    })?;

    let token = token_service::issue(&state.config.jwt_secret, &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            user: user.into(),
            token,
        }),
    ))
}

/// Log in with email and password.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Response
///
/// - **Success (200 OK)**: `{success, user, token}`
/// - **Error (400)**: Missing email or password
/// - **Error (401)**: Unknown email or wrong password
///
/// # Security Note
///
/// The same 401 is returned whether the email is unknown or the password is
/// wrong, so the endpoint cannot be used to probe which emails have
/// accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (Some(email), Some(pass)) = (request.email, request.password) else {
        return Err(AppError::InvalidRequest(
            "Email and password are required".to_string(),
        ));
    };

    let email = normalize_email(&email);

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&pass, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = token_service::issue(&state.config.jwt_secret, &user.email)?;

    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
        token,
    }))
}

/// Confirm that a user id still maps to an account.
///
/// # Endpoint
///
/// `POST /auth/verify`
///
/// Used by clients to validate a cached session's user on page load.
///
/// # Response
///
/// - **Success (200 OK)**: `{success, user}`
/// - **Error (400)**: Missing user id
/// - **Error (401)**: No such user
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let user_id = request
        .user_id
        .ok_or_else(|| AppError::InvalidRequest("User ID is required".to_string()))?;

    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or(AppError::UserNotFound)?;

    Ok(Json(VerifyResponse {
        success: true,
        user: user.into(),
    }))
}

/// Lowercase and trim an email for storage and lookup.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: non-empty local part, a dot somewhere in the domain,
/// no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn accepts_ordinary_emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@nodot"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example.com."));
        assert!(!is_valid_email("spa ce@example.com"));
    }
}
