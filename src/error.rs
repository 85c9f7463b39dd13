//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Session Errors**: Missing, invalid or expired bearer tokens (401)
/// - **API Key Errors**: Missing key (400), unknown key (401), quota
///   exhaustion (429)
/// - **Pipeline Errors**: Unparseable GitHub URL (400), missing README (404),
///   provider credit exhaustion (402), other provider failures (500)
/// - **Validation Errors**: Invalid request data (400)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No `Authorization: Bearer <token>` header on a dashboard request.
    #[error("Authorization token required")]
    MissingToken,

    /// Session token failed signature or expiry verification.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token verified but no matching user exists.
    ///
    /// Happens when a user is deleted after a token was issued.
    #[error("User not found")]
    UserNotFound,

    /// Login attempt with a wrong email or password.
    ///
    /// Deliberately does not say which one was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup with an email that already has an account.
    #[error("User with this email already exists")]
    DuplicateEmail,

    /// Summarizer request carried no API key, or a blank one.
    #[error("API key is required")]
    MissingApiKey,

    /// Presented API key does not exist.
    #[error("API key not found")]
    InvalidApiKey,

    /// API key has exhausted its usage quota.
    ///
    /// Carries the current usage and ceiling so the client can see how far
    /// over it is. No usage is recorded for a rate-limited attempt.
    #[error("Rate limit exceeded")]
    RateLimited { usage: i64, rate_limit: i64 },

    /// Key CRUD target does not exist or belongs to another user.
    #[error("API key not found")]
    ApiKeyNotFound,

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Submitted URL does not match any accepted GitHub repository shape.
    #[error("Invalid GitHub URL")]
    InvalidGithubUrl,

    /// No README variant could be fetched from the repository.
    #[error("README not found in repository")]
    ReadmeNotFound,

    /// Neither ANTHROPIC_API_KEY nor OPENAI_API_KEY is configured.
    #[error("No LLM API key configured")]
    LlmCredentialsMissing,

    /// The model provider reported billing/credit exhaustion.
    #[error("Insufficient API credits: {0}")]
    InsufficientCredits(String),

    /// Any other model provider failure (network, auth, malformed output).
    #[error("Failed to generate summary: {0}")]
    SummarizationFailed(String),

    /// Token issuance failed. Verification failures map to InvalidToken
    /// instead; this only covers the signing path.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Unexpected internal failure (e.g., password hashing).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "success": false,
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Rate-limit errors additionally carry `usage` and `rate_limit` at the top
/// level so clients can display quota state.
///
/// # Status Code Mapping
///
/// - `MissingApiKey`, `InvalidRequest`, `InvalidGithubUrl` → 400
/// - `MissingToken`, `InvalidToken`, `UserNotFound`, `InvalidCredentials`, `InvalidApiKey` → 401
/// - `InsufficientCredits` → 402
/// - `ApiKeyNotFound`, `ReadmeNotFound` → 404
/// - `DuplicateEmail` → 409
/// - `RateLimited` → 429
/// - everything else → 500 (hides details from client where appropriate)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token", self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string()),
            AppError::UserNotFound => (StatusCode::UNAUTHORIZED, "user_not_found", self.to_string()),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::DuplicateEmail => {
                (StatusCode::CONFLICT, "duplicate_email", self.to_string())
            }
            AppError::MissingApiKey => {
                (StatusCode::BAD_REQUEST, "missing_api_key", self.to_string())
            }
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::RateLimited { usage, rate_limit } => {
                // Build the enriched body here and return early; the generic
                // envelope below has no slot for the quota numbers.
                let body = Json(json!({
                    "success": false,
                    "error": {
                        "code": "rate_limit_exceeded",
                        "message": format!(
                            "API key has reached its usage limit of {rate_limit} requests"
                        )
                    },
                    "usage": usage,
                    "rate_limit": rate_limit
                }));
                return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            }
            AppError::ApiKeyNotFound => {
                (StatusCode::NOT_FOUND, "api_key_not_found", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::InvalidGithubUrl => (
                StatusCode::BAD_REQUEST,
                "invalid_github_url",
                "Please provide a valid GitHub repository URL".to_string(),
            ),
            AppError::ReadmeNotFound => (
                StatusCode::NOT_FOUND,
                "readme_not_found",
                "Could not retrieve README.md from the repository".to_string(),
            ),
            AppError::LlmCredentialsMissing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "llm_credentials_missing",
                "No LLM API key configured. Set ANTHROPIC_API_KEY or OPENAI_API_KEY".to_string(),
            ),
            AppError::InsufficientCredits(ref detail) => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_credits",
                detail.clone(),
            ),
            AppError::SummarizationFailed(ref detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "summarization_failed",
                detail.clone(),
            ),
            AppError::Database(_) | AppError::Token(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(status_of(AppError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::UserNotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidApiKey), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_key_is_a_client_error_not_auth() {
        assert_eq!(status_of(AppError::MissingApiKey), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limited_maps_to_429() {
        let err = AppError::RateLimited {
            usage: 100,
            rate_limit: 100,
        };
        assert_eq!(status_of(err), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn billing_maps_to_402_and_readme_to_404() {
        assert_eq!(
            status_of(AppError::InsufficientCredits("credit balance too low".into())),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(status_of(AppError::ReadmeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::DuplicateEmail), StatusCode::CONFLICT);
    }
}
