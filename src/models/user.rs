//! User model and authentication request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing an account
//! - `SignupRequest` / `LoginRequest` / `VerifyRequest`: auth endpoint bodies
//! - `UserResponse` / `AuthResponse`: response bodies returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `email`: Unique, stored lowercased and trimmed
/// - `password_hash`: Argon2 PHC-format hash, never serialized
/// - `name`: Optional display name
/// - `created_at`: When the account was created
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Normalized email address (lowercase, trimmed)
    pub email: String,

    /// Argon2 hash of the user's password.
    ///
    /// The plaintext password never touches the database; login verifies the
    /// submitted password against this hash.
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Timestamp when this account was created
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /auth/signup`.
///
/// All fields are optional at the serde level so that missing fields produce
/// a 400 with a useful message instead of a body-rejection error.
///
/// # Validation
///
/// - `email`: required, must look like `local@domain.tld`, normalized to
///   lowercase/trimmed before use
/// - `password`: required, at least 6 characters
/// - `name`: optional
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /auth/verify`.
///
/// Accepts both `userId` (the original client spelling) and `user_id`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default, alias = "userId")]
    pub user_id: Option<Uuid>,
}

/// Public view of a user, returned to API clients.
///
/// The password hash is deliberately absent.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "email": "ada@example.com",
///   "name": "Ada",
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Convert database User to API UserResponse, dropping the password hash.
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Response body for signup and login: the user plus a fresh session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
    pub token: String,
}

/// Response body for `POST /auth/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserResponse,
}
