//! API key model and key-management request/response types.
//!
//! API keys are opaque bearer credentials scoped to a user. Each key carries
//! a usage counter and a quota ceiling; the summarizer endpoint admits a
//! request only while `usage < rate_limit`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `user_id`: Owning user (many keys per user)
/// - `name`: Human-readable label, non-empty
/// - `key`: The opaque key value itself, unique across all keys
/// - `usage`: Admitted request count, monotonically non-decreasing
/// - `rate_limit`: Quota ceiling, defaults to 100
/// - `last_used`: Set on every admitted request, NULL until first use
/// - `created_at`: When the key was created
///
/// # Invariant
///
/// `usage <= rate_limit` holds for every committed row: admission increments
/// usage through a single conditional UPDATE gated on `usage < rate_limit`,
/// so two racing requests can never both slip past the ceiling.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// Foreign key to the user that owns this key.
    ///
    /// Key CRUD queries always filter by `user_id` so one user can never
    /// read or mutate another user's keys, even with a correct id.
    pub user_id: Uuid,

    /// Human-readable name for this key
    pub name: String,

    /// The opaque key value presented by callers.
    ///
    /// No required format beyond opacity; the default generator emits
    /// `ghs_<32 hex chars>`. Lookups compare the exact trimmed value.
    pub key: String,

    /// Number of requests admitted with this key
    pub usage: i64,

    /// Maximum number of admitted requests before callers get 429
    pub rate_limit: i64,

    /// Timestamp of the most recent admitted request
    pub last_used: Option<DateTime<Utc>>,

    /// Timestamp when this key was created
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api-keys`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "production",
///   "key": "ghs_custom_value"  // optional, generated when absent
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,

    /// Caller-supplied key value. A random one is generated when omitted.
    #[serde(default)]
    pub key: Option<String>,
}

/// Request body for `PUT /api-keys/{id}`.
///
/// At least one field must be present; both absent is a 400.
#[derive(Debug, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub key: Option<String>,
}

/// Public view of an API key, returned to its owner.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "production",
///   "key": "ghs_3f9a...",
///   "usage": 12,
///   "rate_limit": 100,
///   "last_used": "2025-12-20T10:00:00Z",
///   "created_at": "2025-12-01T09:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub usage: i64,
    pub rate_limit: i64,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Convert database ApiKey to API response, dropping the internal `user_id`.
impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            key: key.key,
            usage: key.usage,
            rate_limit: key.rate_limit,
            last_used: key.last_used,
            created_at: key.created_at,
        }
    }
}

/// Envelope for `GET /api-keys`.
#[derive(Debug, Serialize)]
pub struct ApiKeyListResponse {
    pub success: bool,
    pub data: Vec<ApiKeyResponse>,
}

/// Envelope for single-key responses (create, get, update).
#[derive(Debug, Serialize)]
pub struct ApiKeyEnvelope {
    pub success: bool,
    pub data: ApiKeyResponse,
}

/// Envelope for `DELETE /api-keys/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteApiKeyResponse {
    pub success: bool,
    pub message: String,
}
