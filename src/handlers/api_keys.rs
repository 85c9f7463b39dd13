//! API key management HTTP handlers.
//!
//! This module implements the key CRUD endpoints:
//! - GET /api-keys - List the caller's keys
//! - POST /api-keys - Create a new key
//! - GET /api-keys/{id} - Fetch one key
//! - PUT /api-keys/{id} - Rename a key or replace its value
//! - DELETE /api-keys/{id} - Delete a key
//!
//! All routes sit behind the session middleware; every query filters by the
//! authenticated user's id, so a foreign key id yields 404 rather than
//! another user's data.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::api_key::{
        ApiKey, ApiKeyEnvelope, ApiKeyListResponse, CreateApiKeyRequest, DeleteApiKeyResponse,
        UpdateApiKeyRequest,
    },
    services::api_key_service,
    state::AppState,
};

const KEY_COLUMNS: &str = "id, user_id, name, key, usage, rate_limit, last_used, created_at";

/// List all API keys owned by the caller, newest first.
///
/// # Endpoint
///
/// `GET /api-keys`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     { "id": "...", "name": "production", "key": "ghs_...", "usage": 12, "rate_limit": 100, ... }
///   ]
/// }
/// ```
pub async fn list_keys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiKeyListResponse>, AppError> {
    let keys = sqlx::query_as::<_, ApiKey>(&format!(
        "SELECT {KEY_COLUMNS} FROM api_keys WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiKeyListResponse {
        success: true,
        data: keys.into_iter().map(Into::into).collect(),
    }))
}

/// Create a new API key.
///
/// # Endpoint
///
/// `POST /api-keys`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "production",
///   "key": "ghs_custom"  // optional, generated when absent
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the new key with `usage` 0 and the default
///   rate limit of 100
/// - **Error (400)**: name missing or empty after trimming
pub async fn create_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyEnvelope>), AppError> {
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AppError::InvalidRequest(
                "Name is required and must be a non-empty string".to_string(),
            )
        })?;

    // Generate a key value unless the caller supplied one
    let key_value = match request.key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => api_key_service::generate_key(),
    };

    // usage and rate_limit take their column defaults (0 and 100)
    let key = sqlx::query_as::<_, ApiKey>(&format!(
        "INSERT INTO api_keys (user_id, name, key)
         VALUES ($1, $2, $3)
         RETURNING {KEY_COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(name)
    .bind(&key_value)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::InvalidRequest("An API key with this value already exists".to_string())
        } else {
            AppError::Database(err)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiKeyEnvelope {
            success: true,
            data: key.into(),
        }),
    ))
}

/// Fetch a single API key.
///
/// # Endpoint
///
/// `GET /api-keys/{id}`
///
/// Returns 404 if the key doesn't exist OR belongs to a different user, so
/// key ids cannot be enumerated across accounts.
pub async fn get_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<ApiKeyEnvelope>, AppError> {
    let key = sqlx::query_as::<_, ApiKey>(&format!(
        "SELECT {KEY_COLUMNS} FROM api_keys WHERE id = $1 AND user_id = $2"
    ))
    .bind(key_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::ApiKeyNotFound)?;

    Ok(Json(ApiKeyEnvelope {
        success: true,
        data: key.into(),
    }))
}

/// Update an API key's name and/or value.
///
/// # Endpoint
///
/// `PUT /api-keys/{id}`
///
/// # Request Body
///
/// ```json
/// { "name": "staging" }
/// ```
///
/// At least one of `name`, `key` must be present; a provided field must be
/// non-empty after trimming.
///
/// # Response
///
/// - **Success (200 OK)**: the updated key
/// - **Error (400)**: no fields, or an empty field
/// - **Error (404)**: key not found or not owned by the caller
pub async fn update_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyEnvelope>, AppError> {
    if request.name.is_none() && request.key.is_none() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let name = request
        .name
        .as_deref()
        .map(|n| {
            let n = n.trim();
            if n.is_empty() {
                Err(AppError::InvalidRequest(
                    "Name must be a non-empty string".to_string(),
                ))
            } else {
                Ok(n.to_string())
            }
        })
        .transpose()?;

    let key_value = request
        .key
        .as_deref()
        .map(|k| {
            let k = k.trim();
            if k.is_empty() {
                Err(AppError::InvalidRequest(
                    "Key must be a non-empty string".to_string(),
                ))
            } else {
                Ok(k.to_string())
            }
        })
        .transpose()?;

    // COALESCE keeps whichever column the caller didn't send
    let key = sqlx::query_as::<_, ApiKey>(&format!(
        "UPDATE api_keys
         SET name = COALESCE($3, name),
             key = COALESCE($4, key)
         WHERE id = $1 AND user_id = $2
         RETURNING {KEY_COLUMNS}"
    ))
    .bind(key_id)
    .bind(auth.user_id)
    .bind(name)
    .bind(key_value)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::ApiKeyNotFound)?;

    Ok(Json(ApiKeyEnvelope {
        success: true,
        data: key.into(),
    }))
}

/// Delete an API key.
///
/// # Endpoint
///
/// `DELETE /api-keys/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: `{success, message}`
/// - **Error (404)**: key not found or not owned by the caller
pub async fn delete_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<DeleteApiKeyResponse>, AppError> {
    let deleted = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
        .bind(key_id)
        .bind(auth.user_id)
        .execute(&state.pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::ApiKeyNotFound);
    }

    Ok(Json(DeleteApiKeyResponse {
        success: true,
        message: "API key deleted successfully".to_string(),
    }))
}
