//! Repository summarization HTTP handlers.
//!
//! This module implements the API-key-gated endpoints:
//! - POST /summarize - Summarize a GitHub repository's README with an LLM
//! - GET /summarize - Validate an API key without running the pipeline
//!
//! The pipeline (README fetch, model call) runs only after key validation
//! succeeds, so unauthenticated or rate-limited callers never burn external
//! quota.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};

use crate::{
    error::AppError,
    models::{
        api_key::ApiKey,
        summary::{KeyCheckResponse, RepositoryInfo, SummarizeRequest, SummarizeResponse},
    },
    services::{api_key_service, github_service, summarizer_service},
    state::AppState,
};

/// Summarize a GitHub repository.
///
/// # Endpoint
///
/// `POST /summarize`
///
/// # Authentication
///
/// API key in one of these headers, checked in order (header lookup is
/// case-insensitive):
/// - `x-api-key: <key>`
/// - `Authorization: Bearer <key>`
/// - `api-key: <key>`
///
/// # Request Body
///
/// ```json
/// { "githubUrl": "https://github.com/facebook/react" }
/// ```
///
/// `github_url` and `url` are accepted spellings.
///
/// # Pipeline
///
/// 1. Validate the key and record the use (quota is spent here; a failure
///    further down is not rolled back)
/// 2. Parse the URL into owner/repo/branch
/// 3. Fetch the README (content API, then raw variants)
/// 4. Ask the configured LLM for a structured summary
///
/// # Response
///
/// - **Success (200 OK)**: `{success, repository, summary, cool_facts}`
/// - **Error (400)**: missing key, bad body, missing or invalid URL
/// - **Error (401)**: unknown key
/// - **Error (402)**: model provider out of credits
/// - **Error (404)**: no README found
/// - **Error (429)**: key over quota, carries usage and limit
/// - **Error (500)**: store or provider failure
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, AppError> {
    // The gate runs before anything else: key errors surface ahead of body
    // errors, and no pipeline work happens for an unauthenticated caller.
    let raw_key = extract_api_key(&headers).ok_or(AppError::MissingApiKey)?;
    api_key_service::validate(&state.pool, &raw_key).await?;

    let Json(request) = body.map_err(|_| {
        AppError::InvalidRequest("Request body must be valid JSON".to_string())
    })?;

    let github_url = request.github_url.ok_or_else(|| {
        AppError::InvalidRequest("Please provide githubUrl in the request body".to_string())
    })?;

    let repo = github_service::parse_github_url(&github_url).ok_or(AppError::InvalidGithubUrl)?;

    tracing::info!(
        owner = %repo.owner,
        repo = %repo.repo,
        branch = %repo.branch,
        "summarizing repository"
    );

    let readme = github_service::fetch_readme(&state.http, &repo).await?;
    let summary = summarizer_service::summarize(&state.http, &state.config, &readme).await?;

    Ok(Json(SummarizeResponse {
        success: true,
        repository: RepositoryInfo {
            owner: repo.owner,
            repo: repo.repo,
            branch: repo.branch,
            url: github_url,
        },
        summary: summary.summary,
        cool_facts: summary.cool_facts,
    }))
}

/// Validate an API key without summarizing anything.
///
/// # Endpoint
///
/// `GET /summarize`
///
/// Lets clients confirm a key works and see its quota state. This counts as
/// a use: the usage counter advances exactly as it would for a real
/// summarization call.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "success": true,
///   "message": "API key validated successfully",
///   "usage": 13,
///   "rate_limit": 100
/// }
/// ```
pub async fn check_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<KeyCheckResponse>, AppError> {
    let raw_key = extract_api_key(&headers).ok_or(AppError::MissingApiKey)?;
    let key: ApiKey = api_key_service::validate(&state.pool, &raw_key).await?;

    Ok(Json(KeyCheckResponse {
        success: true,
        message: "API key validated successfully".to_string(),
        usage: key.usage,
        rate_limit: key.rate_limit,
    }))
}

/// Pull the API key out of the request headers.
///
/// Checks `x-api-key`, then `Authorization: Bearer <key>`, then `api-key`.
/// HeaderMap lookups are case-insensitive, so `X-API-Key` and friends need
/// no special handling.
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = header_str(headers, "x-api-key") {
        return Some(value.to_string());
    }

    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(value.to_string());
    }

    header_str(headers, "api-key").map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn prefers_x_api_key_header() {
        let mut headers = headers_with("x-api-key", "ghs_primary");
        headers.insert("authorization", HeaderValue::from_static("Bearer other"));
        assert_eq!(extract_api_key(&headers).as_deref(), Some("ghs_primary"));
    }

    #[test]
    fn falls_back_to_bearer_then_api_key() {
        let headers = headers_with("authorization", "Bearer ghs_bearer");
        assert_eq!(extract_api_key(&headers).as_deref(), Some("ghs_bearer"));

        let headers = headers_with("api-key", "ghs_plain");
        assert_eq!(extract_api_key(&headers).as_deref(), Some("ghs_plain"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        // HeaderMap normalizes names, so mixed-case client headers still hit
        let headers = headers_with("x-api-key", "ghs_key");
        assert!(headers.get("X-API-Key").is_some());
        assert_eq!(extract_api_key(&headers).as_deref(), Some("ghs_key"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let headers = headers_with("authorization", "Basic dXNlcjpwYXNz");
        assert!(extract_api_key(&headers).is_none());
    }

    #[test]
    fn no_key_headers_yields_none() {
        assert!(extract_api_key(&HeaderMap::new()).is_none());
    }
}
