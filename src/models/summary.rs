//! Summarizer endpoint request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /summarize`.
///
/// Accepts `githubUrl` (the original client spelling), `github_url`, or
/// plain `url`.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default, alias = "githubUrl", alias = "url")]
    pub github_url: Option<String>,
}

/// A parsed GitHub repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Repository block embedded in the summarizer response, echoing back the
/// parsed coordinates plus the URL the caller submitted.
#[derive(Debug, Serialize)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub url: String,
}

/// Structured output produced by the language model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoSummary {
    /// Free-text summary of the repository based on its README
    pub summary: String,

    /// Interesting or notable facts about the repository
    pub cool_facts: Vec<String>,
}

/// Response body for `POST /summarize`.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": true,
///   "repository": {
///     "owner": "facebook",
///     "repo": "react",
///     "branch": "main",
///     "url": "https://github.com/facebook/react"
///   },
///   "summary": "React is a JavaScript library for building user interfaces...",
///   "cool_facts": ["Powers Facebook and Instagram", "First released in 2013"]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub repository: RepositoryInfo,
    pub summary: String,
    pub cool_facts: Vec<String>,
}

/// Response body for `GET /summarize` (key check without running the
/// pipeline).
#[derive(Debug, Serialize)]
pub struct KeyCheckResponse {
    pub success: bool,
    pub message: String,
    pub usage: i64,
    pub rate_limit: i64,
}
