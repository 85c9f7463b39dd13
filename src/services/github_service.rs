//! GitHub URL parsing and README retrieval.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::{error::AppError, models::summary::RepoRef};

/// README file names tried against the raw-content host, in order.
/// The first hit wins; no variant is retried.
const README_VARIANTS: [&str; 3] = ["README.md", "readme.md", "Readme.md"];

/// Parse a GitHub repository URL into owner, repo and branch.
///
/// # Accepted shapes
///
/// - `https://github.com/owner/repo`
/// - `https://github.com/owner/repo/tree/branch`
/// - `git@github.com:owner/repo.git` (SSH style)
///
/// Trailing slashes and a `.git` suffix are tolerated. The branch defaults
/// to `main` when the URL does not name one. Returns `None` for anything
/// that is not a GitHub repository URL.
pub fn parse_github_url(raw: &str) -> Option<RepoRef> {
    let url = raw.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let host_at = url.find("github.com")?;
    let rest = &url[host_at + "github.com".len()..];

    // Path separator: '/' for https URLs, ':' for SSH remotes.
    let rest = rest
        .strip_prefix('/')
        .or_else(|| rest.strip_prefix(':'))?;

    let mut segments = rest.split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    let branch = match (segments.next(), segments.next()) {
        (Some("tree"), Some(branch)) if !branch.is_empty() => branch,
        _ => "main",
    };

    Some(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
    })
}

/// Subset of the GitHub content API response for `/readme`.
#[derive(Debug, Deserialize)]
struct ContentApiReadme {
    content: String,
}

/// Fetch the README text for a repository.
///
/// # Process
///
/// 1. Try the structured content API
///    (`https://api.github.com/repos/{owner}/{repo}/readme`), which resolves
///    the README regardless of its exact file name and returns its content
///    base64-encoded.
/// 2. On any failure, fall through to the raw-content host, trying
///    `README.md`, `readme.md`, `Readme.md` against the resolved branch in
///    that fixed order.
///
/// All requests go through the shared client, which carries a bounded
/// timeout, so a slow upstream surfaces as `ReadmeNotFound` rather than a
/// hung request.
///
/// # Errors
///
/// `ReadmeNotFound` when every variant fails.
pub async fn fetch_readme(http: &reqwest::Client, repo: &RepoRef) -> Result<String, AppError> {
    let api_url = format!(
        "https://api.github.com/repos/{}/{}/readme",
        repo.owner, repo.repo
    );

    let api_result = http
        .get(&api_url)
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "github-summarizer")
        .send()
        .await;

    if let Ok(response) = api_result {
        if response.status().is_success() {
            if let Ok(body) = response.json::<ContentApiReadme>().await {
                if let Some(text) = decode_content(&body.content) {
                    return Ok(text);
                }
            }
        }
    }

    // Content API failed; try the raw host with known README spellings.
    for variant in README_VARIANTS {
        let raw_url = format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            repo.owner, repo.repo, repo.branch, variant
        );

        match http.get(&raw_url).send().await {
            Ok(response) if response.status().is_success() => {
                if let Ok(text) = response.text().await {
                    return Ok(text);
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!("raw README fetch failed for {raw_url}: {err}");
            }
        }
    }

    Err(AppError::ReadmeNotFound)
}

/// Decode the base64 payload from the content API.
///
/// GitHub inserts newlines into the encoded content, so whitespace is
/// stripped before decoding.
fn decode_content(encoded: &str) -> Option<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> RepoRef {
        parse_github_url(url).expect("should parse")
    }

    #[test]
    fn parses_plain_https_url() {
        let repo = parsed("https://github.com/facebook/react");
        assert_eq!(repo.owner, "facebook");
        assert_eq!(repo.repo, "react");
        assert_eq!(repo.branch, "main");
    }

    #[test]
    fn parses_tree_branch_url() {
        let repo = parsed("https://github.com/facebook/react/tree/dev");
        assert_eq!(repo.branch, "dev");
    }

    #[test]
    fn parses_ssh_remote() {
        let repo = parsed("git@github.com:rust-lang/cargo.git");
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.repo, "cargo");
        assert_eq!(repo.branch, "main");
    }

    #[test]
    fn tolerates_trailing_slash_and_git_suffix() {
        let repo = parsed("https://github.com/tokio-rs/tokio/");
        assert_eq!(repo.repo, "tokio");

        let repo = parsed("https://github.com/tokio-rs/tokio.git");
        assert_eq!(repo.repo, "tokio");
    }

    #[test]
    fn extra_path_segments_do_not_change_the_branch() {
        // /blob/... is not a /tree/<branch> shape
        let repo = parsed("https://github.com/facebook/react/blob/main/README.md");
        assert_eq!(repo.branch, "main");
    }

    #[test]
    fn rejects_non_github_urls() {
        assert!(parse_github_url("https://gitlab.com/owner/repo").is_none());
        assert!(parse_github_url("not a url at all").is_none());
        assert!(parse_github_url("").is_none());
    }

    #[test]
    fn rejects_urls_without_a_repo() {
        assert!(parse_github_url("https://github.com/onlyowner").is_none());
        assert!(parse_github_url("https://github.com/").is_none());
    }

    #[test]
    fn decodes_base64_with_embedded_newlines() {
        // "# Hello\n" encoded, split across lines the way GitHub returns it
        let encoded = "IyBI\nZWxs\nbwo=";
        assert_eq!(decode_content(encoded).unwrap(), "# Hello\n");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(decode_content("!!not base64!!").is_none());
    }
}
