//! LLM-backed README summarization.
//!
//! The model is asked for structured output with exactly two fields: a
//! free-text `summary` and a `cool_facts` list of strings. Anthropic is the
//! preferred provider (forced tool call carrying the output schema); OpenAI
//! is the fallback (chat completion with a `json_schema` response format).
//! Provider selection depends only on which credential is configured.

use serde_json::{Value, json};

use crate::{config::Config, error::AppError, models::summary::RepoSummary};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o";

/// Summarize README content with whichever provider is configured.
///
/// # Errors
///
/// - `LlmCredentialsMissing` when neither provider credential is set
/// - `InsufficientCredits` when the provider reports billing exhaustion
/// - `SummarizationFailed` for any other provider failure, including
///   timeouts from the shared client
pub async fn summarize(
    http: &reqwest::Client,
    config: &Config,
    readme: &str,
) -> Result<RepoSummary, AppError> {
    if let Some(key) = configured(&config.anthropic_api_key) {
        tracing::info!("summarizing with Anthropic {ANTHROPIC_MODEL}");
        summarize_with_anthropic(http, key, readme).await
    } else if let Some(key) = configured(&config.openai_api_key) {
        tracing::info!("summarizing with OpenAI {OPENAI_MODEL}");
        summarize_with_openai(http, key, readme).await
    } else {
        Err(AppError::LlmCredentialsMissing)
    }
}

/// A credential counts as configured only when set and non-blank.
fn configured(credential: &Option<String>) -> Option<&str> {
    credential
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

fn prompt(readme: &str) -> String {
    format!("Summarize this github repository from this readme file content:\n\n{readme}")
}

/// JSON schema for the structured output, shared by both providers.
fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "A comprehensive summary of the GitHub repository based on the README content"
            },
            "cool_facts": {
                "type": "array",
                "items": { "type": "string" },
                "description": "A list of interesting or notable facts about the repository"
            }
        },
        "required": ["summary", "cool_facts"],
        "additionalProperties": false
    })
}

/// Call the Anthropic Messages API with a forced tool call.
///
/// The tool's input schema is the output schema; forcing the tool choice
/// makes the model respond with a `tool_use` block whose `input` is the
/// structured summary.
async fn summarize_with_anthropic(
    http: &reqwest::Client,
    api_key: &str,
    readme: &str,
) -> Result<RepoSummary, AppError> {
    let body = json!({
        "model": ANTHROPIC_MODEL,
        "max_tokens": 1024,
        "temperature": 0.0,
        "tools": [{
            "name": "record_summary",
            "description": "Record the repository summary and notable facts",
            "input_schema": output_schema()
        }],
        "tool_choice": { "type": "tool", "name": "record_summary" },
        "messages": [{ "role": "user", "content": prompt(readme) }]
    });

    let response = http
        .post(ANTHROPIC_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(|err| AppError::SummarizationFailed(err.to_string()))?;

    if !response.status().is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(classify_provider_error(detail));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|err| AppError::SummarizationFailed(err.to_string()))?;

    extract_anthropic_summary(&value).ok_or_else(|| {
        AppError::SummarizationFailed("provider returned no structured output".to_string())
    })
}

/// Call the OpenAI chat completions API with a strict JSON schema response
/// format.
async fn summarize_with_openai(
    http: &reqwest::Client,
    api_key: &str,
    readme: &str,
) -> Result<RepoSummary, AppError> {
    let body = json!({
        "model": OPENAI_MODEL,
        "temperature": 0.0,
        "messages": [{ "role": "user", "content": prompt(readme) }],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "repo_summary",
                "strict": true,
                "schema": output_schema()
            }
        }
    });

    let response = http
        .post(OPENAI_URL)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|err| AppError::SummarizationFailed(err.to_string()))?;

    if !response.status().is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(classify_provider_error(detail));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|err| AppError::SummarizationFailed(err.to_string()))?;

    extract_openai_summary(&value).ok_or_else(|| {
        AppError::SummarizationFailed("provider returned no structured output".to_string())
    })
}

/// Pull the structured summary out of an Anthropic Messages response:
/// the `input` of the first `tool_use` content block.
fn extract_anthropic_summary(response: &Value) -> Option<RepoSummary> {
    let blocks = response.get("content")?.as_array()?;
    let tool_use = blocks
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("tool_use"))?;
    serde_json::from_value(tool_use.get("input")?.clone()).ok()
}

/// Pull the structured summary out of an OpenAI chat completion: the message
/// content is a JSON string conforming to the requested schema.
fn extract_openai_summary(response: &Value) -> Option<RepoSummary> {
    let content = response
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()?;
    serde_json::from_str(content).ok()
}

/// Map a provider error body onto the failure taxonomy.
fn classify_provider_error(detail: String) -> AppError {
    if is_credit_error(&detail) {
        AppError::InsufficientCredits(detail)
    } else {
        AppError::SummarizationFailed(detail)
    }
}

/// Heuristic detection of billing/credit exhaustion from provider error
/// text. String-matching third-party messages is brittle but the providers
/// expose no structured code for this; keeping the check in one place makes
/// it easy to replace if they ever do.
fn is_credit_error(detail: &str) -> bool {
    let lowered = detail.to_lowercase();
    lowered.contains("credit balance")
        || lowered.contains("too low")
        || lowered.contains("insufficient_quota")
        || lowered.contains("exceeded your current quota")
        || lowered.contains("insufficient credits")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_heuristic_matches_known_provider_phrasings() {
        assert!(is_credit_error(
            "Your credit balance is too low to access the Anthropic API"
        ));
        assert!(is_credit_error(
            r#"{"error":{"type":"insufficient_quota","message":"..."}}"#
        ));
        assert!(is_credit_error(
            "You exceeded your current quota, please check your plan"
        ));
    }

    #[test]
    fn credit_heuristic_ignores_other_errors() {
        assert!(!is_credit_error("invalid x-api-key"));
        assert!(!is_credit_error("model not found"));
        assert!(!is_credit_error(""));
    }

    #[test]
    fn extracts_anthropic_tool_use_block() {
        let response = json!({
            "id": "msg_01",
            "content": [
                { "type": "text", "text": "calling the tool" },
                {
                    "type": "tool_use",
                    "name": "record_summary",
                    "input": {
                        "summary": "A web framework.",
                        "cool_facts": ["fast", "popular"]
                    }
                }
            ]
        });

        let summary = extract_anthropic_summary(&response).unwrap();
        assert_eq!(summary.summary, "A web framework.");
        assert_eq!(summary.cool_facts, vec!["fast", "popular"]);
    }

    #[test]
    fn anthropic_response_without_tool_use_is_none() {
        let response = json!({
            "content": [{ "type": "text", "text": "no tool call here" }]
        });
        assert!(extract_anthropic_summary(&response).is_none());
    }

    #[test]
    fn extracts_openai_json_content() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": r#"{"summary":"A parser.","cool_facts":["zero-copy"]}"#
                }
            }]
        });

        let summary = extract_openai_summary(&response).unwrap();
        assert_eq!(summary.summary, "A parser.");
        assert_eq!(summary.cool_facts, vec!["zero-copy"]);
    }

    #[test]
    fn openai_non_json_content_is_none() {
        let response = json!({
            "choices": [{ "message": { "content": "plain prose, not JSON" } }]
        });
        assert!(extract_openai_summary(&response).is_none());
    }

    #[test]
    fn blank_credentials_do_not_count_as_configured() {
        assert!(configured(&None).is_none());
        assert!(configured(&Some("   ".to_string())).is_none());
        assert_eq!(configured(&Some(" sk-key ".to_string())), Some("sk-key"));
    }
}
