//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `JWT_SECRET` (optional): HMAC secret for session tokens; defaults to a
///   development value that must be overridden in production
/// - `ANTHROPIC_API_KEY` (optional): enables the Anthropic summarizer provider
/// - `OPENAI_API_KEY` (optional): fallback summarizer provider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Ceiling on pooled database connections.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Signing secret for session tokens.
    ///
    /// Rotating this value invalidates every outstanding token; there is no
    /// revocation list.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Anthropic credential. Preferred provider when set and non-blank.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,

    /// OpenAI credential. Used when no Anthropic credential is configured.
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

/// Default pool size if DATABASE_MAX_CONNECTIONS is not set.
fn default_max_connections() -> u32 {
    5
}

/// Development-only fallback secret.
fn default_jwt_secret() -> String {
    "your-secret-key-change-in-production".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn minimal_environment_gets_defaults() {
        let config: Config =
            envy::from_iter(vars(&[("DATABASE_URL", "postgres://localhost/app")])).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/app");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_secret, "your-secret-key-change-in-production");
        assert!(config.anthropic_api_key.is_none());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = envy::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("SERVER_PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_max_connections, 20);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(envy::from_iter::<_, Config>(vars(&[("SERVER_PORT", "8080")])).is_err());
    }
}
