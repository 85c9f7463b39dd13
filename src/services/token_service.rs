//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs binding a user's email to a 7-day validity window.
//! They authenticate dashboard (key CRUD) requests only; the summarizer
//! endpoint uses API keys instead.
//!
//! The signing secret is passed in from configuration rather than read from
//! the environment here, so tests and callers control it explicitly.
//! Rotating the secret invalidates all outstanding tokens; there is no
//! revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token validity window.
const TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the user this token asserts identity for
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issue a signed session token for `email`, expiring in 7 days.
///
/// Pure function of the secret and the current time; no side effects.
pub fn issue(secret: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        email: email.to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token and return its claims.
///
/// Returns `None` if the signature is invalid, the token has expired, or
/// the payload is malformed. This is a query, not an assertion: malformed
/// input never panics or errors, it is simply not a valid token.
pub fn verify(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_preserves_email() {
        let token = issue(SECRET, "ada@example.com").unwrap();
        let claims = verify(SECRET, &token).expect("fresh token should verify");
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn expiry_is_seven_days_out() {
        let token = issue(SECRET, "ada@example.com").unwrap();
        let claims = verify(SECRET, &token).unwrap();
        let window = claims.exp - claims.iat;
        assert_eq!(window, 7 * 24 * 60 * 60);
    }

    #[test]
    fn expired_token_is_invalid() {
        // Encode claims whose expiry is well past the default 60s leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: "ada@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_none());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = issue(SECRET, "ada@example.com").unwrap();
        assert!(verify("other-secret", &token).is_none());
    }

    #[test]
    fn garbage_input_is_invalid_not_a_panic() {
        assert!(verify(SECRET, "").is_none());
        assert!(verify(SECRET, "not.a.jwt").is_none());
        assert!(verify(SECRET, "££ invalid utf nonsense ££").is_none());
    }
}
