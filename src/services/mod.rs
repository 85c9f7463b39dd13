//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle key validation, token issuance, password hashing, and the
//! summarization pipeline.

/// API key validation, rate limiting and key generation
pub mod api_key_service;
/// GitHub URL parsing and README retrieval
pub mod github_service;
/// Password hashing and verification
pub mod password;
/// LLM-backed README summarization
pub mod summarizer_service;
/// Session token issuance and verification
pub mod token_service;
