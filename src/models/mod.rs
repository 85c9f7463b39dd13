//! Data models representing database entities and API payloads.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response types exchanged with clients.

/// API key entity and key CRUD payloads
pub mod api_key;
/// Summarizer request/response payloads
pub mod summary;
/// User entity and auth payloads
pub mod user;
