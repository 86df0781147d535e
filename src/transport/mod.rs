//! Transport layer for parkd.
//!
//! Currently provides HTTP transport via axum. The transport parses wire
//! payloads, maps ledger error kinds to status codes, and serializes results;
//! it carries no allocation logic.

pub mod http;

pub use http::{ServerConfig, serve};
