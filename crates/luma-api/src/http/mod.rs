//! HTTP/REST API layer for Luma.
//!
//! Axum-based REST API at `/api/v1/` with bearer session authentication,
//! `{error, code}` error bodies and CORS for the web frontend.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
