//! Chat pipeline for Luma.
//!
//! Context assembly, prompt building, the streaming relay and the chat
//! service, plus the `ChatRepository` trait the infrastructure layer
//! implements for turn persistence.

pub mod context;
pub mod prompt;
pub mod relay;
pub mod repository;
pub mod service;
