//! Shared domain types for Luma.
//!
//! This crate contains the domain types used across the backend: users,
//! people, memories, photos, chat turns, completion types, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod person;
pub mod photo;
pub mod user;
