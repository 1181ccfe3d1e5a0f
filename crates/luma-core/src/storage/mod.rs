//! Storage abstractions for Luma.
//!
//! Implementations live in luma-infra.

pub mod photo_store;
