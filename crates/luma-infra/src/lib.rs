//! Infrastructure layer for Luma.
//!
//! Contains implementations of the ports defined in `luma-core`: SQLite
//! repositories, the Anthropic completion client, credential and token
//! cryptography, local photo storage, outbound mail, and the config loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod mail;
pub mod sqlite;
pub mod storage;
