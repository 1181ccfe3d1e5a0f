//! Business logic and repository trait definitions for Luma.
//!
//! This crate defines the "ports" (repository, provider, storage and mail
//! traits) that the infrastructure layer implements, and the services that
//! orchestrate them. It depends only on `luma-types` -- never on
//! `luma-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
pub mod storage;

#[cfg(test)]
mod testing;
