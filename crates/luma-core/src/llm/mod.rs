//! Completion provider abstractions for Luma.

pub mod provider;
