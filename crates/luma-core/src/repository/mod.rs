//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (luma-infra) implements. The core crate never depends on any specific
//! storage technology. Chat turns have their own repository under
//! [`crate::chat::repository`].

pub mod memory;
pub mod person;
pub mod photo;
pub mod user;
