//! REST API handlers, one module per resource.

pub mod account;
pub mod auth;
pub mod chat;
pub mod health;
pub mod memories;
pub mod people;
pub mod photos;
