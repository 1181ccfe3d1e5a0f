//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, photo storage, mail and business
//! rules. They depend on traits (ports) -- never on concrete
//! infrastructure implementations.

pub mod auth;
pub mod hash;
pub mod mail;
pub mod memory;
pub mod password;
pub mod person;
pub mod photo;
pub mod session;
pub mod validate;
