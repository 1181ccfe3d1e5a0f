//! Photo byte storage.
//!
//! Implements the `PhotoStore` trait from `luma-core` on the local
//! filesystem. Metadata lives in SQLite; this module only moves bytes.

pub mod filesystem;
