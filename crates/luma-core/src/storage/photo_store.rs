//! PhotoStore trait.
//!
//! Defines where photo bytes live. Metadata is tracked separately by
//! `PhotoRepository`. Implementations live in luma-infra.

/// Trait for photo byte storage, addressed by opaque keys such as
/// `photos/<uuid>.jpg`.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait PhotoStore: Send + Sync {
    /// Write `data` under `key`, replacing anything already there.
    fn put(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Read the bytes stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, std::io::Error>> + Send;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;
}
