//! Resolve free-text addresses and postal codes into coordinates.

use async_trait::async_trait;

use crate::Coordinates;

/// Turn an address or postal code into coordinates.
///
/// Resolution never fails loudly: an unknown address, a provider outage or a
/// malformed answer all come back as `None` so callers can fall back.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query` to coordinates, or `None` when it cannot be resolved.
    async fn resolve(&self, query: &str) -> Option<Coordinates>;
}
