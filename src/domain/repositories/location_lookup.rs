//! Location enrichment for recorded clicks.

use async_trait::async_trait;

/// Resolves a coarse, human-readable location for a click.
///
/// Real geolocation is not part of the registry; implementations may return
/// synthetic values. The trait is the attachment point for a real provider.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Returns a location label such as `"London, UK"`.
    async fn locate(&self, ip: Option<&str>) -> String;

    /// Provider name, used in logs.
    fn name(&self) -> &'static str;
}
