//! Location providers for click enrichment.

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::domain::repositories::LocationLookup;

pub const SAMPLE_LOCATIONS: &[&str] = &[
    "New York, US",
    "London, UK",
    "Mumbai, IN",
    "Tokyo, JP",
    "Sydney, AU",
];

/// Picks a location uniformly from [`SAMPLE_LOCATIONS`], ignoring the IP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticLocations;

#[async_trait]
impl LocationLookup for SyntheticLocations {
    async fn locate(&self, _ip: Option<&str>) -> String {
        SAMPLE_LOCATIONS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("Unknown")
            .to_string()
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Always returns the same location.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub String);

impl FixedLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

#[async_trait]
impl LocationLookup for FixedLocation {
    async fn locate(&self, _ip: Option<&str>) -> String {
        self.0.clone()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
