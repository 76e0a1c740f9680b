//! Traits describing provider capabilities and the shared error type.

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{BoundingBox, CollectionEvent, Coordinate, CouncilMeta};
use crate::zones::ZoneRecord;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while resolving an address to collections.
pub enum PortError {
    /// Network layer failed or the upstream answered with an error status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Upstream payload was not in the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Failed to parse a date from the provider response.
    #[error("Date parse error: {0}")]
    Date(#[from] ChronoParseError),
    /// The address could not be geocoded or found by the provider.
    #[error("Address not found")]
    AddressNotFound,
    /// The council for the address could not be determined.
    #[error("Council not found")]
    CouncilNotFound,
    /// No adapter is registered for the council.
    #[error("Unsupported council: {0}")]
    UnsupportedCouncil(String),
    /// A required configuration value is missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[async_trait]
/// A council's collection source. Every adapter, whatever its strategy,
/// answers with the collections for an address.
pub trait SourceAdapter: Send + Sync {
    /// Metadata describing the council handled by this adapter.
    fn council(&self) -> &CouncilMeta;

    /// Fetch upcoming collections for a street address.
    ///
    /// Returns an empty list when the council publishes no schedule for the
    /// address.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when an upstream request fails or the address
    /// cannot be resolved.
    async fn fetch(&self, address: &str) -> Result<Vec<CollectionEvent>, PortError>;
}

#[async_trait]
/// Source of geofenced collection zones.
pub trait ZonePort: Send + Sync {
    /// Load the full zone dataset.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Network`] when the dataset cannot be fetched and
    /// [`PortError::Parse`] when it is not valid `GeoJSON`.
    async fn load_zones(&self) -> Result<Vec<ZoneRecord>, PortError>;
}

#[async_trait]
/// Free-text address to coordinate resolution.
pub trait GeocodePort: Send + Sync {
    /// Resolve `address`, preferring matches inside `bounds` when given.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::AddressNotFound`] when there is no candidate.
    async fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> Result<Coordinate, PortError>;
}

#[async_trait]
/// Address to local-authority name resolution.
pub trait CouncilLocator: Send + Sync {
    /// Name of the council governing `address`, if it can be determined.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the lookup service fails.
    async fn locate(&self, address: &str) -> Result<Option<String>, PortError>;
}
