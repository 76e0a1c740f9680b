//! Core types and service wiring for the kerbside bin-collection resolver.

/// Authority-name to adapter resolution.
pub mod directory;
/// Adapter that resolves schedules from a geofenced zone dataset.
pub mod geofence;
/// Point-in-polygon containment over zone geometries.
pub mod geometry;
/// Shared HTTP helpers for provider backends.
pub mod http;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Registry and helpers for plugging council-specific adapters into the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Recurring collection-date projection.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;
/// Zone dataset parsing, bounding envelopes, and zone matching.
pub mod zones;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
