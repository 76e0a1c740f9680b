//! Geocoding backends: council lookup via the Google Geocoding API and
//! coordinate lookup via Nominatim.

/// Council lookup backed by the Google Geocoding API.
pub mod google;
/// Address geocoding backed by `OpenStreetMap` Nominatim.
pub mod nominatim;

pub use google::GoogleCouncilLocator;
pub use nominatim::NominatimGeocoder;
