//! Provider implementation for the City of Melbourne using its open-data
//! garbage collection zones.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use kerbside_core::{
    geofence::{GeofencedAdapter, WasteStream},
    http::fetch_text,
    model::{CouncilMeta, Councils, IconTable},
    plugin::CouncilPlugin,
    ports::{GeocodePort, PortError, ZonePort},
    zones::{ZoneRecord, parse_zones},
};
use kerbside_geocode::NominatimGeocoder;

/// `GeoJSON` export of the garbage-collection-zones dataset.
pub const ZONES_URL: &str = "https://data.melbourne.vic.gov.au/api/explore/v2.1/catalog/datasets/garbage-collection-zones/exports/geojson?lang=en&timezone=Australia%2FSydney";

const STREAMS: &[WasteStream] = &[
    WasteStream {
        key: "rec",
        label: "Recycling",
    },
    WasteStream {
        key: "rub",
        label: "General Waste",
    },
];

const ICON_MAP: IconTable = &[
    ("Recycling", "mdi:recycle"),
    ("General Waste", "mdi:trash-can"),
];

/// Loads Melbourne's collection zones over HTTP.
pub struct MelbourneZonePort {
    client: Client,
    url: String,
}

impl MelbourneZonePort {
    /// Create a zone port reading the public dataset.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_url(client, ZONES_URL)
    }

    /// Create a zone port reading a dataset mirror.
    #[must_use]
    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ZonePort for MelbourneZonePort {
    async fn load_zones(&self) -> Result<Vec<ZoneRecord>, PortError> {
        let body = fetch_text(self.client.get(&self.url)).await?;
        debug!(bytes = body.len(), "downloaded Melbourne zones");
        parse_zones(&body)
    }
}

/// Build the Melbourne adapter over arbitrary zone and geocoding backends.
#[must_use]
pub fn adapter_with(zones: Arc<dyn ZonePort>, geocoder: Arc<dyn GeocodePort>) -> GeofencedAdapter {
    GeofencedAdapter::new(council_meta(), zones, geocoder, STREAMS, ICON_MAP)
}

/// Build the plugin bundle for the Melbourne provider.
#[must_use]
pub fn plugin(client: Client) -> CouncilPlugin {
    let zones = Arc::new(MelbourneZonePort::new(client.clone()));
    let geocoder = Arc::new(NominatimGeocoder::new(client));

    CouncilPlugin::new(Arc::new(adapter_with(zones, geocoder)))
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: Councils::Melbourne.into(),
        name: String::from("City of Melbourne"),
    }
}
