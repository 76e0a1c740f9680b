//! Looks up the local government area of an address with the Google Geocoding API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use kerbside_core::{
    http::{decode_json, fetch_text},
    ports::{CouncilLocator, PortError},
};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

// Victorian councils are reported at this level.
const COUNCIL_COMPONENT: &str = "administrative_area_level_2";

/// Response from /geocode/json
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Council lookup backed by the Google Geocoding API.
pub struct GoogleCouncilLocator {
    client: Client,
    api_key: String,
}

impl GoogleCouncilLocator {
    /// Create a locator using the given HTTP client and API key.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Config`] when the key is blank.
    pub fn new(client: Client, api_key: impl Into<String>) -> Result<Self, PortError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PortError::Config("Google API key is empty".to_owned()));
        }
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl CouncilLocator for GoogleCouncilLocator {
    async fn locate(&self, address: &str) -> Result<Option<String>, PortError> {
        let req = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", self.api_key.as_str())]);

        let body = fetch_text(req).await?;
        council_from_body(&body)
    }
}

fn council_from_body(body: &str) -> Result<Option<String>, PortError> {
    let response = decode_json::<GeocodeResponse>(body)?;

    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        status => {
            let detail = response.error_message.unwrap_or_default();
            return Err(PortError::Parse(format!(
                "Geocoding API returned {status}: {detail}"
            )));
        }
    }

    let council = response
        .results
        .into_iter()
        .next()
        .and_then(|top| {
            top.address_components
                .into_iter()
                .find(|component| component.types.iter().any(|kind| kind == COUNCIL_COMPONENT))
        })
        .map(|component| component.long_name);

    debug!(?council, "council lookup");
    Ok(council)
}
