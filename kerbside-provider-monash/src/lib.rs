//! Provider implementation for Monash City Council using its "my area" web API.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use kerbside_core::{
    http::{HttpSettings, fetch_json, fetch_text},
    model::{CollectionEvent, CouncilMeta, Councils, IconTable, lookup_icon},
    plugin::CouncilPlugin,
    ports::{PortError, SourceAdapter},
};

const BASE_URL: &str = "https://www.monash.vic.gov.au";

// Loading this page issues the session cookies the API calls rely on.
const SESSION_PATH: &str = "/Waste-Sustainability/Bin-Collection/When-we-collect-your-bins";
const SEARCH_PATH: &str = "/api/v1/myarea/search";
const SERVICES_PATH: &str = "/ocapi/Public/myarea/wasteservices?ocsvclang=en-AU";

const DATE_FORMAT: &str = "%d/%m/%Y";

const ICON_MAP: IconTable = &[
    ("Food and Garden Waste", "mdi:leaf"),
    ("Hard Waste", "mdi:sofa"),
    ("Recycling", "mdi:recycle"),
    ("Landfill Waste", "mdi:delete"),
];

static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("static selector"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("static selector"));
static NEXT_SERVICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".next-service").expect("static selector"));

// "Tue 12/3/2024": a weekday token, then the date.
static NEXT_SERVICE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S* \d{1,2}/\d{1,2}/\d{4}").expect("static regex"));

/// Response from /api/v1/myarea/search
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Items", default)]
    items: Vec<SearchItem>,
}

/// Single address hit; the id is a GUID string in practice.
#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Id")]
    id: JsonValue,
    #[serde(rename = "AddressSingleLine", default)]
    address: Option<String>,
}

/// Response from /ocapi/Public/myarea/wasteservices
#[derive(Debug, Deserialize)]
struct WasteServicesResponse {
    #[serde(rename = "responseContent", default)]
    response_content: String,
}

/// Collection lookup for Monash.
pub struct MonashAdapter {
    settings: HttpSettings,
    base_url: String,
    meta: CouncilMeta,
}

impl MonashAdapter {
    /// Create an adapter that opens a fresh session per lookup.
    #[must_use]
    pub fn new(settings: HttpSettings) -> Self {
        Self::with_base_url(settings, BASE_URL)
    }

    /// Create an adapter against another host serving the same site layout.
    #[must_use]
    pub fn with_base_url(settings: HttpSettings, base_url: impl Into<String>) -> Self {
        Self {
            settings,
            base_url: base_url.into(),
            meta: council_meta(),
        }
    }
}

#[async_trait]
impl SourceAdapter for MonashAdapter {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn fetch(&self, address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        let session = self.settings.session()?;
        let base = self.base_url.trim_end_matches('/');

        fetch_text(session.get(format!("{base}{SESSION_PATH}"))).await?;

        let search = fetch_json::<SearchResponse>(
            session
                .get(format!("{base}{SEARCH_PATH}"))
                .query(&[("keywords", address)]),
        )
        .await?;

        let Some(top_hit) = search.items.into_iter().next() else {
            debug!(address, "Monash address search returned no results");
            return Err(PortError::AddressNotFound);
        };
        debug!(address = ?top_hit.address, "Monash address search top hit");

        let geolocation_id = match top_hit.id {
            JsonValue::String(id) => id,
            other => other.to_string(),
        };

        let services = fetch_json::<WasteServicesResponse>(
            session
                .get(format!("{base}{SERVICES_PATH}"))
                .query(&[("geolocationid", geolocation_id.as_str())]),
        )
        .await?;

        parse_waste_services(&services.response_content)
    }
}

/// Build the plugin bundle for the Monash provider.
#[must_use]
pub fn plugin(settings: HttpSettings) -> CouncilPlugin {
    CouncilPlugin::new(Arc::new(MonashAdapter::new(settings)))
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: Councils::Monash.into(),
        name: String::from("Monash City Council"),
    }
}

/// Extract one collection per service article of the waste-services fragment.
fn parse_waste_services(fragment: &str) -> Result<Vec<CollectionEvent>, PortError> {
    let document = Html::parse_fragment(fragment);
    let mut events = Vec::new();

    for article in document.select(&ARTICLE) {
        let Some(label) = first_text(article, &HEADING) else {
            warn!("waste service without a heading");
            continue;
        };
        let Some(next_service) = first_text(article, &NEXT_SERVICE) else {
            debug!(%label, "waste service without a next service date");
            continue;
        };
        if !NEXT_SERVICE_DATE.is_match(&next_service) {
            debug!(%label, %next_service, "next service is not a date");
            continue;
        }

        let Some(date_text) = next_service.split(' ').nth(1) else {
            continue;
        };
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)?;

        events.push(CollectionEvent {
            date,
            icon: lookup_icon(ICON_MAP, &label),
            label,
        });
    }

    Ok(events)
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
}
