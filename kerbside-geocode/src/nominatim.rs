//! Resolves addresses to coordinates with the `OpenStreetMap` Nominatim search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use kerbside_core::{
    http::fetch_json,
    model::{BoundingBox, Coordinate},
    ports::{GeocodePort, PortError},
};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Single hit from /search?format=json
#[derive(Debug, Deserialize)]
struct SearchHit {
    // Nominatim sends coordinates as strings.
    lat: String,
    lon: String,
}

/// Geocoder backed by Nominatim.
///
/// Nominatim rejects requests without a descriptive User-Agent; configure one
/// on the client.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder against the public Nominatim instance.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, SEARCH_URL)
    }

    /// Create a geocoder against a specific search endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GeocodePort for NominatimGeocoder {
    async fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> Result<Coordinate, PortError> {
        let req = self
            .client
            .get(&self.base_url)
            .query(&search_params(address, bounds));

        let hits = fetch_json::<Vec<SearchHit>>(req).await?;
        let point = first_coordinate(hits)?;
        debug!(address, lon = point.x, lat = point.y, "nominatim hit");
        Ok(point)
    }
}

fn search_params(address: &str, bounds: Option<BoundingBox>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", address.to_owned()),
        ("format", "json".to_owned()),
        ("limit", "1".to_owned()),
    ];

    // viewbox is left,top,right,bottom
    if let Some(bounds) = bounds {
        let (south_west, north_east) = (bounds.min(), bounds.max());
        params.push((
            "viewbox",
            format!(
                "{},{},{},{}",
                south_west.x, north_east.y, north_east.x, south_west.y
            ),
        ));
        params.push(("bounded", "1".to_owned()));
    }

    params
}

fn first_coordinate(hits: Vec<SearchHit>) -> Result<Coordinate, PortError> {
    let hit = hits.into_iter().next().ok_or(PortError::AddressNotFound)?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|err| PortError::Parse(format!("Nominatim coordinate {value:?}: {err}")))
    };

    Ok(Coordinate {
        x: parse(&hit.lon)?,
        y: parse(&hit.lat)?,
    })
}

#[cfg(test)]
mod tests {
    use kerbside_core::http::decode_json;

    use super::*;

    #[test]
    fn bounded_search_sends_viewbox() {
        let bounds = BoundingBox::new(
            Coordinate { x: 144.89, y: -37.85 },
            Coordinate { x: 145.0, y: -37.77 },
        );
        let params = search_params("Queen Victoria Market", Some(bounds));
        assert!(params.contains(&("viewbox", "144.89,-37.77,145,-37.85".to_owned())));
        assert!(params.contains(&("bounded", "1".to_owned())));
        assert!(params.contains(&("q", "Queen Victoria Market".to_owned())));
    }

    #[test]
    fn unbounded_search_omits_viewbox() {
        let params = search_params("Somewhere", None);
        assert!(params.iter().all(|(key, _)| *key != "viewbox" && *key != "bounded"));
        assert!(params.contains(&("limit", "1".to_owned())));
    }

    #[test]
    fn first_hit_becomes_coordinate() {
        let hits: Vec<SearchHit> = decode_json(
            r#"[{"place_id": 1, "lat": "-37.8076", "lon": "144.9568", "display_name": "Queen Victoria Market"}]"#,
        )
        .expect("valid body");
        assert_eq!(
            first_coordinate(hits).expect("one hit"),
            Coordinate {
                x: 144.9568,
                y: -37.8076,
            }
        );
    }

    #[test]
    fn no_hits_is_address_not_found() {
        assert!(matches!(
            first_coordinate(Vec::new()),
            Err(PortError::AddressNotFound)
        ));
    }

    #[test]
    fn garbage_coordinates_are_parse_errors() {
        let hits = vec![SearchHit {
            lat: "north".to_owned(),
            lon: "144.9".to_owned(),
        }];
        assert!(matches!(first_coordinate(hits), Err(PortError::Parse(_))));
    }
}
