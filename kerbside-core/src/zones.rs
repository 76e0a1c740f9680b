//! Geofenced zone records: parsing from `GeoJSON`, envelopes, and lookup.

use std::collections::BTreeMap;
use std::str::FromStr;

use geo::{BoundingRect, Geometry, MultiPolygon};
use geojson::{Feature, GeoJson, JsonObject, JsonValue};
use tracing::debug;

use crate::geometry::{contains, contains_exterior};
use crate::model::{BoundingBox, Coordinate};
use crate::ports::PortError;
use crate::schedule::{ScheduleError, StreamSchedule, parse_anchor, parse_weekday};

const DAY_SUFFIX: &str = "_day";
const WEEKS_SUFFIX: &str = "_weeks";
const START_SUFFIX: &str = "_start";

/// One geofenced collection zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    /// Constituent polygons; a plain polygon zone has exactly one.
    pub polygons: MultiPolygon<f64>,
    /// Per-stream schedules keyed by stream prefix (`rec`, `rub`, ...).
    ///
    /// Only streams with a non-empty `<stream>_day` appear. Streams whose
    /// remaining attributes are malformed keep the reason instead.
    pub schedules: BTreeMap<String, Result<StreamSchedule, ScheduleError>>,
}

impl ZoneRecord {
    /// Build a zone from geometry and a raw `GeoJSON` property object.
    #[must_use]
    pub fn new(polygons: MultiPolygon<f64>, properties: &JsonObject) -> Self {
        Self {
            polygons,
            schedules: parse_schedules(properties),
        }
    }

    /// Schedule entry for a stream, if the zone publishes one.
    #[must_use]
    pub fn schedule(&self, stream: &str) -> Option<&Result<StreamSchedule, ScheduleError>> {
        self.schedules.get(stream)
    }
}

/// Parse a `GeoJSON` feature collection into zone records.
///
/// Features without polygonal geometry are skipped.
///
/// # Errors
///
/// Returns [`PortError::Parse`] if `body` is not a `GeoJSON` feature collection.
pub fn parse_zones(body: &str) -> Result<Vec<ZoneRecord>, PortError> {
    let document =
        GeoJson::from_str(body).map_err(|err| PortError::Parse(format!("GeoJSON: {err}")))?;

    let GeoJson::FeatureCollection(collection) = document else {
        return Err(PortError::Parse(
            "expected a GeoJSON FeatureCollection".to_owned(),
        ));
    };

    let total = collection.features.len();
    let zones: Vec<ZoneRecord> = collection
        .features
        .iter()
        .filter_map(zone_from_feature)
        .collect();

    debug!(total, parsed = zones.len(), "parsed zone dataset");
    Ok(zones)
}

fn zone_from_feature(feature: &Feature) -> Option<ZoneRecord> {
    let Some(geometry) = feature.geometry.as_ref() else {
        debug!("skipping feature without geometry");
        return None;
    };

    let polygons = match Geometry::<f64>::try_from(&geometry.value) {
        Ok(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
        Ok(Geometry::MultiPolygon(parts)) => parts,
        Ok(_) => {
            debug!("skipping non-polygonal feature");
            return None;
        }
        Err(err) => {
            debug!(%err, "skipping feature with unreadable geometry");
            return None;
        }
    };

    let empty = JsonObject::new();
    let properties = feature.properties.as_ref().unwrap_or(&empty);
    Some(ZoneRecord::new(polygons, properties))
}

fn parse_schedules(properties: &JsonObject) -> BTreeMap<String, Result<StreamSchedule, ScheduleError>> {
    properties
        .iter()
        .filter_map(|(key, value)| {
            let stream = key.strip_suffix(DAY_SUFFIX)?;
            let day = value.as_str().map(str::trim).filter(|day| !day.is_empty())?;
            Some((stream.to_owned(), parse_stream(stream, day, properties)))
        })
        .collect()
}

fn parse_stream(
    stream: &str,
    day: &str,
    properties: &JsonObject,
) -> Result<StreamSchedule, ScheduleError> {
    let weekday = parse_weekday(day)?;
    let interval_weeks = parse_interval(properties.get(&format!("{stream}{WEEKS_SUFFIX}")))?;

    let anchor = match properties.get(&format!("{stream}{START_SUFFIX}")) {
        Some(JsonValue::String(text)) if !text.trim().is_empty() => parse_anchor(text)?,
        Some(JsonValue::String(_) | JsonValue::Null) | None => {
            return Err(ScheduleError::MissingAnchor);
        }
        Some(other) => return Err(ScheduleError::InvalidAnchor(other.to_string())),
    };

    Ok(StreamSchedule {
        weekday,
        interval_weeks,
        anchor,
    })
}

/// Interval in weeks; absent means weekly. Accepts integral numbers and
/// numeric strings.
fn parse_interval(value: Option<&JsonValue>) -> Result<i64, ScheduleError> {
    let weeks = match value {
        None | Some(JsonValue::Null) => return Ok(1),
        Some(JsonValue::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral))
            .ok_or_else(|| ScheduleError::InvalidInterval(number.to_string()))?,
        Some(JsonValue::String(text)) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| ScheduleError::InvalidInterval(text.clone()))?
        }
        Some(other) => return Err(ScheduleError::InvalidInterval(other.to_string())),
    };

    if weeks < 1 {
        return Err(ScheduleError::NonPositiveInterval(weeks));
    }
    Ok(weeks)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is checked to be a small whole number first"
)]
fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < 1e12).then_some(value as i64)
}

/// Envelope around every zone, or `None` for an empty dataset.
#[must_use]
pub fn compute_bounding_box(zones: &[ZoneRecord]) -> Option<BoundingBox> {
    zones
        .iter()
        .filter_map(|zone| zone.polygons.bounding_rect())
        .reduce(|current, rect| {
            BoundingBox::new(
                Coordinate {
                    x: current.min().x.min(rect.min().x),
                    y: current.min().y.min(rect.min().y),
                },
                Coordinate {
                    x: current.max().x.max(rect.max().x),
                    y: current.max().y.max(rect.max().y),
                },
            )
        })
}

/// First zone, in dataset order, whose polygon exteriors contain `point`.
///
/// Holes are not subtracted; see [`find_zone_exact`] for that.
#[must_use]
pub fn find_zone(zones: &[ZoneRecord], point: Coordinate) -> Option<&ZoneRecord> {
    zones.iter().find(|zone| {
        zone.polygons
            .iter()
            .any(|polygon| contains_exterior(polygon, point))
    })
}

/// First zone, in dataset order, that contains `point` once holes are
/// subtracted.
#[must_use]
pub fn find_zone_exact(zones: &[ZoneRecord], point: Coordinate) -> Option<&ZoneRecord> {
    zones
        .iter()
        .find(|zone| zone.polygons.iter().any(|polygon| contains(polygon, point)))
}
