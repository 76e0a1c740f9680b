//! Domain data structures for councils, coordinates, and collection events.

use std::fmt;

use chrono::NaiveDate;
use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// Built-in councils supported by the application.
pub enum Councils {
    /// City of Melbourne, Victoria.
    Melbourne,
    /// City of Monash, Victoria.
    Monash,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Stable identifier for a council known to kerbside.
pub struct CouncilId(pub String);

impl fmt::Display for Councils {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Councils::Melbourne => "melbourne",
            Councils::Monash => "monash",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Councils> for CouncilId {
    fn from(council: Councils) -> Self {
        CouncilId(council.to_string())
    }
}

impl fmt::Display for CouncilId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a council and its published title.
pub struct CouncilMeta {
    /// Unique identifier.
    pub id: CouncilId,
    /// Title the council publishes itself under, e.g. "City of Melbourne".
    pub name: String,
}

/// A position in decimal degrees: `x` is longitude, `y` is latitude.
pub type Coordinate = Coord<f64>;

/// Axis-aligned envelope; `min()` is the south-west corner, `max()` the
/// north-east one.
pub type BoundingBox = Rect<f64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Scheduled collection for a specific day.
pub struct CollectionEvent {
    /// Date of the collection.
    pub date: NaiveDate,
    /// Waste stream collected, as the council labels it.
    #[serde(rename = "type")]
    pub label: String,
    /// Display icon, e.g. `mdi:recycle`.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Resolved council plus its upcoming collections for one address.
pub struct CollectionReport {
    /// Council name as reported by the council lookup.
    pub council: String,
    /// Address as supplied by the caller.
    pub address: String,
    /// Upcoming collections, in adapter order.
    pub collections: Vec<CollectionEvent>,
}

/// Static waste-stream label to icon mapping.
pub type IconTable = &'static [(&'static str, &'static str)];

/// Look up the icon for a waste-stream label. Unknown labels have no icon.
#[must_use]
pub fn lookup_icon(table: IconTable, label: &str) -> Option<String> {
    table
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, icon)| (*icon).to_owned())
}
