//! Adapter for councils that publish collection zones as a geofenced dataset.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::model::{CollectionEvent, CouncilMeta, IconTable, lookup_icon};
use crate::ports::{GeocodePort, PortError, SourceAdapter, ZonePort};
use crate::schedule::DEFAULT_OCCURRENCES;
use crate::zones::{compute_bounding_box, find_zone};

/// A waste stream published in the zone dataset.
#[derive(Debug, Clone, Copy)]
pub struct WasteStream {
    /// Property prefix, e.g. `rec` for `rec_day` / `rec_weeks` / `rec_start`.
    pub key: &'static str,
    /// Label reported on each collection.
    pub label: &'static str,
}

/// Resolves an address to a zone and projects each stream's recurrence.
pub struct GeofencedAdapter {
    meta: CouncilMeta,
    zones: Arc<dyn ZonePort>,
    geocoder: Arc<dyn GeocodePort>,
    streams: &'static [WasteStream],
    icons: IconTable,
}

impl GeofencedAdapter {
    /// Create an adapter over a zone source and a geocoder.
    #[must_use]
    pub fn new(
        meta: CouncilMeta,
        zones: Arc<dyn ZonePort>,
        geocoder: Arc<dyn GeocodePort>,
        streams: &'static [WasteStream],
        icons: IconTable,
    ) -> Self {
        Self {
            meta,
            zones,
            geocoder,
            streams,
            icons,
        }
    }

    /// Fetch collections as seen from `today`.
    ///
    /// # Errors
    ///
    /// Propagates zone-loading and geocoding failures. Malformed stream
    /// schedules are skipped rather than reported.
    pub async fn fetch_on(
        &self,
        address: &str,
        today: NaiveDate,
    ) -> Result<Vec<CollectionEvent>, PortError> {
        let zones = self.zones.load_zones().await?;
        let bounds = compute_bounding_box(&zones);
        if bounds.is_none() {
            debug!(council = %self.meta.id, "zone dataset is empty, geocoding unbounded");
        }

        let point = self.geocoder.geocode(address, bounds).await?;
        debug!(lon = point.x, lat = point.y, "geocoded address");

        let Some(zone) = find_zone(&zones, point) else {
            info!(council = %self.meta.id, address, "address lies outside every collection zone");
            return Ok(Vec::new());
        };

        let mut events = Vec::new();
        for stream in self.streams {
            let Some(entry) = zone.schedule(stream.key) else {
                continue;
            };

            let dates = match entry {
                Ok(schedule) => schedule.project(DEFAULT_OCCURRENCES, today),
                Err(err) => Err(err.clone()),
            };

            match dates {
                Ok(dates) => {
                    let icon = lookup_icon(self.icons, stream.label);
                    events.extend(dates.into_iter().map(|date| CollectionEvent {
                        date,
                        label: stream.label.to_owned(),
                        icon: icon.clone(),
                    }));
                }
                Err(err) => {
                    warn!(council = %self.meta.id, stream = stream.key, %err, "skipping stream");
                }
            }
        }

        Ok(events)
    }
}

#[async_trait]
impl SourceAdapter for GeofencedAdapter {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn fetch(&self, address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        self.fetch_on(address, Local::now().date_naive()).await
    }
}
