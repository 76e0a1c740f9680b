//! High-level service facade combining the council lookup and all adapters.

use std::sync::Arc;

use tracing::info;

use crate::directory::resolve_council;
use crate::model::{CollectionReport, CouncilId};
use crate::plugin::PluginRegistry;
use crate::ports::{CouncilLocator, PortError};

/// Public entry point for resolving addresses to collections.
pub struct KerbsideService {
    registry: Arc<PluginRegistry>,
    locator: Arc<dyn CouncilLocator>,
}

impl KerbsideService {
    /// Create a new service bound to the provided registry and council lookup.
    #[must_use]
    pub fn new(registry: Arc<PluginRegistry>, locator: Arc<dyn CouncilLocator>) -> Self {
        Self { registry, locator }
    }

    /// List all supported councils and their titles.
    #[must_use]
    pub fn councils(&self) -> Vec<(CouncilId, String)> {
        self.registry
            .councils()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Determine the council governing an address.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::CouncilNotFound`] when the lookup has no answer, or
    /// the lookup's own error.
    pub async fn council_for(&self, address: &str) -> Result<String, PortError> {
        self.locator
            .locate(address)
            .await?
            .ok_or(PortError::CouncilNotFound)
    }

    /// Resolve an address to its council and upcoming collections.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::CouncilNotFound`] or [`PortError::UnsupportedCouncil`]
    /// when no adapter applies, otherwise whatever the adapter reports.
    pub async fn collections_for(&self, address: &str) -> Result<CollectionReport, PortError> {
        let council = self.council_for(address).await?;
        info!(%council, "resolved council");

        let id = resolve_council(&council, &self.registry)
            .ok_or_else(|| PortError::UnsupportedCouncil(council.clone()))?;
        let plugin = self.registry.plugin(&id)?;

        let collections = plugin.adapter.fetch(address).await?;
        info!(council = %id, count = collections.len(), "fetched collections");

        Ok(CollectionReport {
            council,
            address: address.to_owned(),
            collections,
        })
    }
}
