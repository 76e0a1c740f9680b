//! Registry for all council plugins and their adapters.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{CouncilId, CouncilMeta};
use crate::ports::{PortError, SourceAdapter};

/// Adapter bundle for a single council.
pub struct CouncilPlugin {
    /// Static metadata describing the council.
    pub meta: CouncilMeta,
    /// Implementation for fetching collections.
    pub adapter: Arc<dyn SourceAdapter>,
}

impl CouncilPlugin {
    /// Bundle an adapter with the metadata it reports.
    #[must_use]
    pub fn new(adapter: Arc<dyn SourceAdapter>) -> Self {
        Self {
            meta: adapter.council().clone(),
            adapter,
        }
    }
}

/// Registry that resolves plugins by council identifier.
///
/// Iteration is ordered by identifier.
pub struct PluginRegistry {
    plugins: BTreeMap<CouncilId, CouncilPlugin>,
}

impl PluginRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<CouncilPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered councils.
    #[must_use]
    pub fn councils(&self) -> Vec<CouncilMeta> {
        self.councils_iter().cloned().collect()
    }

    /// Iterator over council metadata.
    pub fn councils_iter(&self) -> impl Iterator<Item = &CouncilMeta> {
        self.plugins.values().map(|plugin| &plugin.meta)
    }

    /// Look up a plugin for the given council.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedCouncil`] when no plugin is registered.
    pub fn plugin(&self, council: &CouncilId) -> Result<&CouncilPlugin, PortError> {
        self.plugins
            .get(council)
            .ok_or_else(|| PortError::UnsupportedCouncil(council.to_string()))
    }
}
