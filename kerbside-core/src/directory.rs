//! Maps the council name reported by the council lookup to a registered adapter.

use crate::model::{CouncilId, Councils};
use crate::plugin::PluginRegistry;

/// Resolve a free-text council name to a council identifier.
///
/// Well-known councils are matched by keyword first; anything else is matched
/// loosely against the titles of registered councils.
#[must_use]
pub fn resolve_council(name: &str, registry: &PluginRegistry) -> Option<CouncilId> {
    let lower = name.to_lowercase();
    if lower.contains("monash") {
        return Some(Councils::Monash.into());
    }
    if lower.contains("melbourne") {
        return Some(Councils::Melbourne.into());
    }

    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }

    registry
        .councils_iter()
        .find(|meta| normalize(&meta.name).contains(&wanted))
        .map(|meta| meta.id.clone())
}

/// Lowercase and drop everything that is not alphanumeric.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
