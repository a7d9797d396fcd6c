//! Startup configuration for the cast receiver
//!
//! Two values are resolved once per process start from layered sources:
//! - **endpoint**: the playback server base URL (fails when nothing is configured)
//! - **identity**: the player id (generated and persisted when nothing is configured)
//!
//! Both follow the same chain: launch override (persisted before use) >
//! persisted value > fallback.

pub mod endpoint;
pub mod identity;

pub use endpoint::resolve_base_url;
pub use identity::resolve_player_id;

use tracing::{info, warn};

use crate::launch::LaunchParams;
use crate::storage::KeyValueStore;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// One-shot launch parameter
    Override,
    /// Value persisted by a previous run
    Persisted,
    /// Synthesized because no other source had a value
    Generated,
}

/// Walk the override and persisted layers in order, short-circuiting on the
/// first hit. An override is written to the store before it is returned so
/// the next resolution without parameters reproduces it.
pub(crate) fn lookup_layered(
    params: &dyn LaunchParams,
    store: &mut dyn KeyValueStore,
    param_key: &str,
    storage_key: &str,
) -> Option<(String, Source)> {
    if let Some(value) = params.get(param_key) {
        persist(store, storage_key, &value);
        info!(key = param_key, value = %value, "Using launch parameter override");
        return Some((value, Source::Override));
    }

    store
        .get(storage_key)
        .map(|value| (value, Source::Persisted))
}

/// Write through to the store. Failure is logged, never propagated: the
/// resolved value is still usable for this run.
pub(crate) fn persist(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!(key = key, error = ?e, "Failed to persist resolved value, continuing without it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::QueryParams;
    use crate::storage::MemoryStore;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("store is read-only")
        }
    }

    #[test]
    fn test_override_beats_persisted() {
        let mut store = MemoryStore::new();
        store.set("k", "stored").unwrap();
        let params = QueryParams::new().with("p", "launch");

        let resolved = lookup_layered(&params, &mut store, "p", "k");
        assert_eq!(resolved, Some(("launch".to_string(), Source::Override)));
        assert_eq!(store.get("k"), Some("launch".to_string()));
    }

    #[test]
    fn test_persisted_when_no_override() {
        let mut store = MemoryStore::new();
        store.set("k", "stored").unwrap();

        let resolved = lookup_layered(&QueryParams::new(), &mut store, "p", "k");
        assert_eq!(resolved, Some(("stored".to_string(), Source::Persisted)));
    }

    #[test]
    fn test_nothing_configured() {
        let mut store = MemoryStore::new();
        assert_eq!(lookup_layered(&QueryParams::new(), &mut store, "p", "k"), None);
    }

    #[test]
    fn test_override_survives_store_write_failure() {
        let params = QueryParams::new().with("p", "launch");
        let resolved = lookup_layered(&params, &mut ReadOnlyStore, "p", "k");
        assert_eq!(resolved, Some(("launch".to_string(), Source::Override)));
    }
}
