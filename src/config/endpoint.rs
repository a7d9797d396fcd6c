//! Server endpoint resolution

use tracing::{error, info};

use super::lookup_layered;
use crate::constants;
use crate::error::BootstrapError;
use crate::launch::LaunchParams;
use crate::storage::KeyValueStore;

/// Resolve the playback server base URL.
///
/// The `server` launch parameter wins and is persisted; otherwise the stored
/// value from a previous run is used. The URL is not validated here, a bad
/// one surfaces later as a connection failure.
pub fn resolve_base_url(
    params: &dyn LaunchParams,
    store: &mut dyn KeyValueStore,
) -> Result<String, BootstrapError> {
    match lookup_layered(
        params,
        store,
        constants::launch::SERVER,
        constants::storage::SERVER_URL_KEY,
    ) {
        Some((url, source)) => {
            info!(base_url = %url, source = ?source, "Resolved server endpoint");
            Ok(url)
        }
        None => {
            error!(
                param = constants::launch::SERVER,
                key = constants::storage::SERVER_URL_KEY,
                "No server URL in launch parameters or local store"
            );
            Err(BootstrapError::ConfigurationMissing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::QueryParams;
    use crate::storage::MemoryStore;

    #[test]
    fn test_override_with_empty_store_is_persisted() {
        let mut store = MemoryStore::new();
        let params = QueryParams::parse("?server=http://h:8095");

        let url = resolve_base_url(&params, &mut store).unwrap();
        assert_eq!(url, "http://h:8095");
        assert_eq!(store.get("resonate_server_url"), Some("http://h:8095".to_string()));
    }

    #[test]
    fn test_second_resolution_without_params_is_idempotent() {
        let mut store = MemoryStore::new();
        let params = QueryParams::parse("?server=http://h:8095");
        let first = resolve_base_url(&params, &mut store).unwrap();
        let second = resolve_base_url(&QueryParams::new(), &mut store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_replaces_stored_value() {
        let mut store = MemoryStore::new();
        store.set("resonate_server_url", "http://old:8095").unwrap();

        let params = QueryParams::parse("?server=http://new:8095");
        let url = resolve_base_url(&params, &mut store).unwrap();
        assert_eq!(url, "http://new:8095");
        assert_eq!(store.get("resonate_server_url"), Some("http://new:8095".to_string()));
    }

    #[test]
    fn test_stored_value_returned_unchanged() {
        let mut store = MemoryStore::new();
        store.set("resonate_server_url", "not even a url").unwrap();

        let url = resolve_base_url(&QueryParams::new(), &mut store).unwrap();
        assert_eq!(url, "not even a url");
    }

    #[test]
    fn test_missing_everywhere_fails() {
        let mut store = MemoryStore::new();
        let err = resolve_base_url(&QueryParams::new(), &mut store).unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigurationMissing));
    }

    #[test]
    fn test_player_id_param_does_not_configure_server() {
        let mut store = MemoryStore::new();
        let params = QueryParams::parse("?player_id=kitchen");
        assert!(resolve_base_url(&params, &mut store).is_err());
    }
}
