//! Player identity resolution

use rand::Rng;
use tracing::info;

use super::{lookup_layered, persist, Source};
use crate::constants;
use crate::launch::LaunchParams;
use crate::storage::KeyValueStore;

/// Resolve the player id. Never fails.
///
/// Priority: `player_id` launch parameter (persisted) > stored id > a freshly
/// generated `cast-xxxxxxxx` id, which is persisted so later runs reuse it.
pub fn resolve_player_id(params: &dyn LaunchParams, store: &mut dyn KeyValueStore) -> String {
    if let Some((id, source)) = lookup_layered(
        params,
        store,
        constants::launch::PLAYER_ID,
        constants::storage::PLAYER_ID_KEY,
    ) {
        info!(player_id = %id, source = ?source, "Resolved player identity");
        return id;
    }

    let id = generate_player_id(&mut rand::thread_rng());
    persist(store, constants::storage::PLAYER_ID_KEY, &id);
    info!(player_id = %id, source = ?Source::Generated, "Resolved player identity");
    id
}

/// `cast-` followed by lowercase base36 characters
pub fn generate_player_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let alphabet = constants::identity::ALPHABET;
    let suffix: String = (0..constants::identity::SUFFIX_LEN)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect();
    format!("{}{}", constants::identity::PREFIX, suffix)
}
