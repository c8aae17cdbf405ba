//! Purpose: Enrichment pipeline turning the skeletal list into the detailed collection.
//! Exports: `COMPLETE_LIST_KEY`, `load_collection`.
//! Role: Single place deciding cache adoption vs remote fetch + merge.
//! Invariants: Base-list failure aborts the load; per-identifier failures leave entries skeletal.
//! Invariants: The cache only ever holds the fully merged collection.

use std::collections::HashMap;

use crate::api::remote::RemoteClient;
use crate::core::cache::TtlCache;
use crate::core::catalog::{Pokemon, PokemonDetail};
use crate::core::error::Error;

pub const COMPLETE_LIST_KEY: &str = "pokemon-list-complete";

/// Eager load: adopt the cached collection when it is still live, otherwise
/// fetch the base list, enrich every entry through the batch detail fetch,
/// and cache the merged result under the fixed key.
pub fn load_collection(
    client: &RemoteClient,
    cache: &mut TtlCache<Vec<Pokemon>>,
) -> Result<Vec<Pokemon>, Error> {
    if let Some(cached) = cache.get(COMPLETE_LIST_KEY) {
        return Ok(cached.clone());
    }

    let base = client.fetch_list()?;
    let ids: Vec<u32> = base.iter().map(|entry| entry.id).collect();
    let details = client.fetch_many(&ids);
    let merged = merge_details(base, details);

    cache.set(COMPLETE_LIST_KEY, merged.clone());
    Ok(merged)
}

/// Merge detail records onto base entries by identifier. Entries whose
/// identifier has no matching detail keep their skeletal form.
fn merge_details(base: Vec<Pokemon>, details: Vec<PokemonDetail>) -> Vec<Pokemon> {
    let mut by_id: HashMap<u32, PokemonDetail> = details
        .into_iter()
        .map(|detail| (detail.id, detail))
        .collect();
    base.into_iter()
        .map(|entry| match by_id.remove(&entry.id) {
            Some(detail) => entry.with_detail(&detail),
            None => entry,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::merge_details;
    use crate::core::catalog::{Pokemon, PokemonDetail};

    fn detail(id: u32, name: &str, weight: u32) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            height: 7,
            weight,
            sprite: None,
            artwork: None,
            types: vec!["grass".to_string()],
            abilities: Vec::new(),
            stats: Vec::new(),
        }
    }

    #[test]
    fn merge_enriches_matches_and_keeps_order() {
        let base = vec![
            Pokemon::skeletal(1, "bulbasaur"),
            Pokemon::skeletal(2, "ivysaur"),
            Pokemon::skeletal(3, "venusaur"),
        ];
        let details = vec![detail(3, "venusaur", 1000), detail(1, "bulbasaur", 69)];

        let merged = merge_details(base, details);
        let ids: Vec<u32> = merged.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(merged[0].weight, Some(69));
        assert!(merged[1].is_skeletal());
        assert_eq!(merged[2].weight, Some(1000));
    }

    #[test]
    fn merge_ignores_details_for_unknown_identifiers() {
        let base = vec![Pokemon::skeletal(1, "bulbasaur")];
        let merged = merge_details(base, vec![detail(9, "blastoise", 855)]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_skeletal());
    }
}
