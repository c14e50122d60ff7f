use std::collections::HashMap;

use super::model::{CatalogEntry, RawEntry};
use super::priority::TierTable;

/// Collapse raw entries into the de-duplicated, globally ordered catalog.
///
/// Entries sharing a [`RawEntry::dedup_key`] are the same logical song; the
/// highest-ranked variant survives. Equal ranks keep the first entry in
/// traversal order, which is pinned here by sorting on path components so
/// the result does not depend on enumeration order.
pub fn build(entries: &[RawEntry], tiers: &TierTable) -> Vec<CatalogEntry> {
    let mut ordered: Vec<&RawEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.path.split('/').cmp(b.path.split('/')));

    // Dedup key -> best (rank, entry). Strictly-greater keeps the first
    // winner on rank ties.
    let mut best: HashMap<(String, String), (u8, &RawEntry)> = HashMap::new();
    let mut seen: Vec<(String, String)> = Vec::new();

    for track in ordered {
        let key = track.dedup_key();
        let (rank, _) = tiers.resolve(&track.subfolders);
        let replace = match best.get(&key) {
            Some((held, _)) => rank > *held,
            None => {
                seen.push(key.clone());
                true
            }
        };
        if replace {
            best.insert(key, (rank, track));
        }
    }

    let mut survivors: Vec<CatalogEntry> = seen
        .iter()
        .map(|key| {
            let (_, track) = best[key];
            let (_, tag) = tiers.resolve(&track.subfolders);
            CatalogEntry {
                display: track.title.clone(),
                path: track.path.clone(),
                artist: track.artist.clone(),
                subfolder: track.subfolders.join("/"),
                tag: tag.to_string(),
                url: String::new(),
            }
        })
        .collect();

    // The global (artist, title) sort is authoritative; the path tie-break
    // keeps output deterministic when distinct artists fold to the same
    // lowercase key.
    survivors.sort_by(|a, b| {
        (a.artist.to_lowercase(), a.display.to_lowercase(), &a.path)
            .cmp(&(b.artist.to_lowercase(), b.display.to_lowercase(), &b.path))
    });
    survivors
}
