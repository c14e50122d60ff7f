use std::sync::{Arc, Mutex};

use super::model::CatalogEntry;

/// The published, de-duplicated track list plus its distinct artists.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub artists: Vec<String>,
}

/// Read model over the current library scan.
///
/// `publish` swaps the whole snapshot behind an `Arc`, so readers either see
/// the previous scan or the new one, never a half-built list. Cheap to clone;
/// clones share the same snapshot.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<Mutex<Arc<CatalogSnapshot>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible catalog atomically.
    pub fn publish(&self, entries: Vec<CatalogEntry>) {
        let mut artists: Vec<String> = Vec::new();
        for entry in &entries {
            if !artists.contains(&entry.artist) {
                artists.push(entry.artist.clone());
            }
        }
        artists.sort_by_key(|a| a.to_lowercase());

        let snapshot = Arc::new(CatalogSnapshot { entries, artists });
        *self.inner.lock().unwrap() = snapshot;
    }

    /// The current snapshot; holds no lock while the caller reads it.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn all(&self) -> Vec<CatalogEntry> {
        self.snapshot().entries.clone()
    }

    pub fn artists(&self) -> Vec<String> {
        self.snapshot().artists.clone()
    }

    pub fn by_artist(&self, name: &str) -> Vec<CatalogEntry> {
        self.filtered(Some(name), "")
    }

    /// Case-insensitive substring match over `display`.
    pub fn search(&self, query: &str) -> Vec<CatalogEntry> {
        self.filtered(None, query)
    }

    /// Artist filter AND search query, the combined projection the player
    /// builds its active view from. An empty query matches everything.
    pub fn filtered(&self, artist: Option<&str>, query: &str) -> Vec<CatalogEntry> {
        let query = query.trim().to_lowercase();
        self.snapshot()
            .entries
            .iter()
            .filter(|e| artist.is_none_or(|a| e.artist == a))
            .filter(|e| query.is_empty() || e.display.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}
