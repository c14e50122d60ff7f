use serde::Serialize;

/// Artist assigned to tracks that sit directly under the storage root.
pub const UNSORTED_ARTIST: &str = "Unsorted";

/// One physical audio object, classified from its storage-relative path.
///
/// `path` is the only durable identity; every other field is derived from it
/// and recomputed on each scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub path: String,
    pub artist: String,
    /// Path segments strictly between the artist and the filename.
    pub subfolders: Vec<String>,
    /// Filename with its extension stripped.
    pub title: String,
}

impl RawEntry {
    /// Dedup key: two entries with the same key are the same logical song.
    pub fn dedup_key(&self) -> (String, String) {
        (self.artist.clone(), self.title.trim().to_lowercase())
    }
}

/// One published, de-duplicated catalog record.
///
/// Entries are created fresh on every scan and are immutable once published;
/// a re-scan supersedes the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub display: String,
    pub path: String,
    pub artist: String,
    /// Joined subfolder chain, e.g. `"Remasters"` or `""`.
    pub subfolder: String,
    /// Tier tag, e.g. `"REMASTER"`, or the configured fallback.
    pub tag: String,
    /// Playable locator resolved by the storage backend.
    pub url: String,
}
