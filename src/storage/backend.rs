use thiserror::Error;

/// One audio object as reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    /// Slash-separated path relative to the storage root.
    pub relpath: String,
    /// Object size in bytes; 0 when the backend could not stat the object.
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage root {root:?} is not a directory")]
    RootNotADirectory { root: String },
}

/// Enumeration and locator resolution over a storage root.
///
/// `enumerate` must yield directories and files in lexicographic order at
/// every level; the indexer's first-wins tie-break is defined against that
/// order. Individual unreadable entries are skipped, never fatal.
pub trait StorageBackend: Send + Sync {
    /// List every audio object under the root, filtered by the configured
    /// extension allow-list.
    fn enumerate(&self) -> Result<Vec<StorageObject>, StorageError>;

    /// Turn a relative path into a playable locator (filesystem path or URL).
    fn locator(&self, relpath: &str) -> String;
}
