use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::storage::{StorageBackend, StorageError};

use super::catalog::Catalog;
use super::classify::classify;
use super::index::build;
use super::model::RawEntry;
use super::priority::TierTable;

/// Outcome of a refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A scan ran and its result was published.
    Completed { scanned: usize, published: usize },
    /// Another refresh was already in flight; nothing was scanned. The
    /// caller still observes the latest completed publish through the
    /// catalog.
    AlreadyRunning,
}

/// Drives storage enumeration through the indexing pipeline into the catalog.
///
/// Concurrent `refresh` calls collapse to a single in-flight scan; a rebuild
/// never blocks catalog readers or an in-progress play-through.
pub struct Librarian {
    storage: Arc<dyn StorageBackend>,
    tiers: TierTable,
    catalog: Catalog,
    scanning: AtomicBool,
}

impl Librarian {
    pub fn new(storage: Arc<dyn StorageBackend>, tiers: TierTable, catalog: Catalog) -> Self {
        Self {
            storage,
            tiers,
            catalog,
            scanning: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog.clone()
    }

    pub fn refresh(&self) -> Result<RefreshOutcome, StorageError> {
        if self.scanning.swap(true, Ordering::SeqCst) {
            return Ok(RefreshOutcome::AlreadyRunning);
        }

        let result = self.scan_and_publish();
        self.scanning.store(false, Ordering::SeqCst);
        result
    }

    fn scan_and_publish(&self) -> Result<RefreshOutcome, StorageError> {
        let objects = self.storage.enumerate()?;
        let scanned = objects.len();

        let mut raw: Vec<RawEntry> = Vec::with_capacity(scanned);
        for object in objects {
            match classify(&object.relpath) {
                Some(entry) => raw.push(entry),
                None => warn!("skipping unclassifiable path {:?}", object.relpath),
            }
        }

        let mut entries = build(&raw, &self.tiers);
        for entry in &mut entries {
            entry.url = self.storage.locator(&entry.path);
        }

        let published = entries.len();
        self.catalog.publish(entries);
        info!(scanned, published, "library refresh complete");

        Ok(RefreshOutcome::Completed { scanned, published })
    }
}
