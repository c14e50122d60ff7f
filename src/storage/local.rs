use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::backend::{StorageBackend, StorageError, StorageObject};

/// Local-filesystem storage: a directory tree of `Artist/[Tier/]Song.ext`.
///
/// With a `base_url` configured the backend still enumerates the local tree
/// but resolves locators against the public base, the way a deployment that
/// serves the same tree through a CDN does.
pub struct LocalStorage {
    root: PathBuf,
    extensions: Vec<String>,
    base_url: Option<String>,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            root: root.into(),
            extensions,
            base_url: None,
        }
    }

    /// Resolve locators against a public base URL instead of the local tree.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        self.base_url = if base.is_empty() { None } else { Some(base) };
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }

    fn relpath_of(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for comp in rel.components() {
            parts.push(comp.as_os_str().to_str()?);
        }
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}

impl StorageBackend for LocalStorage {
    fn enumerate(&self) -> Result<Vec<StorageObject>, StorageError> {
        // A missing root means an empty library; a root that is a file is a
        // configuration mistake worth surfacing.
        if self.root.exists() && !self.root.is_dir() {
            return Err(StorageError::RootNotADirectory {
                root: self.root.display().to_string(),
            });
        }

        let mut objects = Vec::new();

        // `sort_by_file_name` gives the lexicographic visit order at every
        // level that the dedup tie-break is defined against.
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry under {:?}: {}", self.root, err);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.is_audio_file(path) {
                continue;
            }

            let Some(relpath) = self.relpath_of(path) else {
                warn!("skipping non-unicode path {:?}", path);
                continue;
            };

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            objects.push(StorageObject { relpath, size });
        }

        Ok(objects)
    }

    fn locator(&self, relpath: &str) -> String {
        match &self.base_url {
            Some(base) => {
                let encoded: Vec<String> = relpath
                    .split('/')
                    .map(|seg| urlencoding::encode(seg).into_owned())
                    .collect();
                format!("{}/{}", base, encoded.join("/"))
            }
            None => {
                let mut full = self.root.clone();
                for seg in relpath.split('/') {
                    full.push(seg);
                }
                full.display().to_string()
            }
        }
    }
}
