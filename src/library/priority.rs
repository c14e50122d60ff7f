/// Quality-tier ranking derived from a track's first subfolder.
///
/// The table is fixed; only the tag handed to unranked tracks is policy
/// (deployments disagree between `""` and `"LEAKED"`), so it is supplied by
/// configuration rather than baked in.
#[derive(Debug, Clone)]
pub struct TierTable {
    fallback_tag: String,
}

/// `(subfolder key, rank, tag)`; keys are matched trimmed and lowercased.
const TIERS: [(&str, u8, &str); 4] = [
    ("remasters", 4, "REMASTER"),
    ("leaked", 3, "LEAKED"),
    ("session edits", 2, "SESSION"),
    ("extras", 1, "EXTRA"),
];

impl TierTable {
    pub fn new() -> Self {
        Self::with_fallback("")
    }

    pub fn with_fallback(fallback_tag: impl Into<String>) -> Self {
        Self {
            fallback_tag: fallback_tag.into(),
        }
    }

    /// Rank a subfolder chain. Only the first element participates; nested
    /// subfolders below it never affect the rank. No match, and the empty
    /// chain, rank 0 with the fallback tag.
    pub fn resolve(&self, subfolders: &[String]) -> (u8, &str) {
        let key = subfolders
            .first()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        for (tier_key, rank, tag) in TIERS {
            if tier_key == key {
                return (rank, tag);
            }
        }
        (0, &self.fallback_tag)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new()
    }
}
