use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            library: LibrarySettings::default(),
            playback: PlaybackSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the music library, laid out as `Artist/[Tier/]Song.ext`.
    pub root: String,
    /// Optional public base URL. When set, catalog locators are built as
    /// `<base_url>/<percent-encoded relative path>` instead of direct
    /// filesystem paths, matching a deployment that serves audio from a CDN.
    pub base_url: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: "Music".to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    ///
    /// The default covers the local deployment; object-store deployments
    /// typically extend this to `["mp3", "m4a", "wav", "flac", "ogg"]`.
    pub extensions: Vec<String>,
    /// Tag given to tracks whose subfolder matches no known tier.
    ///
    /// The two observed deployments disagree here (empty string vs "LEAKED"),
    /// so this is a policy knob rather than a constant.
    pub fallback_tag: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            fallback_tag: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether repeat (restart the current track at its end) starts enabled.
    pub repeat: bool,
    /// Initial volume, 0-100.
    pub volume: u8,
    /// Progress sampler poll interval in milliseconds.
    pub sampler_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            volume: 60,
            sampler_interval_ms: 100,
        }
    }
}
