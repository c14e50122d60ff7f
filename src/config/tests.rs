use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert_eq!(s.storage.root, "Music");
    assert!(s.storage.base_url.is_none());
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.library.fallback_tag, "");
    assert!(!s.playback.shuffle);
    assert!(!s.playback.repeat);
    assert_eq!(s.playback.volume, 60);
    assert_eq!(s.playback.sampler_interval_ms, 100);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.playback.sampler_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions.clear();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[storage]
root = "/srv/vault"
base_url = "https://cdn.example.net/media"

[library]
extensions = ["mp3", "m4a", "wav", "flac", "ogg"]
fallback_tag = "LEAKED"

[playback]
shuffle = true
repeat = true
volume = 80
sampler_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.root, "/srv/vault");
    assert_eq!(
        s.storage.base_url.as_deref(),
        Some("https://cdn.example.net/media")
    );
    assert_eq!(s.library.extensions.len(), 5);
    assert_eq!(s.library.fallback_tag, "LEAKED");
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.playback.volume, 80);
    assert_eq!(s.playback.sampler_interval_ms, 250);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 40
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__PLAYBACK__VOLUME", "95");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 95);
}
