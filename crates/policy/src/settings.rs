//! User preferences consumed by the speaker policy.
//!
//! The engine reads settings, it never owns or writes them. Providers are
//! consulted on every event so a changed preference applies to the next
//! proximity sample without restarting the session.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SettingsError;

/// Default delay before switching to the speaker.
pub const DEFAULT_SWITCH_DELAY_MS: u64 = 3000;

/// File name under the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximitySettings {
    /// Route to the speaker when the phone is held away.
    pub auto_speaker_enabled: bool,
    /// Never auto-switch to the speaker on calls the user placed.
    pub in_call_only: bool,
    /// Debounce before a near reading moves audio to the speaker.
    #[serde(deserialize_with = "deserialize_delay")]
    pub switch_delay_ms: u64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            auto_speaker_enabled: false,
            in_call_only: false,
            switch_delay_ms: DEFAULT_SWITCH_DELAY_MS,
        }
    }
}

impl ProximitySettings {
    pub fn switch_delay(&self) -> Duration {
        Duration::from_millis(self.switch_delay_ms)
    }
}

/// Accepts `3000` as well as `"3000"`; preference stores often keep it as text.
fn deserialize_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Delay {
        Number(u64),
        Text(String),
    }

    match Delay::deserialize(deserializer)? {
        Delay::Number(ms) => Ok(ms),
        Delay::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid switch delay '{}'", text))
        }),
    }
}

/// Source of the current settings.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> ProximitySettings;
}

/// Fixed settings.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub ProximitySettings);

impl SettingsProvider for StaticSettings {
    fn settings(&self) -> ProximitySettings {
        self.0.clone()
    }
}

/// Settings that can be changed while a session is running.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<ProximitySettings>,
}

impl SharedSettings {
    pub fn new(settings: ProximitySettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    pub fn replace(&self, settings: ProximitySettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    pub fn update(&self, f: impl FnOnce(&mut ProximitySettings)) {
        f(&mut self.inner.write().unwrap_or_else(PoisonError::into_inner));
    }
}

impl SettingsProvider for SharedSettings {
    fn settings(&self) -> ProximitySettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// `<config dir>/proxcall/settings.json`, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("proxcall").join(SETTINGS_FILE_NAME))
}

/// Load settings from a JSON file. A missing file yields the defaults.
pub fn load_settings_file(path: &Path) -> Result<ProximitySettings, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(ProximitySettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let settings: ProximitySettings =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        path = %path.display(),
        auto_speaker = settings.auto_speaker_enabled,
        in_call_only = settings.in_call_only,
        delay_ms = settings.switch_delay_ms,
        "proximity settings loaded"
    );

    Ok(settings)
}

/// Load from the default location, falling back to defaults on any problem.
pub fn load_default_settings() -> ProximitySettings {
    let Some(path) = default_settings_path() else {
        return ProximitySettings::default();
    };

    load_settings_file(&path).unwrap_or_else(|e| {
        tracing::warn!("using default proximity settings: {}", e);
        ProximitySettings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = ProximitySettings::default();
        assert!(!settings.auto_speaker_enabled);
        assert!(!settings.in_call_only);
        assert_eq!(settings.switch_delay(), Duration::from_millis(3000));
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: ProximitySettings =
            serde_json::from_str(r#"{"auto_speaker_enabled": true}"#).unwrap();
        assert!(settings.auto_speaker_enabled);
        assert_eq!(settings.switch_delay_ms, DEFAULT_SWITCH_DELAY_MS);
    }

    #[test]
    fn test_delay_as_string() {
        let settings: ProximitySettings =
            serde_json::from_str(r#"{"switch_delay_ms": "1500"}"#).unwrap();
        assert_eq!(settings.switch_delay_ms, 1500);
    }

    #[test]
    fn test_invalid_delay_rejected() {
        let result = serde_json::from_str::<ProximitySettings>(r#"{"switch_delay_ms": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, ProximitySettings::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"auto_speaker_enabled": true, "in_call_only": true, "switch_delay_ms": 500}"#,
        )
        .unwrap();

        let settings = load_settings_file(&path).unwrap();
        assert!(settings.auto_speaker_enabled);
        assert!(settings.in_call_only);
        assert_eq!(settings.switch_delay_ms, 500);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();

        let err = load_settings_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_shared_settings_update() {
        let shared = SharedSettings::default();
        assert!(!shared.settings().auto_speaker_enabled);

        shared.update(|s| s.auto_speaker_enabled = true);
        assert!(shared.settings().auto_speaker_enabled);

        shared.replace(ProximitySettings::default());
        assert!(!shared.settings().auto_speaker_enabled);
    }
}
