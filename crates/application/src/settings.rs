//! Runtime settings.
//!
//! Every field has a default matching the reference behavior, so an empty
//! or partial JSON file is valid.

use serde::{Deserialize, Serialize};
use shakeball_input::Key;
use shakeball_motion::ClassifierConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::COOLDOWN;
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shake classifier tunables.
    pub classifier: ClassifierConfig,
    /// Cooldown after each trigger, in milliseconds.
    pub cooldown_ms: u64,
    /// Key that triggers an answer in keyboard/pointer mode.
    pub activate_key: Key,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            cooldown_ms: COOLDOWN.as_millis() as u64,
            activate_key: Key::Space,
        }
    }
}

impl Settings {
    /// Cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Parse and validate settings from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| SettingsError::Parse {
                path: None,
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: Some(PathBuf::from(path)),
                source,
            })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    /// Reject values the classifier or the cooldown timer cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let threshold = self.classifier.threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "classifier.threshold must be a positive number, got {}",
                threshold
            )));
        }
        if self.classifier.min_interval_ms < 0 {
            return Err(SettingsError::Invalid(format!(
                "classifier.min_interval_ms must not be negative, got {}",
                self.classifier.min_interval_ms
            )));
        }
        if self.cooldown_ms == 0 {
            return Err(SettingsError::Invalid(
                "cooldown_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cooldown(), Duration::from_millis(1000));
        assert_eq!(settings.activate_key, Key::Space);
        assert_eq!(settings.classifier.threshold, 15.0);
        assert_eq!(settings.classifier.min_interval_ms, 100);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{"activate_key": "Enter", "classifier": {"threshold": 20}}"#)
                .unwrap();
        assert_eq!(settings.activate_key, Key::Enter);
        assert_eq!(settings.classifier.threshold, 20.0);
        assert_eq!(settings.classifier.min_interval_ms, 100);
        assert_eq!(settings.cooldown_ms, 1000);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::from_json(r#"{"cooldown_ms": 0}"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"classifier": {"threshold": -1}}"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse { path: None, .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cooldown_ms": 250}}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.cooldown(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
