use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::generator::DEFAULT_LENGTH;
use crate::errors::{BentoError, Result};
use crate::vault::RotationPolicy;

/// User-level configuration, loaded from `<data_dir>/bento.toml`.
///
/// Every field has a sensible default so Bento works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Re-encrypt stored passwords when the PIN changes (default: false).
    ///
    /// When off, entries saved under the old PIN stop decrypting after a
    /// PIN change.
    #[serde(default)]
    pub reencrypt_on_rotate: bool,

    /// Length of passwords produced by `bento pass generate` (default: 12).
    #[serde(default = "default_generated_password_length")]
    pub generated_password_length: usize,

    /// File name used by `bento export` when no output is given.
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_generated_password_length() -> usize {
    DEFAULT_LENGTH
}

fn default_export_file_name() -> String {
    "bento_data.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            reencrypt_on_rotate: false,
            generated_password_length: default_generated_password_length(),
            export_file_name: default_export_file_name(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = "bento.toml";

    /// Load settings from `<data_dir>/bento.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = Self::path(data_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            BentoError::ConfigError(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            BentoError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.generated_password_length == 0 {
            return Err(BentoError::ConfigError(
                "generated_password_length must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Full path of the config file inside `data_dir`.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(Self::FILE_NAME)
    }

    /// The vault rotation policy these settings ask for.
    pub fn rotation_policy(&self) -> RotationPolicy {
        if self.reencrypt_on_rotate {
            RotationPolicy::Reencrypt
        } else {
            RotationPolicy::PreserveCiphertext
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert!(!s.reencrypt_on_rotate);
        assert_eq!(s.generated_password_length, 12);
        assert_eq!(s.export_file_name, "bento_data.json");
        assert_eq!(s.rotation_policy(), RotationPolicy::PreserveCiphertext);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.generated_password_length, 12);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
reencrypt_on_rotate = true
generated_password_length = 20
export_file_name = "backup.json"
"#;
        fs::write(tmp.path().join("bento.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.reencrypt_on_rotate);
        assert_eq!(settings.generated_password_length, 20);
        assert_eq!(settings.export_file_name, "backup.json");
        assert_eq!(settings.rotation_policy(), RotationPolicy::Reencrypt);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bento.toml"), "reencrypt_on_rotate = true\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.reencrypt_on_rotate);
        // Rest should be defaults
        assert_eq!(settings.generated_password_length, 12);
        assert_eq!(settings.export_file_name, "bento_data.json");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bento.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_zero_length_passwords() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("bento.toml"),
            "generated_password_length = 0\n",
        )
        .unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(BentoError::ConfigError(_))
        ));
    }
}
