use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::app::domain::charset::SingleByteCharset;
use crate::app::domain::color::ChannelOrder;
use crate::app::infrastructure::error::{AppError, Result};

/// Show a confirmation before loading text at or above this size.
pub const MIN_SIZE_WARN: u64 = 4 * 1024 * 1024;
/// Refuse the text view at or above this size.
pub const MIN_SIZE_BLOCK_TEXT: u64 = 128 * 1024 * 1024;
/// Refuse the raw view at or above this size.
pub const MIN_SIZE_BLOCK_RAW: u64 = 256 * 1024 * 1024;

/// Size thresholds, in bytes. Must satisfy `warn_text < block_text < block_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub warn_text: u64,
    pub block_text: u64,
    pub block_raw: u64,
}

impl SizeLimits {
    pub const DEFAULT: SizeLimits = SizeLimits {
        warn_text: MIN_SIZE_WARN,
        block_text: MIN_SIZE_BLOCK_TEXT,
        block_raw: MIN_SIZE_BLOCK_RAW,
    };

    pub fn validate(&self) -> Result<()> {
        if self.warn_text < self.block_text && self.block_text < self.block_raw {
            Ok(())
        } else {
            Err(AppError::Settings(format!(
                "size limits must increase: warn {} < text {} < raw {}",
                self.warn_text, self.block_text, self.block_raw
            )))
        }
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub size_limits: SizeLimits,

    /// Charset for text without a byte-order mark
    #[serde(default)]
    pub fallback_charset: SingleByteCharset,

    /// Refuse to commit while the inactive view holds unsynchronized edits
    #[serde(default)]
    pub strict_commit: bool,

    /// Packing used by the color picker
    #[serde(default)]
    pub color_order: ChannelOrder,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            size_limits: SizeLimits::DEFAULT,
            fallback_charset: SingleByteCharset::default(),
            strict_commit: false,
            color_order: ChannelOrder::default(),
        }
    }
}

impl EditorSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_or_init(&Self::get_config_path())
    }

    /// Load `path`. A missing file is created with defaults; any other
    /// failure leaves the file alone and falls back to defaults.
    pub fn load_or_init(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save_to(path);
                default
            }
            Err(e) => {
                warn!("Failed to load settings: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Read and validate a settings file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.size_limits.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.size_limits.validate()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("respad");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.size_limits.warn_text, 4 * 1024 * 1024);
        assert_eq!(settings.size_limits.block_text, 128 * 1024 * 1024);
        assert_eq!(settings.size_limits.block_raw, 256 * 1024 * 1024);
        assert_eq!(settings.fallback_charset, SingleByteCharset::Latin1);
        assert!(!settings.strict_commit);
        assert_eq!(settings.color_order, ChannelOrder::Xrgb);
        assert!(settings.size_limits.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        // Simulate old config missing new fields
        let json = r#"{"strict_commit": true}"#;
        let settings: EditorSettings = serde_json::from_str(json).unwrap();
        assert!(settings.strict_commit);
        assert_eq!(settings.size_limits, SizeLimits::DEFAULT);
        assert_eq!(settings.fallback_charset, SingleByteCharset::Latin1);
    }

    #[test]
    fn test_enum_serialization() {
        let settings = EditorSettings {
            fallback_charset: SingleByteCharset::Windows1252,
            color_order: ChannelOrder::Rgbx,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Windows1252\""));
        assert!(json.contains("\"Rgbx\""));
    }

    #[test]
    fn test_limits_must_increase() {
        let limits = SizeLimits {
            warn_text: 10,
            block_text: 10,
            block_raw: 20,
        };
        assert!(matches!(limits.validate(), Err(AppError::Settings(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = EditorSettings {
            size_limits: SizeLimits {
                warn_text: 1,
                block_text: 2,
                block_raw: 3,
            },
            strict_commit: true,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = EditorSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_bad_limits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"size_limits": {"warn_text": 9, "block_text": 5, "block_raw": 1}}"#,
        )
        .unwrap();
        assert!(matches!(
            EditorSettings::load_from(&path),
            Err(AppError::Settings(_))
        ));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorSettings::load_from(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn test_load_or_init_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respad").join("settings.json");
        let settings = EditorSettings::load_or_init(&path);
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(EditorSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_or_init_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let garbage = [0xFF, 0xFE, 0x00, 0x7B];
        fs::write(&path, garbage).unwrap();

        let settings = EditorSettings::load_or_init(&path);
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(fs::read(&path).unwrap(), garbage);
    }
}
