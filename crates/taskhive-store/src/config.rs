use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use taskhive_core::geometry::DEFAULT_SPACING;
use tracing::warn;

pub const DEFAULT_STORAGE_KEY: &str = "hex-task-hive-data";

/// Store settings, read from a JSON file. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub version: u32,
    /// The single key the whole snapshot lives under.
    pub storage_key: String,
    /// Gap between hex tokens when the store computes a layout.
    pub hex_spacing: f64,
    /// Pretty-print persisted snapshots.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            hex_spacing: DEFAULT_SPACING,
            pretty: false,
        }
    }
}

impl StoreConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        self.validate()?;
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        validate_key(&self.storage_key)?;
        if !self.hex_spacing.is_finite() || self.hex_spacing < 0.0 {
            return Err(StoreError::InvalidConfig(format!(
                "hex_spacing must be a non-negative number, got {}",
                self.hex_spacing
            )));
        }
        Ok(())
    }

    /// Replace invalid values with their defaults, logging each one.
    pub fn or_defaults(mut self) -> Self {
        if let Err(e) = validate_key(&self.storage_key) {
            warn!(error = %e, "invalid storage key, using the default");
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        if !self.hex_spacing.is_finite() || self.hex_spacing < 0.0 {
            warn!(hex_spacing = self.hex_spacing, "invalid hex spacing, using the default");
            self.hex_spacing = DEFAULT_SPACING;
        }
        self
    }
}

/// Keys double as file names, so keep them to a safe alphabet.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey(key.into(), "key cannot be empty".into()));
    }
    if key.starts_with('.') {
        return Err(StoreError::InvalidKey(
            key.into(),
            "key cannot start with '.'".into(),
        ));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(StoreError::InvalidKey(
            key.replace('\0', "\\0"),
            format!("unsupported character {bad:?}"),
        ));
    }
    Ok(())
}
