//! Converter settings and their TOML persistence.
//!
//! Settings are owned by the host (CLI, editor integration, ...) and handed
//! to the engine for each conversion call; the engine never mutates them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A user-supplied rewrite rule, appended to the forward pipeline.
///
/// `pattern` is a regex; `replacement` may reference captures as `$1`, `$2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRule {
    pub pattern: String,
    pub replacement: String,
}

/// Settings consulted by the conversion pipeline.
///
/// The TOML layout of this struct is the persistence format; it must
/// round-trip losslessly, including the order of `custom_rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Base URL of the Backlog space (e.g. "https://example.backlog.jp")
    pub base_url: String,

    /// Backlog project key used for issue references (e.g. "BLG").
    /// When empty, issue reference rules are inert.
    pub project_key: String,

    /// Whether the host should convert automatically (host concern; the
    /// engine only carries the flag)
    pub enable_auto_conversion: bool,

    /// Emit tabs instead of two-space units when reconstructing Markdown
    /// list indentation
    pub use_tabs_for_indent: bool,

    /// Extra forward rules, applied after the built-in table in list order
    pub custom_rules: Vec<CustomRule>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            project_key: String::new(),
            enable_auto_conversion: false,
            use_tabs_for_indent: true,
            custom_rules: Vec::new(),
        }
    }
}

/// Partial update for [`ConversionSettings`].
///
/// Unset fields keep their previous values; `custom_rules` is replaced
/// wholesale, never merged element-wise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub base_url: Option<String>,
    pub project_key: Option<String>,
    pub enable_auto_conversion: Option<bool>,
    pub use_tabs_for_indent: Option<bool>,
    pub custom_rules: Option<Vec<CustomRule>>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file at {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse settings file at {path:?}: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("failed to write settings file at {path:?}: {source}")]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConversionSettings {
    /// Return a copy with the patch applied as a shallow merge.
    pub fn merged(&self, patch: SettingsPatch) -> Self {
        Self {
            base_url: patch.base_url.unwrap_or_else(|| self.base_url.clone()),
            project_key: patch.project_key.unwrap_or_else(|| self.project_key.clone()),
            enable_auto_conversion: patch
                .enable_auto_conversion
                .unwrap_or(self.enable_auto_conversion),
            use_tabs_for_indent: patch.use_tabs_for_indent.unwrap_or(self.use_tabs_for_indent),
            custom_rules: patch.custom_rules.unwrap_or_else(|| self.custom_rules.clone()),
        }
    }

    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Write settings to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            source,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.base_url, "");
        assert_eq!(settings.project_key, "");
        assert!(!settings.enable_auto_conversion);
        assert!(settings.use_tabs_for_indent);
        assert!(settings.custom_rules.is_empty());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let settings = ConversionSettings {
            project_key: "BLG".to_string(),
            ..Default::default()
        };
        let merged = settings.merged(SettingsPatch {
            use_tabs_for_indent: Some(false),
            ..Default::default()
        });
        assert_eq!(merged.project_key, "BLG");
        assert!(!merged.use_tabs_for_indent);
        assert!(!merged.enable_auto_conversion);
    }

    #[test]
    fn test_merge_replaces_custom_rules_wholesale() {
        let settings = ConversionSettings {
            custom_rules: vec![
                CustomRule {
                    pattern: "a".to_string(),
                    replacement: "b".to_string(),
                },
                CustomRule {
                    pattern: "c".to_string(),
                    replacement: "d".to_string(),
                },
            ],
            ..Default::default()
        };
        let merged = settings.merged(SettingsPatch {
            custom_rules: Some(vec![CustomRule {
                pattern: "x".to_string(),
                replacement: "y".to_string(),
            }]),
            ..Default::default()
        });
        assert_eq!(merged.custom_rules.len(), 1);
        assert_eq!(merged.custom_rules[0].pattern, "x");
    }

    #[test]
    fn test_toml_roundtrip_preserves_rule_order() {
        let settings = ConversionSettings {
            base_url: "https://example.backlog.jp".to_string(),
            project_key: "BLG".to_string(),
            custom_rules: vec![
                CustomRule {
                    pattern: "first".to_string(),
                    replacement: "1".to_string(),
                },
                CustomRule {
                    pattern: "second".to_string(),
                    replacement: "2".to_string(),
                },
            ],
            ..Default::default()
        };
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let restored: ConversionSettings = toml::from_str(&serialized).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let restored: ConversionSettings = toml::from_str("project_key = \"BLG\"").unwrap();
        assert_eq!(restored.project_key, "BLG");
        assert!(restored.use_tabs_for_indent);
        assert!(restored.custom_rules.is_empty());
    }
}
