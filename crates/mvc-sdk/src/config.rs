use std::path::Path;

use mvc_checkout::PreviewStyle;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Repository configuration, stored as TOML in `.mvc/config.toml`.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MvcConfig {
    /// Hex characters shown for commit ids.
    pub short_id_len: usize,
    /// Gitignore-style patterns left out of the working-tree scan.
    pub ignore: Vec<String>,
    /// Diff shown before an overwrite prompt during checkout.
    pub checkout_preview: PreviewStyle,
    /// Unchanged lines shown around each change in status diffs.
    pub diff_context: usize,
}

impl Default for MvcConfig {
    fn default() -> Self {
        Self {
            short_id_len: 7,
            ignore: vec!["node_modules/".to_string()],
            checkout_preview: PreviewStyle::Aligned,
            diff_context: 3,
        }
    }
}

impl MvcConfig {
    pub const MIN_SHORT_ID_LEN: usize = 4;
    pub const MAX_SHORT_ID_LEN: usize = 64;

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_SHORT_ID_LEN..=Self::MAX_SHORT_ID_LEN).contains(&self.short_id_len) {
            return Err(format!(
                "short_id_len must be between {} and {}, got {}",
                Self::MIN_SHORT_ID_LEN,
                Self::MAX_SHORT_ID_LEN,
                self.short_id_len
            ));
        }
        Ok(())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SdkError::io(path, e)),
        };
        Self::from_toml(&text).map_err(|reason| SdkError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }
}
