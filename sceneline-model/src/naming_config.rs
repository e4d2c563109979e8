//! Naming configuration snapshot consumed by the token engine.

use crate::error::{ModelError, Result};

/// Replacement policy for characters illegal on the target filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CharReplacement {
    /// Drop the character entirely.
    Delete,
    /// Replace with a bare dash.
    Dash,
    /// Replace with " -".
    SpaceDash,
    /// Replace with " - ".
    SpaceDashSpace,
    /// Dash-with-spaces only when a colon is followed by a space,
    /// otherwise delete.
    #[default]
    Smart,
}

/// Read-only snapshot of the naming configuration.
///
/// Fetched fresh for every naming resolution call; templates can change
/// between files so a snapshot is never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NamingConfig {
    /// Template for the entity folder, relative to the library root.
    pub folder_template: String,
    /// Template for the file name, without extension.
    pub file_template: String,
    pub replacement: CharReplacement,
    /// Maximum length of a folder path component, in bytes.
    pub max_folder_len: usize,
    /// Maximum length of the file name (without extension), in bytes.
    pub max_file_len: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            folder_template: "{Studio}/{Title} ({Year})".to_string(),
            file_template: "{Studio} - {Release Date} - {Title} [{Quality Title}]"
                .to_string(),
            replacement: CharReplacement::Smart,
            max_folder_len: 230,
            max_file_len: 230,
        }
    }
}

impl NamingConfig {
    /// Reject configurations that cannot produce a usable name.
    pub fn validate(&self) -> Result<()> {
        if self.folder_template.trim().is_empty() {
            return Err(ModelError::InvalidConfig(
                "folder template is empty".to_string(),
            ));
        }
        if self.file_template.trim().is_empty() {
            return Err(ModelError::InvalidConfig(
                "file template is empty".to_string(),
            ));
        }
        if self.max_folder_len == 0 || self.max_file_len == 0 {
            return Err(ModelError::InvalidConfig(
                "maximum component length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        NamingConfig::default().validate().expect("default valid");
    }

    #[test]
    fn empty_template_is_rejected() {
        let config = NamingConfig {
            file_template: "  ".to_string(),
            ..NamingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
