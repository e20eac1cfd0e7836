//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kvtree/kvtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `KVTREE_*` prefix, `__` between nested keys
//!    (e.g. `KVTREE_TREE__CHECK_CYCLES=false`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Delimiter, OutlineBuilder, TreeOptions};

/// Errors while loading or rendering settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot render settings: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Map codec settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MapSettings {
    /// Delimiter for the delimited text form; unset means `key=value key=value`
    pub delimiter: Option<String>,
}

/// Tree settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Reject links that would make a node its own ancestor
    pub check_cycles: bool,
    /// Spaces per level in outline files
    pub indent_width: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            check_cycles: TreeOptions::default().check_cycles,
            indent_width: 2,
        }
    }
}

/// Unified configuration for kvtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Log level when no `-d` flag is given (error, warn, info, debug, trace)
    pub log_level: String,
    pub map: MapSettings,
    pub tree: TreeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            map: MapSettings::default(),
            tree: TreeSettings::default(),
        }
    }
}

/// Get the XDG config directory for kvtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kvtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kvtree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "global config");
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(SettingsError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("KVTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text (no other layers).
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if let Some(delim) = &self.map.delimiter {
            Delimiter::new(delim.as_str()).map_err(|e| SettingsError::Invalid {
                key: "map.delimiter",
                message: e.to_string(),
            })?;
        }
        if self.tree.indent_width == 0 {
            return Err(SettingsError::Invalid {
                key: "tree.indent_width",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Configured delimiter, None for the default `key=value` form.
    pub fn delimiter(&self) -> Option<Delimiter> {
        self.map
            .delimiter
            .as_deref()
            .and_then(|d| Delimiter::new(d).ok())
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            check_cycles: self.tree.check_cycles,
        }
    }

    pub fn outline_builder(&self) -> OutlineBuilder {
        OutlineBuilder::new(self.tree.indent_width).with_options(self.tree_options())
    }

    /// Render the active settings as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Commented default configuration.
    pub fn template() -> String {
        r#"# kvtree configuration
# Global: $XDG_CONFIG_HOME/kvtree/kvtree.toml
# Env overrides: KVTREE_LOG_LEVEL, KVTREE_MAP__DELIMITER, KVTREE_TREE__CHECK_CYCLES, ...

# Log level without -d flags: error, warn, info, debug, trace
log_level = "warn"

[map]
# Delimiter for the delimited text form (key<d>value<d>key<d>value).
# Leave unset for the default "key=value key=value" form.
# delimiter = "|"

[tree]
# Reject links that would make a node its own ancestor
check_cycles = true
# Spaces per level in outline files (a tab counts as one level)
indent_width = 2
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.delimiter(), None);
        assert!(settings.tree_options().check_cycles);
        assert_eq!(settings.tree.indent_width, 2);
    }

    #[test]
    fn given_template_when_parsed_then_equals_defaults() {
        let parsed = Settings::from_toml(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_partial_toml_then_missing_fields_default() {
        let parsed = Settings::from_toml("[map]\ndelimiter = \"|\"\n").unwrap();
        assert_eq!(parsed.delimiter().unwrap().as_str(), "|");
        assert_eq!(parsed.tree, TreeSettings::default());
    }

    #[test]
    fn given_empty_delimiter_then_invalid() {
        let err = Settings::from_toml("[map]\ndelimiter = \"\"\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                key: "map.delimiter",
                ..
            }
        ));
    }

    #[test]
    fn given_zero_indent_then_invalid() {
        let err = Settings::from_toml("[tree]\nindent_width = 0\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                key: "tree.indent_width",
                ..
            }
        ));
    }

    #[test]
    fn given_settings_when_rendered_then_parses_back() {
        let mut settings = Settings::default();
        settings.map.delimiter = Some(";".into());
        settings.tree.check_cycles = false;
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }
}
