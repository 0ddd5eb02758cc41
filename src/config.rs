//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/graftree/graftree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `GRAFTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::provider::expand_env_vars;

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub auto_mount: Option<bool>,
    pub parameters: Option<BTreeMap<String, String>>,
}

/// Unified configuration for graftree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for relative mount sources (default: the document's directory)
    pub base_dir: Option<PathBuf>,
    /// Resolve eager mount points when loading (default: true)
    pub auto_mount: bool,
    /// Parameters handed to the provider
    pub parameters: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: None,
            auto_mount: true,
            parameters: BTreeMap::new(),
        }
    }
}

/// Get the XDG config directory for graftree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "graftree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("graftree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.base_dir {
            let expanded = expand_env_vars(dir.to_string_lossy().as_ref());
            self.base_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Parameters: overlay keys are added, replacing equal keys
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut parameters = self.parameters.clone();
        if let Some(extra) = &overlay.parameters {
            parameters.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            base_dir: overlay.base_dir.clone().or_else(|| self.base_dir.clone()),
            auto_mount: overlay.auto_mount.unwrap_or(self.auto_mount),
            parameters,
        }
    }

    /// Load settings: defaults, global config, `config_file`, then env vars.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply GRAFTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("GRAFTREE").separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("auto_mount") {
            settings.auto_mount = val;
        }
        if let Ok(val) = config.get::<BTreeMap<String, String>>("parameters") {
            settings.parameters.extend(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# graftree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/graftree/graftree.toml
#   Explicit: --config <file>
#   Env:      GRAFTREE_* environment variables (GRAFTREE_PARAMETERS__KEY=value)

# Base directory for relative mount sources (default: directory of the document)
# base_dir = "~/trees"

# Resolve "now" mount points when a document is loaded
# auto_mount = true

[parameters]
# Free-form parameters passed to the provider
# lang = "en"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_auto_mount_is_on() {
        let settings = Settings::default();
        assert!(settings.auto_mount);
        assert!(settings.base_dir.is_none());
        assert!(settings.parameters.is_empty());
    }

    #[test]
    fn given_overlay_when_merging_then_scalars_replace_and_parameters_extend() {
        let mut base = Settings::default();
        base.parameters.insert("lang".into(), "en".into());
        base.parameters.insert("theme".into(), "dark".into());

        let overlay = RawSettings {
            base_dir: Some(PathBuf::from("/trees")),
            auto_mount: Some(false),
            parameters: Some(BTreeMap::from([("lang".to_string(), "de".to_string())])),
        };

        let result = base.merge_with(&overlay);
        assert_eq!(result.base_dir, Some(PathBuf::from("/trees")));
        assert!(!result.auto_mount);
        assert_eq!(result.parameters.get("lang").unwrap(), "de");
        assert_eq!(result.parameters.get("theme").unwrap(), "dark");
    }

    #[test]
    fn given_empty_overlay_when_merging_then_keeps_base() {
        let base = Settings {
            base_dir: Some(PathBuf::from("/base")),
            auto_mount: false,
            parameters: BTreeMap::new(),
        };
        let result = base.merge_with(&RawSettings::default());
        assert_eq!(result, base);
    }

    #[test]
    fn given_tilde_in_base_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            base_dir: Some(PathBuf::from("~/trees")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.base_dir.unwrap();
        assert!(
            dir.to_string_lossy().starts_with(&home),
            "base_dir should start with home dir: {}",
            dir.display()
        );
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.base_dir.is_none());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.parameters.insert("lang".into(), "en".into());
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
