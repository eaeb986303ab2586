// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration file handling.
//!
//! The file is read once at startup; nothing watches it for changes.

use crate::hotplug::{BindingTable, PortBinding};
use crate::input::keysym::{Keysym, UnknownKeysym};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE: &str = "jackhook.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Port {port}: {source}")]
    UnknownKey {
        port: String,
        #[source]
        source: UnknownKeysym,
    },
    #[error("Port {0} is bound more than once")]
    DuplicatePort(String),
    #[error("No config directory found")]
    NoConfigDir,
}

/// Which action variant handles port transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    /// Print a status line per transition.
    #[default]
    Log,
    /// Press the bound key on the X display.
    Key,
}

/// One `[[ports]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortConfig {
    pub name: String,
    #[serde(default)]
    pub plugged: Option<String>,
    #[serde(default)]
    pub unplugged: Option<String>,
}

impl PortConfig {
    fn to_binding(&self) -> Result<PortBinding, ConfigError> {
        let parse = |key: &Option<String>| -> Result<Option<Keysym>, ConfigError> {
            key.as_deref()
                .map(str::parse::<Keysym>)
                .transpose()
                .map_err(|source| ConfigError::UnknownKey {
                    port: self.name.clone(),
                    source,
                })
        };
        Ok(PortBinding::new(&self.name).with_keys(parse(&self.plugged)?, parse(&self.unplugged)?))
    }
}

fn default_client_name() -> String {
    "jackhook".to_string()
}

fn default_ports() -> Vec<PortConfig> {
    vec![PortConfig {
        name: "analog-output-headphones".to_string(),
        plugged: Some("XF86AudioPlay".to_string()),
        unplugged: Some("XF86AudioPause".to_string()),
    }]
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub mode: ActionMode,
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Audio server address; `None` lets the library pick.
    #[serde(default)]
    pub server: Option<String>,
    /// X display for key mode; `None` uses `$DISPLAY`.
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default = "default_ports")]
    pub ports: Vec<PortConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ActionMode::default(),
            client_name: default_client_name(),
            server: None,
            display: None,
            ports: default_ports(),
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Build the binding table, validating key names and port uniqueness.
    pub fn bindings(&self) -> Result<BindingTable, ConfigError> {
        let bindings = self
            .ports
            .iter()
            .map(PortConfig::to_binding)
            .collect::<Result<Vec<_>, _>>()?;
        BindingTable::new(bindings).map_err(ConfigError::DuplicatePort)
    }
}

/// Locates and loads the configuration file.
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager for the XDG config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = directories::ProjectDirs::from("com", "jackhook", "jackhook")
            .map(|d| d.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)?;

        debug!("Config directory: {:?}", config_dir);
        Ok(Self { config_dir })
    }

    #[cfg(test)]
    fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load the configuration, falling back to defaults if there is no file.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            debug!("No config found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Config::from_toml(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mode, ActionMode::Log);
        assert_eq!(config.client_name, "jackhook");
        let bindings = config.bindings().unwrap();
        let headphones = bindings.get("analog-output-headphones").unwrap();
        assert_eq!(headphones.plugged, Some("XF86AudioPlay".parse().unwrap()));
        assert_eq!(headphones.unplugged, Some("XF86AudioPause".parse().unwrap()));
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml(
            r#"
            mode = "key"
            client_name = "jack-test"
            server = "unix:/run/user/1000/pulse/native"
            display = ":1"

            [[ports]]
            name = "analog-input-headset-mic"
            plugged = "F13"

            [[ports]]
            name = "analog-output-lineout"
            unplugged = "XF86AudioMute"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, ActionMode::Key);
        assert_eq!(config.server.as_deref(), Some("unix:/run/user/1000/pulse/native"));
        assert_eq!(config.display.as_deref(), Some(":1"));

        let bindings = config.bindings().unwrap();
        assert_eq!(bindings.len(), 2);
        let mic = bindings.get("analog-input-headset-mic").unwrap();
        assert!(mic.plugged.is_some());
        assert!(mic.unplugged.is_none());
    }

    #[test]
    fn test_missing_ports_uses_default() {
        let config = Config::from_toml("mode = \"log\"").unwrap();
        assert_eq!(config.ports, default_ports());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let config = Config::from_toml(
            r#"
            [[ports]]
            name = "analog-output-headphones"
            plugged = "NoSuchKey"
            "#,
        )
        .unwrap();
        assert!(matches!(config.bindings(), Err(ConfigError::UnknownKey { .. })));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        // `[[port]]` instead of `[[ports]]` must not fall back to the defaults.
        let misspelled_table = r#"
            [[port]]
            name = "analog-output-lineout"
            "#;
        assert!(Config::from_toml(misspelled_table).is_err());

        let misspelled_key = r#"
            [[ports]]
            name = "analog-output-lineout"
            pluged = "F13"
            "#;
        assert!(Config::from_toml(misspelled_key).is_err());
    }

    #[test]
    fn test_duplicate_port_rejected() {
        let config = Config::from_toml(
            r#"
            [[ports]]
            name = "analog-output-headphones"

            [[ports]]
            name = "analog-output-headphones"
            "#,
        )
        .unwrap();
        assert!(matches!(config.bindings(), Err(ConfigError::DuplicatePort(_))));
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Config::from_toml("mode = \"beep\"").is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());
        assert_eq!(manager.load().unwrap(), Config::default());

        std::fs::write(dir.path().join(CONFIG_FILE), "mode = \"key\"\n").unwrap();
        assert_eq!(manager.load().unwrap().mode, ActionMode::Key);

        std::fs::write(dir.path().join(CONFIG_FILE), "mode = [").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::TomlParse(_))));
    }
}
