use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Controls;

/// Port the torch firmware serves its WebSocket on.
pub const DEFAULT_PORT: u16 = 81;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Root {
    /// Where the torch lives.
    pub device: Device,
    /// Effect names, in the order the firmware numbers them.
    pub effects: Vec<String>,
    /// Control values shown before the torch reports anything.
    pub initial: Initial,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    /// Host name or address of the torch.
    pub host: Option<String>,
    /// WebSocket port.
    pub port: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Initial {
    pub brightness: i64,
    pub rate: i64,
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    pub effect: i64,
    pub on: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("error reading config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config lists no effects")]
    NoEffects,
}

impl Default for Root {
    fn default() -> Root {
        Root {
            device: Device::default(),
            effects: default_effects(),
            initial: Initial::default(),
        }
    }
}

impl Default for Device {
    fn default() -> Device {
        Device {
            host: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Default for Initial {
    fn default() -> Initial {
        Initial {
            brightness: 128,
            rate: 50,
            red: 255,
            green: 255,
            blue: 255,
            effect: 0,
            on: true,
        }
    }
}

impl Initial {
    pub fn controls(&self) -> Controls {
        Controls {
            brightness: self.brightness,
            rate: self.rate,
            red: self.red,
            green: self.green,
            blue: self.blue,
            effect_index: self.effect,
            on_off: self.on,
        }
    }
}

/// Placeholder names; `effects:` in the config file replaces them.
fn default_effects() -> Vec<String> {
    ["Solid Colour", "Torch Flicker", "Fade", "Rainbow", "Fire", "Sparkle"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn parse_config_yaml(source: &str) -> Result<Root, ConfigError> {
    let root: Root = serde_yaml::from_str(source)?;

    // An effect selection needs at least one name to point at.
    if root.effects.is_empty() {
        return Err(ConfigError::NoEffects);
    }

    Ok(root)
}

pub fn read_config_yaml<T: AsRef<Path>>(path: T) -> Result<Root, ConfigError> {
    let source = fs::read_to_string(path)?;
    parse_config_yaml(&source)
}

/// Read the config file if there is one, otherwise fall back to defaults.
pub fn read_config_or_default<T: AsRef<Path>>(path: T) -> Result<Root, ConfigError> {
    match read_config_yaml(path) {
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(Root::default()),
        other => other,
    }
}
