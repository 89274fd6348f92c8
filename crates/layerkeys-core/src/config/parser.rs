// Layerkeys Config Parser - TOML with Serde
// Parses layer tables and output settings from TOML files

use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::command::is_layer_selector;
use crate::dispatch::DispatchEngine;
use crate::layer::{Layer, LayerTable};
use crate::token::{parse_sequence, TokenParseError};

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key in layer '{layer}', button '{button}': {source}")]
    InvalidKey {
        layer: String,
        button: String,
        source: TokenParseError,
    },

    #[error("Button '{button}' in layer '{layer}' has no keys")]
    EmptySequence { layer: String, button: String },

    #[error("Button '{button}' in layer '{layer}' is reserved for layer selection")]
    ReservedButton { layer: String, button: String },

    #[error("Configuration defines no layers")]
    NoLayers,

    #[error("Default layer {layer} out of range (1..={count})")]
    DefaultLayerOutOfRange { layer: usize, count: usize },
}

/// Main configuration structure (root TOML table)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    /// General settings
    #[serde(default)]
    pub general: Option<GeneralConfig>,

    /// Output throttle delays
    #[serde(default)]
    pub delays: Option<DelayConfig>,

    /// Layers in ordinal order
    #[serde(default)]
    pub layer: Vec<LayerTomlEntry>,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Layer active at startup (1-based)
    pub default_layer: Option<usize>,
}

/// Output delay configuration (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelayConfig {
    /// Delay before key output
    pub key_pre_delay_ms: Option<u64>,
    /// Delay after key output
    pub key_post_delay_ms: Option<u64>,
}

/// One `[[layer]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerTomlEntry {
    /// Optional display name
    pub name: Option<String>,

    /// Button-to-keys mappings
    #[serde(default)]
    pub mappings: IndexMap<String, LayerTomlOutput>,
}

/// Output side of a layer mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayerTomlOutput {
    /// Single key token as string
    Single(String),

    /// Key tokens pressed in order
    Multiple(Vec<String>),
}

impl LayerTomlOutput {
    fn tokens(&self) -> &[String] {
        match self {
            LayerTomlOutput::Single(token) => std::slice::from_ref(token),
            LayerTomlOutput::Multiple(tokens) => tokens,
        }
    }
}

/// Parsed configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Layer table
    pub layers: LayerTable,
    /// Default layer (0-based); the middle layer when unset
    pub default_layer: Option<usize>,
    /// Delay before each injected key event
    pub key_pre_delay_ms: u64,
    /// Delay after each injected key event
    pub key_post_delay_ms: u64,
}

impl Config {
    /// The built-in five-layer piano table with its middle layer selected
    pub fn builtin() -> Self {
        Self {
            layers: LayerTable::builtin(),
            default_layer: None,
            key_pre_delay_ms: 0,
            key_post_delay_ms: 0,
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        toml_config.to_config()
    }

    /// Parse configuration from a TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        log::debug!(
            "Loaded {} layers from {}",
            config.layers.len(),
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Get the default config path (~/.config/layerkeys/layers.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("layerkeys").join("layers.toml"))
    }

    /// Load from an explicit path, else the default path, else the built-in table
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_toml_path(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_toml_path(path),
            _ => {
                log::debug!("No config file found, using built-in layers");
                Ok(Self::builtin())
            }
        }
    }

    /// Override the default layer with a 1-based layer number
    pub fn set_default_layer(&mut self, layer: usize) -> Result<(), ConfigError> {
        self.default_layer = Some(checked_layer(layer, self.layers.len())?);
        Ok(())
    }

    /// Effective 0-based default layer
    pub fn effective_default_layer(&self) -> usize {
        self.default_layer
            .unwrap_or_else(|| self.layers.middle_index())
    }

    /// Build a dispatch engine over this configuration
    pub fn to_engine(&self) -> DispatchEngine {
        DispatchEngine::with_default_layer(self.layers.clone(), self.effective_default_layer())
    }
}

/// Convert a 1-based layer number to an ordinal within `count` layers
fn checked_layer(layer: usize, count: usize) -> Result<usize, ConfigError> {
    if layer == 0 || layer > count {
        return Err(ConfigError::DefaultLayerOutOfRange { layer, count });
    }
    Ok(layer - 1)
}

impl ConfigToml {
    /// Convert parsed TOML to internal Config structure
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        if self.layer.is_empty() {
            return Err(ConfigError::NoLayers);
        }

        let mut layers = Vec::with_capacity(self.layer.len());
        for (index, entry) in self.layer.iter().enumerate() {
            let name = entry
                .name
                .clone()
                .unwrap_or_else(|| format!("layer {}", index + 1));
            let mut layer = Layer::new(name.clone());

            for (button, output) in &entry.mappings {
                if is_layer_selector(button) {
                    return Err(ConfigError::ReservedButton {
                        layer: name,
                        button: button.clone(),
                    });
                }
                let tokens = output.tokens();
                if tokens.is_empty() {
                    return Err(ConfigError::EmptySequence {
                        layer: name,
                        button: button.clone(),
                    });
                }
                let sequence =
                    parse_sequence(tokens).map_err(|source| ConfigError::InvalidKey {
                        layer: name.clone(),
                        button: button.clone(),
                        source,
                    })?;
                layer.insert(button.clone(), sequence);
            }

            log::trace!("Layer '{}' parsed with {} mappings", layer.name(), layer.len());
            layers.push(layer);
        }

        let count = layers.len();
        let default_layer = self
            .general
            .as_ref()
            .and_then(|g| g.default_layer)
            .map(|layer| checked_layer(layer, count))
            .transpose()?;

        let delays = self.delays.as_ref();
        Ok(Config {
            layers: LayerTable::new(layers),
            default_layer,
            key_pre_delay_ms: delays.and_then(|d| d.key_pre_delay_ms).unwrap_or(0),
            key_post_delay_ms: delays.and_then(|d| d.key_post_delay_ms).unwrap_or(0),
        })
    }
}
