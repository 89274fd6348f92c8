// Layerkeys Config API
// Layer tables and output settings loaded from TOML

pub mod parser;

pub use parser::{Config, ConfigError, ConfigToml, DelayConfig, GeneralConfig, LayerTomlEntry, LayerTomlOutput};
