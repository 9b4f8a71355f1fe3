//! Engine configuration, loadable from TOML.

use game_rules::{LedgerConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::deck::DeckConfig;
use crate::error::ConfigError;
use crate::relationship::MonitorConfig;

/// Every tunable of the engine. Missing sections and keys take defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ledger: LedgerConfig,
    pub resolver: ResolverConfig,
    pub deck: DeckConfig,
    pub relationship: MonitorConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger.validate()?;
        self.resolver.validate()?;
        self.deck.validate()?;
        self.relationship.validate()?;

        let mut names = HashSet::new();
        for event in &self.relationship.events {
            if !names.insert(event.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "relationship event `{}` is defined more than once",
                    event.name
                )));
            }
        }
        Ok(())
    }
}
