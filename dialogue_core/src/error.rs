//! Error types for content loading, configuration and turn handling.

use std::path::PathBuf;

use game_rules::RulesError;

use crate::content::NodeId;

/// Problems reading dialogue content.
///
/// Fatal for the main node collection. For side events the content store
/// logs them and continues with an empty deck.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("content file missing: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("main storyline contains no nodes")]
    EmptyNodes,

    #[error("node id {0} is defined more than once")]
    DuplicateNode(NodeId),

    #[error("node id {0} is reserved for the end of the story")]
    ReservedNodeId(NodeId),
}

/// Problems loading engine tuning.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rule tuning: {0}")]
    Rules(#[from] RulesError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rejected controller operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NarrativeError {
    #[error("option {index} does not exist ({available} available)")]
    OptionOutOfRange { index: usize, available: usize },

    #[error("the story has already ended")]
    AlreadyEnded,
}
