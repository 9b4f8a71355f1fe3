//! Content sources - where nodes and side events come from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{DialogueNode, DialogueOption, NodeId, SideEvent};
use crate::error::ContentError;

/// A node as it appears in content files. Without an `id` the node is
/// addressed by its position in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default)]
    pub id: Option<NodeId>,
    pub body: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub char_left: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

impl NodeRecord {
    pub fn into_node(self, position: usize) -> DialogueNode {
        DialogueNode {
            id: self.id.unwrap_or(NodeId(position as i32)),
            body: self.body,
            background: self.background,
            char_left: self.char_left,
            options: self.options,
        }
    }
}

/// Main storyline file: `{ "nodes": [...] }`.
#[derive(Debug, Deserialize)]
struct NodeFile {
    nodes: Option<Vec<NodeRecord>>,
}

/// Side-event file: `{ "events": [...] }`.
#[derive(Debug, Deserialize)]
struct SideEventFile {
    events: Option<Vec<SideEvent>>,
}

/// Supplies dialogue content to the [`ContentStore`](super::ContentStore).
pub trait ContentSource {
    /// The main storyline. Errors here abort startup.
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, ContentError>;

    /// The side-event deck. Errors here degrade to an empty deck.
    fn load_side_events(&self) -> Result<Vec<SideEvent>, ContentError>;
}

/// Parse a main storyline document.
pub fn parse_nodes(json: &str) -> Result<Vec<NodeRecord>, ContentError> {
    let file: NodeFile = serde_json::from_str(json).map_err(|source| ContentError::Parse {
        what: "dialogue nodes".to_string(),
        source,
    })?;
    match file.nodes {
        Some(nodes) if !nodes.is_empty() => Ok(nodes),
        _ => Err(ContentError::EmptyNodes),
    }
}

/// Parse a side-event document.
pub fn parse_side_events(json: &str) -> Result<Vec<SideEvent>, ContentError> {
    let file: SideEventFile =
        serde_json::from_str(json).map_err(|source| ContentError::Parse {
            what: "side events".to_string(),
            source,
        })?;
    Ok(file.events.unwrap_or_default())
}

/// Content read from JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    nodes_path: PathBuf,
    side_events_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(nodes_path: impl Into<PathBuf>) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            side_events_path: None,
        }
    }

    pub fn with_side_events(mut self, path: impl Into<PathBuf>) -> Self {
        self.side_events_path = Some(path.into());
        self
    }

    /// The conventional pair of files inside a content directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("breaking_patterns.json")).with_side_events(dir.join("side_events.json"))
    }
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    if !path.exists() {
        return Err(ContentError::Missing {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "Reading content file");
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ContentSource for JsonFileSource {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, ContentError> {
        parse_nodes(&read_file(&self.nodes_path)?)
    }

    fn load_side_events(&self) -> Result<Vec<SideEvent>, ContentError> {
        match &self.side_events_path {
            Some(path) => parse_side_events(&read_file(path)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Content held as JSON text in memory.
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    nodes_json: String,
    side_events_json: Option<String>,
}

impl InlineSource {
    pub fn new(nodes_json: impl Into<String>) -> Self {
        Self {
            nodes_json: nodes_json.into(),
            side_events_json: None,
        }
    }

    pub fn with_side_events(mut self, json: impl Into<String>) -> Self {
        self.side_events_json = Some(json.into());
        self
    }
}

impl ContentSource for InlineSource {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, ContentError> {
        parse_nodes(&self.nodes_json)
    }

    fn load_side_events(&self) -> Result<Vec<SideEvent>, ContentError> {
        match &self.side_events_json {
            Some(json) => parse_side_events(json),
            None => Ok(Vec::new()),
        }
    }
}
