//! Content Store - the immutable dialogue graph and side-event collection.
//!
//! Content is loaded once from a [`ContentSource`] and never mutated
//! afterwards. Nodes are indexed by identifier for constant-time lookup.

mod assets;
mod source;

pub use assets::*;
pub use source::*;

use game_rules::StatDelta;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::error::ContentError;

/// Identifier of a dialogue node. Negative values mark intro/special nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl NodeId {
    /// Destination meaning "the story ends here". Never a real node.
    pub const END: NodeId = NodeId(-1);

    /// Preferred entry node when the content defines it.
    pub const INTRO: NodeId = NodeId(-100);

    /// Fallback target for unresolved destinations.
    pub const SAFE_DEFAULT: NodeId = NodeId(0);

    pub fn is_end(&self) -> bool {
        *self == Self::END
    }

    /// Intro and special nodes live in the negative range.
    pub fn is_special(&self) -> bool {
        self.0 < 0
    }

    fn end() -> Self {
        Self::END
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn open_max() -> i32 {
    i32::MAX
}

fn default_max_scene() -> u32 {
    10
}

fn default_rare_chance() -> f64 {
    0.1
}

/// A player choice on a node or side event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub text: String,
    #[serde(default)]
    pub profit: i32,
    #[serde(default, rename = "relationships")]
    pub relationship: i32,
    #[serde(default)]
    pub suspicion: i32,
    /// Ignored on side events, which always return to the interrupted node.
    #[serde(default = "NodeId::end")]
    pub next_node: NodeId,
    #[serde(default)]
    pub min_relationship: i32,
    #[serde(default = "open_max")]
    pub max_relationship: i32,
    /// Hidden options only appear while the relationship gate is satisfied.
    #[serde(default)]
    pub is_hidden: bool,
}

impl DialogueOption {
    /// A plain option with zero deltas and an open gate.
    pub fn new(text: impl Into<String>, next_node: NodeId) -> Self {
        Self {
            text: text.into(),
            profit: 0,
            relationship: 0,
            suspicion: 0,
            next_node,
            min_relationship: 0,
            max_relationship: open_max(),
            is_hidden: false,
        }
    }

    /// The option synthesized when nothing else is visible.
    pub fn fallback_continue() -> Self {
        Self::new("Continue", NodeId::END)
    }

    pub fn with_deltas(mut self, delta: StatDelta) -> Self {
        self.profit = delta.profit;
        self.relationship = delta.relationship;
        self.suspicion = delta.suspicion;
        self
    }

    pub fn with_gate(mut self, min_relationship: i32, max_relationship: i32) -> Self {
        self.min_relationship = min_relationship;
        self.max_relationship = max_relationship;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// The nominal stat payload.
    pub fn nominal(&self) -> StatDelta {
        StatDelta::new(self.profit, self.relationship, self.suspicion)
    }

    pub fn gate_allows(&self, relationship: i32) -> bool {
        (self.min_relationship..=self.max_relationship).contains(&relationship)
    }

    pub fn ends_story(&self) -> bool {
        self.next_node.is_end()
    }
}

/// A unit of main-storyline dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueNode {
    pub id: NodeId,
    pub body: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub char_left: String,
    /// One to four entries in well-formed content.
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

impl DialogueNode {
    /// Asset names the presentation layer should resolve for this node.
    pub fn asset_names(&self) -> Vec<&str> {
        asset_names(&self.background, &self.char_left)
    }
}

/// A consumable interruption drawn between main-node transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEvent {
    pub body: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub char_left: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
    #[serde(default)]
    pub min_suspicion: i32,
    /// Latest story progress at which the event may still appear.
    #[serde(default = "default_max_scene")]
    pub max_scene: u32,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub min_relationship: i32,
    #[serde(default = "open_max")]
    pub max_relationship: i32,
    /// Extra draw probability for events tagged rare.
    #[serde(default = "default_rare_chance")]
    pub rare_chance: f64,
}

impl SideEvent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            background: String::new(),
            char_left: String::new(),
            options: Vec::new(),
            min_suspicion: 0,
            max_scene: default_max_scene(),
            tag: None,
            min_relationship: 0,
            max_relationship: open_max(),
            rare_chance: default_rare_chance(),
        }
    }

    pub fn with_option(mut self, option: DialogueOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn asset_names(&self) -> Vec<&str> {
        asset_names(&self.background, &self.char_left)
    }
}

fn asset_names<'a>(background: &'a str, char_left: &'a str) -> Vec<&'a str> {
    [background, char_left]
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect()
}

/// Immutable, id-indexed dialogue content.
#[derive(Debug, Clone)]
pub struct ContentStore {
    nodes: Vec<DialogueNode>,
    index: HashMap<NodeId, usize>,
    side_events: Vec<SideEvent>,
}

impl ContentStore {
    /// Load everything from a content source.
    ///
    /// Fails if the main node collection is missing, unparsable or empty.
    /// A broken side-event collection is logged and yields an empty deck.
    #[instrument(skip_all)]
    pub fn load<S: ContentSource + ?Sized>(source: &S) -> Result<Self, ContentError> {
        let nodes = source.load_nodes()?;
        let side_events = match source.load_side_events() {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "Side events unavailable, continuing with an empty deck");
                Vec::new()
            }
        };
        Self::from_parts(nodes, side_events)
    }

    /// Build a store from already-parsed records.
    pub fn from_parts(
        records: Vec<NodeRecord>,
        side_events: Vec<SideEvent>,
    ) -> Result<Self, ContentError> {
        if records.is_empty() {
            return Err(ContentError::EmptyNodes);
        }

        let mut nodes = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let node = record.into_node(position);
            if node.id.is_end() {
                return Err(ContentError::ReservedNodeId(node.id));
            }
            if index.insert(node.id, nodes.len()).is_some() {
                return Err(ContentError::DuplicateNode(node.id));
            }
            nodes.push(node);
        }

        let store = Self {
            nodes,
            index,
            side_events,
        };
        store.report_integrity();
        info!(
            nodes = store.nodes.len(),
            side_events = store.side_events.len(),
            "Content loaded"
        );
        Ok(store)
    }

    pub fn find_node_by_id(&self, id: NodeId) -> Option<&DialogueNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn all_side_events(&self) -> &[SideEvent] {
        &self.side_events
    }

    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The intro node if present, else the first loaded node.
    pub fn entry_id(&self) -> NodeId {
        if self.contains(NodeId::INTRO) {
            NodeId::INTRO
        } else {
            // Construction rejects an empty node list.
            self.nodes[0].id
        }
    }

    /// Log content problems that the controller can still route around.
    fn report_integrity(&self) {
        for node in &self.nodes {
            if node.options.is_empty() || node.options.len() > 4 {
                warn!(
                    node = %node.id,
                    options = node.options.len(),
                    "Node should offer between one and four options"
                );
            }
            for option in &node.options {
                if !option.ends_story() && !self.contains(option.next_node) {
                    warn!(
                        node = %node.id,
                        destination = %option.next_node,
                        "Option points at a node that does not exist"
                    );
                }
            }
        }
    }
}
