//! Values the controller hands to the presentation layer.

use game_rules::{Ending, StatChangeResult, StatDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{DialogueNode, NodeId, SideEvent};
use crate::relationship::RelationshipNotice;

/// Identifier of one playthrough, regenerated on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaythroughId(pub Uuid);

impl PlaythroughId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaythroughId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlaythroughId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    ShowingNode,
    ShowingSideEvent,
    /// Terminal until reset.
    Ended,
}

/// What is on screen right now.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    Node(&'a DialogueNode),
    SideEvent(&'a SideEvent),
}

impl<'a> Screen<'a> {
    pub fn body(&self) -> &'a str {
        match self {
            Screen::Node(node) => &node.body,
            Screen::SideEvent(event) => &event.body,
        }
    }

    pub fn background(&self) -> &'a str {
        match self {
            Screen::Node(node) => &node.background,
            Screen::SideEvent(event) => &event.background,
        }
    }

    pub fn char_left(&self) -> &'a str {
        match self {
            Screen::Node(node) => &node.char_left,
            Screen::SideEvent(event) => &event.char_left,
        }
    }

    pub fn asset_names(&self) -> Vec<&'a str> {
        match self {
            Screen::Node(node) => node.asset_names(),
            Screen::SideEvent(event) => event.asset_names(),
        }
    }
}

/// Everything that happened during one choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Resolver output, nominal next to actual.
    pub choice: StatChangeResult,
    /// What the ledger actually moved by for the choice itself.
    pub applied: StatDelta,
    pub notices: Vec<RelationshipNotice>,
    /// A side event interrupted the transition.
    pub interrupted: bool,
    pub ending: Option<Ending>,
    /// Substitute node used because the chosen destination does not exist.
    pub rerouted: Option<NodeId>,
}

impl TurnReport {
    pub(crate) fn new(choice: StatChangeResult, applied: StatDelta) -> Self {
        Self {
            choice,
            applied,
            notices: Vec::new(),
            interrupted: false,
            ending: None,
            rerouted: None,
        }
    }

    pub fn ended(&self) -> bool {
        self.ending.is_some()
    }
}
