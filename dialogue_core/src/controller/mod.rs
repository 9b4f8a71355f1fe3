//! Narrative Controller - turn sequencing over the dialogue graph.
//!
//! One choice runs through a fixed pipeline:
//! 1. **Resolve**: the stat resolver turns the option's payload into deltas
//! 2. **Apply**: the ledger clamps them and may bust the player
//! 3. **Relationship events**: one-shot triggers may fire
//! 4. **Interruption**: on a main node, the side-event deck may interrupt
//! 5. **Transition**: follow the option's destination or end the story
//!
//! Side events never transition. Choosing on one returns to the node that
//! was interrupted.

mod report;

pub use report::*;

use game_rules::{Ending, StatLedger, StatResolver, StatSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::config::EngineConfig;
use crate::content::{ContentStore, DialogueNode, DialogueOption, NodeId, SideEvent};
use crate::deck::SideEventDeck;
use crate::error::NarrativeError;
use crate::gate::{clamp_selection, filter_options, GatedOption};
use crate::relationship::RelationshipMonitor;

/// Drives a playthrough. All randomness comes from the single `R`.
pub struct NarrativeController<R = StdRng> {
    store: Arc<ContentStore>,
    ledger: StatLedger,
    resolver: StatResolver,
    deck: SideEventDeck,
    monitor: RelationshipMonitor,
    rng: R,

    playthrough: PlaythroughId,
    state: ControllerState,
    current_node: NodeId,
    side_event: Option<SideEvent>,
    options: Vec<GatedOption>,
    selection: usize,
    /// Node cursor saved while a side event is showing.
    node_selection: usize,
    story_progress: u32,
    ending: Option<Ending>,
}

impl NarrativeController<StdRng> {
    /// Build every component from configuration, seeded from the OS.
    pub fn from_config(store: Arc<ContentStore>, config: &EngineConfig) -> Self {
        Self::from_config_with_rng(store, config, StdRng::from_entropy())
    }

    /// Build from configuration with a reproducible seed.
    pub fn with_seed(store: Arc<ContentStore>, config: &EngineConfig, seed: u64) -> Self {
        Self::from_config_with_rng(store, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NarrativeController<R> {
    /// Assemble a controller from its collaborators.
    pub fn new(
        store: Arc<ContentStore>,
        ledger: StatLedger,
        resolver: StatResolver,
        deck: SideEventDeck,
        monitor: RelationshipMonitor,
        rng: R,
    ) -> Self {
        let entry = store.entry_id();
        let mut controller = Self {
            store,
            ledger,
            resolver,
            deck,
            monitor,
            rng,
            playthrough: PlaythroughId::new(),
            state: ControllerState::ShowingNode,
            current_node: entry,
            side_event: None,
            options: Vec::new(),
            selection: 0,
            node_selection: 0,
            story_progress: 0,
            ending: None,
        };
        info!(playthrough = %controller.playthrough, entry = %entry, "Playthrough started");
        controller.show_node(entry);
        controller
    }

    /// Build every component from configuration with a caller-supplied RNG.
    pub fn from_config_with_rng(store: Arc<ContentStore>, config: &EngineConfig, rng: R) -> Self {
        let deck = SideEventDeck::new(store.all_side_events().to_vec(), config.deck.clone());
        Self::new(
            store,
            StatLedger::with_config(config.ledger.clone()),
            StatResolver::new(config.resolver.clone()),
            deck,
            RelationshipMonitor::new(config.relationship.clone()),
            rng,
        )
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == ControllerState::Ended
    }

    pub fn playthrough_id(&self) -> PlaythroughId {
        self.playthrough
    }

    pub fn current_node_id(&self) -> NodeId {
        self.current_node
    }

    /// The active main-storyline node, also while a side event interrupts it.
    pub fn current_node(&self) -> Option<&DialogueNode> {
        self.store.find_node_by_id(self.current_node)
    }

    pub fn current_side_event(&self) -> Option<&SideEvent> {
        self.side_event.as_ref()
    }

    /// What the player is looking at; `None` once the story has ended.
    pub fn screen(&self) -> Option<Screen<'_>> {
        match self.state {
            ControllerState::ShowingSideEvent => self.side_event.as_ref().map(Screen::SideEvent),
            ControllerState::ShowingNode => self.current_node().map(Screen::Node),
            ControllerState::Ended => None,
        }
    }

    /// The filtered choices for the current screen.
    pub fn options(&self) -> &[GatedOption] {
        &self.options
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    pub fn selected_option(&self) -> Option<&GatedOption> {
        self.options.get(self.selection)
    }

    pub fn ledger(&self) -> &StatLedger {
        &self.ledger
    }

    pub fn stats(&self) -> StatSnapshot {
        self.ledger.snapshot()
    }

    pub fn deck(&self) -> &SideEventDeck {
        &self.deck
    }

    pub fn monitor(&self) -> &RelationshipMonitor {
        &self.monitor
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Main-node transitions taken this playthrough.
    pub fn story_progress(&self) -> u32 {
        self.story_progress
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    /// Move the cursor, wrapping at both ends.
    pub fn move_selection(&mut self, delta: i32) {
        let count = self.options.len() as i32;
        if count == 0 {
            return;
        }
        self.selection = (self.selection as i32 + delta).rem_euclid(count) as usize;
    }

    /// Put the cursor on an option, clamped to the list.
    pub fn set_selection(&mut self, index: usize) {
        self.selection = clamp_selection(index, self.options.len());
    }

    /// Commit the option under the cursor.
    pub fn choose_selected(&mut self) -> Result<TurnReport, NarrativeError> {
        self.choose(self.selection)
    }

    /// Commit an option by its position in [`options`](Self::options).
    #[instrument(skip(self), fields(playthrough = %self.playthrough, node = %self.current_node))]
    pub fn choose(&mut self, index: usize) -> Result<TurnReport, NarrativeError> {
        if self.state == ControllerState::Ended {
            return Err(NarrativeError::AlreadyEnded);
        }
        let option: DialogueOption = self
            .options
            .get(index)
            .map(|gated| gated.option.clone())
            .ok_or(NarrativeError::OptionOutOfRange {
                index,
                available: self.options.len(),
            })?;

        let choice = self
            .resolver
            .resolve(option.nominal(), self.ledger.relationship(), &mut self.rng);
        let applied = self.ledger.apply(choice.actual);
        let mut report = TurnReport::new(choice, applied);
        // Relationship events cannot buy back a bust.
        if !self.ledger.is_busted() {
            report.notices = self.monitor.check(&mut self.ledger, &mut self.rng);
        }

        if self.ledger.is_busted() {
            report.ending = Some(self.finish());
            return Ok(report);
        }

        match self.state {
            ControllerState::ShowingSideEvent => self.return_from_side_event(),
            ControllerState::ShowingNode => {
                if self.try_interrupt(index) {
                    report.interrupted = true;
                } else if option.ends_story() {
                    report.ending = Some(self.finish());
                } else {
                    report.rerouted = self.advance(option.next_node);
                }
            }
            ControllerState::Ended => {}
        }

        Ok(report)
    }

    /// Start a fresh playthrough over the same content.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.monitor.reset();
        self.deck.refill(self.store.all_side_events());
        self.playthrough = PlaythroughId::new();
        self.story_progress = 0;
        self.ending = None;
        self.node_selection = 0;
        let entry = self.store.entry_id();
        info!(playthrough = %self.playthrough, entry = %entry, "Playthrough reset");
        self.show_node(entry);
    }

    fn show_node(&mut self, id: NodeId) {
        self.state = ControllerState::ShowingNode;
        self.current_node = id;
        self.side_event = None;
        self.selection = 0;
        self.refresh_options();
        info!(node = %id, options = self.options.len(), "Showing node");
    }

    /// Re-run the gate for the current screen and keep the cursor in range.
    fn refresh_options(&mut self) {
        let relationship = self.ledger.relationship();
        self.options = match (&self.side_event, self.store.find_node_by_id(self.current_node)) {
            (Some(event), _) => filter_options(&event.options, relationship),
            (None, Some(node)) => filter_options(&node.options, relationship),
            (None, None) => filter_options(&[], relationship),
        };
        self.selection = clamp_selection(self.selection, self.options.len());
    }

    /// Draw a side event unless the current node is an intro/special node.
    fn try_interrupt(&mut self, chosen: usize) -> bool {
        if self.current_node.is_special() {
            return false;
        }
        let stats = self.ledger.snapshot();
        let Some(event) = self
            .deck
            .try_draw(&stats, self.story_progress, &mut self.rng)
        else {
            return false;
        };

        self.node_selection = chosen;
        self.side_event = Some(event);
        self.state = ControllerState::ShowingSideEvent;
        self.selection = 0;
        self.refresh_options();
        true
    }

    fn return_from_side_event(&mut self) {
        self.side_event = None;
        self.state = ControllerState::ShowingNode;
        self.selection = self.node_selection;
        self.refresh_options();
    }

    /// Move to a destination node. Returns the substitute used if the
    /// destination does not exist.
    fn advance(&mut self, destination: NodeId) -> Option<NodeId> {
        self.story_progress += 1;
        if self.store.contains(destination) {
            self.show_node(destination);
            return None;
        }

        let fallback = if self.store.contains(NodeId::SAFE_DEFAULT) {
            NodeId::SAFE_DEFAULT
        } else {
            self.store.entry_id()
        };
        error!(
            from = %self.current_node,
            destination = %destination,
            fallback = %fallback,
            "Unresolved node reference, rerouting"
        );
        self.show_node(fallback);
        Some(fallback)
    }

    fn finish(&mut self) -> Ending {
        let stats = self.ledger.snapshot();
        let ending = if self.ledger.is_busted() {
            Ending::Captured
        } else {
            Ending::classify(stats, self.ledger.max_suspicion())
        };
        self.state = ControllerState::Ended;
        self.side_event = None;
        self.options.clear();
        self.selection = 0;
        self.ending = Some(ending);
        info!(
            playthrough = %self.playthrough,
            ?ending,
            profit = stats.profit,
            relationship = stats.relationship,
            suspicion = stats.suspicion,
            "Story ended"
        );
        ending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::InlineSource;
    use crate::deck::DeckConfig;
    use crate::relationship::MonitorConfig;
    use game_rules::ResolverConfig;

    const STORY: &str = r#"{
        "nodes": [
            { "id": -100, "body": "Intro", "options": [ { "text": "Begin", "nextNode": 0 } ] },
            { "id": 0, "body": "Lab", "options": [
                { "text": "Cook", "profit": 10, "nextNode": 1 },
                { "text": "Lie low", "suspicion": -5, "nextNode": 1 },
                { "text": "Call Saul", "relationships": 5, "nextNode": 1,
                  "minRelationship": 70, "isHidden": true }
            ] },
            { "id": 1, "body": "Showdown", "options": [
                { "text": "Walk away" },
                { "text": "Chase", "nextNode": 42 }
            ] }
        ]
    }"#;

    const EVENTS: &str = r#"{ "events": [
        { "body": "Hank calls", "options": [ { "text": "Answer", "relationships": 10 } ] }
    ] }"#;

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            resolver: ResolverConfig::deterministic(),
            deck: DeckConfig {
                interruption_chance: 0.0,
                ..Default::default()
            },
            relationship: MonitorConfig {
                trigger_chance: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn controller(config: &EngineConfig, events: bool) -> NarrativeController {
        let mut source = InlineSource::new(STORY);
        if events {
            source = source.with_side_events(EVENTS);
        }
        let store = Arc::new(ContentStore::load(&source).unwrap());
        NarrativeController::with_seed(store, config, 7)
    }

    fn texts(controller: &NarrativeController) -> Vec<&str> {
        controller
            .options()
            .iter()
            .map(|g| g.option.text.as_str())
            .collect()
    }

    #[test]
    fn test_starts_on_intro() {
        let controller = controller(&quiet_config(), false);
        assert_eq!(controller.current_node_id(), NodeId::INTRO);
        assert_eq!(controller.state(), ControllerState::ShowingNode);
        assert_eq!(controller.screen().unwrap().body(), "Intro");
    }

    #[test]
    fn test_walkthrough_to_ending() {
        let mut controller = controller(&quiet_config(), false);

        controller.choose(0).unwrap();
        assert_eq!(controller.current_node_id(), NodeId(0));
        assert_eq!(texts(&controller), vec!["Cook", "Lie low"]);

        let report = controller.choose(0).unwrap();
        assert_eq!(report.applied.profit, 10);
        assert_eq!(controller.current_node_id(), NodeId(1));
        assert_eq!(controller.story_progress(), 2);

        let report = controller.choose(0).unwrap();
        assert_eq!(report.ending, Some(Ending::Survivor));
        assert!(controller.is_ended());
        assert!(controller.screen().is_none());
        assert_eq!(controller.choose(0), Err(NarrativeError::AlreadyEnded));
    }

    #[test]
    fn test_out_of_range_choice() {
        let mut controller = controller(&quiet_config(), false);
        assert_eq!(
            controller.choose(5),
            Err(NarrativeError::OptionOutOfRange {
                index: 5,
                available: 1
            })
        );
        assert_eq!(controller.current_node_id(), NodeId::INTRO);
    }

    #[test]
    fn test_unresolved_destination_reroutes() {
        let mut controller = controller(&quiet_config(), false);
        controller.choose(0).unwrap();
        controller.choose(0).unwrap();

        let report = controller.choose(1).unwrap();
        assert_eq!(report.rerouted, Some(NodeId(0)));
        assert_eq!(controller.current_node_id(), NodeId(0));
        assert!(!controller.is_ended());
    }

    #[test]
    fn test_selection_wraps() {
        let mut controller = controller(&quiet_config(), false);
        controller.choose(0).unwrap();

        controller.move_selection(-1);
        assert_eq!(controller.selection(), 1);
        controller.move_selection(1);
        assert_eq!(controller.selection(), 0);

        controller.set_selection(9);
        assert_eq!(controller.selection(), 1);
        assert_eq!(controller.selected_option().unwrap().option.text, "Lie low");
    }

    #[test]
    fn test_side_event_interrupts_and_returns() {
        let config = EngineConfig {
            deck: DeckConfig {
                interruption_chance: 1.0,
                ..Default::default()
            },
            ..quiet_config()
        };
        let mut controller = controller(&config, true);

        // Intro nodes never get interrupted.
        let report = controller.choose(0).unwrap();
        assert!(!report.interrupted);
        assert_eq!(controller.current_node_id(), NodeId(0));

        let report = controller.choose(1).unwrap();
        assert!(report.interrupted);
        assert_eq!(controller.state(), ControllerState::ShowingSideEvent);
        assert_eq!(controller.screen().unwrap().body(), "Hank calls");
        assert_eq!(controller.current_node_id(), NodeId(0));
        assert!(controller.deck().is_empty());

        // Answering raises relationship to 60; the node is shown again with
        // the cursor restored.
        let report = controller.choose(0).unwrap();
        assert!(!report.interrupted);
        assert_eq!(controller.state(), ControllerState::ShowingNode);
        assert_eq!(controller.current_node_id(), NodeId(0));
        assert_eq!(controller.selection(), 1);
        assert_eq!(controller.stats().relationship, 60);
    }

    #[test]
    fn test_hidden_option_appears_after_side_event() {
        let config = EngineConfig {
            deck: DeckConfig {
                interruption_chance: 1.0,
                ..Default::default()
            },
            ledger: game_rules::LedgerConfig {
                starting_relationship: 60,
                ..Default::default()
            },
            ..quiet_config()
        };
        let mut controller = controller(&config, true);
        controller.choose(0).unwrap();
        assert_eq!(texts(&controller), vec!["Cook", "Lie low"]);

        controller.choose(0).unwrap();
        controller.choose(0).unwrap();
        assert_eq!(controller.stats().relationship, 70);
        assert_eq!(texts(&controller), vec!["Cook", "Lie low", "Call Saul"]);
    }

    #[test]
    fn test_reset_restores_everything() {
        let config = EngineConfig {
            deck: DeckConfig {
                interruption_chance: 1.0,
                ..Default::default()
            },
            ..quiet_config()
        };
        let mut controller = controller(&config, true);
        let first = controller.playthrough_id();
        controller.choose(0).unwrap();
        controller.choose(0).unwrap();
        assert!(controller.deck().is_empty());

        controller.reset();
        assert_ne!(controller.playthrough_id(), first);
        assert_eq!(controller.current_node_id(), NodeId::INTRO);
        assert_eq!(controller.stats(), StatSnapshot::new(0, 50, 0));
        assert_eq!(controller.deck().len(), 1);
        assert_eq!(controller.story_progress(), 0);
        assert!(controller.ending().is_none());
    }
}
