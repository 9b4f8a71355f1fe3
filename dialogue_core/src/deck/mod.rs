//! Side-Event Deck - probabilistic, consumable interruptions.
//!
//! A draw happens in three steps:
//! 1. **Interruption roll**: abort unless the global chance succeeds
//! 2. **Eligibility**: suspicion, relationship and story-progress gates, plus
//!    an extra roll for events tagged rare
//! 3. **Pick**: a uniform choice among eligible events, removed from the deck

use game_rules::{check_probability, RulesError, StatSnapshot};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::content::SideEvent;

/// Tuning for side-event draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Chance that a draw is attempted at all.
    pub interruption_chance: f64,
    /// Tag marking events that need the extra rare roll.
    pub rare_tag: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            interruption_chance: 0.35,
            rare_tag: "rare".to_string(),
        }
    }
}

impl DeckConfig {
    pub fn validate(&self) -> Result<(), RulesError> {
        check_probability("interruption_chance", self.interruption_chance)
    }
}

/// Undrawn side events.
#[derive(Debug, Clone, Default)]
pub struct SideEventDeck {
    remaining: Vec<SideEvent>,
    config: DeckConfig,
}

impl SideEventDeck {
    pub fn new(events: Vec<SideEvent>, config: DeckConfig) -> Self {
        Self {
            remaining: events,
            config,
        }
    }

    pub fn with_defaults(events: Vec<SideEvent>) -> Self {
        Self::new(events, DeckConfig::default())
    }

    pub fn remaining(&self) -> &[SideEvent] {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Replace the deck contents for a new playthrough.
    pub fn refill(&mut self, events: &[SideEvent]) {
        self.remaining = events.to_vec();
    }

    /// Gates that need no roll.
    pub fn is_eligible(event: &SideEvent, stats: &StatSnapshot, story_progress: u32) -> bool {
        stats.suspicion >= event.min_suspicion
            && (event.min_relationship..=event.max_relationship).contains(&stats.relationship)
            && story_progress <= event.max_scene
    }

    /// Try to draw an interruption. A drawn event is removed for good.
    pub fn try_draw<R: Rng>(
        &mut self,
        stats: &StatSnapshot,
        story_progress: u32,
        rng: &mut R,
    ) -> Option<SideEvent> {
        if self.remaining.is_empty() {
            return None;
        }
        if !rng.gen_bool(self.config.interruption_chance.clamp(0.0, 1.0)) {
            debug!("No interruption this turn");
            return None;
        }

        let mut eligible = Vec::new();
        for (index, event) in self.remaining.iter().enumerate() {
            if !Self::is_eligible(event, stats, story_progress) {
                continue;
            }
            if event.has_tag(&self.config.rare_tag)
                && !rng.gen_bool(event.rare_chance.clamp(0.0, 1.0))
            {
                continue;
            }
            eligible.push(index);
        }

        if eligible.is_empty() {
            debug!(
                remaining = self.remaining.len(),
                story_progress, "No eligible side event"
            );
            return None;
        }

        let pick = eligible[rng.gen_range(0..eligible.len())];
        let event = self.remaining.remove(pick);
        info!(
            remaining = self.remaining.len(),
            tag = event.tag.as_deref().unwrap_or(""),
            "Side event drawn"
        );
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always() -> DeckConfig {
        DeckConfig {
            interruption_chance: 1.0,
            ..Default::default()
        }
    }

    fn stats(relationship: i32, suspicion: i32) -> StatSnapshot {
        StatSnapshot::new(0, relationship, suspicion)
    }

    #[test]
    fn test_empty_deck_draws_nothing() {
        let mut deck = SideEventDeck::new(Vec::new(), always());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(deck.try_draw(&stats(50, 0), 0, &mut rng).is_none());
    }

    #[test]
    fn test_zero_interruption_chance() {
        let mut deck = SideEventDeck::new(
            vec![SideEvent::new("Skinny Pete calls")],
            DeckConfig {
                interruption_chance: 0.0,
                ..Default::default()
            },
        );
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(deck.try_draw(&stats(50, 0), 0, &mut rng).is_none());
        }
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_draw_consumes() {
        let mut deck = SideEventDeck::new(
            vec![SideEvent::new("A"), SideEvent::new("B"), SideEvent::new("C")],
            always(),
        );
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = Vec::new();
        while let Some(event) = deck.try_draw(&stats(50, 0), 0, &mut rng) {
            assert!(!seen.contains(&event.body), "{} drawn twice", event.body);
            seen.push(event.body);
        }
        assert_eq!(seen.len(), 3);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_eligibility_gates() {
        let mut event = SideEvent::new("DEA raid");
        event.min_suspicion = 40;
        event.max_scene = 5;
        event.min_relationship = 20;
        event.max_relationship = 60;

        assert!(SideEventDeck::is_eligible(&event, &stats(50, 40), 5));
        assert!(!SideEventDeck::is_eligible(&event, &stats(50, 39), 5));
        assert!(!SideEventDeck::is_eligible(&event, &stats(50, 40), 6));
        assert!(!SideEventDeck::is_eligible(&event, &stats(61, 40), 0));
        assert!(!SideEventDeck::is_eligible(&event, &stats(19, 40), 0));
    }

    #[test]
    fn test_ineligible_events_stay_in_deck() {
        let mut event = SideEvent::new("Late game only");
        event.min_suspicion = 90;
        let mut deck = SideEventDeck::new(vec![event], always());
        let mut rng = StdRng::seed_from_u64(5);

        assert!(deck.try_draw(&stats(50, 10), 0, &mut rng).is_none());
        assert_eq!(deck.len(), 1);
        assert!(deck.try_draw(&stats(50, 95), 0, &mut rng).is_some());
    }

    #[test]
    fn test_rare_with_zero_chance_never_drawn() {
        let mut rare = SideEvent::new("Tuco's cousins").with_tag("rare");
        rare.rare_chance = 0.0;
        let mut deck = SideEventDeck::new(vec![rare], always());
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..1_000 {
            assert!(deck.try_draw(&stats(50, 100), 0, &mut rng).is_none());
        }
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_rare_with_full_chance_is_drawn() {
        let mut rare = SideEvent::new("Gale's notebook").with_tag("rare");
        rare.rare_chance = 1.0;
        let mut deck = SideEventDeck::new(vec![rare], always());
        let mut rng = StdRng::seed_from_u64(8);
        assert!(deck.try_draw(&stats(50, 0), 0, &mut rng).is_some());
    }

    #[test]
    fn test_refill_restores_events() {
        let events = vec![SideEvent::new("A")];
        let mut deck = SideEventDeck::new(events.clone(), always());
        let mut rng = StdRng::seed_from_u64(3);
        deck.try_draw(&stats(50, 0), 0, &mut rng);
        assert!(deck.is_empty());

        deck.refill(&events);
        assert_eq!(deck.len(), 1);
    }
}
