//! Relationship Event Monitor - one-shot bonuses and penalties triggered by
//! the relationship stat crossing a threshold.

use game_rules::{check_probability, RulesError, StatDelta, StatLedger};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Which side of the threshold triggers an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDirection {
    /// Fires at `relationship >= threshold`.
    AtOrAbove,
    /// Fires at `relationship <= threshold`.
    AtOrBelow,
}

/// A one-shot relationship event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEvent {
    pub name: String,
    pub threshold: i32,
    pub direction: TriggerDirection,
    pub message: String,
    #[serde(default)]
    pub reward: StatDelta,
}

impl RelationshipEvent {
    pub fn new(
        name: impl Into<String>,
        threshold: i32,
        direction: TriggerDirection,
        message: impl Into<String>,
        reward: StatDelta,
    ) -> Self {
        Self {
            name: name.into(),
            threshold,
            direction,
            message: message.into(),
            reward,
        }
    }

    pub fn is_triggered_by(&self, relationship: i32) -> bool {
        match self.direction {
            TriggerDirection::AtOrAbove => relationship >= self.threshold,
            TriggerDirection::AtOrBelow => relationship <= self.threshold,
        }
    }

    /// The built-in table.
    pub fn default_table() -> Vec<RelationshipEvent> {
        vec![
            RelationshipEvent::new(
                "jesse_loyalty",
                75,
                TriggerDirection::AtOrAbove,
                "Jesse's loyalty reduces heat from the DEA!",
                StatDelta::suspicion(-10),
            ),
            RelationshipEvent::new(
                "partner_bonus",
                80,
                TriggerDirection::AtOrAbove,
                "Your trusted partners bring in extra profit!",
                StatDelta::profit(20),
            ),
            RelationshipEvent::new(
                "betrayal_risk",
                20,
                TriggerDirection::AtOrBelow,
                "Someone ratted you out to the DEA!",
                StatDelta::suspicion(15),
            ),
            RelationshipEvent::new(
                "partner_abandonment",
                15,
                TriggerDirection::AtOrBelow,
                "Your partners are abandoning the operation!",
                StatDelta::profit(-25),
            ),
        ]
    }
}

/// Tuning for the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Chance an armed event actually fires on a given check.
    pub trigger_chance: f64,
    pub events: Vec<RelationshipEvent>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            trigger_chance: 0.5,
            events: RelationshipEvent::default_table(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), RulesError> {
        check_probability("trigger_chance", self.trigger_chance)
    }
}

/// Payload for the presentation layer when an event fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipNotice {
    pub name: String,
    pub message: String,
    /// What the ledger actually changed by, after clamping.
    pub applied: StatDelta,
    /// High-relationship events are good news.
    pub favorable: bool,
}

/// Watches the relationship stat and fires each event at most once per
/// playthrough.
#[derive(Debug, Clone, Default)]
pub struct RelationshipMonitor {
    config: MonitorConfig,
    fired: HashSet<String>,
}

impl RelationshipMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            fired: HashSet::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RelationshipEvent] {
        &self.config.events
    }

    pub fn has_fired(&self, name: &str) -> bool {
        self.fired.contains(name)
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    /// Check every unfired event against the ledger and apply those that fire.
    pub fn check<R: Rng>(&mut self, ledger: &mut StatLedger, rng: &mut R) -> Vec<RelationshipNotice> {
        let mut notices = Vec::new();
        let chance = self.config.trigger_chance.clamp(0.0, 1.0);

        for event in &self.config.events {
            if self.fired.contains(&event.name) {
                continue;
            }
            // Later events see the ledger as changed by earlier ones.
            if !event.is_triggered_by(ledger.relationship()) {
                continue;
            }
            if !rng.gen_bool(chance) {
                debug!(event = %event.name, "Relationship event armed but did not fire");
                continue;
            }

            self.fired.insert(event.name.clone());
            let applied = ledger.apply(event.reward);
            info!(event = %event.name, %applied, "Relationship event fired");

            notices.push(RelationshipNotice {
                name: event.name.clone(),
                message: event.message.clone(),
                applied,
                favorable: event.direction == TriggerDirection::AtOrAbove,
            });
        }

        notices
    }

    /// Forget which events have fired.
    pub fn reset(&mut self) {
        self.fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn certain() -> RelationshipMonitor {
        RelationshipMonitor::new(MonitorConfig {
            trigger_chance: 1.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_high_events_fire_once() {
        let mut monitor = certain();
        let mut ledger = StatLedger::new();
        ledger.apply(StatDelta::new(0, 35, 30));
        let mut rng = StdRng::seed_from_u64(1);

        let notices = monitor.check(&mut ledger, &mut rng);
        let names: Vec<_> = notices.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["jesse_loyalty", "partner_bonus"]);
        assert!(notices.iter().all(|n| n.favorable));
        assert_eq!(ledger.suspicion(), 20);
        assert_eq!(ledger.profit(), 20);

        // Never again this playthrough.
        assert!(monitor.check(&mut ledger, &mut rng).is_empty());
        assert_eq!(ledger.profit(), 20);
    }

    #[test]
    fn test_low_events() {
        let mut monitor = certain();
        let mut ledger = StatLedger::new();
        ledger.apply(StatDelta::new(10, -40, 0));
        let mut rng = StdRng::seed_from_u64(1);

        let notices = monitor.check(&mut ledger, &mut rng);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| !n.favorable));
        assert_eq!(ledger.suspicion(), 15);
        // Profit clamps at zero, the notice reports what really landed.
        assert_eq!(ledger.profit(), 0);
        assert_eq!(notices[1].applied, StatDelta::profit(-10));
    }

    #[test]
    fn test_nothing_in_middle_band() {
        let mut monitor = certain();
        let mut ledger = StatLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(monitor.check(&mut ledger, &mut rng).is_empty());
        assert_eq!(monitor.fired_count(), 0);
    }

    #[test]
    fn test_zero_chance_never_fires() {
        let mut monitor = RelationshipMonitor::new(MonitorConfig {
            trigger_chance: 0.0,
            ..Default::default()
        });
        let mut ledger = StatLedger::new();
        ledger.apply(StatDelta::relationship(50));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(monitor.check(&mut ledger, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_reset_rearms() {
        let mut monitor = certain();
        let mut ledger = StatLedger::new();
        // 18: inside betrayal_risk only.
        ledger.apply(StatDelta::relationship(-32));
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(monitor.check(&mut ledger, &mut rng).len(), 1);
        assert!(monitor.has_fired("betrayal_risk"));

        monitor.reset();
        assert!(!monitor.has_fired("betrayal_risk"));
        assert_eq!(monitor.check(&mut ledger, &mut rng).len(), 1);
    }

    #[test]
    fn test_trigger_direction() {
        let high = RelationshipEvent::new("h", 75, TriggerDirection::AtOrAbove, "", StatDelta::default());
        assert!(high.is_triggered_by(75));
        assert!(!high.is_triggered_by(74));

        let low = RelationshipEvent::new("l", 20, TriggerDirection::AtOrBelow, "", StatDelta::default());
        assert!(low.is_triggered_by(20));
        assert!(!low.is_triggered_by(21));
    }
}
