//! Stat ledger - the clamped resources of the current playthrough.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RulesError;
use crate::stats::StatDelta;

/// Starting values and bounds for the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub starting_profit: i32,
    /// Non-zero so early relationship-gated content is reachable.
    pub starting_relationship: i32,
    pub starting_suspicion: i32,
    /// Soft upper bound on profit.
    pub max_profit: i32,
    pub max_relationship: i32,
    /// Reaching this value busts the player.
    pub max_suspicion: i32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_profit: 0,
            starting_relationship: 50,
            starting_suspicion: 0,
            max_profit: 999,
            max_relationship: 100,
            max_suspicion: 100,
        }
    }
}

impl LedgerConfig {
    /// Reject bounds that would make clamping meaningless.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (name, max) in [
            ("max_profit", self.max_profit),
            ("max_relationship", self.max_relationship),
            ("max_suspicion", self.max_suspicion),
        ] {
            if max <= 0 {
                return Err(RulesError::InvertedBounds(format!("{} = {}", name, max)));
            }
        }
        Ok(())
    }
}

/// Whether the playthrough can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LedgerState {
    #[default]
    Active,
    /// Suspicion saturated. Terminal until reset.
    Busted,
}

/// Read-only copy of the three stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub profit: i32,
    pub relationship: i32,
    pub suspicion: i32,
}

impl StatSnapshot {
    pub fn new(profit: i32, relationship: i32, suspicion: i32) -> Self {
        Self {
            profit,
            relationship,
            suspicion,
        }
    }
}

/// The three resources plus loss detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLedger {
    profit: i32,
    relationship: i32,
    suspicion: i32,
    state: LedgerState,
    config: LedgerConfig,
}

impl Default for StatLedger {
    fn default() -> Self {
        Self::with_config(LedgerConfig::default())
    }
}

impl StatLedger {
    /// Create a ledger with the default starting snapshot (0, 50, 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with custom bounds and starting values.
    pub fn with_config(config: LedgerConfig) -> Self {
        let mut ledger = Self {
            profit: 0,
            relationship: 0,
            suspicion: 0,
            state: LedgerState::Active,
            config,
        };
        ledger.reset();
        ledger
    }

    pub fn profit(&self) -> i32 {
        self.profit
    }

    pub fn relationship(&self) -> i32 {
        self.relationship
    }

    pub fn suspicion(&self) -> i32 {
        self.suspicion
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn is_busted(&self) -> bool {
        self.state == LedgerState::Busted
    }

    pub fn max_suspicion(&self) -> i32 {
        self.config.max_suspicion
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Copy out the current stats.
    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot::new(self.profit, self.relationship, self.suspicion)
    }

    /// Add a delta, clamp every stat, and detect a bust.
    ///
    /// Returns the change that actually landed after clamping. Applying to a
    /// busted ledger still updates the stats; the caller is responsible for
    /// routing to the ending.
    pub fn apply(&mut self, delta: StatDelta) -> StatDelta {
        let before = self.snapshot();

        self.profit = clamp_add(self.profit, delta.profit, 0, self.config.max_profit);
        self.relationship = clamp_add(
            self.relationship,
            delta.relationship,
            0,
            self.config.max_relationship,
        );
        self.suspicion = clamp_add(self.suspicion, delta.suspicion, 0, self.config.max_suspicion);

        let applied = StatDelta::new(
            self.profit - before.profit,
            self.relationship - before.relationship,
            self.suspicion - before.suspicion,
        );
        debug!(requested = %delta, %applied, "Applied stat delta");

        if self.state == LedgerState::Active && self.suspicion >= self.config.max_suspicion {
            self.state = LedgerState::Busted;
            info!(suspicion = self.suspicion, "Suspicion maxed out, player busted");
        }

        applied
    }

    /// Return to the starting snapshot and the Active state.
    pub fn reset(&mut self) {
        self.profit = self.config.starting_profit.clamp(0, self.config.max_profit);
        self.relationship = self
            .config
            .starting_relationship
            .clamp(0, self.config.max_relationship);
        self.suspicion = self
            .config
            .starting_suspicion
            .clamp(0, self.config.max_suspicion);
        self.state = if self.suspicion >= self.config.max_suspicion {
            LedgerState::Busted
        } else {
            LedgerState::Active
        };
    }
}

fn clamp_add(current: i32, delta: i32, min: i32, max: i32) -> i32 {
    current.saturating_add(delta).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot() {
        let ledger = StatLedger::new();
        assert_eq!(ledger.snapshot(), StatSnapshot::new(0, 50, 0));
        assert_eq!(ledger.state(), LedgerState::Active);
    }

    #[test]
    fn test_apply_clamps_every_stat() {
        let mut ledger = StatLedger::new();

        let applied = ledger.apply(StatDelta::new(-40, 80, -5));
        assert_eq!(ledger.snapshot(), StatSnapshot::new(0, 100, 0));
        assert_eq!(applied, StatDelta::new(0, 50, 0));

        ledger.apply(StatDelta::new(5000, -500, 0));
        assert_eq!(ledger.profit(), 999);
        assert_eq!(ledger.relationship(), 0);
    }

    #[test]
    fn test_bust_on_max_suspicion() {
        let mut ledger = StatLedger::new();
        ledger.apply(StatDelta::suspicion(95));
        assert!(!ledger.is_busted());

        let applied = ledger.apply(StatDelta::suspicion(30));
        assert_eq!(applied.suspicion, 5);
        assert_eq!(ledger.suspicion(), 100);
        assert!(ledger.is_busted());

        // Still computed while busted.
        ledger.apply(StatDelta::profit(10));
        assert_eq!(ledger.profit(), 10);
        assert!(ledger.is_busted());
    }

    #[test]
    fn test_reset() {
        let mut ledger = StatLedger::new();
        ledger.apply(StatDelta::new(30, -20, 100));
        assert!(ledger.is_busted());

        ledger.reset();
        assert_eq!(ledger.snapshot(), StatSnapshot::new(0, 50, 0));
        assert_eq!(ledger.state(), LedgerState::Active);
    }

    #[test]
    fn test_custom_max_suspicion() {
        let mut ledger = StatLedger::with_config(LedgerConfig {
            max_suspicion: 40,
            ..Default::default()
        });
        ledger.apply(StatDelta::suspicion(60));
        assert_eq!(ledger.suspicion(), 40);
        assert!(ledger.is_busted());
    }

    #[test]
    fn test_config_validation() {
        assert!(LedgerConfig::default().validate().is_ok());
        let bad = LedgerConfig {
            max_suspicion: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
