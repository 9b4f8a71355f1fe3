//! Stat resolver - turns a choice's nominal deltas into actual deltas.
//!
//! Resolution runs in a fixed order so a seeded RNG reproduces the outcome:
//! 1. **Critical roll**: one uniform draw decides failure, success or none
//! 2. **Variance**: each non-zero delta is rolled around its nominal value
//!    (profit, then relationship, then suspicion)
//! 3. **Damping**: positive suspicion shrinks with the current relationship
//! 4. **Critical scaling**: success doubles gains, failure halves gains and
//!    amplifies positive suspicion
//!
//! Every fractional scaling rounds half away from zero.

mod variance;

pub use variance::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_positive, check_probability, RulesError};
use crate::stats::{StatDelta, StatKind};

/// Tuning for the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub critical_failure_chance: f64,
    pub critical_success_chance: f64,
    /// Applied to gains on success and to suspicion on failure.
    pub critical_multiplier: f64,
    /// Applied to gains on failure.
    pub failure_multiplier: f64,
    /// Fraction of positive suspicion removed at relationship 100.
    pub suspicion_damping: f64,
    pub profit_variance_divisor: u32,
    pub relationship_variance_divisor: u32,
    pub suspicion_variance_divisor: u32,
    /// When false, nominal deltas are used as-is before scaling.
    pub variance: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            critical_failure_chance: 0.05,
            critical_success_chance: 0.10,
            critical_multiplier: 2.0,
            failure_multiplier: 0.5,
            suspicion_damping: 0.3,
            profit_variance_divisor: 3,
            relationship_variance_divisor: 4,
            suspicion_variance_divisor: 4,
            variance: true,
        }
    }
}

impl ResolverConfig {
    /// A config with no randomness in the outcome: no variance, no criticals.
    pub fn deterministic() -> Self {
        Self {
            critical_failure_chance: 0.0,
            critical_success_chance: 0.0,
            variance: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        check_probability("critical_failure_chance", self.critical_failure_chance)?;
        check_probability("critical_success_chance", self.critical_success_chance)?;
        check_probability(
            "critical_failure_chance + critical_success_chance",
            self.critical_failure_chance + self.critical_success_chance,
        )?;
        check_positive("critical_multiplier", self.critical_multiplier)?;
        check_positive("failure_multiplier", self.failure_multiplier)?;
        check_probability("suspicion_damping", self.suspicion_damping)?;
        check_positive("profit_variance_divisor", self.profit_variance_divisor as f64)?;
        check_positive(
            "relationship_variance_divisor",
            self.relationship_variance_divisor as f64,
        )?;
        check_positive(
            "suspicion_variance_divisor",
            self.suspicion_variance_divisor as f64,
        )?;
        Ok(())
    }

    fn variance_divisor(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Profit => self.profit_variance_divisor,
            StatKind::Relationship => self.relationship_variance_divisor,
            StatKind::Suspicion => self.suspicion_variance_divisor,
        }
    }
}

/// Outcome of the per-resolution critical roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CriticalOutcome {
    #[default]
    None,
    Success,
    Failure,
}

/// What a choice actually did, next to what it promised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatChangeResult {
    pub actual: StatDelta,
    /// Always the pre-roll nominal deltas.
    pub expected: StatDelta,
    pub critical: CriticalOutcome,
}

impl StatChangeResult {
    /// True if any stat landed away from its nominal value.
    pub fn has_variance(&self) -> bool {
        self.actual != self.expected
    }
}

/// Converts nominal choice payloads into actual deltas.
#[derive(Debug, Clone, Default)]
pub struct StatResolver {
    config: ResolverConfig,
}

impl StatResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolver with default tuning.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a nominal delta against the current relationship value.
    ///
    /// Pure apart from RNG draws; applying the result is the caller's job.
    pub fn resolve<R: Rng>(
        &self,
        nominal: StatDelta,
        relationship: i32,
        rng: &mut R,
    ) -> StatChangeResult {
        let critical = self.roll_critical(rng);

        let mut actual = StatDelta::default();
        for kind in StatKind::ALL {
            let base = nominal.get(kind);
            if base == 0 {
                continue;
            }
            let range = if self.config.variance {
                StatRange::scaled(base, self.config.variance_divisor(kind))
            } else {
                StatRange::new(base, 0)
            };
            actual.set(kind, range.roll(rng));
        }

        actual.profit = self.scale_gain(actual.profit, critical);
        actual.relationship = self.scale_gain(actual.relationship, critical);
        actual.suspicion = self.scale_suspicion(actual.suspicion, relationship, critical);

        debug!(
            nominal = %nominal,
            actual = %actual,
            ?critical,
            "Resolved stat change"
        );

        StatChangeResult {
            actual,
            expected: nominal,
            critical,
        }
    }

    /// Relationship-based reduction of suspicion gains.
    pub fn damp_suspicion(&self, suspicion: i32, relationship: i32) -> i32 {
        if suspicion <= 0 {
            return suspicion;
        }
        let modifier = (relationship as f64 / 100.0).clamp(0.0, 1.0);
        scale(suspicion, 1.0 - modifier * self.config.suspicion_damping)
    }

    fn roll_critical<R: Rng>(&self, rng: &mut R) -> CriticalOutcome {
        let roll: f64 = rng.gen();
        if roll < self.config.critical_failure_chance {
            CriticalOutcome::Failure
        } else if roll < self.config.critical_failure_chance + self.config.critical_success_chance {
            CriticalOutcome::Success
        } else {
            CriticalOutcome::None
        }
    }

    fn scale_gain(&self, value: i32, critical: CriticalOutcome) -> i32 {
        if value <= 0 {
            return value;
        }
        match critical {
            CriticalOutcome::Success => scale(value, self.config.critical_multiplier),
            CriticalOutcome::Failure => scale(value, self.config.failure_multiplier),
            CriticalOutcome::None => value,
        }
    }

    fn scale_suspicion(&self, value: i32, relationship: i32, critical: CriticalOutcome) -> i32 {
        // Damping first, then failure amplification.
        let damped = self.damp_suspicion(value, relationship);
        if critical == CriticalOutcome::Failure && damped > 0 {
            scale(damped, self.config.critical_multiplier)
        } else {
            damped
        }
    }
}

/// Multiply and round half away from zero.
pub fn scale(value: i32, factor: f64) -> i32 {
    (value as f64 * factor).round() as i32
}
