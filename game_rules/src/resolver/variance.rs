//! Variance rolls around a nominal value.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A nominal value with a symmetric integer spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub base: i32,
    pub variance: i32,
}

impl StatRange {
    pub fn new(base: i32, variance: i32) -> Self {
        Self {
            base,
            variance: variance.saturating_abs(),
        }
    }

    /// Spread derived from the nominal value: `|base| / divisor`, at least 1
    /// for any non-zero base.
    pub fn scaled(base: i32, divisor: u32) -> Self {
        if base == 0 {
            return Self::new(0, 0);
        }
        let spread = (base.unsigned_abs() / divisor.max(1)).max(1);
        Self::new(base, i32::try_from(spread).unwrap_or(i32::MAX))
    }

    /// Draw `base + uniform(-variance..=variance)`.
    ///
    /// Draws nothing from the RNG when there is no spread.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        if self.variance == 0 {
            return self.base;
        }
        self.base
            .saturating_add(rng.gen_range(-self.variance..=self.variance))
    }
}
