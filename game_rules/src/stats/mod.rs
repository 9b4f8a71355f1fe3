//! The three persistent resources and the delta triple that moves them.

use serde::{Deserialize, Serialize};

/// The resources tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Profit,
    Relationship,
    Suspicion,
}

impl StatKind {
    /// All stats, in resolution order.
    pub const ALL: [StatKind; 3] = [StatKind::Profit, StatKind::Relationship, StatKind::Suspicion];

    /// Display label used by feedback text.
    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Profit => "Profit",
            StatKind::Relationship => "Relationships",
            StatKind::Suspicion => "Suspicion",
        }
    }
}

/// A change to all three stats at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatDelta {
    #[serde(default)]
    pub profit: i32,
    #[serde(default)]
    pub relationship: i32,
    #[serde(default)]
    pub suspicion: i32,
}

impl StatDelta {
    /// Create a delta from its three components.
    pub fn new(profit: i32, relationship: i32, suspicion: i32) -> Self {
        Self {
            profit,
            relationship,
            suspicion,
        }
    }

    /// Delta touching only profit.
    pub fn profit(amount: i32) -> Self {
        Self::new(amount, 0, 0)
    }

    /// Delta touching only relationship.
    pub fn relationship(amount: i32) -> Self {
        Self::new(0, amount, 0)
    }

    /// Delta touching only suspicion.
    pub fn suspicion(amount: i32) -> Self {
        Self::new(0, 0, amount)
    }

    /// Read one component.
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Profit => self.profit,
            StatKind::Relationship => self.relationship,
            StatKind::Suspicion => self.suspicion,
        }
    }

    /// Overwrite one component.
    pub fn set(&mut self, kind: StatKind, value: i32) {
        match kind {
            StatKind::Profit => self.profit = value,
            StatKind::Relationship => self.relationship = value,
            StatKind::Suspicion => self.suspicion = value,
        }
    }

    /// True when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.profit == 0 && self.relationship == 0 && self.suspicion == 0
    }
}

impl std::ops::Add for StatDelta {
    type Output = StatDelta;

    fn add(self, rhs: StatDelta) -> StatDelta {
        StatDelta::new(
            self.profit + rhs.profit,
            self.relationship + rhs.relationship,
            self.suspicion + rhs.suspicion,
        )
    }
}

impl std::fmt::Display for StatDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:+}|{:+}|{:+}]", self.profit, self.relationship, self.suspicion)
    }
}
