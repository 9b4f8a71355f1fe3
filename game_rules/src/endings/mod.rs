//! Ending classification from the final stat snapshot.

use serde::{Deserialize, Serialize};

use crate::ledger::StatSnapshot;

/// The six ways a playthrough can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// Suspicion saturated.
    Captured,
    /// High profit and good relationships.
    Kingpin,
    /// Low profit, high relationships.
    FamilyMan,
    /// High profit, poor relationships.
    Fugitive,
    /// Relationships at rock bottom.
    Betrayed,
    Survivor,
}

impl Ending {
    pub const ALL: [Ending; 6] = [
        Ending::Captured,
        Ending::Kingpin,
        Ending::FamilyMan,
        Ending::Fugitive,
        Ending::Betrayed,
        Ending::Survivor,
    ];

    /// Classify a final snapshot. First match wins; the ranges overlap, so
    /// the order of the checks is part of the rule.
    pub fn classify(stats: StatSnapshot, max_suspicion: i32) -> Ending {
        let StatSnapshot {
            profit,
            relationship,
            suspicion,
        } = stats;

        if suspicion >= max_suspicion {
            Ending::Captured
        } else if profit >= 70 && relationship >= 60 {
            Ending::Kingpin
        } else if profit < 30 && relationship >= 70 {
            Ending::FamilyMan
        } else if profit >= 60 && relationship < 30 {
            Ending::Fugitive
        } else if relationship < 20 {
            Ending::Betrayed
        } else {
            Ending::Survivor
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Ending::Captured => "CAPTURED",
            Ending::Kingpin => "THE KINGPIN",
            Ending::FamilyMan => "THE FAMILY MAN",
            Ending::Fugitive => "THE FUGITIVE",
            Ending::Betrayed => "BETRAYED",
            Ending::Survivor => "THE SURVIVOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Ending::Captured => "The DEA finally caught up with Heisenberg.",
            Ending::Kingpin => "You built an empire and kept your allies close.",
            Ending::FamilyMan => "You chose family over fortune.",
            Ending::Fugitive => "Rich but alone, you vanished into the night.",
            Ending::Betrayed => "Your partners turned on you.",
            Ending::Survivor => "You made it through, barely.",
        }
    }

    /// Closing text with the final stats filled in.
    pub fn epilogue(&self, stats: StatSnapshot) -> String {
        let standing = RelationshipStanding::from_value(stats.relationship);
        match self {
            Ending::Captured => format!(
                "With {}% suspicion, it was only a matter of time. Your ${}k fortune is seized. \
                 Your {} relationships couldn't save you.",
                stats.suspicion, stats.profit, standing
            ),
            Ending::Kingpin => format!(
                "With ${}k in profit and the loyalty of your partners, you rule the Southwest. \
                 Your {} relationships kept the operation running smoothly.",
                stats.profit, standing
            ),
            Ending::FamilyMan => format!(
                "With only ${}k saved, money remains tight. But your family stands by you. \
                 Your {} relationships mean everything.",
                stats.profit, standing
            ),
            Ending::Fugitive => format!(
                "With ${}k in cash hidden away, you have the money but no one to share it with. \
                 Your {} relationships meant burning every bridge.",
                stats.profit, standing
            ),
            Ending::Betrayed => format!(
                "With relationships at rock bottom ({}%), it was inevitable. \
                 Your ${}k means nothing when everyone wants you dead.",
                stats.relationship, stats.profit
            ),
            Ending::Survivor => format!(
                "With ${}k saved and {} relationships, you survived. \
                 The {}% suspicion level kept you on edge.",
                stats.profit, standing, stats.suspicion
            ),
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Descriptive band for a relationship value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipStanding {
    TrustedPartner,
    ReliableAssociate,
    BusinessPartner,
    UneasyAlliance,
    Hostile,
}

impl RelationshipStanding {
    pub fn from_value(relationship: i32) -> Self {
        match relationship {
            r if r >= 80 => RelationshipStanding::TrustedPartner,
            r if r >= 60 => RelationshipStanding::ReliableAssociate,
            r if r >= 40 => RelationshipStanding::BusinessPartner,
            r if r >= 20 => RelationshipStanding::UneasyAlliance,
            _ => RelationshipStanding::Hostile,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelationshipStanding::TrustedPartner => "Trusted Partner",
            RelationshipStanding::ReliableAssociate => "Reliable Associate",
            RelationshipStanding::BusinessPartner => "Business Partner",
            RelationshipStanding::UneasyAlliance => "Uneasy Alliance",
            RelationshipStanding::Hostile => "Hostile",
        }
    }
}

impl std::fmt::Display for RelationshipStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
