//! Level-of-attainment rules engine.
//!
//! Every classifier here is a pure function over already-materialized values:
//! no storage, no session, no clock. Callers recompute on every read.

mod achievement;
mod attainment;
mod guide;
mod leadership;
mod participation;
mod service;

pub use achievement::{
    achievement_level, classify_achievement_domain, AchievementTally, Representation,
};
pub use attainment::{
    compute_attainment, AttainmentRating, AttainmentState, DomainLevels, LevelDistribution,
};
pub use guide::{level_guide, DomainGuide, LevelDescription};
pub use leadership::{
    classify_leadership_level, current_leadership, positions_for_category, CurrentLeadership,
    LeadershipCategory, LEVEL_TABLES, NO_ROLE,
};
pub use participation::{
    classify_participation_domain, validate_participation, ParticipationError,
    MAX_ATTENDANCE_PERCENT, MAX_YEARS_IN_CCA, MIN_ATTENDANCE_PERCENT, MIN_YEARS_IN_CCA,
};
pub use service::{classify_service_domain, ServiceTally, ServiceType};

use serde::{Deserialize, Serialize};

/// Ordinal standing within a domain, 0 through 5.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 5;
    pub const ZERO: Level = Level(0);

    /// Build a level, rejecting anything above [`Level::MAX`].
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if value > Self::MAX {
            return Err(LevelError::AboveMaximum { value });
        }
        Ok(Self(value))
    }

    pub(crate) const fn of(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level {value} exceeds the maximum of 5")]
    AboveMaximum { value: u8 },
}

/// The four tracked activity domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Leadership,
    Achievement,
    Service,
    Participation,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Leadership,
        Domain::Achievement,
        Domain::Service,
        Domain::Participation,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Domain::Leadership => "Leadership",
            Domain::Achievement => "Achievement",
            Domain::Service => "Service",
            Domain::Participation => "Participation",
        }
    }

    /// Highest level the domain's classifier can produce.
    pub const fn max_level(self) -> Level {
        match self {
            Domain::Service => Level(4),
            _ => Level(Level::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_rejects_values_above_five() {
        assert_eq!(Level::new(5).map(Level::value), Ok(5));
        assert_eq!(Level::new(6), Err(LevelError::AboveMaximum { value: 6 }));
    }

    #[test]
    fn level_deserializes_from_plain_integers() {
        let level: Level = serde_json::from_str("3").expect("level parses");
        assert_eq!(level.value(), 3);
        assert!(serde_json::from_str::<Level>("9").is_err());
        assert_eq!(serde_json::to_string(&level).expect("serializes"), "3");
    }

    #[test]
    fn service_caps_below_other_domains() {
        assert_eq!(Domain::Service.max_level().value(), 4);
        assert_eq!(Domain::Leadership.max_level().value(), 5);
    }
}
