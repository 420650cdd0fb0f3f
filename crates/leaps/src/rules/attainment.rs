use serde::{Deserialize, Serialize};

use super::{Domain, Level};

/// Qualitative rating derived from the four domain levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttainmentState {
    Fair,
    Good,
    Excellent,
}

impl AttainmentState {
    pub const fn points(self) -> u8 {
        match self {
            AttainmentState::Fair => 0,
            AttainmentState::Good => 1,
            AttainmentState::Excellent => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AttainmentState::Fair => "Fair",
            AttainmentState::Good => "Good",
            AttainmentState::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttainmentRating {
    pub state: AttainmentState,
    pub points: u8,
}

impl AttainmentRating {
    pub fn summary(&self) -> String {
        let suffix = if self.points == 1 { "" } else { "s" };
        format!("{}: {} point{}", self.state.label(), self.points, suffix)
    }
}

impl From<AttainmentState> for AttainmentRating {
    fn from(state: AttainmentState) -> Self {
        Self {
            state,
            points: state.points(),
        }
    }
}

/// Current level in each of the four domains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLevels {
    pub leadership: Level,
    pub achievement: Level,
    pub participation: Level,
    pub service: Level,
}

impl DomainLevels {
    pub fn get(&self, domain: Domain) -> Level {
        match domain {
            Domain::Leadership => self.leadership,
            Domain::Achievement => self.achievement,
            Domain::Participation => self.participation,
            Domain::Service => self.service,
        }
    }

    fn as_array(&self) -> [Level; 4] {
        [
            self.leadership,
            self.achievement,
            self.participation,
            self.service,
        ]
    }

    fn count_at_least(&self, threshold: u8) -> usize {
        self.as_array()
            .iter()
            .filter(|level| level.value() >= threshold)
            .count()
    }

    pub fn distribution(&self) -> LevelDistribution {
        LevelDistribution::from_levels(self.as_array())
    }
}

/// Rate the four domain levels. Rules are checked in order; first match wins.
pub fn compute_attainment(levels: &DomainLevels) -> AttainmentRating {
    let at_least_1 = levels.count_at_least(1);
    let at_least_2 = levels.count_at_least(2);
    let at_least_3 = levels.count_at_least(3);
    let at_least_4 = levels.count_at_least(4);

    let state = if at_least_3 >= 4 && at_least_4 >= 1 {
        AttainmentState::Excellent
    } else if at_least_1 == 4
        && (at_least_2 >= 3 || (at_least_2 >= 1 && at_least_3 >= 1) || at_least_4 >= 1)
    {
        AttainmentState::Good
    } else {
        AttainmentState::Fair
    };

    state.into()
}

/// How many domains currently sit at each level from 1 to 5. Level 0 is not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub level_one: u8,
    pub level_two: u8,
    pub level_three: u8,
    pub level_four: u8,
    pub level_five: u8,
}

impl LevelDistribution {
    pub fn from_levels<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = Level>,
    {
        let mut distribution = Self::default();
        for level in levels {
            match level.value() {
                1 => distribution.level_one += 1,
                2 => distribution.level_two += 1,
                3 => distribution.level_three += 1,
                4 => distribution.level_four += 1,
                5 => distribution.level_five += 1,
                _ => {}
            }
        }
        distribution
    }
}
