use serde::{Deserialize, Serialize};

use super::Level;

/// Label reported when a student holds no recorded position.
pub const NO_ROLE: &str = "No role";

const LEVEL_ONE: &[&str] = &["Completed 2 modules on leadership"];

const LEVEL_TWO: &[&str] = &[
    "Class Exco",
    "Junior SNW Leader",
    "Committee for SIP",
    "Committee for SL",
    "Junior CCA Exco",
    "NYAA Bronze",
];

const LEVEL_THREE: &[&str] = &[
    "Class Chairperson",
    "Class Vice-Chairperson",
    "Junior SC",
    "Junior PSB",
    "Junior ACE",
    "Junior DC",
    "Junior house captain",
    "Junior house vice-captain",
    "Senior Sports Leader",
    "Committee for school-wide events",
    "Chairperson for SIP",
    "Vice-Chairperson for SIP",
    "Chairperson for SL projects",
    "Vice-Chairperson for SL projects",
    "Junior CCA Chairperson",
    "Junior CCA Vice-Chairperson",
    "NYAA Silver",
];

const LEVEL_FOUR: &[&str] = &[
    "Senior SC",
    "Senior PSB",
    "Senior ACE",
    "Senior DC",
    "House Exco",
    "Senior House Captain",
    "Senior House Vice-Captain",
    "Senior CCA Exco",
    "Chairperson for school-wide events",
    "Vice-Chairperson for school-wide events",
];

const LEVEL_FIVE: &[&str] = &[
    "SC Exco",
    "PSB Exco",
    "ACE Exco",
    "DC Exco",
    "SC President",
    "SC Vice-President",
    "PSB President",
    "PSB Vice-President",
    "ACE President",
    "ACE Vice-President",
    "DC President",
    "DC Vice-President",
    "CCA Chairperson",
    "CCA Vice-Chairperson",
];

/// Role vocabularies ordered from level 1 to level 5. The tables are disjoint.
pub const LEVEL_TABLES: [(u8, &[&str]); 5] = [
    (1, LEVEL_ONE),
    (2, LEVEL_TWO),
    (3, LEVEL_THREE),
    (4, LEVEL_FOUR),
    (5, LEVEL_FIVE),
];

/// Map a role name onto its leadership level; unknown names sit at level 0.
pub fn classify_leadership_level(position_name: &str) -> Level {
    LEVEL_TABLES
        .iter()
        .find(|(_, names)| names.contains(&position_name))
        .map(|(level, _)| Level::of(*level))
        .unwrap_or(Level::ZERO)
}

/// Highest leadership standing across a student's positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLeadership {
    pub position: String,
    pub level: Level,
}

impl Default for CurrentLeadership {
    fn default() -> Self {
        Self {
            position: NO_ROLE.to_string(),
            level: Level::ZERO,
        }
    }
}

/// Pick the position with the highest derived level. Ties go to the position
/// encountered first in `names`.
pub fn current_leadership<'a, I>(names: I) -> CurrentLeadership
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, Level)> = None;
    for name in names {
        let level = classify_leadership_level(name);
        match best {
            Some((_, top)) if top >= level => {}
            _ => best = Some((name, level)),
        }
    }

    best.map(|(position, level)| CurrentLeadership {
        position: position.to_string(),
        level,
    })
    .unwrap_or_default()
}

/// Leadership boards used to group the role vocabulary for input pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadershipCategory {
    #[serde(rename = "ACE Board")]
    AceBoard,
    #[serde(rename = "PSB Board")]
    PsbBoard,
    #[serde(rename = "SC Board")]
    ScBoard,
    #[serde(rename = "DC Board")]
    DcBoard,
    #[serde(rename = "CCA Leaders")]
    CcaLeaders,
    #[serde(rename = "House/SNW")]
    HouseSnw,
    #[serde(rename = "Projects Board")]
    ProjectsBoard,
    #[serde(rename = "Others")]
    Others,
}

impl LeadershipCategory {
    pub const ALL: [LeadershipCategory; 8] = [
        LeadershipCategory::AceBoard,
        LeadershipCategory::PsbBoard,
        LeadershipCategory::ScBoard,
        LeadershipCategory::DcBoard,
        LeadershipCategory::CcaLeaders,
        LeadershipCategory::HouseSnw,
        LeadershipCategory::ProjectsBoard,
        LeadershipCategory::Others,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LeadershipCategory::AceBoard => "ACE Board",
            LeadershipCategory::PsbBoard => "PSB Board",
            LeadershipCategory::ScBoard => "SC Board",
            LeadershipCategory::DcBoard => "DC Board",
            LeadershipCategory::CcaLeaders => "CCA Leaders",
            LeadershipCategory::HouseSnw => "House/SNW",
            LeadershipCategory::ProjectsBoard => "Projects Board",
            LeadershipCategory::Others => "Others",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label.trim()))
    }

    pub const fn positions(self) -> &'static [&'static str] {
        match self {
            LeadershipCategory::AceBoard => &[
                "Junior ACE",
                "Senior ACE",
                "ACE Exco",
                "ACE President",
                "ACE Vice-President",
            ],
            LeadershipCategory::PsbBoard => &[
                "Junior PSB",
                "Senior PSB",
                "PSB Exco",
                "PSB President",
                "PSB Vice-President",
            ],
            LeadershipCategory::ScBoard => &[
                "Junior SC",
                "Senior SC",
                "SC Exco",
                "SC President",
                "SC Vice-President",
            ],
            LeadershipCategory::DcBoard => &[
                "Junior DC",
                "Senior DC",
                "DC Exco",
                "DC President",
                "DC Vice-President",
            ],
            LeadershipCategory::CcaLeaders => &[
                "Junior CCA Chairperson",
                "Junior CCA Vice-Chairperson",
                "Junior CCA Exco",
                "Senior CCA Exco",
                "CCA Chairperson",
                "CCA Vice-Chairperson",
            ],
            LeadershipCategory::HouseSnw => &[
                "Junior house captain",
                "Junior house vice-captain",
                "House Exco",
                "Senior House Captain",
                "Senior House Vice-Captain",
                "Junior SNW Leader",
                "Senior Sports Leader",
            ],
            LeadershipCategory::ProjectsBoard => &[
                "Committee for SIP",
                "Chairperson for SIP",
                "Vice-Chairperson for SIP",
                "Committee for school-wide events",
                "Chairperson for school-wide events",
                "Vice-Chairperson for school-wide events",
                "Chairperson for SL projects",
                "Vice-Chairperson for SL projects",
                "Committee for SL",
            ],
            LeadershipCategory::Others => &[
                "NYAA Bronze",
                "NYAA Silver",
                "Class Chairperson",
                "Class Vice-Chairperson",
                "Class Exco",
                "Completed 2 modules on leadership",
            ],
        }
    }
}

/// Role names offered for a category label; unknown labels yield nothing.
pub fn positions_for_category(label: &str) -> &'static [&'static str] {
    LeadershipCategory::from_label(label)
        .map(LeadershipCategory::positions)
        .unwrap_or(&[])
}
