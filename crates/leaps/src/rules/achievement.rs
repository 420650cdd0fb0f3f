use std::borrow::Cow;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Level;

const NATIONAL: &str = "National (SG/MOE/UG HQ)";
const SCHOOL_EXTERNAL: &str = "School/External Organisation";
const INTRA_SCHOOL: &str = "Intra-school";

/// Scope at which an achievement represented the student.
///
/// Labels outside the known vocabulary are kept verbatim so they round-trip
/// through storage, and contribute nothing to any level. Identity is the
/// label: `Unrecognized` holding a known label equals and classifies as that
/// variant, which is also what it reads back as.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Representation {
    National,
    SchoolExternal,
    IntraSchool,
    Unrecognized(String),
}

impl Representation {
    pub fn label(&self) -> &str {
        match self {
            Representation::National => NATIONAL,
            Representation::SchoolExternal => SCHOOL_EXTERNAL,
            Representation::IntraSchool => INTRA_SCHOOL,
            Representation::Unrecognized(raw) => raw,
        }
    }

    fn canonical(&self) -> Cow<'_, Representation> {
        match self {
            Representation::Unrecognized(raw) if is_known_label(raw) => {
                Cow::Owned(Representation::from(raw.clone()))
            }
            _ => Cow::Borrowed(self),
        }
    }
}

fn is_known_label(label: &str) -> bool {
    matches!(label, NATIONAL | SCHOOL_EXTERNAL | INTRA_SCHOOL)
}

impl PartialEq for Representation {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Eq for Representation {}

impl Hash for Representation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl From<String> for Representation {
    fn from(value: String) -> Self {
        match value.as_str() {
            NATIONAL => Representation::National,
            SCHOOL_EXTERNAL => Representation::SchoolExternal,
            INTRA_SCHOOL => Representation::IntraSchool,
            _ => Representation::Unrecognized(value),
        }
    }
}

impl From<Representation> for String {
    fn from(value: Representation) -> Self {
        match value {
            Representation::Unrecognized(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

/// Informational level of a single achievement. Not used by the domain level.
pub fn achievement_level(representation: &Representation) -> Level {
    match representation.canonical().as_ref() {
        Representation::National => Level::of(5),
        Representation::SchoolExternal => Level::of(3),
        Representation::IntraSchool => Level::of(1),
        Representation::Unrecognized(_) => Level::ZERO,
    }
}

/// Counts the achievement-domain rules are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AchievementTally {
    pub national: usize,
    pub national_years: BTreeSet<String>,
    pub external: usize,
    pub intra: usize,
}

impl AchievementTally {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a Representation, &'a str)>,
    {
        let mut tally = Self::default();
        for (representation, year) in entries {
            match representation.canonical().as_ref() {
                Representation::National => {
                    tally.national += 1;
                    tally.national_years.insert(year.to_string());
                }
                Representation::SchoolExternal => tally.external += 1,
                Representation::IntraSchool => tally.intra += 1,
                Representation::Unrecognized(_) => {}
            }
        }
        tally
    }

    /// Rules are priority ordered and overlap; the first match wins.
    pub fn level(&self) -> Level {
        if self.national >= 2 && self.national_years.len() >= 2 {
            Level::of(5)
        } else if self.national >= 1 && self.external >= 2 {
            Level::of(4)
        } else if self.external >= 2 {
            Level::of(3)
        } else if self.external >= 1 {
            Level::of(2)
        } else if self.intra >= 1 {
            Level::of(1)
        } else {
            Level::ZERO
        }
    }
}

/// Aggregate achievement-domain level over `(representation, year)` pairs.
pub fn classify_achievement_domain<'a, I>(entries: I) -> Level
where
    I: IntoIterator<Item = (&'a Representation, &'a str)>,
{
    AchievementTally::from_entries(entries).level()
}
