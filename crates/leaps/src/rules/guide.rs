use serde::Serialize;

use super::{Domain, Level};

#[derive(Debug, Clone, Serialize)]
pub struct LevelDescription {
    pub level: Level,
    pub description: &'static str,
}

/// What each reachable level of a domain means to a student.
#[derive(Debug, Clone, Serialize)]
pub struct DomainGuide {
    pub domain: Domain,
    pub summary: &'static str,
    pub levels: Vec<LevelDescription>,
}

impl DomainGuide {
    pub fn describe(&self, level: Level) -> Option<&'static str> {
        self.levels
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.description)
    }
}

const LEADERSHIP: [&str; 6] = [
    "No roles",
    "Completed 2 leadership modules of at least 3 hours each",
    "Class committee, committee for an approved student-initiated project, or NYAA Bronze",
    "Class chairperson, lower secondary board or house leader, lower secondary CCA exco, \
     exco for school-wide events, project chairperson, or NYAA Silver/Gold",
    "Upper secondary board leader, house exco or captain, chairperson of school-wide events, \
     or upper secondary CCA exco",
    "Board exco or president, house leader exco, or CCA chairperson/vice-chairperson",
];

const ACHIEVEMENT: [&str; 6] = [
    "Not enough achievements",
    "Represented class or CCA at an intra-school event",
    "Represented the school or an external organisation once",
    "Represented the school or an external organisation at least twice",
    "Represented nationally once and the school or an external organisation at least twice",
    "Represented nationally in at least two different years",
];

const SERVICE: [&str; 5] = [
    "Fewer than 24 service hours",
    "24 to 30 service hours",
    "31 to 36 service hours, or one VIA project",
    "More than 36 service hours, two VIA projects, or 24 hours with one VIA project",
    "24 service hours and two VIA projects",
];

const PARTICIPATION: [&str; 6] = [
    "Fewer than 2 years in a CCA or attendance below 75%",
    "2 years in a CCA with at least 75% attendance",
    "3 years in a CCA with at least 75% attendance",
    "4 years in a CCA with at least 75% attendance",
    "5 years in a CCA with at least 75% attendance",
    "6 or more years in a CCA with at least 75% attendance",
];

fn guide(domain: Domain, summary: &'static str, texts: &[&'static str]) -> DomainGuide {
    let levels = texts
        .iter()
        .copied()
        .zip(0u8..)
        .map(|(description, level)| LevelDescription {
            level: Level::of(level),
            description,
        })
        .collect();

    DomainGuide {
        domain,
        summary,
        levels,
    }
}

/// Guides for all four domains, in display order.
pub fn level_guide() -> Vec<DomainGuide> {
    Domain::ALL
        .into_iter()
        .map(|domain| match domain {
            Domain::Leadership => guide(
                domain,
                "Leadership roles held in boards, CCAs, classes, projects, or NYAA.",
                &LEADERSHIP,
            ),
            Domain::Achievement => guide(
                domain,
                "Representation of the class, school, or nation outside the classroom.",
                &ACHIEVEMENT,
            ),
            Domain::Service => guide(
                domain,
                "Service hours and Values-in-Action projects for the school or community.",
                &SERVICE,
            ),
            Domain::Participation => guide(
                domain,
                "Sustained CCA membership with regular attendance.",
                &PARTICIPATION,
            ),
        })
        .collect()
}
