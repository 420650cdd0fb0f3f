use serde::{Deserialize, Serialize};

use super::Level;

const OTHERS: &str = "Others";
const VIA: &str = "VIA for school/community";
const SIP: &str = "SIP for school/community";

/// Project tag on a service event. Unknown labels are read as `Others`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ServiceType {
    #[default]
    Others,
    Via,
    Sip,
}

impl ServiceType {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Others => OTHERS,
            ServiceType::Via => VIA,
            ServiceType::Sip => SIP,
        }
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            VIA => ServiceType::Via,
            SIP => ServiceType::Sip,
            _ => ServiceType::Others,
        }
    }
}

impl From<ServiceType> for &'static str {
    fn from(value: ServiceType) -> Self {
        value.label()
    }
}

/// Aggregates over every service event a student logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTally {
    pub total_hours: u32,
    pub via_count: u32,
    pub sip_count: u32,
}

impl ServiceTally {
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = (u32, ServiceType)>,
    {
        events
            .into_iter()
            .fold(Self::default(), |mut tally, (hours, kind)| {
                tally.total_hours = tally.total_hours.saturating_add(hours);
                match kind {
                    ServiceType::Via => tally.via_count += 1,
                    ServiceType::Sip => tally.sip_count += 1,
                    ServiceType::Others => {}
                }
                tally
            })
    }

    pub fn level(&self) -> Level {
        classify_service_domain(self.total_hours, self.via_count, self.sip_count)
    }
}

/// Service-domain level, 0 through 4.
///
/// Branches overlap and are evaluated top to bottom. Any SIP project together
/// with a VIA project and 24+ hours lands on level 1, below what the same hours
/// earn without the SIP; that branch is kept as published.
pub fn classify_service_domain(total_hours: u32, via_count: u32, sip_count: u32) -> Level {
    let hours = total_hours;
    let no_sip = sip_count < 1;

    if hours < 24 && via_count == 0 && no_sip {
        Level::ZERO
    } else if (24..=30).contains(&hours) && via_count == 0 && no_sip {
        Level::of(1)
    } else if (31..=36).contains(&hours) && via_count == 0 && no_sip {
        Level::of(2)
    } else if via_count == 1 && hours <= 24 && no_sip {
        Level::of(2)
    } else if hours > 36 && via_count == 0 && no_sip {
        Level::of(3)
    } else if via_count >= 2 && hours < 24 && no_sip {
        Level::of(3)
    } else if hours >= 24 && via_count == 1 && no_sip {
        Level::of(3)
    } else if hours >= 24 && via_count >= 2 && no_sip {
        Level::of(4)
    } else if hours >= 24 && sip_count >= 1 && via_count >= 1 {
        Level::of(1)
    } else {
        Level::ZERO
    }
}
