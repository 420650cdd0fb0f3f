use super::Level;

pub const MIN_ATTENDANCE_PERCENT: u32 = 0;
pub const MAX_ATTENDANCE_PERCENT: u32 = 100;
pub const MIN_YEARS_IN_CCA: u32 = 1;
pub const MAX_YEARS_IN_CCA: u32 = 10;

const ATTENDANCE_THRESHOLD: u32 = 75;

/// Rejected participation input. Nothing is written when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParticipationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Check a proposed `(attendance, years)` pair against the accepted ranges.
pub fn validate_participation(
    attendance_percent: u32,
    years: u32,
) -> Result<(), ParticipationError> {
    if !(MIN_ATTENDANCE_PERCENT..=MAX_ATTENDANCE_PERCENT).contains(&attendance_percent) {
        return Err(ParticipationError::OutOfRange {
            field: "attendance_percent",
            value: attendance_percent,
            min: MIN_ATTENDANCE_PERCENT,
            max: MAX_ATTENDANCE_PERCENT,
        });
    }
    if !(MIN_YEARS_IN_CCA..=MAX_YEARS_IN_CCA).contains(&years) {
        return Err(ParticipationError::OutOfRange {
            field: "years_in_cca",
            value: years,
            min: MIN_YEARS_IN_CCA,
            max: MAX_YEARS_IN_CCA,
        });
    }
    Ok(())
}

/// Attendance below 75% or fewer than two years yields 0; otherwise one level
/// per year beyond the first, capped at 5.
pub fn classify_participation_domain(attendance_percent: u32, years: u32) -> Level {
    if attendance_percent < ATTENDANCE_THRESHOLD || years < 2 {
        return Level::ZERO;
    }
    let level = (years - 1).min(u32::from(Level::MAX));
    Level::of(level as u8)
}
