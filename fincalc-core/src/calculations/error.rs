use thiserror::Error;

use crate::calculations::brackets::BracketError;
use crate::models::Country;

/// Reasons a tax computation cannot produce a result.
///
/// These are configuration problems, not bad user input: the tables for the
/// selected jurisdiction are missing or do not make sense.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxCalculationError {
    #[error("no tax tables loaded for {0}")]
    MissingProfile(Country),

    #[error("{country} has no tax table for region '{region}'")]
    UnsupportedRegion { country: Country, region: String },

    #[error("malformed schedule {schedule}: {source}")]
    MalformedSchedule {
        schedule: String,
        #[source]
        source: BracketError,
    },
}

impl TaxCalculationError {
    pub(crate) fn malformed(
        schedule: impl Into<String>,
        source: BracketError,
    ) -> Self {
        Self::MalformedSchedule {
            schedule: schedule.into(),
            source,
        }
    }
}

/// Reasons a projection cannot produce a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("projection horizon of {years} years exceeds the {max}-year limit")]
    HorizonTooLong { years: u32, max: u32 },

    #[error("balance left the representable range in month {month}")]
    Overflow { month: u32 },
}
