use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CanadaProfile, Country, IndiaProfile, TaxBracket, UsaProfile};
use crate::calculations::brackets::{BracketError, validate_brackets};

/// A schedule in [`TaxTables`] failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("schedule {schedule}: {source}")]
pub struct ScheduleError {
    pub schedule: String,
    #[source]
    pub source: BracketError,
}

/// Every jurisdiction's rate tables for one configuration.
///
/// A country whose profile is `None` has no tables loaded; calculations for
/// it produce an absent result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxTables {
    #[serde(default)]
    pub india: Option<IndiaProfile>,
    #[serde(default)]
    pub canada: Option<CanadaProfile>,
    #[serde(default)]
    pub usa: Option<UsaProfile>,
}

impl TaxTables {
    pub fn has_profile(
        &self,
        country: Country,
    ) -> bool {
        match country {
            Country::India => self.india.is_some(),
            Country::Canada => self.canada.is_some(),
            Country::UnitedStates => self.usa.is_some(),
        }
    }

    /// Supported region codes for `country`, sorted.
    ///
    /// India has no regional tax and always returns an empty list.
    pub fn regions(
        &self,
        country: Country,
    ) -> Vec<String> {
        match country {
            Country::India => Vec::new(),
            Country::Canada => self
                .canada
                .as_ref()
                .map(|p| p.provincial.keys().cloned().collect())
                .unwrap_or_default(),
            Country::UnitedStates => self
                .usa
                .as_ref()
                .map(|p| p.state.keys().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Every bracket schedule with a stable label such as `US:federal:MFJ`.
    pub fn schedules(&self) -> Vec<(String, &[TaxBracket])> {
        let mut out: Vec<(String, &[TaxBracket])> = Vec::new();

        if let Some(india) = &self.india {
            out.push(("IN:old".to_string(), india.old_regime.brackets.as_slice()));
            out.push(("IN:new".to_string(), india.new_regime.brackets.as_slice()));
        }

        if let Some(canada) = &self.canada {
            out.push(("CA:federal".to_string(), canada.federal.as_slice()));
            for (province, brackets) in &canada.provincial {
                out.push((format!("CA:provincial:{province}"), brackets.as_slice()));
            }
        }

        if let Some(usa) = &self.usa {
            for (status, brackets) in usa.federal.iter() {
                out.push((format!("US:federal:{}", status.as_str()), brackets.as_slice()));
            }
            for (status, brackets) in usa.long_term_capital_gains.iter() {
                out.push((format!("US:ltcg:{}", status.as_str()), brackets.as_slice()));
            }
            for (state, brackets) in &usa.state {
                out.push((format!("US:state:{state}"), brackets.as_slice()));
            }
        }

        out
    }

    /// Validates every schedule, reporting the first malformed one.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (schedule, brackets) in self.schedules() {
            validate_brackets(brackets).map_err(|source| ScheduleError { schedule, source })?;
        }
        Ok(())
    }
}
