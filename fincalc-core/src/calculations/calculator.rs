//! Country dispatch over a loaded set of tax tables.

use tracing::warn;

use crate::calculations::canada::CanadaTaxWorksheet;
use crate::calculations::error::TaxCalculationError;
use crate::calculations::india::IndiaTaxWorksheet;
use crate::calculations::usa::UsaTaxWorksheet;
use crate::models::{Country, TaxComputationInput, TaxComputationResult, TaxTables};

/// Routes each input to the worksheet for its country.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Computes tax, reporting why no result could be produced.
    pub fn try_calculate(
        &self,
        input: &TaxComputationInput,
    ) -> Result<TaxComputationResult, TaxCalculationError> {
        match input {
            TaxComputationInput::India(input) => {
                let profile = self
                    .tables
                    .india
                    .as_ref()
                    .ok_or(TaxCalculationError::MissingProfile(Country::India))?;
                IndiaTaxWorksheet::new(profile).calculate(input)
            }
            TaxComputationInput::Canada(input) => {
                let profile = self
                    .tables
                    .canada
                    .as_ref()
                    .ok_or(TaxCalculationError::MissingProfile(Country::Canada))?;
                CanadaTaxWorksheet::new(profile).calculate(input)
            }
            TaxComputationInput::UnitedStates(input) => {
                let profile = self
                    .tables
                    .usa
                    .as_ref()
                    .ok_or(TaxCalculationError::MissingProfile(Country::UnitedStates))?;
                UsaTaxWorksheet::new(profile).calculate(input)
            }
        }
    }

    /// Computes tax, or `None` when the tables cannot serve this input.
    pub fn calculate(
        &self,
        input: &TaxComputationInput,
    ) -> Option<TaxComputationResult> {
        match self.try_calculate(input) {
            Ok(result) => Some(result),
            Err(error) => {
                warn!(
                    country = input.country().as_str(),
                    region = input.region().unwrap_or("-"),
                    %error,
                    "tax calculation produced no result"
                );
                None
            }
        }
    }
}

/// Shorthand for [`TaxCalculator::calculate`].
pub fn calculate_tax(
    tables: &TaxTables,
    input: &TaxComputationInput,
) -> Option<TaxComputationResult> {
    TaxCalculator::new(tables).calculate(input)
}
