use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate slice of a progressive schedule.
///
/// `max_income` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        min_income: Decimal,
        max_income: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income: Some(max_income),
            tax_rate,
        }
    }

    pub fn unbounded(
        min_income: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income: None,
            tax_rate,
        }
    }

    /// Width of the bracket, or `None` for the unbounded top bracket.
    pub fn span(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }
}
