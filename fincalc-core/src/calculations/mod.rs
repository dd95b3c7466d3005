//! Tax and investment calculations.
//!
//! Every jurisdiction is a worksheet over its profile that reduces to calls
//! into the shared bracket engine. [`TaxCalculator`] picks the worksheet for
//! an input; [`project_investment`] runs the SIP/SWP simulation.

pub mod brackets;
pub mod calculator;
pub mod canada;
pub mod common;
pub mod error;
pub mod india;
pub mod projection;
pub mod usa;

pub use brackets::{
    BracketError, BracketSlice, BracketTaxEngine, bracket_breakdown, compute_bracket_tax,
    marginal_rate, validate_brackets, with_basic_exemption,
};
pub use calculator::{TaxCalculator, calculate_tax};
pub use canada::CanadaTaxWorksheet;
pub use error::{ProjectionError, TaxCalculationError};
pub use india::IndiaTaxWorksheet;
pub use projection::{project_investment, projection_timeline, try_project_investment};
pub use usa::UsaTaxWorksheet;
