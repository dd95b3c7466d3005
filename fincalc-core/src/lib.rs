pub mod calculations;
pub mod models;
pub mod tables;

#[cfg(test)]
pub(crate) mod test_support;

pub use calculations::{
    ProjectionError, TaxCalculationError, TaxCalculator, calculate_tax, project_investment,
    projection_timeline, try_project_investment,
};
pub use models::*;
pub use tables::{RepositoryError, TableSourceConfig, TaxTableRepository};
