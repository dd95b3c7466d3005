use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Country, ScheduleError, TaxTables};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("tax tables not found: {0}")]
    NotFound(String),

    #[error("malformed tax tables: {0}")]
    Malformed(String),

    #[error("invalid tax tables: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// A source of tax tables: compiled-in constants, a file, or anything else
/// that can produce a [`TaxTables`] value.
#[async_trait]
pub trait TaxTableRepository: Send + Sync {
    async fn load_tables(&self) -> Result<TaxTables, RepositoryError>;

    /// Region codes the loaded tables support for `country`.
    async fn list_regions(
        &self,
        country: Country,
    ) -> Result<Vec<String>, RepositoryError> {
        Ok(self.load_tables().await?.regions(country))
    }
}

#[async_trait]
impl TaxTableRepository for Box<dyn TaxTableRepository> {
    async fn load_tables(&self) -> Result<TaxTables, RepositoryError> {
        (**self).load_tables().await
    }

    async fn list_regions(
        &self,
        country: Country,
    ) -> Result<Vec<String>, RepositoryError> {
        (**self).list_regions(country).await
    }
}
