//! Tax tables read from a TOML file.
//!
//! The file mirrors [`TaxTables`]: top-level `[india]`, `[canada]` and
//! `[usa]` tables, any of which may be omitted. Amounts may be written as
//! strings (`"55867"`) or bare numbers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fincalc_core::TaxTables;
use fincalc_core::tables::{
    RepositoryError, RepositoryFactory, TableSourceConfig, TaxTableRepository,
};
use tracing::{debug, info};

/// Parses and validates a tables document.
pub fn parse_tables(source: &str) -> Result<TaxTables, RepositoryError> {
    let tables: TaxTables =
        toml::from_str(source).map_err(|e| RepositoryError::Malformed(e.to_string()))?;
    tables.validate()?;
    Ok(tables)
}

/// Renders tables in the same format [`parse_tables`] reads.
pub fn render_tables(tables: &TaxTables) -> Result<String, RepositoryError> {
    toml::to_string_pretty(tables).map_err(|e| RepositoryError::Malformed(e.to_string()))
}

/// Reads the file on every load; wrap it in a
/// [`CachedRepository`](fincalc_core::tables::CachedRepository) to read once.
#[derive(Debug, Clone)]
pub struct TomlTableRepository {
    path: PathBuf,
}

impl TomlTableRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaxTableRepository for TomlTableRepository {
    async fn load_tables(&self) -> Result<TaxTables, RepositoryError> {
        debug!(path = %self.path.display(), "reading tax tables");

        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RepositoryError::NotFound(self.path.display().to_string()),
                _ => RepositoryError::Io(e),
            })?;

        let tables = parse_tables(&source)?;
        info!(
            path = %self.path.display(),
            india = tables.india.is_some(),
            canada = tables.canada.is_some(),
            usa = tables.usa.is_some(),
            "loaded tax tables"
        );
        Ok(tables)
    }
}

/// `toml` backend: `location` is the path of the tables file.
pub struct TomlFileFactory;

#[async_trait]
impl RepositoryFactory for TomlFileFactory {
    fn backend_name(&self) -> &'static str {
        "toml"
    }

    async fn create(
        &self,
        config: &TableSourceConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        let path = config.require_location()?;
        if !tokio::fs::try_exists(path).await? {
            return Err(RepositoryError::NotFound(path.display().to_string()));
        }
        Ok(Box::new(TomlTableRepository::new(path.clone())))
    }
}
