use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repository::{RepositoryError, TaxTableRepository};

/// Backend-agnostic table source configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory. `location` is passed through to that factory
/// unchanged; its meaning is backend-specific.
///
/// | backend    | location                      |
/// |------------|-------------------------------|
/// | `builtin`  | ignored                       |
/// | `toml`     | path to a tables file         |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSourceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"toml"`).
    pub backend: String,
    #[serde(default)]
    pub location: Option<PathBuf>,
}

impl TableSourceConfig {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: "toml".to_string(),
            location: Some(path.into()),
        }
    }

    /// The configured location, or a configuration error naming the backend.
    pub fn require_location(&self) -> Result<&PathBuf, RepositoryError> {
        self.location.as_ref().ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "backend '{}' requires a location",
                self.backend
            ))
        })
    }
}

impl Default for TableSourceConfig {
    fn default() -> Self {
        Self {
            backend: "builtin".to_string(),
            location: None,
        }
    }
}

/// One implementation per table backend, registered with a
/// [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use repository. Implementations may read or parse
    /// their source eagerly.
    async fn create(
        &self,
        config: &TableSourceConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError>;
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] when no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &TableSourceConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
