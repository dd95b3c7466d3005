use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use super::repository::{RepositoryError, TaxTableRepository};
use crate::models::TaxTables;

/// Serves a fixed set of tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: TaxTables,
}

impl InMemoryRepository {
    pub fn new(tables: TaxTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl TaxTableRepository for InMemoryRepository {
    async fn load_tables(&self) -> Result<TaxTables, RepositoryError> {
        Ok(self.tables.clone())
    }
}

/// Loads from the wrapped repository once and serves that copy afterwards.
///
/// A failed load is not cached; the next call retries.
pub struct CachedRepository<R> {
    inner: R,
    tables: OnceCell<TaxTables>,
}

impl<R: TaxTableRepository> CachedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            tables: OnceCell::new(),
        }
    }

    /// Borrow the cached tables, loading them on first use.
    pub async fn tables(&self) -> Result<&TaxTables, RepositoryError> {
        self.tables
            .get_or_try_init(|| async {
                debug!("loading tax tables into cache");
                self.inner.load_tables().await
            })
            .await
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.initialized()
    }
}

#[async_trait]
impl<R: TaxTableRepository> TaxTableRepository for CachedRepository<R> {
    async fn load_tables(&self) -> Result<TaxTables, RepositoryError> {
        self.tables().await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Country;
    use crate::test_support::tax_tables;

    /// Counts loads and fails the first `failures` of them.
    struct CountingRepository {
        loads: Arc<AtomicUsize>,
        failures: usize,
    }

    #[async_trait]
    impl TaxTableRepository for CountingRepository {
        async fn load_tables(&self) -> Result<TaxTables, RepositoryError> {
            let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(RepositoryError::NotFound("flaky".to_string()));
            }
            Ok(tax_tables())
        }
    }

    fn counting(failures: usize) -> (CountingRepository, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (
            CountingRepository {
                loads: loads.clone(),
                failures,
            },
            loads,
        )
    }

    #[tokio::test]
    async fn in_memory_returns_its_tables() {
        let repo = InMemoryRepository::new(tax_tables());

        assert_eq!(repo.load_tables().await.unwrap(), tax_tables());
    }

    #[tokio::test]
    async fn default_list_regions_reads_loaded_tables() {
        let repo = InMemoryRepository::new(tax_tables());

        assert_eq!(
            repo.list_regions(Country::Canada).await.unwrap(),
            vec!["AB".to_string(), "ON".to_string()]
        );
        assert!(repo.list_regions(Country::India).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cached_repository_loads_once() {
        let (inner, loads) = counting(0);
        let repo = CachedRepository::new(inner);

        assert!(!repo.is_loaded());
        repo.tables().await.unwrap();
        repo.load_tables().await.unwrap();
        repo.list_regions(Country::UnitedStates).await.unwrap();

        assert!(repo.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cached_repository_retries_after_failure() {
        let (inner, loads) = counting(1);
        let repo = CachedRepository::new(inner);

        assert!(matches!(
            repo.tables().await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(!repo.is_loaded());

        assert_eq!(repo.tables().await.unwrap(), &tax_tables());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
