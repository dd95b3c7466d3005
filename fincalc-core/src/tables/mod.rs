//! Where tax tables come from.
//!
//! Calculations never load anything themselves; a host resolves a
//! [`TableSourceConfig`] through a [`RepositoryRegistry`], loads the tables
//! once and passes them in.

pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryRegistry, TableSourceConfig};
pub use memory::{CachedRepository, InMemoryRepository};
pub use repository::{RepositoryError, TaxTableRepository};
