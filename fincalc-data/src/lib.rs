//! Tax table sources: the compiled-in tables, TOML table files and CSV
//! bracket overrides.

pub mod builtin;
pub mod loader;
pub mod toml_source;

use fincalc_core::tables::RepositoryRegistry;

pub use builtin::{BuiltinFactory, builtin_tables, canada_2024, india_fy2024_25, usa_2023};
pub use loader::{BracketCsvLoader, BracketRecord, TableLoaderError};
pub use toml_source::{TomlFileFactory, TomlTableRepository, parse_tables, render_tables};

/// A registry with every backend this crate provides.
pub fn default_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(BuiltinFactory));
    registry.register(Box::new(TomlFileFactory));
    registry
}
