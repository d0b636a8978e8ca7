//! # `sqldump` Core
//!
//! The ordering core for the `sqldump` schema dumper: given the catalog of
//! dump objects for a run and their pairwise dependency edges, produce a
//! deterministic emission order that can be replayed to reconstruct the
//! database.
//!
//! This crate provides:
//! - **Catalog**: the typed dump object model and the owning registry
//! - **Ordering**: the type/name pre-sort, the rearrangement-minimizing
//!   topological sort, and the dependency loop repair engine
//!
//! Catalog introspection, SQL generation, archive formats, and restore
//! scheduling live in the surrounding tool, not here.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod order;

// Re-export key types
pub use catalog::{DumpId, DumpObject, ObjectKind, ObjectRegistry};
pub use order::{sort_by_type_name, sort_dependency_aware, SortError};

/// Result type for sqldump-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sqldump-core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalog registration errors.
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    /// Ordering errors.
    #[error("Sort error: {0}")]
    Sort(#[from] order::SortError),
}
