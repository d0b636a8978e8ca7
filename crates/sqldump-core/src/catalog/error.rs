//! Error types for catalog registration.

use super::object::DumpId;

/// Errors that can occur while populating the object registry.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Dump id zero is reserved.
    #[error("dump id 0 is reserved")]
    ReservedDumpId,

    /// Two objects were registered under the same dump id.
    #[error("duplicate dump id: {0}")]
    DuplicateDumpId(DumpId),
}
