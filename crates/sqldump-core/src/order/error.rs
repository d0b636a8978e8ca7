//! Error types for the ordering core.

use crate::catalog::object::DumpId;

/// Errors that can occur while computing a safe dump order.
///
/// Each of these indicates invalid input or internal corruption; cyclic
/// dependency graphs are not errors, they are repaired.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// An input object carries a dump id outside `[1, max_dump_id]`.
    #[error("invalid dump id {0}")]
    InvalidDumpId(DumpId),

    /// A dependency edge targets an id outside `[1, max_dump_id]`.
    #[error("invalid dependency {0}")]
    InvalidDependency(DumpId),

    /// The topological sort failed but no dependency loop could be found.
    #[error("could not identify dependency loop")]
    LoopNotFound,
}
