//! # Dump ordering core
//!
//! Sorts a run's dump objects into a safe emission order: every object after
//! everything it depends on, except where the dependency graph is inherently
//! cyclic, in which case the graph is repaired first.
//!
//! ## Overview
//!
//! - **[`sort_by_type_name`]**: the preferred order — kind priority, schema,
//!   name, and each kind's remaining natural-key columns. No dependency
//!   edges are consulted.
//! - **[`sort_dependency_aware`]**: the main entry point. Runs a reverse
//!   Kahn topological sort that disturbs the preferred order as little as
//!   possible; when contradictory constraints remain, finds each elementary
//!   dependency loop, matches it against a catalog of known schema-level
//!   cycle patterns, rewrites the graph, and retries until the sort
//!   succeeds. Every repair removes at least one edge from a loop, so the
//!   retry always terminates.
//!
//! Repairs are observable outputs: edges are added and removed, and objects
//! pick up `separate`, `dummy_view`, `postponed_def`, section, and shell-type
//! dump-flag changes that the emitter honors. Loops no pattern recognizes are
//! reported through `tracing` and broken arbitrarily; the dump proceeds.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqldump_core::order::{sort_by_type_name, sort_dependency_aware};
//!
//! let mut ids = registry.dump_ids();
//! sort_by_type_name(&registry, &mut ids);
//! sort_dependency_aware(&mut registry, &mut ids, pre_boundary, post_boundary)?;
//! // ids is now a safe emission order.
//! ```

pub mod compare;
pub mod cycles;
pub mod describe;
pub mod error;
pub mod priority;
pub mod repair;
pub mod topo;

#[cfg(test)]
mod tests;

pub use compare::sort_by_type_name;
pub use describe::describe_dump_object;
pub use error::SortError;
pub use priority::SortPriority;

use crate::catalog::object::DumpId;
use crate::catalog::registry::ObjectRegistry;
use cycles::find_dependency_loops;
use repair::BoundaryIds;
use topo::{topo_sort, TopoOutcome};

/// Sorts `ids` into a safe dump order using the dependency information in
/// the registry, rewriting the graph where loops force it.
///
/// The boundary ids name the pre-data and post-data sentinels, needed when a
/// repair pushes an object into the post-data section. On return `ids` holds
/// the final ordering and the registry reflects any repairs.
///
/// # Errors
///
/// Returns [`SortError`] on invalid input (ids or edge targets outside
/// `[1, max_dump_id]`) or if a failed sort yields no discoverable loop.
pub fn sort_dependency_aware(
    registry: &mut ObjectRegistry,
    ids: &mut Vec<DumpId>,
    pre_boundary: DumpId,
    post_boundary: DumpId,
) -> Result<(), SortError> {
    let boundaries = BoundaryIds {
        pre_data: pre_boundary,
        post_data: post_boundary,
    };

    loop {
        match topo_sort(registry, ids)? {
            TopoOutcome::Ordered(ordering) => {
                *ids = ordering;
                return Ok(());
            }
            TopoOutcome::Remainder(remainder) => {
                find_dependency_loops(registry, &remainder, boundaries)?;
            }
        }
    }
}
