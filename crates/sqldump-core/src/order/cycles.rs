//! Dependency loop discovery.
//!
//! Walks the objects the topological sort could not place, finds elementary
//! cycles one at a time, and hands each to the repair dispatcher. Disjoint
//! cycles are all repaired within one pass; when two cycles share a vertex
//! only the first is repaired, since its repair may have fixed the other as
//! well. The sort is then retried.

use super::error::SortError;
use super::repair::{repair_dependency_loop, BoundaryIds};
use crate::catalog::object::DumpId;
use crate::catalog::registry::ObjectRegistry;

/// Finds and repairs dependency loops among `remainder`.
///
/// `remainder` is the failure output of the topological sort: every member
/// either sits on a cycle or is depended on by one.
///
/// # Errors
///
/// Returns [`SortError::LoopNotFound`] if no loop exists in the remainder;
/// the sort failed, so that would mean the search itself is broken.
pub(crate) fn find_dependency_loops(
    registry: &mut ObjectRegistry,
    remainder: &[DumpId],
    boundaries: BoundaryIds,
) -> Result<(), SortError> {
    let id_range = registry.max_dump_id() as usize + 1;

    // processed marks objects already part of a repaired loop (or proven
    // loop-free) during this invocation.
    let mut processed = vec![false; id_range];
    // search_failed[j] = start id k records that no path leads from j back
    // to k. Keying by start id instead of a bool avoids re-zeroing the
    // array for every start point.
    let mut search_failed = vec![DumpId(0); id_range];
    // The current path; sized for the worst case of one chain linking every
    // object.
    let mut workspace = Vec::with_capacity(registry.object_count());

    let mut fixed_loop = false;
    for id in remainder {
        workspace.clear();
        let found = find_loop(
            registry,
            *id,
            *id,
            &processed,
            &mut search_failed,
            &mut workspace,
        );

        if found {
            repair_dependency_loop(registry, &workspace, boundaries);
            fixed_loop = true;
            for member in &workspace {
                processed[member.index()] = true;
            }
        } else {
            // No loop starts here. Not required for correctness, but marking
            // it saves later searches from chasing references into it.
            processed[id.index()] = true;
        }
    }

    if !fixed_loop {
        return Err(SortError::LoopNotFound);
    }
    Ok(())
}

/// Recursively searches for a cycle from `id` back to `start_point`,
/// avoiding objects already claimed by an earlier repair.
///
/// On success the workspace holds the loop members in path order. Recursion
/// depth is bounded by the total object count; the workspace doubles as the
/// visited set, so a start point that merely links into someone else's cycle
/// cannot recurse forever.
fn find_loop(
    registry: &ObjectRegistry,
    id: DumpId,
    start_point: DumpId,
    processed: &[bool],
    search_failed: &mut [DumpId],
    workspace: &mut Vec<DumpId>,
) -> bool {
    // Overlap with a previously repaired loop: stop.
    if processed[id.index()] {
        return false;
    }
    // Already proven there is no path from here back to start_point.
    if search_failed[id.index()] == start_point {
        return false;
    }
    // Already on the current path.
    if workspace.contains(&id) {
        return false;
    }

    let entry_depth = workspace.len();
    workspace.push(id);

    let Some(obj) = registry.find_by_dump_id(id) else {
        // Dependencies on undumped objects are ignored by the caller; the
        // start point itself always exists.
        workspace.truncate(entry_depth);
        return false;
    };

    // An edge back to the start point closes the loop.
    if obj.depends_on(start_point) {
        return true;
    }

    for dep in &obj.dependencies {
        if registry.find_by_dump_id(*dep).is_none() {
            continue;
        }
        if find_loop(registry, *dep, start_point, processed, search_failed, workspace) {
            return true;
        }
    }

    workspace.truncate(entry_depth);
    search_failed[id.index()] = start_point;
    false
}
