//! Topological sort of a dump list.
//!
//! Kahn's algorithm run in reverse with a priority queue: at each step the
//! candidate with the highest input index is emitted into the last unfilled
//! output slot. Choosing the latest allowable position for every object
//! minimizes rearrangement of the input ordering, which the caller has
//! already put into the preferred type/name order.

use std::collections::BinaryHeap;

use super::error::SortError;
use crate::catalog::object::DumpId;
use crate::catalog::registry::ObjectRegistry;

/// Marker for dump ids that do not appear in the input list.
const NOT_IN_INPUT: usize = usize::MAX;

/// Outcome of one sort attempt.
#[derive(Debug)]
pub(crate) enum TopoOutcome {
    /// Every constraint was satisfiable; the full ordering.
    Ordered(Vec<DumpId>),
    /// Contradictory constraints. The ids that could not be placed, in
    /// ascending dump id order: members of at least one dependency cycle,
    /// plus objects depended on by cycle members.
    Remainder(Vec<DumpId>),
}

/// Attempts a dependency-respecting reordering of `ids`.
///
/// The input list is not modified. Dependency edges to ids without a
/// registered object contribute no constraint.
///
/// # Errors
///
/// Returns [`SortError`] when an input id or an edge target lies outside
/// `[1, max_dump_id]`.
pub(crate) fn topo_sort(
    registry: &ObjectRegistry,
    ids: &[DumpId],
) -> Result<TopoOutcome, SortError> {
    if ids.is_empty() {
        return Ok(TopoOutcome::Ordered(Vec::new()));
    }

    let max_dump_id = registry.max_dump_id();
    let id_range = max_dump_id as usize + 1;

    // Map each input id to its position in the input ordering.
    let mut id_map = vec![NOT_IN_INPUT; id_range];
    for (position, id) in ids.iter().enumerate() {
        if id.0 == 0 || id.0 > max_dump_id {
            return Err(SortError::InvalidDumpId(*id));
        }
        id_map[id.index()] = position;
    }

    // before_constraints[id] counts how many input objects must be emitted
    // after the object with that id.
    let mut objects = Vec::with_capacity(ids.len());
    let mut before_constraints = vec![0u32; id_range];
    for id in ids {
        let Some(obj) = registry.find_by_dump_id(*id) else {
            return Err(SortError::InvalidDumpId(*id));
        };
        objects.push(obj);
        for dep in &obj.dependencies {
            if dep.0 == 0 || dep.0 > max_dump_id {
                return Err(SortError::InvalidDependency(*dep));
            }
            if id_map[dep.index()] != NOT_IN_INPUT {
                before_constraints[dep.index()] += 1;
            }
        }
    }

    // Heap of input positions ready to output; heapify is O(N).
    let ready: Vec<usize> = (0..ids.len())
        .filter(|position| before_constraints[ids[*position].index()] == 0)
        .collect();
    let mut pending: BinaryHeap<usize> = BinaryHeap::from(ready);

    // Emit from the back of the output. Each emission releases the
    // constraints the object held against its dependencies, possibly making
    // them ready in turn.
    let mut ordering = vec![DumpId(0); ids.len()];
    let mut next_slot = ids.len();
    while let Some(position) = pending.pop() {
        next_slot -= 1;
        ordering[next_slot] = ids[position];

        for dep in &objects[position].dependencies {
            let target = id_map[dep.index()];
            if target == NOT_IN_INPUT {
                continue;
            }
            before_constraints[dep.index()] -= 1;
            if before_constraints[dep.index()] == 0 {
                pending.push(target);
            }
        }
    }

    if next_slot == 0 {
        return Ok(TopoOutcome::Ordered(ordering));
    }

    // Report the objects that could not be placed, ascending by dump id.
    // Indexes are bounded by max_dump_id, which is a u32.
    #[allow(clippy::cast_possible_truncation)]
    let remainder: Vec<DumpId> = (1..id_range)
        .filter(|index| before_constraints[*index] > 0)
        .map(|index| DumpId(index as u32))
        .collect();
    Ok(TopoOutcome::Remainder(remainder))
}
