//! Dependency loop repair.
//!
//! Reduces the many shapes a dependency loop can take to a catalog of known
//! schema-level patterns and applies one repair per loop: redirecting an edge
//! to a shell type, splitting a view or constraint into a separately emitted
//! object, postponing a matview or function past the data section, or (when
//! no pattern applies) warning and breaking an edge arbitrarily. Every repair
//! removes at least one edge of the offending loop, so the retry loop in the
//! caller always converges.

use tracing::warn;

use super::describe::describe_dump_object;
use crate::catalog::object::{
    DumpComponents, DumpId, ObjectDetails, ObjectKind, Oid, RelKind, Section,
};
use crate::catalog::registry::ObjectRegistry;

/// Dump ids of the two section sentinels, threaded through repair because
/// splitting an object off frequently pushes it into post-data.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundaryIds {
    /// The pre-data boundary singleton.
    pub pre_data: DumpId,
    /// The post-data boundary singleton.
    pub post_data: DumpId,
}

/// Fixes one dependency loop.
///
/// `loop_ids` lists the loop members in path order (each depends on the next,
/// and the last depends on the first). Patterns are tried in a fixed order;
/// the first match mutates the graph and returns.
pub(crate) fn repair_dependency_loop(
    registry: &mut ObjectRegistry,
    loop_ids: &[DumpId],
    boundaries: BoundaryIds,
) {
    let n = loop_ids.len();

    // Datatype and one of its I/O or canonicalize functions.
    if n == 2
        && is_kind(registry, loop_ids[0], ObjectKind::Type)
        && is_kind(registry, loop_ids[1], ObjectKind::Func)
    {
        repair_type_func_loop(registry, loop_ids[0], loop_ids[1]);
        return;
    }
    if n == 2
        && is_kind(registry, loop_ids[1], ObjectKind::Type)
        && is_kind(registry, loop_ids[0], ObjectKind::Func)
    {
        repair_type_func_loop(registry, loop_ids[1], loop_ids[0]);
        return;
    }

    // View (including matview) and its ON SELECT rule.
    if n == 2
        && is_relkind(registry, loop_ids[0], &[RelKind::View, RelKind::MatView])
        && is_on_select_rule_of(registry, loop_ids[1], loop_ids[0])
    {
        repair_view_rule_loop(registry, loop_ids[0], loop_ids[1]);
        return;
    }
    if n == 2
        && is_relkind(registry, loop_ids[1], &[RelKind::View, RelKind::MatView])
        && is_on_select_rule_of(registry, loop_ids[0], loop_ids[1])
    {
        repair_view_rule_loop(registry, loop_ids[1], loop_ids[0]);
        return;
    }

    // Indirect loop involving a view (but not a matview) and its ON SELECT
    // rule.
    if n > 2 {
        for view in loop_ids {
            if !is_relkind(registry, *view, &[RelKind::View]) {
                continue;
            }
            for rule in loop_ids {
                if is_on_select_rule_of(registry, *rule, *view) {
                    repair_view_rule_multi_loop(registry, *view, *rule, boundaries);
                    return;
                }
            }
        }
    }

    // Indirect loop involving a matview (or matview statistics) and a data
    // boundary.
    if n > 2 {
        for member in loop_ids {
            if is_relkind(registry, *member, &[RelKind::MatView]) {
                if let Some((boundary, next)) =
                    boundary_and_successor(registry, loop_ids, ObjectKind::PreDataBoundary)
                {
                    repair_matview_boundary_multi_loop(registry, boundary, next);
                    return;
                }
            } else if is_matview_stats(registry, *member) {
                if let Some((boundary, next)) =
                    boundary_and_successor(registry, loop_ids, ObjectKind::PostDataBoundary)
                {
                    repair_matview_boundary_multi_loop(registry, boundary, next);
                    return;
                }
            }
        }
    }

    // Indirect loop involving a function and the pre-data boundary.
    if n > 2 && loop_ids.iter().any(|id| is_kind(registry, *id, ObjectKind::Func)) {
        if let Some((boundary, next)) =
            boundary_and_successor(registry, loop_ids, ObjectKind::PreDataBoundary)
        {
            repair_function_boundary_multi_loop(registry, boundary, next);
            return;
        }
    }

    // Table and CHECK constraint.
    if n == 2 && is_check_constraint_of(registry, loop_ids[1], loop_ids[0]) {
        repair_table_constraint_loop(registry, loop_ids[0], loop_ids[1]);
        return;
    }
    if n == 2 && is_check_constraint_of(registry, loop_ids[0], loop_ids[1]) {
        repair_table_constraint_loop(registry, loop_ids[1], loop_ids[0]);
        return;
    }

    // Indirect loop involving a table and a CHECK constraint.
    if n > 2 {
        for table in loop_ids {
            for constraint in loop_ids {
                if is_check_constraint_of(registry, *constraint, *table) {
                    repair_table_constraint_multi_loop(
                        registry, *table, *constraint, boundaries,
                    );
                    return;
                }
            }
        }
    }

    // Table and attribute default.
    if n == 2 && is_attrdef_of(registry, loop_ids[1], loop_ids[0]) {
        repair_table_attrdef_loop(registry, loop_ids[0], loop_ids[1]);
        return;
    }
    if n == 2 && is_attrdef_of(registry, loop_ids[0], loop_ids[1]) {
        repair_table_attrdef_loop(registry, loop_ids[1], loop_ids[0]);
        return;
    }

    // Indirect loop involving a table and an attribute default.
    if n > 2 {
        for table in loop_ids {
            for attrdef in loop_ids {
                if is_attrdef_of(registry, *attrdef, *table) {
                    repair_table_attrdef_multi_loop(registry, *table, *attrdef);
                    return;
                }
            }
        }
    }

    // Index on a partitioned table and the corresponding index on a
    // partition.
    if n == 2
        && is_kind(registry, loop_ids[0], ObjectKind::Index)
        && is_kind(registry, loop_ids[1], ObjectKind::Index)
    {
        if index_parent_oid(registry, loop_ids[0]) == catalog_oid(registry, loop_ids[1]) {
            registry.remove_dependency(loop_ids[0], loop_ids[1]);
            return;
        }
        if index_parent_oid(registry, loop_ids[1]) == catalog_oid(registry, loop_ids[0]) {
            registry.remove_dependency(loop_ids[1], loop_ids[0]);
            return;
        }
    }

    // Domain and CHECK or NOT NULL constraint.
    if n == 2 && is_domain_constraint_of(registry, loop_ids[1], loop_ids[0]) {
        repair_domain_constraint_loop(registry, loop_ids[0], loop_ids[1]);
        return;
    }
    if n == 2 && is_domain_constraint_of(registry, loop_ids[0], loop_ids[1]) {
        repair_domain_constraint_loop(registry, loop_ids[1], loop_ids[0]);
        return;
    }

    // Indirect loop involving a domain and a CHECK or NOT NULL constraint.
    if n > 2 {
        for domain in loop_ids {
            for constraint in loop_ids {
                if is_domain_constraint_of(registry, *constraint, *domain) {
                    repair_domain_constraint_multi_loop(
                        registry, *domain, *constraint, boundaries,
                    );
                    return;
                }
            }
        }
    }

    // Loop of a table with itself: a column-on-column or column-on-table
    // dependency collapsed to a self-edge because sub-object ids are not
    // tracked. Drop it silently.
    if n == 1 && is_kind(registry, loop_ids[0], ObjectKind::Table) {
        registry.remove_dependency(loop_ids[0], loop_ids[0]);
        return;
    }

    // All members are table data: a circular set of foreign-key constraints
    // (or one self-referential table).
    if loop_ids
        .iter()
        .all(|id| is_kind(registry, *id, ObjectKind::TableData))
    {
        if n > 1 {
            warn!("there are circular foreign-key constraints among these tables:");
        } else {
            warn!("there are circular foreign-key constraints on this table:");
        }
        for id in loop_ids {
            if let Some(obj) = registry.find_by_dump_id(*id) {
                warn!("{}", obj.name);
            }
        }
        warn!(
            "You might not be able to restore the dump without using \
             --disable-triggers or temporarily dropping the constraints."
        );
        warn!(
            "Consider using a full dump instead of a --data-only dump to \
             avoid this problem."
        );
        break_arbitrary_edge(registry, loop_ids);
        return;
    }

    // No principled way to break the loop: complain and break it anyway.
    warn!("could not resolve dependency loop among these items:");
    for id in loop_ids {
        if let Some(obj) = registry.find_by_dump_id(*id) {
            warn!("{}", describe_dump_object(registry, obj));
        }
    }
    break_arbitrary_edge(registry, loop_ids);
}

/// Removes `loop[0]`'s edge to `loop[1]`, or the self-edge of a
/// single-member loop.
fn break_arbitrary_edge(registry: &mut ObjectRegistry, loop_ids: &[DumpId]) {
    if loop_ids.len() > 1 {
        registry.remove_dependency(loop_ids[0], loop_ids[1]);
    } else {
        registry.remove_dependency(loop_ids[0], loop_ids[0]);
    }
}

// ---- Pattern predicates ----

fn is_kind(registry: &ObjectRegistry, id: DumpId, kind: ObjectKind) -> bool {
    registry
        .find_by_dump_id(id)
        .is_some_and(|obj| obj.kind() == kind)
}

fn is_relkind(registry: &ObjectRegistry, id: DumpId, kinds: &[RelKind]) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(&obj.details, ObjectDetails::Table(t) if kinds.contains(&t.relkind))
    })
}

fn is_matview_stats(registry: &ObjectRegistry, id: DumpId) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(&obj.details, ObjectDetails::RelStats(s) if s.relkind == RelKind::MatView)
    })
}

fn is_on_select_rule_of(registry: &ObjectRegistry, id: DumpId, view: DumpId) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(
            &obj.details,
            ObjectDetails::Rule(r) if r.ev_type == '1' && r.is_instead && r.table == view
        )
    })
}

fn is_check_constraint_of(registry: &ObjectRegistry, id: DumpId, table: DumpId) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(
            &obj.details,
            ObjectDetails::Constraint(c) if c.contype == 'c' && c.table == Some(table)
        )
    })
}

fn is_domain_constraint_of(registry: &ObjectRegistry, id: DumpId, domain: DumpId) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(
            &obj.details,
            ObjectDetails::Constraint(c)
                if (c.contype == 'c' || c.contype == 'n') && c.domain == Some(domain)
        )
    })
}

fn is_attrdef_of(registry: &ObjectRegistry, id: DumpId, table: DumpId) -> bool {
    registry.find_by_dump_id(id).is_some_and(|obj| {
        matches!(&obj.details, ObjectDetails::AttrDef(a) if a.table == table)
    })
}

fn index_parent_oid(registry: &ObjectRegistry, id: DumpId) -> Option<Oid> {
    registry.find_by_dump_id(id).and_then(|obj| match &obj.details {
        ObjectDetails::Index(d) if d.parent_index != 0 => Some(d.parent_index),
        _ => None,
    })
}

fn catalog_oid(registry: &ObjectRegistry, id: DumpId) -> Option<Oid> {
    registry.find_by_dump_id(id).map(|obj| obj.catalog_id.oid)
}

/// Finds the first boundary of the given kind in the loop and the member
/// following it in path order.
fn boundary_and_successor(
    registry: &ObjectRegistry,
    loop_ids: &[DumpId],
    boundary_kind: ObjectKind,
) -> Option<(DumpId, DumpId)> {
    loop_ids
        .iter()
        .position(|id| is_kind(registry, *id, boundary_kind))
        .map(|j| (loop_ids[j], loop_ids[(j + 1) % loop_ids.len()]))
}

// ---- Pattern repairs ----

/// A user-defined type loops with each of its I/O functions (they take or
/// return the type); a range type loops with its canonicalize function the
/// same way. Point the function at the type's shell declaration instead.
fn repair_type_func_loop(registry: &mut ObjectRegistry, type_id: DumpId, func_id: DumpId) {
    registry.remove_dependency(func_id, type_id);

    let shell = registry.find_by_dump_id(type_id).and_then(|obj| {
        match &obj.details {
            ObjectDetails::Type(t) => t.shell_type,
            _ => None,
        }
    });
    let Some(shell_id) = shell else {
        return;
    };
    registry.add_dependency(func_id, shell_id);

    // The shell declaration must exist to identify the function fully, so
    // dump it (definition included) whenever the function is dumped.
    let func_dump = registry
        .find_by_dump_id(func_id)
        .map_or(DumpComponents::empty(), |obj| obj.dump);
    if !func_dump.is_empty() {
        if let Some(shell) = registry.find_by_dump_id_mut(shell_id) {
            shell.dump = func_dump | DumpComponents::DEFINITION;
        }
    }
}

/// A view is forced to depend on its ON SELECT rule while the rule
/// implicitly depends on the view. With nothing else in the loop, drop the
/// implicit edge and leave the rule non-separate (it is inlined into the
/// view definition). Applies to matviews as well.
fn repair_view_rule_loop(registry: &mut ObjectRegistry, view_id: DumpId, rule_id: DumpId) {
    registry.remove_dependency(rule_id, view_id);
}

/// With other objects in the loop, the rule must become a separately dumped
/// object instead. Shorter cycles are found first, so the two-member repair
/// has likely already removed the rule's edge on the view; put it back so
/// the rule cannot be emitted before the view. Does not work for matviews.
fn repair_view_rule_multi_loop(
    registry: &mut ObjectRegistry,
    view_id: DumpId,
    rule_id: DumpId,
    boundaries: BoundaryIds,
) {
    registry.remove_dependency(view_id, rule_id);
    if let Some(view) = registry.find_by_dump_id_mut(view_id) {
        if let ObjectDetails::Table(t) = &mut view.details {
            t.dummy_view = true;
        }
    }
    if let Some(rule) = registry.find_by_dump_id_mut(rule_id) {
        if let ObjectDetails::Rule(r) = &mut rule.details {
            r.separate = true;
        }
    }
    registry.add_dependency(rule_id, view_id);
    // Now that the rule is separate, it must be post-data.
    registry.add_dependency(rule_id, boundaries.post_data);
}

/// A matview in a multi-object loop cannot be fixed by splitting off its
/// rule; instead drop the constraint that it be dumped pre-data. The member
/// after the boundary is not necessarily the matview itself (it can be the
/// matview's rowtype), and interconnected matviews come through here once
/// each while their pre-data linkages are severed.
fn repair_matview_boundary_multi_loop(
    registry: &mut ObjectRegistry,
    boundary_id: DumpId,
    next_id: DumpId,
) {
    registry.remove_dependency(boundary_id, next_id);

    if let Some(next) = registry.find_by_dump_id_mut(next_id) {
        match &mut next.details {
            ObjectDetails::Table(t) if t.relkind == RelKind::MatView => {
                t.postponed_def = true;
            }
            ObjectDetails::RelStats(s) if s.relkind == RelKind::MatView => {
                s.section = Section::PostData;
            }
            _ => {}
        }
    }
}

/// Same stopgap for a function in a multi-object loop with the pre-data
/// boundary, e.g. a function depending on a unique index through GROUP BY.
fn repair_function_boundary_multi_loop(
    registry: &mut ObjectRegistry,
    boundary_id: DumpId,
    next_id: DumpId,
) {
    registry.remove_dependency(boundary_id, next_id);

    if let Some(next) = registry.find_by_dump_id_mut(next_id) {
        if let ObjectDetails::Func(f) = &mut next.details {
            f.postponed_def = true;
        }
    }
}

/// A table depends on its CHECK constraints while each constraint
/// automatically depends on the table. Alone in a loop, drop the automatic
/// edge and keep the constraint inline.
fn repair_table_constraint_loop(
    registry: &mut ObjectRegistry,
    table_id: DumpId,
    constraint_id: DumpId,
) {
    registry.remove_dependency(constraint_id, table_id);
}

/// With other objects in the loop, split the CHECK constraint out instead.
/// The short-cycle repair may have already removed the constraint's edge on
/// the table; put it back so the constraint follows its table.
fn repair_table_constraint_multi_loop(
    registry: &mut ObjectRegistry,
    table_id: DumpId,
    constraint_id: DumpId,
    boundaries: BoundaryIds,
) {
    registry.remove_dependency(table_id, constraint_id);
    mark_constraint_separate(registry, constraint_id);
    registry.add_dependency(constraint_id, table_id);
    // Now that the constraint is separate, it must be post-data.
    registry.add_dependency(constraint_id, boundaries.post_data);
}

/// Attribute defaults behave exactly like CHECK constraints.
fn repair_table_attrdef_loop(
    registry: &mut ObjectRegistry,
    table_id: DumpId,
    attrdef_id: DumpId,
) {
    registry.remove_dependency(attrdef_id, table_id);
}

fn repair_table_attrdef_multi_loop(
    registry: &mut ObjectRegistry,
    table_id: DumpId,
    attrdef_id: DumpId,
) {
    registry.remove_dependency(table_id, attrdef_id);
    if let Some(attrdef) = registry.find_by_dump_id_mut(attrdef_id) {
        if let ObjectDetails::AttrDef(a) = &mut attrdef.details {
            a.separate = true;
        }
    }
    registry.add_dependency(attrdef_id, table_id);
}

/// CHECK and NOT NULL constraints on domains work just like those on tables.
fn repair_domain_constraint_loop(
    registry: &mut ObjectRegistry,
    domain_id: DumpId,
    constraint_id: DumpId,
) {
    registry.remove_dependency(constraint_id, domain_id);
}

fn repair_domain_constraint_multi_loop(
    registry: &mut ObjectRegistry,
    domain_id: DumpId,
    constraint_id: DumpId,
    boundaries: BoundaryIds,
) {
    registry.remove_dependency(domain_id, constraint_id);
    mark_constraint_separate(registry, constraint_id);
    registry.add_dependency(constraint_id, domain_id);
    registry.add_dependency(constraint_id, boundaries.post_data);
}

fn mark_constraint_separate(registry: &mut ObjectRegistry, constraint_id: DumpId) {
    if let Some(constraint) = registry.find_by_dump_id_mut(constraint_id) {
        if let ObjectDetails::Constraint(c) = &mut constraint.details {
            c.separate = true;
        }
    }
}
