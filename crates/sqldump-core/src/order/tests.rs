//! Unit tests for the ordering core: type/name comparison, topological
//! sorting, and dependency loop repair.

use smallvec::SmallVec;

use super::compare::sort_by_type_name;
use super::error::SortError;
use super::sort_dependency_aware;
use crate::catalog::object::{
    AttrDefDetails, CatalogId, CollationDetails, ConstraintDetails, DumpComponents,
    DumpId, DumpObject, FuncDetails, IndexDetails, ObjectDetails, OpclassDetails,
    OperatorDetails, OperatorForm, RelKind, RelStatsDetails, RuleDetails, Section,
    ShellTypeDetails, TableDetails, TypeDetails,
};
use crate::catalog::registry::ObjectRegistry;

/// Helper to build an object with a synthetic catalog OID.
fn obj(id: u32, name: &str, details: ObjectDetails) -> DumpObject {
    DumpObject::new(DumpId(id), CatalogId::new(0, id * 100), name, details)
}

fn with_oid(mut object: DumpObject, oid: u32) -> DumpObject {
    object.catalog_id.oid = oid;
    object
}

fn in_schema(mut object: DumpObject, schema: u32) -> DumpObject {
    object.namespace = Some(DumpId(schema));
    object
}

fn table(id: u32, name: &str, relkind: RelKind) -> DumpObject {
    obj(id, name, ObjectDetails::Table(TableDetails::new(relkind)))
}

fn on_select_rule(id: u32, name: &str, view: u32) -> DumpObject {
    obj(
        id,
        name,
        ObjectDetails::Rule(RuleDetails {
            table: DumpId(view),
            ev_type: '1',
            is_instead: true,
            separate: false,
        }),
    )
}

fn check_constraint(id: u32, name: &str, table: u32) -> DumpObject {
    obj(
        id,
        name,
        ObjectDetails::Constraint(ConstraintDetails {
            contype: 'c',
            table: Some(DumpId(table)),
            domain: None,
            separate: false,
        }),
    )
}

fn domain_constraint(id: u32, name: &str, contype: char, domain: u32) -> DumpObject {
    obj(
        id,
        name,
        ObjectDetails::Constraint(ConstraintDetails {
            contype,
            table: None,
            domain: Some(DumpId(domain)),
            separate: false,
        }),
    )
}

/// Builds a registry from objects plus (from, to) dependency edges.
fn build(objects: Vec<DumpObject>, edges: &[(u32, u32)]) -> ObjectRegistry {
    let mut registry = ObjectRegistry::new();
    for object in objects {
        registry.register(object).unwrap();
    }
    for (from, to) in edges {
        registry.add_dependency(DumpId(*from), DumpId(*to));
    }
    registry
}

/// Runs the full pipeline over the given input ids.
fn sort(
    registry: &mut ObjectRegistry,
    input: &[u32],
    pre: u32,
    post: u32,
) -> Result<Vec<DumpId>, SortError> {
    let mut ids: Vec<DumpId> = input.iter().map(|id| DumpId(*id)).collect();
    sort_by_type_name(registry, &mut ids);
    sort_dependency_aware(registry, &mut ids, DumpId(pre), DumpId(post))?;
    Ok(ids)
}

fn ids(raw: &[u32]) -> Vec<DumpId> {
    raw.iter().map(|id| DumpId(*id)).collect()
}

fn position(order: &[DumpId], id: u32) -> usize {
    order.iter().position(|x| x.0 == id).unwrap()
}

fn deps_of(registry: &ObjectRegistry, id: u32) -> SmallVec<[DumpId; 8]> {
    registry
        .find_by_dump_id(DumpId(id))
        .unwrap()
        .dependencies
        .clone()
}

// ---- Boundary cases ----

#[test]
fn test_empty_input() {
    let mut registry = ObjectRegistry::new();
    let order = sort(&mut registry, &[], 98, 99).unwrap();
    assert!(order.is_empty());
}

#[test]
fn test_single_object_no_edges() {
    let mut registry = build(vec![table(1, "t", RelKind::Ordinary)], &[]);
    let order = sort(&mut registry, &[1], 98, 99).unwrap();
    assert_eq!(order, ids(&[1]));
}

#[test]
fn test_self_loop_on_table_is_dropped() {
    let mut registry = build(vec![table(1, "t", RelKind::Ordinary)], &[(1, 1)]);
    let order = sort(&mut registry, &[1], 98, 99).unwrap();
    assert_eq!(order, ids(&[1]));
    assert!(deps_of(&registry, 1).is_empty());
}

// ---- Input validation ----

#[test]
fn test_zero_dump_id_is_fatal() {
    let mut registry = build(vec![table(1, "t", RelKind::Ordinary)], &[]);
    let mut input = vec![DumpId(0)];
    let result = sort_dependency_aware(&mut registry, &mut input, DumpId(98), DumpId(99));
    assert!(matches!(result, Err(SortError::InvalidDumpId(_))));
}

#[test]
fn test_out_of_range_dependency_is_fatal() {
    let mut registry = build(vec![table(1, "t", RelKind::Ordinary)], &[(1, 500)]);
    let mut input = ids(&[1]);
    let result = sort_dependency_aware(&mut registry, &mut input, DumpId(98), DumpId(99));
    assert!(matches!(result, Err(SortError::InvalidDependency(_))));
}

#[test]
fn test_edge_to_absent_object_is_ignored() {
    // Id 5 is registered (so in range) but not part of the sorted input.
    let mut registry = build(
        vec![
            table(1, "t", RelKind::Ordinary),
            table(5, "other", RelKind::Ordinary),
        ],
        &[(1, 5)],
    );
    let order = sort(&mut registry, &[1], 98, 99).unwrap();
    assert_eq!(order, ids(&[1]));
}

// ---- Topological properties ----

#[test]
fn test_linear_chain() {
    let mut registry = build(
        vec![obj(1, "s", ObjectDetails::Schema), table(2, "t", RelKind::Ordinary)],
        &[(2, 1)],
    );
    let order = sort(&mut registry, &[1, 2], 98, 99).unwrap();
    assert_eq!(order, ids(&[1, 2]));
}

#[test]
fn test_acyclic_output_respects_every_edge() {
    //        s
    //      / | \
    //     a  b  c     (tables in schema s)
    //      \ | /
    //      idx        (index on a, also linked to b and c)
    let edges = [(2, 1), (3, 1), (4, 1), (5, 2), (5, 3), (5, 4)];
    let mut registry = build(
        vec![
            obj(1, "s", ObjectDetails::Schema),
            in_schema(table(2, "a", RelKind::Ordinary), 1),
            in_schema(table(3, "b", RelKind::Ordinary), 1),
            in_schema(table(4, "c", RelKind::Ordinary), 1),
            in_schema(obj(5, "idx", ObjectDetails::Index(IndexDetails::default())), 1),
        ],
        &edges,
    );
    let order = sort(&mut registry, &[1, 2, 3, 4, 5], 98, 99).unwrap();

    assert_eq!(order.len(), 5);
    for (from, to) in edges {
        assert!(
            position(&order, to) < position(&order, from),
            "edge {from}->{to} violated in {order:?}"
        );
    }
}

#[test]
fn test_output_is_a_permutation_of_input() {
    let mut registry = build(
        vec![
            obj(1, "s", ObjectDetails::Schema),
            table(2, "a", RelKind::Ordinary),
            table(3, "b", RelKind::Ordinary),
        ],
        &[(2, 1), (3, 2)],
    );
    let order = sort(&mut registry, &[3, 1, 2], 98, 99).unwrap();
    let mut seen: Vec<u32> = order.iter().map(|id| id.0).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn test_preferred_order_kept_when_it_satisfies_dependencies() {
    // Dependencies already agree with the type/name order, so the sort must
    // not rearrange anything.
    let mut registry = build(
        vec![
            obj(1, "s", ObjectDetails::Schema),
            in_schema(table(2, "alpha", RelKind::Ordinary), 1),
            in_schema(table(3, "beta", RelKind::Ordinary), 1),
            in_schema(table(4, "gamma", RelKind::Ordinary), 1),
        ],
        &[(2, 1), (3, 1), (4, 1)],
    );
    let order = sort(&mut registry, &[1, 2, 3, 4], 98, 99).unwrap();
    assert_eq!(order, ids(&[1, 2, 3, 4]));
}

#[test]
fn test_deterministic_for_any_input_permutation() {
    let objects = || {
        vec![
            obj(1, "s", ObjectDetails::Schema),
            in_schema(table(2, "a", RelKind::Ordinary), 1),
            in_schema(table(3, "b", RelKind::Ordinary), 1),
            in_schema(obj(4, "i", ObjectDetails::Index(IndexDetails::default())), 1),
        ]
    };
    let edges = [(2, 1), (3, 1), (4, 2)];

    let mut reference = None;
    for permutation in [
        vec![1, 2, 3, 4],
        vec![4, 3, 2, 1],
        vec![2, 4, 1, 3],
        vec![3, 1, 4, 2],
    ] {
        let mut registry = build(objects(), &edges);
        let order = sort(&mut registry, &permutation, 98, 99).unwrap();
        match &reference {
            None => reference = Some(order),
            Some(expected) => assert_eq!(&order, expected),
        }
    }
}

// ---- Type/name comparator ----

#[test]
fn test_priority_drives_kind_order() {
    let mut registry = build(
        vec![
            obj(1, "zzz", ObjectDetails::Schema),
            table(2, "aaa", RelKind::Ordinary),
            obj(3, "mmm", ObjectDetails::Cast(Default::default())),
            obj(4, "mmm", ObjectDetails::Func(FuncDetails::default())),
        ],
        &[],
    );
    let mut input = ids(&[4, 2, 3, 1]);
    sort_by_type_name(&registry, &mut input);
    // Schema first, then cast before function, tables after.
    assert_eq!(input, ids(&[1, 3, 4, 2]));
}

#[test]
fn test_missing_schema_sorts_after_named_schemas() {
    let registry = build(
        vec![
            obj(1, "a", ObjectDetails::Schema),
            obj(2, "b", ObjectDetails::Schema),
            in_schema(table(3, "t", RelKind::Ordinary), 2),
            in_schema(table(4, "t", RelKind::Ordinary), 1),
            table(5, "t", RelKind::Ordinary),
        ],
        &[],
    );
    let mut input = ids(&[5, 3, 4]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[4, 3, 5]));
}

#[test]
fn test_kind_breaks_ties_within_shared_priority() {
    let registry = build(
        vec![
            obj(1, "x", ObjectDetails::Opfamily(OpclassDetails::default())),
            obj(2, "x", ObjectDetails::Opclass(OpclassDetails::default())),
        ],
        &[],
    );
    let mut input = ids(&[1, 2]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[2, 1]));
}

#[test]
fn test_opclass_tie_broken_by_access_method_name() {
    let registry = build(
        vec![
            with_oid(obj(1, "btree", ObjectDetails::AccessMethod), 403),
            with_oid(obj(2, "hash", ObjectDetails::AccessMethod), 405),
            obj(3, "x", ObjectDetails::Opclass(OpclassDetails { method: 405 })),
            obj(4, "x", ObjectDetails::Opclass(OpclassDetails { method: 403 })),
        ],
        &[],
    );
    let mut input = ids(&[3, 4]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[4, 3]));
}

#[test]
fn test_function_tie_broken_by_arity_then_argument_types() {
    let registry = build(
        vec![
            obj(1, "s", ObjectDetails::Schema),
            in_schema(
                with_oid(obj(2, "aaa", ObjectDetails::Type(TypeDetails::default())), 1000),
                1,
            ),
            in_schema(
                with_oid(obj(3, "bbb", ObjectDetails::Type(TypeDetails::default())), 2000),
                1,
            ),
            obj(
                4,
                "f",
                ObjectDetails::Func(FuncDetails {
                    arg_types: vec![2000],
                    postponed_def: false,
                }),
            ),
            obj(
                5,
                "f",
                ObjectDetails::Func(FuncDetails {
                    arg_types: vec![1000],
                    postponed_def: false,
                }),
            ),
            obj(
                6,
                "f",
                ObjectDetails::Func(FuncDetails {
                    arg_types: vec![],
                    postponed_def: false,
                }),
            ),
        ],
        &[],
    );
    let mut input = ids(&[4, 5, 6]);
    sort_by_type_name(&registry, &mut input);
    // Zero-argument function first, then by argument type name (aaa < bbb).
    assert_eq!(input, ids(&[6, 5, 4]));
}

#[test]
fn test_operator_forms_sort_prefix_postfix_infix() {
    let operator = |id, form| {
        obj(
            id,
            "+",
            ObjectDetails::Operator(OperatorDetails { form, left: 0, right: 0 }),
        )
    };
    let registry = build(
        vec![
            operator(1, OperatorForm::Infix),
            operator(2, OperatorForm::Prefix),
            operator(3, OperatorForm::Postfix),
        ],
        &[],
    );
    let mut input = ids(&[1, 2, 3]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[2, 3, 1]));
}

#[test]
fn test_domain_constraints_sort_before_table_constraints() {
    let registry = build(
        vec![
            obj(1, "d", ObjectDetails::Type(TypeDetails::default())),
            table(2, "t", RelKind::Ordinary),
            check_constraint(3, "chk", 2),
            domain_constraint(4, "chk", 'c', 1),
        ],
        &[],
    );
    let mut input = ids(&[3, 4]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[4, 3]));
}

#[test]
fn test_attrdef_tie_broken_by_attribute_number() {
    let attrdef = |id, adnum| {
        obj(
            id,
            "",
            ObjectDetails::AttrDef(AttrDefDetails {
                table: DumpId(1),
                adnum,
                separate: false,
            }),
        )
    };
    let registry = build(
        vec![table(1, "t", RelKind::Ordinary), attrdef(2, 4), attrdef(3, 2)],
        &[],
    );
    let mut input = ids(&[2, 3]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[3, 2]));
}

#[test]
fn test_collation_tie_broken_by_encoding() {
    let collation = |id, encoding| {
        obj(id, "c", ObjectDetails::Collation(CollationDetails { encoding }))
    };
    let registry = build(vec![collation(1, 8), collation(2, 6)], &[]);
    let mut input = ids(&[1, 2]);
    sort_by_type_name(&registry, &mut input);
    assert_eq!(input, ids(&[2, 1]));
}

// ---- Loop repair: type and function ----

#[test]
fn test_type_func_loop_redirected_to_shell_type() {
    let mut registry = build(
        vec![
            obj(
                4,
                "widget",
                ObjectDetails::ShellType(ShellTypeDetails { owning_type: Some(DumpId(5)) }),
            ),
            obj(
                5,
                "widget",
                ObjectDetails::Type(TypeDetails { shell_type: Some(DumpId(4)) }),
            ),
            obj(6, "widget_in", ObjectDetails::Func(FuncDetails::default())),
        ],
        &[(5, 6), (6, 5)],
    );
    let order = sort(&mut registry, &[4, 5, 6], 98, 99).unwrap();

    // The function now depends on the shell type instead of the real type.
    assert_eq!(deps_of(&registry, 6).as_slice(), &[DumpId(4)]);
    assert_eq!(order, ids(&[4, 6, 5]));

    // Dumping the function forces the shell declaration out too.
    let shell = registry.find_by_dump_id(DumpId(4)).unwrap();
    assert!(shell.dump.contains(DumpComponents::DEFINITION));
}

#[test]
fn test_type_func_loop_without_shell_type_just_drops_edge() {
    let mut registry = build(
        vec![
            obj(5, "widget", ObjectDetails::Type(TypeDetails::default())),
            obj(6, "widget_in", ObjectDetails::Func(FuncDetails::default())),
        ],
        &[(5, 6), (6, 5)],
    );
    let order = sort(&mut registry, &[5, 6], 98, 99).unwrap();
    assert!(deps_of(&registry, 6).is_empty());
    assert_eq!(order, ids(&[6, 5]));
}

// ---- Loop repair: views and rules ----

#[test]
fn test_view_on_select_rule_direct_loop() {
    let mut registry = build(
        vec![table(10, "v", RelKind::View), on_select_rule(11, "_RETURN", 10)],
        &[(10, 11), (11, 10)],
    );
    let order = sort(&mut registry, &[10, 11], 98, 99).unwrap();

    // The implicit rule->view edge is dropped; the view still depends on its
    // rule, which stays inline (not separate).
    assert!(deps_of(&registry, 11).is_empty());
    assert_eq!(deps_of(&registry, 10).as_slice(), &[DumpId(11)]);
    assert_eq!(order, ids(&[11, 10]));
    let rule = registry.find_by_dump_id(DumpId(11)).unwrap();
    assert!(matches!(&rule.details, ObjectDetails::Rule(r) if !r.separate));
}

#[test]
fn test_matview_on_select_rule_direct_loop() {
    let mut registry = build(
        vec![table(10, "mv", RelKind::MatView), on_select_rule(11, "_RETURN", 10)],
        &[(10, 11), (11, 10)],
    );
    sort(&mut registry, &[10, 11], 98, 99).unwrap();
    assert!(deps_of(&registry, 11).is_empty());
}

#[test]
fn test_view_rule_long_loop_splits_rule_out() {
    let mut registry = build(
        vec![
            table(10, "v", RelKind::View),
            on_select_rule(11, "_RETURN", 10),
            table(12, "t", RelKind::Ordinary),
            obj(99, "POST-DATA BOUNDARY", ObjectDetails::PostDataBoundary),
        ],
        &[(10, 11), (11, 12), (12, 10)],
    );
    let order = sort(&mut registry, &[10, 11, 12], 98, 99).unwrap();

    let view = registry.find_by_dump_id(DumpId(10)).unwrap();
    assert!(matches!(&view.details, ObjectDetails::Table(t) if t.dummy_view));
    let rule = registry.find_by_dump_id(DumpId(11)).unwrap();
    assert!(matches!(&rule.details, ObjectDetails::Rule(r) if r.separate));

    // The rule follows its view again and moved into post-data.
    assert!(deps_of(&registry, 11).contains(&DumpId(10)));
    assert!(deps_of(&registry, 11).contains(&DumpId(99)));
    assert!(!deps_of(&registry, 10).contains(&DumpId(11)));
    assert!(position(&order, 10) < position(&order, 11));
}

// ---- Loop repair: boundaries ----

#[test]
fn test_matview_through_pre_data_boundary_is_postponed() {
    let mut registry = build(
        vec![
            obj(1, "PRE-DATA BOUNDARY", ObjectDetails::PreDataBoundary),
            table(2, "mv", RelKind::MatView),
            obj(3, "mv_idx", ObjectDetails::Index(IndexDetails::default())),
        ],
        &[(1, 2), (2, 3), (3, 1)],
    );
    let order = sort(&mut registry, &[1, 2, 3], 1, 99).unwrap();

    // The boundary released the matview, which moves into post-data.
    assert!(!deps_of(&registry, 1).contains(&DumpId(2)));
    let matview = registry.find_by_dump_id(DumpId(2)).unwrap();
    assert!(matches!(&matview.details, ObjectDetails::Table(t) if t.postponed_def));
    assert_eq!(order.len(), 3);
    assert!(position(&order, 3) < position(&order, 2));
}

#[test]
fn test_matview_stats_through_post_data_boundary_change_section() {
    let mut registry = build(
        vec![
            obj(1, "POST-DATA BOUNDARY", ObjectDetails::PostDataBoundary),
            obj(
                2,
                "mv",
                ObjectDetails::RelStats(RelStatsDetails {
                    relkind: RelKind::MatView,
                    section: Section::Data,
                }),
            ),
            obj(3, "mv_idx", ObjectDetails::Index(IndexDetails::default())),
        ],
        &[(1, 2), (2, 3), (3, 1)],
    );
    sort(&mut registry, &[1, 2, 3], 98, 1).unwrap();

    assert!(!deps_of(&registry, 1).contains(&DumpId(2)));
    let stats = registry.find_by_dump_id(DumpId(2)).unwrap();
    assert!(matches!(
        &stats.details,
        ObjectDetails::RelStats(s) if s.section == Section::PostData
    ));
}

#[test]
fn test_function_through_pre_data_boundary_is_postponed() {
    let mut registry = build(
        vec![
            obj(1, "PRE-DATA BOUNDARY", ObjectDetails::PreDataBoundary),
            obj(2, "f", ObjectDetails::Func(FuncDetails::default())),
            obj(3, "u_idx", ObjectDetails::Index(IndexDetails::default())),
        ],
        &[(1, 2), (2, 3), (3, 1)],
    );
    sort(&mut registry, &[1, 2, 3], 1, 99).unwrap();

    assert!(!deps_of(&registry, 1).contains(&DumpId(2)));
    let func = registry.find_by_dump_id(DumpId(2)).unwrap();
    assert!(matches!(&func.details, ObjectDetails::Func(f) if f.postponed_def));
}

// ---- Loop repair: tables, constraints, defaults ----

#[test]
fn test_table_check_constraint_direct_loop() {
    let mut registry = build(
        vec![table(2, "t", RelKind::Ordinary), check_constraint(3, "chk", 2)],
        &[(2, 3), (3, 2)],
    );
    let order = sort(&mut registry, &[2, 3], 98, 99).unwrap();

    assert!(deps_of(&registry, 3).is_empty());
    assert_eq!(order, ids(&[3, 2]));
    let constraint = registry.find_by_dump_id(DumpId(3)).unwrap();
    assert!(matches!(&constraint.details, ObjectDetails::Constraint(c) if !c.separate));
}

#[test]
fn test_table_check_constraint_long_loop_splits_constraint() {
    let mut registry = build(
        vec![
            table(2, "t", RelKind::Ordinary),
            check_constraint(3, "chk", 2),
            obj(4, "f", ObjectDetails::Func(FuncDetails::default())),
            obj(99, "POST-DATA BOUNDARY", ObjectDetails::PostDataBoundary),
        ],
        &[(2, 3), (3, 4), (4, 2)],
    );
    let order = sort(&mut registry, &[2, 3, 4], 98, 99).unwrap();

    let constraint = registry.find_by_dump_id(DumpId(3)).unwrap();
    assert!(matches!(&constraint.details, ObjectDetails::Constraint(c) if c.separate));
    assert!(deps_of(&registry, 3).contains(&DumpId(2)));
    assert!(deps_of(&registry, 3).contains(&DumpId(99)));
    assert!(!deps_of(&registry, 2).contains(&DumpId(3)));
    assert!(position(&order, 2) < position(&order, 3));
}

#[test]
fn test_table_attrdef_direct_loop() {
    let mut registry = build(
        vec![
            table(2, "t", RelKind::Ordinary),
            obj(
                3,
                "",
                ObjectDetails::AttrDef(AttrDefDetails {
                    table: DumpId(2),
                    adnum: 1,
                    separate: false,
                }),
            ),
        ],
        &[(2, 3), (3, 2)],
    );
    sort(&mut registry, &[2, 3], 98, 99).unwrap();
    assert!(deps_of(&registry, 3).is_empty());
}

#[test]
fn test_table_attrdef_long_loop_splits_default() {
    let mut registry = build(
        vec![
            table(2, "t", RelKind::Ordinary),
            obj(
                3,
                "",
                ObjectDetails::AttrDef(AttrDefDetails {
                    table: DumpId(2),
                    adnum: 1,
                    separate: false,
                }),
            ),
            obj(4, "f", ObjectDetails::Func(FuncDetails::default())),
        ],
        &[(2, 3), (3, 4), (4, 2)],
    );
    sort(&mut registry, &[2, 3, 4], 98, 99).unwrap();

    let attrdef = registry.find_by_dump_id(DumpId(3)).unwrap();
    assert!(matches!(&attrdef.details, ObjectDetails::AttrDef(a) if a.separate));
    // Unlike constraints, a split default is not forced into post-data.
    assert!(deps_of(&registry, 3).contains(&DumpId(2)));
    assert!(!deps_of(&registry, 2).contains(&DumpId(3)));
}

#[test]
fn test_partitioned_index_pair_loop() {
    let mut registry = build(
        vec![
            // obj() assigns catalog OID id * 100, so the parent's OID is 300.
            obj(
                2,
                "child_idx",
                ObjectDetails::Index(IndexDetails { parent_index: 300 }),
            ),
            obj(3, "parent_idx", ObjectDetails::Index(IndexDetails::default())),
        ],
        &[(2, 3), (3, 2)],
    );
    sort(&mut registry, &[2, 3], 98, 99).unwrap();

    assert!(deps_of(&registry, 2).is_empty());
    assert_eq!(deps_of(&registry, 3).as_slice(), &[DumpId(2)]);
}

#[test]
fn test_domain_not_null_constraint_direct_loop() {
    let mut registry = build(
        vec![
            obj(2, "d", ObjectDetails::Type(TypeDetails::default())),
            domain_constraint(3, "nn", 'n', 2),
        ],
        &[(2, 3), (3, 2)],
    );
    sort(&mut registry, &[2, 3], 98, 99).unwrap();
    assert!(deps_of(&registry, 3).is_empty());
}

#[test]
fn test_domain_check_constraint_long_loop_splits_constraint() {
    let mut registry = build(
        vec![
            obj(2, "d", ObjectDetails::Type(TypeDetails::default())),
            domain_constraint(3, "chk", 'c', 2),
            obj(4, "f", ObjectDetails::Func(FuncDetails::default())),
            obj(99, "POST-DATA BOUNDARY", ObjectDetails::PostDataBoundary),
        ],
        &[(2, 3), (3, 4), (4, 2)],
    );
    sort(&mut registry, &[2, 3, 4], 98, 99).unwrap();

    let constraint = registry.find_by_dump_id(DumpId(3)).unwrap();
    assert!(matches!(&constraint.details, ObjectDetails::Constraint(c) if c.separate));
    assert!(deps_of(&registry, 3).contains(&DumpId(2)));
    assert!(deps_of(&registry, 3).contains(&DumpId(99)));
    assert!(!deps_of(&registry, 2).contains(&DumpId(3)));
}

// ---- Loop repair: last resorts ----

#[test]
fn test_circular_foreign_keys_between_table_data() {
    let mut registry = build(
        vec![
            obj(7, "orders", ObjectDetails::TableData),
            obj(8, "customers", ObjectDetails::TableData),
        ],
        &[(7, 8), (8, 7)],
    );
    let order = sort(&mut registry, &[7, 8], 98, 99).unwrap();

    // The loop is entered at the lowest dump id, so 7's edge on 8 is cut.
    assert!(deps_of(&registry, 7).is_empty());
    assert_eq!(deps_of(&registry, 8).as_slice(), &[DumpId(7)]);
    assert_eq!(order, ids(&[7, 8]));
}

#[test]
fn test_self_referential_table_data() {
    let mut registry = build(vec![obj(7, "t", ObjectDetails::TableData)], &[(7, 7)]);
    let order = sort(&mut registry, &[7], 98, 99).unwrap();
    assert_eq!(order, ids(&[7]));
    assert!(deps_of(&registry, 7).is_empty());
}

#[test]
fn test_unrecognized_loop_is_broken_arbitrarily() {
    let mut registry = build(
        vec![
            obj(2, "a", ObjectDetails::Schema),
            obj(3, "b", ObjectDetails::Schema),
        ],
        &[(2, 3), (3, 2)],
    );
    let order = sort(&mut registry, &[2, 3], 98, 99).unwrap();

    assert!(deps_of(&registry, 2).is_empty());
    assert_eq!(deps_of(&registry, 3).as_slice(), &[DumpId(2)]);
    assert_eq!(order, ids(&[2, 3]));
}

#[test]
fn test_two_disjoint_loops_fixed_in_one_pass() {
    let mut registry = build(
        vec![
            table(2, "t1", RelKind::Ordinary),
            check_constraint(3, "chk1", 2),
            table(4, "t2", RelKind::Ordinary),
            check_constraint(5, "chk2", 4),
        ],
        &[(2, 3), (3, 2), (4, 5), (5, 4)],
    );
    let order = sort(&mut registry, &[2, 3, 4, 5], 98, 99).unwrap();

    assert_eq!(order.len(), 4);
    assert!(deps_of(&registry, 3).is_empty());
    assert!(deps_of(&registry, 5).is_empty());
}
