//! Type/name ordering over dump objects.
//!
//! A total order reflecting the desired emission order before dependency
//! constraints are applied: kind priority, then schema, then name, then kind,
//! then whatever is left of each catalog's natural key. Natural keys refer to
//! other catalogs by surrogate OID; those references are translated to the
//! referenced catalog's natural key through the registry, descending multiple
//! levels where needed (a function argument type compares as its
//! (schema name, type name) pair).

use std::cmp::Ordering;

use crate::catalog::object::{DumpId, DumpObject, ObjectDetails, Oid};
use crate::catalog::registry::ObjectRegistry;

/// Sorts `ids` into the type/name ordering.
///
/// This is the usual starting point for the dependency-based ordering; it
/// consults no dependency edges.
pub fn sort_by_type_name(registry: &ObjectRegistry, ids: &mut [DumpId]) {
    if ids.len() > 1 {
        ids.sort_unstable_by(|a, b| compare_ids(registry, *a, *b));
    }
}

fn compare_ids(registry: &ObjectRegistry, a: DumpId, b: DumpId) -> Ordering {
    match (registry.find_by_dump_id(a), registry.find_by_dump_id(b)) {
        (Some(obj1), Some(obj2)) => type_name_cmp(registry, obj1, obj2),
        // Unregistered ids sort last, by raw id; they should not appear in
        // sortable input at all.
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(&b),
    }
}

/// Compares two objects in the type/name order.
pub(crate) fn type_name_cmp(
    registry: &ObjectRegistry,
    obj1: &DumpObject,
    obj2: &DumpObject,
) -> Ordering {
    let ord = obj1.kind().priority().cmp(&obj2.kind().priority());
    if ord != Ordering::Equal {
        return ord;
    }

    // Typically all objects of one priority either have or lack a schema
    // link, but there are exceptions; sort missing schemas last.
    let ord = match (schema_name(registry, obj1), schema_name(registry, obj2)) {
        (Some(ns1), Some(ns2)) => ns1.cmp(ns2),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if ord != Ordering::Equal {
        return ord;
    }

    let ord = obj1.name.as_bytes().cmp(obj2.name.as_bytes());
    if ord != Ordering::Equal {
        return ord;
    }

    // Kinds that share a priority without sharing a unique name constraint,
    // e.g. opclass and opfamily.
    let ord = obj1.kind().cmp(&obj2.kind());
    if ord != Ordering::Equal {
        return ord;
    }

    let ord = natural_key_cmp(registry, obj1, obj2);
    if ord != Ordering::Equal {
        return ord;
    }

    // Only reachable when two objects collide through their whole natural
    // key, i.e. catalog corruption. OID order is stable within a run but not
    // across parallel restores, so nothing should depend on it.
    obj1.catalog_id.oid.cmp(&obj2.catalog_id.oid)
}

/// Remaining natural-key columns for kinds whose (schema, name) is not a
/// unique identifier.
fn natural_key_cmp(
    registry: &ObjectRegistry,
    obj1: &DumpObject,
    obj2: &DumpObject,
) -> Ordering {
    match (&obj1.details, &obj2.details) {
        (ObjectDetails::Func(f1), ObjectDetails::Func(f2))
        | (ObjectDetails::Agg(f1), ObjectDetails::Agg(f2)) => {
            let ord = f1.arg_types.len().cmp(&f2.arg_types.len());
            if ord != Ordering::Equal {
                return ord;
            }
            for (t1, t2) in f1.arg_types.iter().zip(&f2.arg_types) {
                let ord = type_oid_cmp(registry, *t1, *t2);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        }
        (ObjectDetails::Operator(o1), ObjectDetails::Operator(o2)) => o1
            .form
            .cmp(&o2.form)
            .then_with(|| type_oid_cmp(registry, o1.left, o2.left))
            .then_with(|| type_oid_cmp(registry, o1.right, o2.right)),
        (ObjectDetails::Opclass(c1), ObjectDetails::Opclass(c2))
        | (ObjectDetails::Opfamily(c1), ObjectDetails::Opfamily(c2)) => {
            access_method_cmp(registry, c1.method, c2.method)
        }
        (ObjectDetails::Collation(c1), ObjectDetails::Collation(c2)) => {
            c1.encoding.cmp(&c2.encoding)
        }
        (ObjectDetails::AttrDef(d1), ObjectDetails::AttrDef(d2)) => {
            d1.adnum.cmp(&d2.adnum)
        }
        (ObjectDetails::Policy(p1), ObjectDetails::Policy(p2))
        | (ObjectDetails::Trigger(p1), ObjectDetails::Trigger(p2)) => {
            owner_name_cmp(registry, p1.table, p2.table)
        }
        (ObjectDetails::Rule(r1), ObjectDetails::Rule(r2)) => {
            owner_name_cmp(registry, r1.table, r2.table)
        }
        (ObjectDetails::Constraint(c1), ObjectDetails::Constraint(c2)) => {
            // Domain constraints sort before table constraints, consistent
            // with CREATE DOMAIN sorting before CREATE TABLE.
            match (c1.domain, c2.domain) {
                (Some(d1), Some(d2)) => owner_name_cmp(registry, d1, d2),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => match (c1.table, c2.table) {
                    (Some(t1), Some(t2)) => owner_name_cmp(registry, t1, t2),
                    _ => Ordering::Equal,
                },
            }
        }
        (ObjectDetails::PublicationRel(p1), ObjectDetails::PublicationRel(p2))
        | (
            ObjectDetails::PublicationTableInSchema(p1),
            ObjectDetails::PublicationTableInSchema(p2),
        ) => owner_name_cmp(registry, p1.publication, p2.publication),
        _ => Ordering::Equal,
    }
}

/// Compares two OID-identified types by (schema name, type name).
///
/// A failed lookup reports "equal" so the caller falls through to its next
/// comparison basis; missing rows mean the catalog was corrupt, and the sort
/// must still terminate with a stable order.
fn type_oid_cmp(registry: &ObjectRegistry, typid1: Oid, typid2: Oid) -> Ordering {
    if typid1 == typid2 {
        return Ordering::Equal;
    }
    let (Some(ty1), Some(ty2)) = (
        registry.find_type_by_oid(typid1),
        registry.find_type_by_oid(typid2),
    ) else {
        return Ordering::Equal;
    };

    let ord = match (schema_name(registry, ty1), schema_name(registry, ty2)) {
        (Some(ns1), Some(ns2)) => ns1.cmp(ns2),
        _ => Ordering::Equal,
    };
    ord.then_with(|| ty1.name.as_bytes().cmp(ty2.name.as_bytes()))
}

/// Compares two OID-identified access methods by name.
fn access_method_cmp(registry: &ObjectRegistry, am1: Oid, am2: Oid) -> Ordering {
    if am1 == am2 {
        return Ordering::Equal;
    }
    let (Some(m1), Some(m2)) = (
        registry.find_access_method_by_oid(am1),
        registry.find_access_method_by_oid(am2),
    ) else {
        return Ordering::Equal;
    };
    m1.name.as_bytes().cmp(m2.name.as_bytes())
}

/// Compares the names of two owning objects (the owners' schemas were already
/// considered by the caller).
fn owner_name_cmp(registry: &ObjectRegistry, id1: DumpId, id2: DumpId) -> Ordering {
    match (registry.find_by_dump_id(id1), registry.find_by_dump_id(id2)) {
        (Some(o1), Some(o2)) => o1.name.as_bytes().cmp(o2.name.as_bytes()),
        _ => Ordering::Equal,
    }
}

/// Name of the schema an object belongs to, when it has one.
fn schema_name<'a>(registry: &'a ObjectRegistry, obj: &DumpObject) -> Option<&'a str> {
    obj.namespace
        .and_then(|id| registry.find_by_dump_id(id))
        .map(|ns| ns.name.as_str())
}
