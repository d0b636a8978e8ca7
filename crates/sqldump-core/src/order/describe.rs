//! Human-readable descriptions of dump objects, for loop diagnostics.

use crate::catalog::object::{DumpObject, ObjectDetails};
use crate::catalog::registry::ObjectRegistry;

/// Describes a dump object usefully for warnings: the SQL-level kind word,
/// the name where one applies, the dump id, and the catalog OID.
#[must_use]
pub fn describe_dump_object(registry: &ObjectRegistry, obj: &DumpObject) -> String {
    let name = &obj.name;
    let id = obj.dump_id;
    let oid = obj.catalog_id.oid;

    match &obj.details {
        ObjectDetails::Schema => format!("SCHEMA {name}  (ID {id} OID {oid})"),
        ObjectDetails::Extension => format!("EXTENSION {name}  (ID {id} OID {oid})"),
        ObjectDetails::Type(_) => format!("TYPE {name}  (ID {id} OID {oid})"),
        ObjectDetails::ShellType(_) => format!("SHELL TYPE {name}  (ID {id} OID {oid})"),
        ObjectDetails::Func(_) => format!("FUNCTION {name}  (ID {id} OID {oid})"),
        ObjectDetails::Agg(_) => format!("AGGREGATE {name}  (ID {id} OID {oid})"),
        ObjectDetails::Operator(_) => format!("OPERATOR {name}  (ID {id} OID {oid})"),
        ObjectDetails::AccessMethod => {
            format!("ACCESS METHOD {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Opclass(_) => {
            format!("OPERATOR CLASS {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Opfamily(_) => {
            format!("OPERATOR FAMILY {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Collation(_) => format!("COLLATION {name}  (ID {id} OID {oid})"),
        ObjectDetails::Conversion => format!("CONVERSION {name}  (ID {id} OID {oid})"),
        ObjectDetails::Table(_) => format!("TABLE {name}  (ID {id} OID {oid})"),
        ObjectDetails::TableAttach => format!("TABLE ATTACH {name}  (ID {id})"),
        ObjectDetails::AttrDef(ad) => {
            let table = registry.find_by_dump_id(ad.table);
            let table_name = table.map_or("?", |t| t.name.as_str());
            let column = table
                .and_then(|t| match &t.details {
                    ObjectDetails::Table(details) => usize::try_from(ad.adnum - 1)
                        .ok()
                        .and_then(|index| details.attribute_names.get(index)),
                    _ => None,
                })
                .map_or("?", String::as_str);
            format!("ATTRDEF {table_name}.{column}  (ID {id} OID {oid})")
        }
        ObjectDetails::Index(_) => format!("INDEX {name}  (ID {id} OID {oid})"),
        ObjectDetails::IndexAttach => format!("INDEX ATTACH {name}  (ID {id})"),
        ObjectDetails::StatsExt => format!("STATISTICS {name}  (ID {id} OID {oid})"),
        ObjectDetails::RefreshMatView => {
            format!("REFRESH MATERIALIZED VIEW {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Rule(_) => format!("RULE {name}  (ID {id} OID {oid})"),
        ObjectDetails::Trigger(_) => format!("TRIGGER {name}  (ID {id} OID {oid})"),
        ObjectDetails::EventTrigger => {
            format!("EVENT TRIGGER {name} (ID {id} OID {oid})")
        }
        ObjectDetails::Constraint(_) => format!("CONSTRAINT {name}  (ID {id} OID {oid})"),
        ObjectDetails::FkConstraint(_) => {
            format!("FK CONSTRAINT {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::ProcLang => {
            format!("PROCEDURAL LANGUAGE {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Cast(c) => {
            format!("CAST {} to {}  (ID {id} OID {oid})", c.source, c.target)
        }
        ObjectDetails::Transform(t) => {
            format!("TRANSFORM {} lang {}  (ID {id} OID {oid})", t.ty, t.lang)
        }
        ObjectDetails::TableData => format!("TABLE DATA {name}  (ID {id} OID {oid})"),
        ObjectDetails::SequenceSet => format!("SEQUENCE SET {name}  (ID {id} OID {oid})"),
        ObjectDetails::DummyType => format!("DUMMY TYPE {name}  (ID {id} OID {oid})"),
        ObjectDetails::TsParser => {
            format!("TEXT SEARCH PARSER {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::TsDict => {
            format!("TEXT SEARCH DICTIONARY {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::TsTemplate => {
            format!("TEXT SEARCH TEMPLATE {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::TsConfig => {
            format!("TEXT SEARCH CONFIGURATION {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::Fdw => {
            format!("FOREIGN DATA WRAPPER {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::ForeignServer => {
            format!("FOREIGN SERVER {name}  (ID {id} OID {oid})")
        }
        ObjectDetails::DefaultAcl => format!("DEFAULT ACL {name}  (ID {id} OID {oid})"),
        ObjectDetails::LargeObject => format!("LARGE OBJECT  (ID {id} OID {oid})"),
        ObjectDetails::LargeObjectData => format!("LARGE OBJECT DATA  (ID {id})"),
        ObjectDetails::Policy(_) => format!("POLICY (ID {id} OID {oid})"),
        ObjectDetails::Publication => format!("PUBLICATION (ID {id} OID {oid})"),
        ObjectDetails::PublicationRel(_) => {
            format!("PUBLICATION TABLE (ID {id} OID {oid})")
        }
        ObjectDetails::PublicationTableInSchema(_) => {
            format!("PUBLICATION TABLES IN SCHEMA (ID {id} OID {oid})")
        }
        ObjectDetails::Subscription => format!("SUBSCRIPTION (ID {id} OID {oid})"),
        ObjectDetails::SubscriptionRel => {
            format!("SUBSCRIPTION TABLE (ID {id} OID {oid})")
        }
        ObjectDetails::PreDataBoundary => format!("PRE-DATA BOUNDARY  (ID {id})"),
        ObjectDetails::PostDataBoundary => format!("POST-DATA BOUNDARY  (ID {id})"),
        ObjectDetails::RelStats(_) => {
            format!("RELATION STATISTICS FOR {name}  (ID {id} OID {oid})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::object::{
        AttrDefDetails, CatalogId, DumpId, DumpObject, RelKind, TableDetails,
    };
    use crate::catalog::registry::ObjectRegistry;

    #[test]
    fn boundary_descriptions_omit_oid() {
        let registry = ObjectRegistry::new();
        let pre = DumpObject::new(
            DumpId(1),
            CatalogId::default(),
            "PRE-DATA BOUNDARY",
            ObjectDetails::PreDataBoundary,
        );
        assert_eq!(
            describe_dump_object(&registry, &pre),
            "PRE-DATA BOUNDARY  (ID 1)"
        );
    }

    #[test]
    fn attrdef_names_table_and_column() {
        let mut registry = ObjectRegistry::new();
        let mut table_details = TableDetails::new(RelKind::Ordinary);
        table_details.attribute_names = vec!["a".into(), "b".into()];
        registry
            .register(DumpObject::new(
                DumpId(1),
                CatalogId::new(1259, 500),
                "orders",
                ObjectDetails::Table(table_details),
            ))
            .unwrap();

        let attrdef = DumpObject::new(
            DumpId(2),
            CatalogId::new(2604, 600),
            "",
            ObjectDetails::AttrDef(AttrDefDetails {
                table: DumpId(1),
                adnum: 2,
                separate: false,
            }),
        );
        assert_eq!(
            describe_dump_object(&registry, &attrdef),
            "ATTRDEF orders.b  (ID 2 OID 600)"
        );
    }
}
