//! Dump object model.
//!
//! Defines `DumpObject`, the typed catalog of object kinds, and the
//! kind-specific payloads consulted by the comparator and the loop repair
//! engine.

use std::fmt;

use bitflags::bitflags;
use smallvec::SmallVec;

/// Catalog-assigned object identifier (surrogate key).
pub type Oid = u32;

/// Dense identifier for a dump object, unique within a run.
///
/// Valid ids occupy the interval `[1, max_dump_id]`; zero is reserved as
/// "no object" in the memoization arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DumpId(pub u32);

impl DumpId {
    /// Index form for dense per-id arrays.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identity of an object: the row's table OID plus its own OID.
///
/// Used only as the last-resort comparison key; two distinct objects should
/// never need it unless the catalog is corrupted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogId {
    /// OID of the catalog the row lives in.
    pub tableoid: Oid,
    /// OID of the row itself.
    pub oid: Oid,
}

impl CatalogId {
    /// Identity within the catalog named by `tableoid`.
    #[must_use]
    pub fn new(tableoid: Oid, oid: Oid) -> Self {
        Self { tableoid, oid }
    }
}

bitflags! {
    /// Which components of an object are to be emitted.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DumpComponents: u32 {
        /// The object's defining DDL.
        const DEFINITION = 0x01;
        /// The object's data.
        const DATA = 0x02;
        /// COMMENT ON statements.
        const COMMENT = 0x04;
        /// SECURITY LABEL statements.
        const SECLABEL = 0x08;
        /// GRANT/REVOKE statements.
        const ACL = 0x10;
        /// Row-security policies.
        const POLICY = 0x20;
        /// User mappings (foreign servers).
        const USER_MAP = 0x40;
        /// Statistics import statements.
        const STATISTICS = 0x80;
    }
}

/// Relation kind, for the table-shaped objects the sort inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    /// Ordinary heap table.
    Ordinary,
    /// Sequence.
    Sequence,
    /// View.
    View,
    /// Materialized view.
    MatView,
    /// Foreign table.
    Foreign,
    /// Partitioned table.
    Partitioned,
}

/// Emission section an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Schema emitted before any data.
    PreData,
    /// Data itself.
    Data,
    /// Schema emitted after all data.
    PostData,
}

/// Every dumpable object kind, without payload.
///
/// The discriminant order doubles as the tie-break between kinds that share a
/// sort priority (e.g. type vs. shell type, opclass vs. opfamily).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    /// Schema (namespace).
    Schema,
    /// Extension.
    Extension,
    /// Base, composite, enum, range, or domain type.
    Type,
    /// Forward declaration of a type.
    ShellType,
    /// Function or procedure.
    Func,
    /// Aggregate function.
    Agg,
    /// Operator.
    Operator,
    /// Index/table access method.
    AccessMethod,
    /// Operator class.
    Opclass,
    /// Operator family.
    Opfamily,
    /// Collation.
    Collation,
    /// Encoding conversion.
    Conversion,
    /// Table, view, matview, sequence, or foreign table.
    Table,
    /// ALTER TABLE ... ATTACH PARTITION.
    TableAttach,
    /// Column default expression.
    AttrDef,
    /// Index.
    Index,
    /// ALTER INDEX ... ATTACH PARTITION.
    IndexAttach,
    /// Extended statistics object.
    StatsExt,
    /// Rewrite rule.
    Rule,
    /// Trigger.
    Trigger,
    /// Check, not-null, unique, primary-key, or exclusion constraint.
    Constraint,
    /// Foreign-key constraint.
    FkConstraint,
    /// Procedural language.
    ProcLang,
    /// Cast.
    Cast,
    /// A table's row data.
    TableData,
    /// Sequence state restore.
    SequenceSet,
    /// Stand-in type for an unconvertible composite.
    DummyType,
    /// Text search parser.
    TsParser,
    /// Text search dictionary.
    TsDict,
    /// Text search template.
    TsTemplate,
    /// Text search configuration.
    TsConfig,
    /// Foreign-data wrapper.
    Fdw,
    /// Foreign server.
    ForeignServer,
    /// Default ACL.
    DefaultAcl,
    /// Transform.
    Transform,
    /// Large object metadata.
    LargeObject,
    /// Large object contents.
    LargeObjectData,
    /// Sentinel closing the pre-data section.
    PreDataBoundary,
    /// Sentinel opening the post-data section.
    PostDataBoundary,
    /// Event trigger.
    EventTrigger,
    /// REFRESH MATERIALIZED VIEW.
    RefreshMatView,
    /// Row-security policy.
    Policy,
    /// Publication.
    Publication,
    /// Publication membership of one table.
    PublicationRel,
    /// Publication membership of a whole schema.
    PublicationTableInSchema,
    /// Imported relation statistics.
    RelStats,
    /// Subscription.
    Subscription,
    /// Subscription relation state.
    SubscriptionRel,
}

impl ObjectKind {
    /// Every kind, in discriminant order.
    pub const ALL: [ObjectKind; 48] = [
        ObjectKind::Schema,
        ObjectKind::Extension,
        ObjectKind::Type,
        ObjectKind::ShellType,
        ObjectKind::Func,
        ObjectKind::Agg,
        ObjectKind::Operator,
        ObjectKind::AccessMethod,
        ObjectKind::Opclass,
        ObjectKind::Opfamily,
        ObjectKind::Collation,
        ObjectKind::Conversion,
        ObjectKind::Table,
        ObjectKind::TableAttach,
        ObjectKind::AttrDef,
        ObjectKind::Index,
        ObjectKind::IndexAttach,
        ObjectKind::StatsExt,
        ObjectKind::Rule,
        ObjectKind::Trigger,
        ObjectKind::Constraint,
        ObjectKind::FkConstraint,
        ObjectKind::ProcLang,
        ObjectKind::Cast,
        ObjectKind::TableData,
        ObjectKind::SequenceSet,
        ObjectKind::DummyType,
        ObjectKind::TsParser,
        ObjectKind::TsDict,
        ObjectKind::TsTemplate,
        ObjectKind::TsConfig,
        ObjectKind::Fdw,
        ObjectKind::ForeignServer,
        ObjectKind::DefaultAcl,
        ObjectKind::Transform,
        ObjectKind::LargeObject,
        ObjectKind::LargeObjectData,
        ObjectKind::PreDataBoundary,
        ObjectKind::PostDataBoundary,
        ObjectKind::EventTrigger,
        ObjectKind::RefreshMatView,
        ObjectKind::Policy,
        ObjectKind::Publication,
        ObjectKind::PublicationRel,
        ObjectKind::PublicationTableInSchema,
        ObjectKind::RelStats,
        ObjectKind::Subscription,
        ObjectKind::SubscriptionRel,
    ];
}

/// Operator form, ordered the way the comparator needs it: prefix operators
/// sort before postfix, which sort before infix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperatorForm {
    /// One argument, on the right ('l' in the catalog).
    Prefix,
    /// One argument, on the left ('r'; unproducible since v14, still dumpable).
    Postfix,
    /// Two arguments ('b').
    Infix,
}

/// Payload for [`ObjectKind::Type`].
#[derive(Debug, Clone, Default)]
pub struct TypeDetails {
    /// The shell type predeclaring this type, when one exists.
    pub shell_type: Option<DumpId>,
}

/// Payload for [`ObjectKind::ShellType`].
#[derive(Debug, Clone, Default)]
pub struct ShellTypeDetails {
    /// The type this shell predeclares.
    pub owning_type: Option<DumpId>,
}

/// Payload for [`ObjectKind::Func`] and [`ObjectKind::Agg`].
#[derive(Debug, Clone, Default)]
pub struct FuncDetails {
    /// Argument type OIDs, in declaration order.
    pub arg_types: Vec<Oid>,
    /// Definition deferred to the post-data section by loop repair.
    pub postponed_def: bool,
}

/// Payload for [`ObjectKind::Operator`].
#[derive(Debug, Clone)]
pub struct OperatorDetails {
    /// Prefix, postfix, or infix.
    pub form: OperatorForm,
    /// Left operand type OID (zero for prefix operators).
    pub left: Oid,
    /// Right operand type OID (zero for postfix operators).
    pub right: Oid,
}

/// Payload for [`ObjectKind::Opclass`] and [`ObjectKind::Opfamily`].
#[derive(Debug, Clone, Default)]
pub struct OpclassDetails {
    /// OID of the owning access method.
    pub method: Oid,
}

/// Payload for [`ObjectKind::Collation`].
#[derive(Debug, Clone, Default)]
pub struct CollationDetails {
    /// Encoding the collation is defined for (-1 for any).
    pub encoding: i32,
}

/// Payload for [`ObjectKind::Table`].
#[derive(Debug, Clone)]
pub struct TableDetails {
    /// What kind of relation this is.
    pub relkind: RelKind,
    /// Emit a stub definition; the real query is re-attached by a rule.
    pub dummy_view: bool,
    /// Definition deferred to the post-data section by loop repair.
    pub postponed_def: bool,
    /// Column names, indexed by attribute number minus one.
    pub attribute_names: Vec<String>,
}

impl TableDetails {
    /// A relation of the given kind with no columns recorded.
    #[must_use]
    pub fn new(relkind: RelKind) -> Self {
        Self {
            relkind,
            dummy_view: false,
            postponed_def: false,
            attribute_names: Vec::new(),
        }
    }
}

/// Payload for [`ObjectKind::AttrDef`].
#[derive(Debug, Clone)]
pub struct AttrDefDetails {
    /// The table owning the defaulted column.
    pub table: DumpId,
    /// Attribute number of the column (1-based).
    pub adnum: i32,
    /// Emit as its own ALTER statement instead of inline in CREATE TABLE.
    pub separate: bool,
}

/// Payload for [`ObjectKind::Index`].
#[derive(Debug, Clone, Default)]
pub struct IndexDetails {
    /// OID of the partitioned-table index this index is attached to, or zero.
    pub parent_index: Oid,
}

/// Payload for [`ObjectKind::Rule`].
#[derive(Debug, Clone)]
pub struct RuleDetails {
    /// The table or view the rule rewrites.
    pub table: DumpId,
    /// Event type: '1' select, '2' update, '3' insert, '4' delete.
    pub ev_type: char,
    /// Whether this is an INSTEAD rule.
    pub is_instead: bool,
    /// Emit as its own CREATE RULE instead of inline in the view.
    pub separate: bool,
}

/// Payload for [`ObjectKind::Trigger`] and [`ObjectKind::Policy`].
#[derive(Debug, Clone)]
pub struct TableBoundDetails {
    /// The table the object hangs off.
    pub table: DumpId,
}

/// Payload for [`ObjectKind::Constraint`] and [`ObjectKind::FkConstraint`].
#[derive(Debug, Clone)]
pub struct ConstraintDetails {
    /// Constraint type: 'c' check, 'n' not-null, 'f' foreign key, etc.
    pub contype: char,
    /// Owning table, for table constraints.
    pub table: Option<DumpId>,
    /// Owning domain, for domain constraints.
    pub domain: Option<DumpId>,
    /// Emit as its own ALTER statement instead of inline.
    pub separate: bool,
}

/// Payload for [`ObjectKind::Cast`].
#[derive(Debug, Clone, Default)]
pub struct CastDetails {
    /// Source type OID.
    pub source: Oid,
    /// Target type OID.
    pub target: Oid,
}

/// Payload for [`ObjectKind::Transform`].
#[derive(Debug, Clone, Default)]
pub struct TransformDetails {
    /// Transformed type OID.
    pub ty: Oid,
    /// Language OID.
    pub lang: Oid,
}

/// Payload for [`ObjectKind::PublicationRel`] and
/// [`ObjectKind::PublicationTableInSchema`].
#[derive(Debug, Clone)]
pub struct PublicationMemberDetails {
    /// The owning publication.
    pub publication: DumpId,
}

/// Payload for [`ObjectKind::RelStats`].
#[derive(Debug, Clone)]
pub struct RelStatsDetails {
    /// Kind of the relation the statistics describe.
    pub relkind: RelKind,
    /// Section the statistics are emitted in; loop repair may push matview
    /// statistics into post-data.
    pub section: Section,
}

/// Kind-specific payload, one variant per [`ObjectKind`].
///
/// The registry hands out neutral [`DumpObject`] references; the comparator
/// and the repair dispatcher match on this to reach the natural-key columns
/// and repair flags.
#[derive(Debug, Clone)]
pub enum ObjectDetails {
    /// Schema.
    Schema,
    /// Extension.
    Extension,
    /// Type, with its shell back-reference.
    Type(TypeDetails),
    /// Shell type, with its completing type.
    ShellType(ShellTypeDetails),
    /// Function.
    Func(FuncDetails),
    /// Aggregate.
    Agg(FuncDetails),
    /// Operator.
    Operator(OperatorDetails),
    /// Access method.
    AccessMethod,
    /// Operator class.
    Opclass(OpclassDetails),
    /// Operator family.
    Opfamily(OpclassDetails),
    /// Collation.
    Collation(CollationDetails),
    /// Conversion.
    Conversion,
    /// Relation.
    Table(TableDetails),
    /// Partition attach.
    TableAttach,
    /// Column default.
    AttrDef(AttrDefDetails),
    /// Index.
    Index(IndexDetails),
    /// Index partition attach.
    IndexAttach,
    /// Extended statistics.
    StatsExt,
    /// Rewrite rule.
    Rule(RuleDetails),
    /// Trigger.
    Trigger(TableBoundDetails),
    /// Non-FK constraint.
    Constraint(ConstraintDetails),
    /// Foreign-key constraint.
    FkConstraint(ConstraintDetails),
    /// Procedural language.
    ProcLang,
    /// Cast.
    Cast(CastDetails),
    /// Table data.
    TableData,
    /// Sequence state.
    SequenceSet,
    /// Dummy type.
    DummyType,
    /// Text search parser.
    TsParser,
    /// Text search dictionary.
    TsDict,
    /// Text search template.
    TsTemplate,
    /// Text search configuration.
    TsConfig,
    /// Foreign-data wrapper.
    Fdw,
    /// Foreign server.
    ForeignServer,
    /// Default ACL.
    DefaultAcl,
    /// Transform.
    Transform(TransformDetails),
    /// Large object metadata.
    LargeObject,
    /// Large object contents.
    LargeObjectData,
    /// Pre-data boundary sentinel.
    PreDataBoundary,
    /// Post-data boundary sentinel.
    PostDataBoundary,
    /// Event trigger.
    EventTrigger,
    /// Matview refresh.
    RefreshMatView,
    /// Policy.
    Policy(TableBoundDetails),
    /// Publication.
    Publication,
    /// Publication table.
    PublicationRel(PublicationMemberDetails),
    /// Publication tables-in-schema.
    PublicationTableInSchema(PublicationMemberDetails),
    /// Relation statistics.
    RelStats(RelStatsDetails),
    /// Subscription.
    Subscription,
    /// Subscription relation.
    SubscriptionRel,
}

impl ObjectDetails {
    /// The fieldless kind for this payload.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectDetails::Schema => ObjectKind::Schema,
            ObjectDetails::Extension => ObjectKind::Extension,
            ObjectDetails::Type(_) => ObjectKind::Type,
            ObjectDetails::ShellType(_) => ObjectKind::ShellType,
            ObjectDetails::Func(_) => ObjectKind::Func,
            ObjectDetails::Agg(_) => ObjectKind::Agg,
            ObjectDetails::Operator(_) => ObjectKind::Operator,
            ObjectDetails::AccessMethod => ObjectKind::AccessMethod,
            ObjectDetails::Opclass(_) => ObjectKind::Opclass,
            ObjectDetails::Opfamily(_) => ObjectKind::Opfamily,
            ObjectDetails::Collation(_) => ObjectKind::Collation,
            ObjectDetails::Conversion => ObjectKind::Conversion,
            ObjectDetails::Table(_) => ObjectKind::Table,
            ObjectDetails::TableAttach => ObjectKind::TableAttach,
            ObjectDetails::AttrDef(_) => ObjectKind::AttrDef,
            ObjectDetails::Index(_) => ObjectKind::Index,
            ObjectDetails::IndexAttach => ObjectKind::IndexAttach,
            ObjectDetails::StatsExt => ObjectKind::StatsExt,
            ObjectDetails::Rule(_) => ObjectKind::Rule,
            ObjectDetails::Trigger(_) => ObjectKind::Trigger,
            ObjectDetails::Constraint(_) => ObjectKind::Constraint,
            ObjectDetails::FkConstraint(_) => ObjectKind::FkConstraint,
            ObjectDetails::ProcLang => ObjectKind::ProcLang,
            ObjectDetails::Cast(_) => ObjectKind::Cast,
            ObjectDetails::TableData => ObjectKind::TableData,
            ObjectDetails::SequenceSet => ObjectKind::SequenceSet,
            ObjectDetails::DummyType => ObjectKind::DummyType,
            ObjectDetails::TsParser => ObjectKind::TsParser,
            ObjectDetails::TsDict => ObjectKind::TsDict,
            ObjectDetails::TsTemplate => ObjectKind::TsTemplate,
            ObjectDetails::TsConfig => ObjectKind::TsConfig,
            ObjectDetails::Fdw => ObjectKind::Fdw,
            ObjectDetails::ForeignServer => ObjectKind::ForeignServer,
            ObjectDetails::DefaultAcl => ObjectKind::DefaultAcl,
            ObjectDetails::Transform(_) => ObjectKind::Transform,
            ObjectDetails::LargeObject => ObjectKind::LargeObject,
            ObjectDetails::LargeObjectData => ObjectKind::LargeObjectData,
            ObjectDetails::PreDataBoundary => ObjectKind::PreDataBoundary,
            ObjectDetails::PostDataBoundary => ObjectKind::PostDataBoundary,
            ObjectDetails::EventTrigger => ObjectKind::EventTrigger,
            ObjectDetails::RefreshMatView => ObjectKind::RefreshMatView,
            ObjectDetails::Policy(_) => ObjectKind::Policy,
            ObjectDetails::Publication => ObjectKind::Publication,
            ObjectDetails::PublicationRel(_) => ObjectKind::PublicationRel,
            ObjectDetails::PublicationTableInSchema(_) => {
                ObjectKind::PublicationTableInSchema
            }
            ObjectDetails::RelStats(_) => ObjectKind::RelStats,
            ObjectDetails::Subscription => ObjectKind::Subscription,
            ObjectDetails::SubscriptionRel => ObjectKind::SubscriptionRel,
        }
    }
}

/// A single dumpable unit: schema object, data blob, or section sentinel.
///
/// Dependency edges point at the objects this one must be emitted *after*.
/// Edges may name ids with no registered object; traversals skip those.
#[derive(Debug, Clone)]
pub struct DumpObject {
    /// Dense per-run identifier.
    pub dump_id: DumpId,
    /// Catalog identity, last-resort tie-breaker.
    pub catalog_id: CatalogId,
    /// Display name. Not necessarily unique.
    pub name: String,
    /// Owning schema, when the object lives in one.
    pub namespace: Option<DumpId>,
    /// Components of the object selected for emission.
    pub dump: DumpComponents,
    /// Outgoing dependency edges, as target dump ids.
    pub dependencies: SmallVec<[DumpId; 8]>,
    /// Kind-specific payload.
    pub details: ObjectDetails,
}

impl DumpObject {
    /// A named object with no namespace, no edges, and everything dumped.
    #[must_use]
    pub fn new(
        dump_id: DumpId,
        catalog_id: CatalogId,
        name: impl Into<String>,
        details: ObjectDetails,
    ) -> Self {
        Self {
            dump_id,
            catalog_id,
            name: name.into(),
            namespace: None,
            dump: DumpComponents::all(),
            dependencies: SmallVec::new(),
            details,
        }
    }

    /// The object's fieldless kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.details.kind()
    }

    /// Whether this object depends on `id`.
    #[must_use]
    pub fn depends_on(&self, id: DumpId) -> bool {
        self.dependencies.contains(&id)
    }
}
