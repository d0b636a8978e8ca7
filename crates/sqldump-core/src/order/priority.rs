//! Sort priority for dump object kinds.
//!
//! Objects are sorted by kind priority, and within a priority by name. The
//! priorities partition kinds into the pre-data, data, and post-data bands,
//! split by the two boundary sentinels; they must agree exactly with the
//! section each kind is emitted in.
//!
//! Triggers, event triggers, and matview refreshes are intentionally late:
//! triggers must not interfere with data loading, event triggers must not
//! fire against object creation of any kind, and matview refreshes must run
//! in the database's final restored state.
//!
//! Casts are intentionally earlier than the functions they usually depend on.
//! The backend records views that use casts as dependent on the cast's
//! underlying function; sorting casts first lets the dependency sort hoist
//! exactly the functions casts need (and in turn the views those functions
//! need) while leaving unrelated views in their natural late position.

use crate::catalog::object::{ObjectKind, Section};

/// Priority levels, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortPriority {
    /// Schemas come first.
    Schema,
    /// Procedural languages.
    ProcLang,
    /// Collations.
    Collation,
    /// Transforms.
    Transform,
    /// Extensions.
    Extension,
    /// Types and shell types.
    Type,
    /// Casts, deliberately before functions.
    Cast,
    /// Functions.
    Func,
    /// Aggregates.
    Agg,
    /// Access methods.
    AccessMethod,
    /// Operators.
    Operator,
    /// Operator families and classes.
    Opfamily,
    /// Conversions.
    Conversion,
    /// Text search parsers.
    TsParser,
    /// Text search templates.
    TsTemplate,
    /// Text search dictionaries.
    TsDict,
    /// Text search configurations.
    TsConfig,
    /// Foreign-data wrappers.
    Fdw,
    /// Foreign servers.
    ForeignServer,
    /// Relations.
    Table,
    /// Partition attaches.
    TableAttach,
    /// Dummy types.
    DummyType,
    /// Column defaults.
    AttrDef,
    /// End of the pre-data section.
    PreDataBoundary,
    /// Table data.
    TableData,
    /// Sequence states.
    SequenceSet,
    /// Large object metadata.
    LargeObject,
    /// Large object contents.
    LargeObjectData,
    /// Relation statistics.
    RelStats,
    /// Start of the post-data section.
    PostDataBoundary,
    /// Constraints.
    Constraint,
    /// Indexes.
    Index,
    /// Index partition attaches.
    IndexAttach,
    /// Extended statistics.
    StatsExt,
    /// Rules.
    Rule,
    /// Triggers.
    Trigger,
    /// Foreign-key constraints.
    FkConstraint,
    /// Policies.
    Policy,
    /// Publications.
    Publication,
    /// Publication tables.
    PublicationRel,
    /// Publication tables-in-schema.
    PublicationTableInSchema,
    /// Subscriptions.
    Subscription,
    /// Subscription relations.
    SubscriptionRel,
    /// Default ACLs, done in the ACL pass.
    DefaultAcl,
    /// Event triggers, next to last.
    EventTrigger,
    /// Matview refreshes, last.
    RefreshMatView,
}

impl SortPriority {
    /// The emission section this priority belongs to.
    #[must_use]
    pub fn section(self) -> Section {
        if self <= SortPriority::PreDataBoundary {
            Section::PreData
        } else if self < SortPriority::PostDataBoundary {
            Section::Data
        } else {
            Section::PostData
        }
    }
}

impl ObjectKind {
    /// Sort priority for this kind.
    ///
    /// The match is total, so adding a kind without choosing its priority is
    /// a compile error.
    #[must_use]
    pub fn priority(self) -> SortPriority {
        match self {
            ObjectKind::Schema => SortPriority::Schema,
            ObjectKind::ProcLang => SortPriority::ProcLang,
            ObjectKind::Collation => SortPriority::Collation,
            ObjectKind::Transform => SortPriority::Transform,
            ObjectKind::Extension => SortPriority::Extension,
            ObjectKind::Type | ObjectKind::ShellType => SortPriority::Type,
            ObjectKind::Cast => SortPriority::Cast,
            ObjectKind::Func => SortPriority::Func,
            ObjectKind::Agg => SortPriority::Agg,
            ObjectKind::AccessMethod => SortPriority::AccessMethod,
            ObjectKind::Operator => SortPriority::Operator,
            ObjectKind::Opclass | ObjectKind::Opfamily => SortPriority::Opfamily,
            ObjectKind::Conversion => SortPriority::Conversion,
            ObjectKind::TsParser => SortPriority::TsParser,
            ObjectKind::TsTemplate => SortPriority::TsTemplate,
            ObjectKind::TsDict => SortPriority::TsDict,
            ObjectKind::TsConfig => SortPriority::TsConfig,
            ObjectKind::Fdw => SortPriority::Fdw,
            ObjectKind::ForeignServer => SortPriority::ForeignServer,
            ObjectKind::Table => SortPriority::Table,
            ObjectKind::TableAttach => SortPriority::TableAttach,
            ObjectKind::DummyType => SortPriority::DummyType,
            ObjectKind::AttrDef => SortPriority::AttrDef,
            ObjectKind::PreDataBoundary => SortPriority::PreDataBoundary,
            ObjectKind::TableData => SortPriority::TableData,
            ObjectKind::SequenceSet => SortPriority::SequenceSet,
            ObjectKind::LargeObject => SortPriority::LargeObject,
            ObjectKind::LargeObjectData => SortPriority::LargeObjectData,
            ObjectKind::RelStats => SortPriority::RelStats,
            ObjectKind::PostDataBoundary => SortPriority::PostDataBoundary,
            ObjectKind::Constraint => SortPriority::Constraint,
            ObjectKind::Index => SortPriority::Index,
            ObjectKind::IndexAttach => SortPriority::IndexAttach,
            ObjectKind::StatsExt => SortPriority::StatsExt,
            ObjectKind::Rule => SortPriority::Rule,
            ObjectKind::Trigger => SortPriority::Trigger,
            ObjectKind::FkConstraint => SortPriority::FkConstraint,
            ObjectKind::Policy => SortPriority::Policy,
            ObjectKind::Publication => SortPriority::Publication,
            ObjectKind::PublicationRel => SortPriority::PublicationRel,
            ObjectKind::PublicationTableInSchema => {
                SortPriority::PublicationTableInSchema
            }
            ObjectKind::Subscription => SortPriority::Subscription,
            ObjectKind::SubscriptionRel => SortPriority::SubscriptionRel,
            ObjectKind::DefaultAcl => SortPriority::DefaultAcl,
            ObjectKind::EventTrigger => SortPriority::EventTrigger,
            ObjectKind::RefreshMatView => SortPriority::RefreshMatView,
        }
    }

    /// Emission section for this kind.
    #[must_use]
    pub fn section(self) -> Section {
        self.priority().section()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_priority() {
        // The match in priority() is exhaustive; this pins the kind count so
        // a new kind also forces a look at ALL and the tests built on it.
        assert_eq!(ObjectKind::ALL.len(), 48);
        for kind in ObjectKind::ALL {
            let _ = kind.priority();
        }
    }

    #[test]
    fn bands_are_split_by_the_boundaries() {
        let pre = ObjectKind::PreDataBoundary.priority();
        let post = ObjectKind::PostDataBoundary.priority();
        assert!(pre < post);

        for kind in ObjectKind::ALL {
            let priority = kind.priority();
            match priority.section() {
                Section::PreData => assert!(priority <= pre),
                Section::Data => assert!(priority > pre && priority < post),
                Section::PostData => assert!(priority >= post),
            }
        }
    }

    #[test]
    fn deliberate_orderings_hold() {
        assert!(ObjectKind::Cast.priority() < ObjectKind::Func.priority());
        assert!(ObjectKind::EventTrigger.priority() > ObjectKind::DefaultAcl.priority());
        assert!(ObjectKind::RefreshMatView.priority() > ObjectKind::EventTrigger.priority());
        assert_eq!(ObjectKind::Type.priority(), ObjectKind::ShellType.priority());
        assert_eq!(ObjectKind::Opclass.priority(), ObjectKind::Opfamily.priority());
        assert_eq!(ObjectKind::TableData.priority().section(), Section::Data);
    }
}
