//! Object model and registry for dumpable database objects.
//!
//! A dump run materializes every schema object, data blob, and section
//! sentinel as a [`DumpObject`] with a dense [`DumpId`], a kind-specific
//! payload, and a list of outgoing dependency edges. The [`ObjectRegistry`]
//! owns the objects and provides the lookups the ordering core needs.

pub mod error;
pub mod object;
pub mod registry;

pub use error::CatalogError;
pub use object::{
    AttrDefDetails, CastDetails, CatalogId, CollationDetails, ConstraintDetails,
    DumpComponents, DumpId, DumpObject, FuncDetails, IndexDetails, ObjectDetails,
    ObjectKind, Oid, OpclassDetails, OperatorDetails, OperatorForm,
    PublicationMemberDetails, RelKind, RelStatsDetails, RuleDetails, Section,
    ShellTypeDetails, TableBoundDetails, TableDetails, TransformDetails, TypeDetails,
};
pub use registry::ObjectRegistry;
