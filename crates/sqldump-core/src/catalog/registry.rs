//! Object registry: ownership, lookup, and edge mutation.
//!
//! The registry owns every [`DumpObject`] for a run, stores them densely by
//! dump id, and maintains the OID indexes the type/name comparator resolves
//! natural keys through.

use fxhash::FxHashMap;

use super::error::CatalogError;
use super::object::{DumpId, DumpObject, ObjectDetails, Oid};

/// Owning store for a run's dump objects.
///
/// Lookup by dump id is a dense array access; type and access-method lookups
/// by OID go through secondary indexes maintained at registration time.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    /// Objects indexed by dump id; slot 0 is always empty.
    objects: Vec<Option<DumpObject>>,
    /// Catalog OID -> dump id, for types.
    types_by_oid: FxHashMap<Oid, DumpId>,
    /// Catalog OID -> dump id, for access methods.
    access_methods_by_oid: FxHashMap<Oid, DumpId>,
}

impl ObjectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object under its own dump id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ReservedDumpId`] for id zero and
    /// [`CatalogError::DuplicateDumpId`] if the id is already taken.
    pub fn register(&mut self, object: DumpObject) -> Result<DumpId, CatalogError> {
        let id = object.dump_id;
        if id.0 == 0 {
            return Err(CatalogError::ReservedDumpId);
        }
        if self.objects.len() <= id.index() {
            self.objects.resize_with(id.index() + 1, || None);
        }
        if self.objects[id.index()].is_some() {
            return Err(CatalogError::DuplicateDumpId(id));
        }

        match object.details {
            ObjectDetails::Type(_) => {
                self.types_by_oid.insert(object.catalog_id.oid, id);
            }
            ObjectDetails::AccessMethod => {
                self.access_methods_by_oid.insert(object.catalog_id.oid, id);
            }
            _ => {}
        }
        self.objects[id.index()] = Some(object);

        Ok(id)
    }

    /// Highest dump id ever registered (0 when empty).
    #[must_use]
    pub fn max_dump_id(&self) -> u32 {
        // Slot count tracks the largest registered DumpId, which is a u32.
        #[allow(clippy::cast_possible_truncation)]
        {
            self.objects.len().saturating_sub(1) as u32
        }
    }

    /// Number of registered objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|slot| slot.is_some()).count()
    }

    /// Looks up an object by dump id.
    #[must_use]
    pub fn find_by_dump_id(&self, id: DumpId) -> Option<&DumpObject> {
        self.objects.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable lookup by dump id.
    #[must_use]
    pub fn find_by_dump_id_mut(&mut self, id: DumpId) -> Option<&mut DumpObject> {
        self.objects.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Looks up a type object by its catalog OID.
    #[must_use]
    pub fn find_type_by_oid(&self, oid: Oid) -> Option<&DumpObject> {
        self.types_by_oid
            .get(&oid)
            .and_then(|id| self.find_by_dump_id(*id))
    }

    /// Looks up an access method by its catalog OID.
    #[must_use]
    pub fn find_access_method_by_oid(&self, oid: Oid) -> Option<&DumpObject> {
        self.access_methods_by_oid
            .get(&oid)
            .and_then(|id| self.find_by_dump_id(*id))
    }

    /// Appends a dependency edge: `of` must be emitted after `on`.
    ///
    /// Unknown ids are accepted; edges to unregistered objects are ignored by
    /// every traversal.
    pub fn add_dependency(&mut self, of: DumpId, on: DumpId) {
        if let Some(object) = self.find_by_dump_id_mut(of) {
            object.dependencies.push(on);
        }
    }

    /// Removes every dependency edge from `of` to `on`.
    pub fn remove_dependency(&mut self, of: DumpId, on: DumpId) {
        if let Some(object) = self.find_by_dump_id_mut(of) {
            object.dependencies.retain(|dep| *dep != on);
        }
    }

    /// Iterates over all registered objects in dump id order.
    pub fn objects(&self) -> impl Iterator<Item = &DumpObject> {
        self.objects.iter().filter_map(Option::as_ref)
    }

    /// All registered dump ids, ascending.
    #[must_use]
    pub fn dump_ids(&self) -> Vec<DumpId> {
        self.objects().map(|object| object.dump_id).collect()
    }
}
