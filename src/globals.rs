//! Cross-scene persistent entity store.
//!
//! Entities promoted out of a scene land here and stay alive across scene
//! transitions and scene removal. The store is a plain value owned by the
//! frame loop and passed by reference wherever it is needed — there is no
//! process-wide static. Clearing it is an explicit teardown step; doing so
//! mid-session drops the store's share of every entity, so only references
//! held elsewhere keep them alive.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::entity::EntityRef;

/// Name-keyed store of entities that survive scene transitions.
#[derive(Default)]
pub struct GlobalEntities {
    entities: FxHashMap<String, EntityRef>,
}

impl GlobalEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, keyed by its current name. A name collision is logged
    /// and the newer entity wins.
    pub fn insert(&mut self, entity: EntityRef) {
        let name = entity.borrow().name().to_string();
        if self.entities.contains_key(&name) {
            warn!("global entity {name:?} replaces an existing one");
        } else {
            debug!("entity {name:?} promoted to global");
        }
        self.entities.insert(name, entity);
    }

    /// Find a global entity by name. Mirrors scene lookup semantics: an
    /// entity that has been soft-deleted is reported as absent.
    pub fn find(&self, name: &str) -> Option<EntityRef> {
        let entity = self.entities.get(name)?;
        if entity.borrow().is_active() {
            Some(Rc::clone(entity))
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Drop every stored entity. Full-teardown operation: anything not
    /// referenced elsewhere is destroyed here.
    pub fn clear(&mut self) {
        debug!("clearing {} global entities", self.entities.len());
        self.entities.clear();
    }
}
