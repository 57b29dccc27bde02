//! Scenes: named collections of entities sharing one update context.
//!
//! A scene owns the live entity map and drives the per-frame passes over it.
//! Structural mutation is two-phase: spawns requested at any time — including
//! from inside a component's `update` — land in a pending buffer behind a
//! shared [`SceneHandle`], and only `process_new_entities` moves them into
//! the live map. Removal is likewise deferred: `destroy`/`remove_entity`
//! flip the active flag, `refresh` prunes. Neither flush step ever runs
//! inside an iteration, which is what keeps the frame's entity set stable
//! under callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::blueprint::SceneBlueprint;
use crate::entity::{Entity, EntityRef};
use crate::factory::ComponentFactory;
use crate::globals::GlobalEntities;

/// Spawns and promotions requested since the last flush.
#[derive(Default)]
struct PendingEntities {
    /// Entities waiting to enter the live map.
    spawned: Vec<EntityRef>,
    /// Live entities waiting to be promoted into the global store.
    promoted: Vec<EntityRef>,
}

/// State shared between a scene and the handles held by its entities.
struct SceneShared {
    name: RefCell<String>,
    pending: RefCell<PendingEntities>,
}

/// Cheap, cloneable reference to a scene's identity and pending buffers.
///
/// Every entity attached to a scene carries one; it is how a component can
/// request a spawn mid-frame without touching the container being iterated.
#[derive(Clone)]
pub struct SceneHandle {
    shared: Rc<SceneShared>,
}

impl SceneHandle {
    /// Name of the scene this handle belongs to.
    pub fn name(&self) -> String {
        self.shared.name.borrow().clone()
    }

    /// Buffer a new entity bound to this scene and return it immediately.
    ///
    /// The entity joins the live map at the scene's next
    /// `process_new_entities`; until then lookups will not find it and it
    /// receives no callbacks.
    pub fn add_entity(&self, name: impl Into<String>) -> EntityRef {
        let entity = Entity::with_scene(name, self.clone()).into_ref();
        self.shared
            .pending
            .borrow_mut()
            .spawned
            .push(Rc::clone(&entity));
        entity
    }
}

/// A named container of entities with its own per-frame update passes.
pub struct Scene {
    shared: Rc<SceneShared>,
    entities: FxHashMap<String, EntityRef>,
    started: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            shared: Rc::new(SceneShared {
                name: RefCell::new(name.into()),
                pending: RefCell::new(PendingEntities::default()),
            }),
            entities: FxHashMap::default(),
            started: false,
        }
    }

    pub fn name(&self) -> String {
        self.shared.name.borrow().clone()
    }

    /// Rename the scene. Handles held by this scene's entities observe the
    /// new name immediately.
    pub fn set_name(&mut self, name: impl Into<String>) {
        *self.shared.name.borrow_mut() = name.into();
    }

    /// A handle onto this scene's pending buffers.
    pub fn handle(&self) -> SceneHandle {
        SceneHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    // -------------------------------------------------------------------
    // Entity management
    // -------------------------------------------------------------------

    /// Buffer a new entity for this scene. See [`SceneHandle::add_entity`].
    pub fn add_entity(&mut self, name: impl Into<String>) -> EntityRef {
        self.handle().add_entity(name)
    }

    /// Soft-delete the named live entity. `true` if it was found.
    pub fn remove_entity(&mut self, name: &str) -> bool {
        match self.entities.get(name) {
            Some(entity) => {
                entity.borrow_mut().destroy();
                true
            }
            None => false,
        }
    }

    /// Find a live, active entity by name. An entity that exists but has
    /// been soft-deleted is reported as absent.
    pub fn find_entity(&self, name: &str) -> Option<EntityRef> {
        let entity = self.entities.get(name)?;
        if entity.borrow().is_active() {
            Some(Rc::clone(entity))
        } else {
            None
        }
    }

    /// Re-key a live entity. Fails if `old` is absent or `new` is taken.
    pub fn rename_entity(&mut self, old: &str, new: &str) -> bool {
        if !self.entities.contains_key(old) || self.entities.contains_key(new) {
            return false;
        }
        let Some(entity) = self.entities.remove(old) else {
            return false;
        };
        entity.borrow_mut().set_name(new);
        self.entities.insert(new.to_string(), entity);
        true
    }

    /// Live entities, pending ones excluded.
    pub fn entities(&self) -> impl Iterator<Item = &EntityRef> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether a live entity of this name exists, active or not.
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Queue a live entity for promotion into the global store, so it
    /// survives scene transitions. `false` if the entity is not a current
    /// member of this scene. The promotion lands at the next
    /// `process_new_entities`.
    pub fn promote_to_global(&mut self, name: &str) -> bool {
        let Some(entity) = self.entities.get(name) else {
            return false;
        };
        self.shared
            .pending
            .borrow_mut()
            .promoted
            .push(Rc::clone(entity));
        debug!("scene {:?}: queued {name:?} for global promotion", self.name());
        true
    }

    /// Insert an already-built entity into the live map and bind it to this
    /// scene. Used when re-attaching global entities on scene arrival.
    pub(crate) fn adopt(&mut self, entity: EntityRef) {
        let name = {
            let mut e = entity.borrow_mut();
            e.set_scene(Some(self.handle()));
            e.name().to_string()
        };
        if self.entities.contains_key(&name) {
            warn!(
                "scene {:?}: adopting {name:?} replaces a live entity of the same name",
                self.name()
            );
        }
        self.entities.insert(name, entity);
    }

    // -------------------------------------------------------------------
    // Frame passes
    // -------------------------------------------------------------------

    /// Run the once-only start pass over the entities present right now.
    /// Later calls are no-ops; entities added afterwards do not get a
    /// retroactive start.
    pub fn start(&mut self, factory: &ComponentFactory) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            "scene {:?} starting with {} entities",
            self.name(),
            self.entities.len()
        );
        for entity in self.entities.values() {
            entity.borrow_mut().start(factory);
        }
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Dispatch `update` across the live entity set.
    pub fn update(&mut self, dt: f32, factory: &ComponentFactory) {
        for entity in self.entities.values() {
            entity.borrow_mut().update(dt, factory);
        }
    }

    /// Dispatch `late_update` across the live entity set. Runs only after
    /// `update` has completed for every entity.
    pub fn late_update(&mut self, dt: f32, factory: &ComponentFactory) {
        for entity in self.entities.values() {
            entity.borrow_mut().late_update(dt, factory);
        }
    }

    /// Physically remove soft-deleted entities from the live map. Runs after
    /// both update passes so this frame's callbacks saw a stable set.
    pub fn refresh(&mut self) {
        let scene_name = self.name();
        self.entities.retain(|name, entity| {
            let active = entity.borrow().is_active();
            if !active {
                debug!("scene {scene_name:?}: pruning {name:?}");
            }
            active
        });
    }

    /// Drain the pending buffers: spawned entities enter the live map,
    /// promoted entities enter the global store. A pending name colliding
    /// with a live one is the caller's naming discipline failing; the newer
    /// entity wins and the collision is logged.
    pub fn process_new_entities(&mut self, globals: &mut GlobalEntities) {
        let (spawned, promoted) = {
            let mut pending = self.shared.pending.borrow_mut();
            (
                std::mem::take(&mut pending.spawned),
                std::mem::take(&mut pending.promoted),
            )
        };
        for entity in spawned {
            let name = entity.borrow().name().to_string();
            if self.entities.contains_key(&name) {
                warn!(
                    "scene {:?}: pending entity {name:?} replaces a live entity of the same name",
                    self.name()
                );
            }
            self.entities.insert(name, entity);
        }
        for entity in promoted {
            globals.insert(entity);
        }
    }

    // -------------------------------------------------------------------
    // Bulk population
    // -------------------------------------------------------------------

    /// Build entities and their components from a blueprint, straight into
    /// the live map (bulk population is a load-time operation, never run
    /// inside frame dispatch).
    ///
    /// Best-effort, not transactional: a component that fails to build is
    /// reported through the `false` return, but entities and components
    /// already created — including earlier components of the failing entity —
    /// stay in place.
    pub fn push_entities(&mut self, blueprint: &SceneBlueprint, factory: &ComponentFactory) -> bool {
        let mut all_built = true;
        for entry in &blueprint.entities {
            let entity = Entity::with_scene(entry.name.clone(), self.handle()).into_ref();
            {
                let mut e = entity.borrow_mut();
                for component in &entry.components {
                    if e.add_component(factory, component.kind.clone(), &component.params)
                        .is_none()
                    {
                        warn!(
                            "scene {:?}: could not build component {:?} for entity {:?}",
                            self.name(),
                            component.kind,
                            entry.name
                        );
                        all_built = false;
                    }
                }
            }
            if self.entities.contains_key(&entry.name) {
                warn!(
                    "scene {:?}: blueprint entity {:?} replaces a live entity of the same name",
                    self.name(),
                    entry.name
                );
            }
            self.entities.insert(entry.name.clone(), entity);
        }
        all_built
    }
}
