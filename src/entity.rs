//! Entities: named, component-carrying objects that live inside scenes.
//!
//! An entity is a container of components, unique per component type name,
//! with an active flag and an optional link to its owning scene. Destroying
//! an entity is a soft delete: the flag flips, every dispatch path starts
//! refusing it, and the owning scene physically removes it at its next
//! `refresh`. That deferral is what lets components of other entities keep
//! holding references to it for the rest of the frame.
//!
//! Entities are shared-ownership objects ([`EntityRef`]): the scene's live
//! map, its pending buffers, the global store, and external collaborators may
//! all hold the same entity. The runtime is single-threaded by contract, so
//! `Rc<RefCell<_>>` is the whole story.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use smallvec::SmallVec;

use crate::component::{Component, Ctx};
use crate::components::COLLIDER;
use crate::factory::{ComponentBuilder, ComponentFactory};
use crate::params::Parameters;
use crate::scene::SceneHandle;

/// Shared handle to an entity.
pub type EntityRef = Rc<RefCell<Entity>>;

/// One attached component plus its slot-level bookkeeping.
///
/// The builder is captured at attach time so the component can be released
/// through the same policy that created it, wherever the entity ends up
/// being dropped. `component` is `None` only while its own hook runs.
struct Slot {
    kind: String,
    enabled: bool,
    builder: Rc<dyn ComponentBuilder>,
    component: Option<Box<dyn Component>>,
}

/// A named, lifecycle-managed container of components.
pub struct Entity {
    name: String,
    active: bool,
    scene: Option<SceneHandle>,
    slots: SmallVec<[Slot; 4]>,
}

impl Entity {
    /// Create a freestanding entity, not attached to any scene.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("entity {name:?} created");
        Self {
            name,
            active: true,
            scene: None,
            slots: SmallVec::new(),
        }
    }

    /// Create an entity bound to a scene. Used by the scene's spawn paths.
    pub(crate) fn with_scene(name: impl Into<String>, scene: SceneHandle) -> Self {
        let mut entity = Self::new(name);
        entity.scene = Some(scene);
        entity
    }

    /// Wrap the entity in its shared-ownership form.
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity itself. A scene re-keys its live map through
    /// `Scene::rename_entity`, which calls this.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Soft delete: mark inactive so the owning scene removes the entity at
    /// its next `refresh`. Nothing is freed here.
    pub fn destroy(&mut self) {
        if self.active {
            debug!("entity {:?} marked for removal", self.name);
        }
        self.active = false;
    }

    /// The owning scene, if the entity is attached to one.
    pub fn scene(&self) -> Option<&SceneHandle> {
        self.scene.as_ref()
    }

    pub(crate) fn set_scene(&mut self, scene: Option<SceneHandle>) {
        self.scene = scene;
    }

    // -------------------------------------------------------------------
    // Components
    // -------------------------------------------------------------------

    /// Attach a component of type `kind`, built by `factory` from `params`.
    ///
    /// Fails with `None` — leaving the entity unchanged — if a component of
    /// that type is already attached, if the type is unregistered, or if the
    /// builder rejects the parameters.
    pub fn add_component(
        &mut self,
        factory: &ComponentFactory,
        kind: impl Into<String>,
        params: &Parameters,
    ) -> Option<&mut dyn Component> {
        let kind = kind.into();
        if self.has_component(&kind) {
            debug!("entity {:?} already has a {kind:?} component", self.name);
            return None;
        }
        let builder = factory.builder(&kind)?;
        let Some(component) = builder.create(params) else {
            warn!(
                "entity {:?}: builder for {kind:?} rejected parameters",
                self.name
            );
            return None;
        };
        self.slots.push(Slot {
            kind,
            enabled: true,
            builder,
            component: Some(component),
        });
        self.slots.last_mut()?.component.as_deref_mut()
    }

    /// Detach and destroy the component of type `kind` through the builder
    /// that created it. `false` if no such component exists (a no-op, not an
    /// error).
    pub fn remove_component(&mut self, kind: &str) -> bool {
        let Some(index) = self.slots.iter().position(|slot| slot.kind == kind) else {
            return false;
        };
        let slot = self.slots.remove(index);
        if let Some(component) = slot.component {
            slot.builder.destroy(component);
        }
        debug!("entity {:?} removed component {kind:?}", self.name);
        true
    }

    pub fn has_component(&self, kind: &str) -> bool {
        self.slots.iter().any(|slot| slot.kind == kind)
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    /// Attached component type names, in attach order (the dispatch order).
    pub fn component_kinds(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.kind.as_str())
    }

    /// Typed access to the component stored under `kind`.
    pub fn component<T: Component>(&self, kind: &str) -> Option<&T> {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)?
            .component
            .as_ref()?
            .as_any()
            .downcast_ref()
    }

    /// Typed mutable access to the component stored under `kind`.
    pub fn component_mut<T: Component>(&mut self, kind: &str) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|slot| slot.kind == kind)?
            .component
            .as_mut()?
            .as_any_mut()
            .downcast_mut()
    }

    /// Gate a single component's dispatch without detaching it.
    /// `false` if no component of that type exists.
    pub fn set_component_enabled(&mut self, kind: &str, enabled: bool) -> bool {
        match self.slots.iter_mut().find(|slot| slot.kind == kind) {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Whether the component of type `kind` is dispatch-enabled.
    /// `false` if no such component exists.
    pub fn is_component_enabled(&self, kind: &str) -> bool {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)
            .is_some_and(|slot| slot.enabled)
    }

    // -------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------

    /// Run `start` on every enabled component. Called by the owning scene,
    /// once, when it first becomes active.
    pub fn start(&mut self, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, None, |component, ctx| component.start(ctx));
    }

    /// Dispatch `update` to every enabled component. No-op while inactive.
    pub fn update(&mut self, dt: f32, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, None, |component, ctx| component.update(dt, ctx));
    }

    /// Dispatch `late_update` to every enabled component. No-op while inactive.
    pub fn late_update(&mut self, dt: f32, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, None, |component, ctx| {
            component.late_update(dt, ctx)
        });
    }

    /// Deliver a collision-start event. The collider component originates
    /// these events and is excluded so it never re-receives its own report.
    pub fn on_collision_enter(&mut self, other: &EntityRef, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, Some(COLLIDER), |component, ctx| {
            component.on_collision_enter(other, ctx)
        });
    }

    /// Deliver a collision-continue event. See [`Self::on_collision_enter`].
    pub fn on_collision_stay(&mut self, other: &EntityRef, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, Some(COLLIDER), |component, ctx| {
            component.on_collision_stay(other, ctx)
        });
    }

    /// Deliver a collision-end event. See [`Self::on_collision_enter`].
    pub fn on_collision_exit(&mut self, other: &EntityRef, factory: &ComponentFactory) {
        if !self.active {
            return;
        }
        self.dispatch(factory, Some(COLLIDER), |component, ctx| {
            component.on_collision_exit(other, ctx)
        });
    }

    /// Take-and-put-back dispatch over the component slots, in attach order.
    ///
    /// Each component is detached from its slot while its hook runs so the
    /// hook may freely borrow the owning entity through [`Ctx`]. Hooks may
    /// add or remove components on the owner; components appended during the
    /// walk are picked up, and a component that removes itself is released
    /// through its builder once its hook returns.
    fn dispatch<F>(&mut self, factory: &ComponentFactory, exclude: Option<&str>, mut hook: F)
    where
        F: FnMut(&mut Box<dyn Component>, &mut Ctx<'_>),
    {
        let mut index = 0;
        while index < self.slots.len() {
            let skip = !self.slots[index].enabled
                || exclude.is_some_and(|kind| self.slots[index].kind == kind);
            if skip {
                index += 1;
                continue;
            }
            let kind = self.slots[index].kind.clone();
            let builder = Rc::clone(&self.slots[index].builder);
            let Some(mut component) = self.slots[index].component.take() else {
                index += 1;
                continue;
            };
            {
                let mut ctx = Ctx {
                    owner: self,
                    factory,
                };
                hook(&mut component, &mut ctx);
            }
            // Re-locate the slot by kind: the hook may have removed slots and
            // shifted positions. A missing slot means the hook removed its
            // own component; finish the job through its builder.
            match self.slots.iter().position(|slot| slot.kind == kind) {
                Some(pos) => {
                    self.slots[pos].component = Some(component);
                    index = pos + 1;
                }
                None => builder.destroy(component),
            }
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        for slot in self.slots.drain(..) {
            if let Some(component) = slot.component {
                slot.builder.destroy(component);
            }
        }
        debug!("entity {:?} dropped", self.name);
    }
}
