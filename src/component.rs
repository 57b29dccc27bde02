//! Behavioral component trait and its dispatch context.
//!
//! A component is a unit of behavior attached to exactly one entity. The
//! entity drives it through the lifecycle hooks below; every hook receives a
//! [`Ctx`] that borrows the owning entity for the duration of the call, which
//! is how a component reaches its siblings (the owning-entity back-reference
//! of classic component models, scoped to the dispatch instead of stored).
//!
//! All hooks have empty default bodies so a component only implements what it
//! reacts to. The per-component `enabled` flag lives in the entity's slot and
//! gates dispatch uniformly; a disabled component receives no hooks at all.

use std::any::Any;

use crate::entity::{Entity, EntityRef};
use crate::factory::ComponentFactory;

/// Dispatch context handed to every component lifecycle hook.
///
/// Borrows the owning entity, so hooks can inspect and mutate sibling
/// components, soft-destroy the owner, or spawn new entities through the
/// owner's scene handle. Also carries the component factory so hooks can
/// attach further components to their owner.
pub struct Ctx<'a> {
    /// The entity this component is attached to. The component itself is
    /// detached from its slot while its hook runs, so the borrow is safe.
    pub owner: &'a mut Entity,
    /// Factory used for any component construction performed by the hook.
    pub factory: &'a ComponentFactory,
}

/// A polymorphic behavioral unit owned by exactly one entity.
///
/// Hooks run in this order within one frame: `update` across all live
/// entities, then `late_update` across all live entities. `start` runs once,
/// when the owning scene first becomes active. Collision hooks are delivered
/// by an external collision source through the owning entity and are never
/// dispatched to the component type that originated the event.
pub trait Component: Any {
    /// One-time setup, run when the owning scene starts.
    fn start(&mut self, _ctx: &mut Ctx<'_>) {}

    /// Per-frame behavior. `dt` is the seconds elapsed since the last frame.
    fn update(&mut self, _dt: f32, _ctx: &mut Ctx<'_>) {}

    /// Per-frame behavior that runs after every entity finished `update`.
    fn late_update(&mut self, _dt: f32, _ctx: &mut Ctx<'_>) {}

    /// The owner started colliding with `other`.
    fn on_collision_enter(&mut self, _other: &EntityRef, _ctx: &mut Ctx<'_>) {}

    /// The owner keeps colliding with `other` this frame.
    fn on_collision_stay(&mut self, _other: &EntityRef, _ctx: &mut Ctx<'_>) {}

    /// The owner stopped colliding with `other`.
    fn on_collision_exit(&mut self, _other: &EntityRef, _ctx: &mut Ctx<'_>) {}

    /// Upcast for typed access through [`Entity::component`].
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed access through [`Entity::component_mut`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
