//! Hit points with collision-driven damage.

use std::any::Any;

use log::debug;

use crate::component::{Component, Ctx};
use crate::entity::EntityRef;
use crate::factory::ComponentBuilder;
use crate::params::Parameters;

/// Hit points. Each collision start costs `damage_per_hit`; reaching zero
/// soft-destroys the owning entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub damage_per_hit: i32,
}

impl Health {
    pub fn new(max: i32, damage_per_hit: i32) -> Self {
        Self {
            current: max,
            max,
            damage_per_hit,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl Component for Health {
    fn on_collision_enter(&mut self, _other: &EntityRef, ctx: &mut Ctx<'_>) {
        self.current -= self.damage_per_hit;
        debug!(
            "entity {:?} took {} damage, {} hp left",
            ctx.owner.name(),
            self.damage_per_hit,
            self.current
        );
        if self.is_depleted() {
            ctx.owner.destroy();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds a [`Health`] from `max` (default 100) and `damage` (default 10).
pub struct HealthBuilder;

impl ComponentBuilder for HealthBuilder {
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        Some(Box::new(Health::new(
            params.i32_or("max", 100)?,
            params.i32_or("damage", 10)?,
        )))
    }
}
