//! Kinematic movement component.
//!
//! Integrates its velocity into the sibling [`Transform`] every update. An
//! entity without a transform keeps the velocity but goes nowhere.

use std::any::Any;

use crate::component::{Component, Ctx};
use crate::components::{TRANSFORM, Transform};
use crate::factory::ComponentBuilder;
use crate::math::Vec2;
use crate::params::Parameters;

/// Velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

impl Component for RigidBody {
    fn update(&mut self, dt: f32, ctx: &mut Ctx<'_>) {
        let step = self.velocity * dt;
        if let Some(transform) = ctx.owner.component_mut::<Transform>(TRANSFORM) {
            transform.position += step;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds a [`RigidBody`] from `vx`, `vy` (both optional, default 0).
pub struct RigidBodyBuilder;

impl ComponentBuilder for RigidBodyBuilder {
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        Some(Box::new(RigidBody::new(Vec2::new(
            params.f32_or("vx", 0.0)?,
            params.f32_or("vy", 0.0)?,
        ))))
    }
}
