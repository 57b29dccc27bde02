//! Axis-aligned box collider.
//!
//! Holds the extents an external collision source uses to detect overlaps.
//! The source routes its findings back into the runtime through the owning
//! entity's `on_collision_*` methods; this component itself is excluded from
//! that dispatch (see [`crate::components::COLLIDER`]).

use std::any::Any;

use crate::component::Component;
use crate::factory::ComponentBuilder;
use crate::math::Vec2;
use crate::params::Parameters;

/// Box extents centered on the owning entity's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether two colliders at the given centers overlap.
    pub fn overlaps(&self, position: Vec2, other: &Collider, other_position: Vec2) -> bool {
        let delta = position - other_position;
        delta.x.abs() * 2.0 < self.width + other.width
            && delta.y.abs() * 2.0 < self.height + other.height
    }
}

impl Component for Collider {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds a [`Collider`] from `width`, `height` (default 1.0 each).
pub struct ColliderBuilder;

impl ComponentBuilder for ColliderBuilder {
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        Some(Box::new(Collider::new(
            params.f32_or("width", 1.0)?,
            params.f32_or("height", 1.0)?,
        )))
    }
}
