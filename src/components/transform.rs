//! Spatial placement component.
//!
//! Pure data: position, rotation and scale, read and written by sibling
//! components (movement, collision) and by external collaborators that need
//! a world position for an entity.

use std::any::Any;

use crate::component::Component;
use crate::factory::ComponentBuilder;
use crate::math::Vec2;
use crate::params::Parameters;

/// Position, rotation (degrees) and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Component for Transform {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds a [`Transform`] from `x`, `y`, `rotation`, `sx`, `sy`.
/// Every key is optional; a malformed value rejects the parameters.
pub struct TransformBuilder;

impl ComponentBuilder for TransformBuilder {
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        Some(Box::new(Transform {
            position: Vec2::new(params.f32_or("x", 0.0)?, params.f32_or("y", 0.0)?),
            rotation: params.f32_or("rotation", 0.0)?,
            scale: Vec2::new(params.f32_or("sx", 1.0)?, params.f32_or("sy", 1.0)?),
        }))
    }
}
