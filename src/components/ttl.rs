//! Time-to-live component.
//!
//! Counts down each frame and soft-destroys the owning entity when the
//! remaining time reaches zero; the scene then prunes it at `refresh`.
//! Fire and forget, no callback.

use std::any::Any;

use crate::component::{Component, Ctx};
use crate::factory::ComponentBuilder;
use crate::params::Parameters;

/// Remaining lifetime in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ttl {
    pub remaining: f32,
}

impl Ttl {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

impl Component for Ttl {
    fn update(&mut self, dt: f32, ctx: &mut Ctx<'_>) {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
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

/// Builds a [`Ttl`] from `seconds`. The key is required; an absent or
/// malformed value rejects the parameters.
pub struct TtlBuilder;

impl ComponentBuilder for TtlBuilder {
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        Some(Box::new(Ttl::new(params.get_f32("seconds")?)))
    }
}
