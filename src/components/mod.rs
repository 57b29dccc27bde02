//! Built-in component set.
//!
//! These are the components the runtime ships with; games register their own
//! alongside them through [`ComponentFactory::register`]. Type names are the
//! factory keys and double as the blueprint `kind` strings.

use std::rc::Rc;

use crate::factory::ComponentFactory;

pub mod collider;
pub mod health;
pub mod rigidbody;
pub mod transform;
pub mod ttl;

pub use collider::Collider;
pub use health::Health;
pub use rigidbody::RigidBody;
pub use transform::Transform;
pub use ttl::Ttl;

/// Component type name for [`Transform`].
pub const TRANSFORM: &str = "transform";
/// Component type name for [`RigidBody`].
pub const RIGIDBODY: &str = "rigidbody";
/// Component type name for [`Collider`]. Collision dispatch excludes this
/// type: the collider originates the events and must not re-receive them.
pub const COLLIDER: &str = "collider";
/// Component type name for [`Health`].
pub const HEALTH: &str = "health";
/// Component type name for [`Ttl`].
pub const TTL: &str = "ttl";

/// Register every built-in component builder.
pub fn register_defaults(factory: &mut ComponentFactory) {
    factory.register(TRANSFORM, Rc::new(transform::TransformBuilder));
    factory.register(RIGIDBODY, Rc::new(rigidbody::RigidBodyBuilder));
    factory.register(COLLIDER, Rc::new(collider::ColliderBuilder));
    factory.register(HEALTH, Rc::new(health::HealthBuilder));
    factory.register(TTL, Rc::new(ttl::TtlBuilder));
}
