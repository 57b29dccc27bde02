//! Component factory: a registry mapping component type names to
//! construction/destruction strategies.
//!
//! The factory owns no component instances, only policy. Construction takes a
//! [`Parameters`] map and may fail (unknown type, rejected parameters), which
//! is reported as `None` rather than an error. Destruction routes a component
//! back through the same strategy that created it; entity slots capture their
//! builder so teardown stays symmetric even after the factory goes out of
//! reach.

use std::rc::Rc;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::component::Component;
use crate::params::Parameters;

/// Construction/destruction strategy for one component type.
pub trait ComponentBuilder {
    /// Build a component from `params`. `None` if the parameters are invalid.
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>>;

    /// Release a component created by this builder. The default policy is a
    /// plain drop; builders that hand out collaborator resources (render
    /// handles, audio channels) override this to release them.
    fn destroy(&self, component: Box<dyn Component>) {
        drop(component);
    }
}

/// Adapter so a closure can serve as a [`ComponentBuilder`].
struct FnBuilder<F>(F);

impl<F> ComponentBuilder for FnBuilder<F>
where
    F: Fn(&Parameters) -> Option<Box<dyn Component>>,
{
    fn create(&self, params: &Parameters) -> Option<Box<dyn Component>> {
        (self.0)(params)
    }
}

/// Registry of component builders, keyed by component type name.
#[derive(Default)]
pub struct ComponentFactory {
    builders: FxHashMap<String, Rc<dyn ComponentBuilder>>,
}

impl ComponentFactory {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in component set.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        crate::components::register_defaults(&mut factory);
        factory
    }

    /// Register a builder for `kind`. Returns `false` (and leaves the
    /// existing registration untouched) if the type name is already taken.
    pub fn register(&mut self, kind: impl Into<String>, builder: Rc<dyn ComponentBuilder>) -> bool {
        let kind = kind.into();
        if self.builders.contains_key(&kind) {
            warn!("component type {kind:?} is already registered");
            return false;
        }
        debug!("registered component type {kind:?}");
        self.builders.insert(kind, builder);
        true
    }

    /// Register a plain construction closure for `kind` (drop-based destroy).
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, build: F) -> bool
    where
        F: Fn(&Parameters) -> Option<Box<dyn Component>> + 'static,
    {
        self.register(kind, Rc::new(FnBuilder(build)))
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.builders.contains_key(kind)
    }

    /// Build a component of type `kind`. `None` if the type is unregistered
    /// or the builder rejected the parameters.
    pub fn create(&self, kind: &str, params: &Parameters) -> Option<Box<dyn Component>> {
        let Some(builder) = self.builders.get(kind) else {
            warn!("no component builder registered for {kind:?}");
            return None;
        };
        builder.create(params)
    }

    /// Release a component through the strategy registered for `kind`.
    /// An unregistered type falls back to a plain drop.
    pub fn destroy(&self, kind: &str, component: Box<dyn Component>) {
        match self.builders.get(kind) {
            Some(builder) => builder.destroy(component),
            None => {
                warn!("destroying component of unregistered type {kind:?}");
                drop(component);
            }
        }
    }

    pub(crate) fn builder(&self, kind: &str) -> Option<Rc<dyn ComponentBuilder>> {
        self.builders.get(kind).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use std::any::Any;

    struct Dummy;

    impl Component for Dummy {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut factory = ComponentFactory::new();
        assert!(factory.register_fn("dummy", |_| Some(Box::new(Dummy))));
        assert!(!factory.register_fn("dummy", |_| None));
        // The original registration still wins.
        assert!(factory.create("dummy", &Parameters::new()).is_some());
    }

    #[test]
    fn unregistered_type_fails_construction() {
        let factory = ComponentFactory::new();
        assert!(factory.create("ghost", &Parameters::new()).is_none());
    }

    #[test]
    fn builder_can_reject_parameters() {
        let mut factory = ComponentFactory::new();
        factory.register_fn("picky", |params: &Parameters| {
            params.get_f32("required")?;
            Some(Box::new(Dummy) as Box<dyn Component>)
        });

        assert!(factory.create("picky", &Parameters::new()).is_none());
        let params = Parameters::new().with("required", "1.0");
        assert!(factory.create("picky", &params).is_some());
    }
}
