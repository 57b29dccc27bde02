//! Scene lifecycle integration tests: buffered creation, soft delete with
//! deferred pruning, rename, and mid-frame spawn stability.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use stagehand::component::{Component, Ctx};
use stagehand::factory::ComponentFactory;
use stagehand::globals::GlobalEntities;
use stagehand::params::Parameters;
use stagehand::scene::Scene;

/// Run one frame over a scene in the manager's pass order.
fn tick(scene: &mut Scene, factory: &ComponentFactory, globals: &mut GlobalEntities) {
    scene.process_new_entities(globals);
    scene.update(1.0 / 60.0, factory);
    scene.late_update(1.0 / 60.0, factory);
    scene.refresh();
}

#[test]
fn added_entity_is_invisible_until_flush() {
    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");

    scene.add_entity("crate");
    assert!(scene.find_entity("crate").is_none());
    assert_eq!(scene.entity_count(), 0);

    scene.process_new_entities(&mut globals);
    assert!(scene.find_entity("crate").is_some());
    assert_eq!(scene.entity_count(), 1);
}

#[test]
fn soft_deleted_entity_lingers_until_refresh() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");

    scene.add_entity("crate");
    scene.process_new_entities(&mut globals);

    assert!(scene.remove_entity("crate"));
    // Still a member of the live map, but lookups treat it as gone.
    assert_eq!(scene.entity_count(), 1);
    assert!(scene.contains("crate"));
    assert!(scene.find_entity("crate").is_none());

    // The entity is still visited (and no-ops) until refresh prunes it.
    scene.update(1.0 / 60.0, &factory);
    scene.refresh();
    assert_eq!(scene.entity_count(), 0);
    assert!(!scene.contains("crate"));
}

#[test]
fn remove_entity_is_false_for_unknown_names() {
    let mut scene = Scene::new("level");
    assert!(!scene.remove_entity("nobody"));
}

#[test]
fn rename_entity_rekeys_the_live_map() {
    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");
    scene.add_entity("old");
    scene.add_entity("taken");
    scene.process_new_entities(&mut globals);

    assert!(!scene.rename_entity("missing", "new"));
    assert!(!scene.rename_entity("old", "taken"));

    assert!(scene.rename_entity("old", "new"));
    assert!(scene.find_entity("old").is_none());
    let renamed = scene.find_entity("new").unwrap();
    assert_eq!(renamed.borrow().name(), "new");
}

#[test]
fn pending_name_collision_keeps_the_newer_entity() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");

    let first = scene.add_entity("twin");
    first
        .borrow_mut()
        .add_component(&factory, "transform", &Parameters::new());
    scene.add_entity("twin");
    scene.process_new_entities(&mut globals);

    assert_eq!(scene.entity_count(), 1);
    // The second spawn won; it has no components.
    let survivor = scene.find_entity("twin").unwrap();
    assert_eq!(survivor.borrow().component_count(), 0);
}

#[test]
fn promotion_requires_live_membership() {
    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");

    scene.add_entity("hero");
    // Still pending: not a member yet.
    assert!(!scene.promote_to_global("hero"));

    scene.process_new_entities(&mut globals);
    assert!(scene.promote_to_global("hero"));
    assert!(globals.find("hero").is_none()); // queued, not yet flushed

    scene.process_new_entities(&mut globals);
    assert!(globals.find("hero").is_some());
}

// =============================================================================
// Mid-frame structural mutation
// =============================================================================

#[derive(Default, Clone)]
struct Counters {
    updates: Rc<Cell<u32>>,
}

struct Probe {
    counters: Counters,
}

impl Component for Probe {
    fn update(&mut self, _dt: f32, _ctx: &mut Ctx<'_>) {
        self.counters.updates.set(self.counters.updates.get() + 1);
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn register_probe(factory: &mut ComponentFactory, kind: &str) -> Counters {
    let counters = Counters::default();
    let shared = counters.clone();
    factory.register_fn(kind, move |_params: &Parameters| {
        Some(Box::new(Probe {
            counters: shared.clone(),
        }) as Box<dyn Component>)
    });
    counters
}

/// Spawns one "hatchling" sibling (carrying a probe) on its first update.
struct Spawner {
    done: bool,
}

impl Component for Spawner {
    fn update(&mut self, _dt: f32, ctx: &mut Ctx<'_>) {
        if self.done {
            return;
        }
        self.done = true;
        let factory = ctx.factory;
        if let Some(scene) = ctx.owner.scene() {
            let hatchling = scene.add_entity("hatchling");
            hatchling
                .borrow_mut()
                .add_component(factory, "probe", &Parameters::new());
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn entities_spawned_mid_update_join_next_frame() {
    let mut factory = ComponentFactory::new();
    let probe_counters = register_probe(&mut factory, "probe");
    factory.register_fn("spawner", |_params: &Parameters| {
        Some(Box::new(Spawner { done: false }) as Box<dyn Component>)
    });

    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");
    let nest = scene.add_entity("nest");
    nest.borrow_mut()
        .add_component(&factory, "spawner", &Parameters::new());

    // Frame 1: the nest becomes live and spawns mid-update. The hatchling
    // must not be visible, nor updated, within this frame.
    tick(&mut scene, &factory, &mut globals);
    assert!(scene.find_entity("hatchling").is_none());
    assert_eq!(scene.entity_count(), 1);
    assert_eq!(probe_counters.updates.get(), 0);

    // Frame 2: the pending buffer drains first, then the hatchling updates.
    tick(&mut scene, &factory, &mut globals);
    assert!(scene.find_entity("hatchling").is_some());
    assert_eq!(probe_counters.updates.get(), 1);
}

// =============================================================================
// Pass ordering
// =============================================================================

struct PassLogger {
    log: Rc<std::cell::RefCell<Vec<&'static str>>>,
}

impl Component for PassLogger {
    fn update(&mut self, _dt: f32, _ctx: &mut Ctx<'_>) {
        self.log.borrow_mut().push("update");
    }
    fn late_update(&mut self, _dt: f32, _ctx: &mut Ctx<'_>) {
        self.log.borrow_mut().push("late");
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn update_completes_across_all_entities_before_late_update() {
    let log: Rc<std::cell::RefCell<Vec<&'static str>>> = Rc::default();
    let mut factory = ComponentFactory::new();
    let shared = Rc::clone(&log);
    factory.register_fn("logger", move |_params: &Parameters| {
        Some(Box::new(PassLogger {
            log: Rc::clone(&shared),
        }) as Box<dyn Component>)
    });

    let mut globals = GlobalEntities::new();
    let mut scene = Scene::new("level");
    for name in ["a", "b", "c"] {
        let entity = scene.add_entity(name);
        entity
            .borrow_mut()
            .add_component(&factory, "logger", &Parameters::new());
    }

    tick(&mut scene, &factory, &mut globals);

    let recorded = log.borrow();
    assert_eq!(
        *recorded,
        vec!["update", "update", "update", "late", "late", "late"]
    );
}
