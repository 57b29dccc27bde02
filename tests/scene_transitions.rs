//! Scene manager integration tests: deferred transitions, quit reporting,
//! and global-entity persistence across scene swaps.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use stagehand::component::{Component, Ctx};
use stagehand::factory::ComponentFactory;
use stagehand::globals::GlobalEntities;
use stagehand::manager::SceneManager;
use stagehand::params::Parameters;

const DT: f32 = 1.0 / 60.0;

#[derive(Default, Clone)]
struct Counters {
    starts: Rc<Cell<u32>>,
}

struct Probe {
    counters: Counters,
}

impl Component for Probe {
    fn start(&mut self, _ctx: &mut Ctx<'_>) {
        self.counters.starts.set(self.counters.starts.get() + 1);
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

/// Manager with empty scenes "a" and "b", "a" active.
fn two_scene_manager(factory: &ComponentFactory) -> SceneManager {
    let mut manager = SceneManager::new();
    manager.add_scene("a");
    manager.add_scene("b");
    assert!(manager.set_active_scene("a", factory));
    manager
}

fn active_name(manager: &SceneManager) -> Option<String> {
    manager.active_scene().map(|scene| scene.name())
}

#[test]
fn change_does_not_swap_until_update() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = two_scene_manager(&factory);

    manager.change("b", Vec::new(), Vec::new());
    assert!(manager.is_changing());
    assert_eq!(manager.next_scene(), Some("b"));
    assert_eq!(active_name(&manager), Some("a".to_string()));

    assert!(!manager.update(DT, &factory, &mut globals));
    assert_eq!(active_name(&manager), Some("b".to_string()));
    assert!(!manager.is_changing());
}

#[test]
fn latest_change_request_wins() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = two_scene_manager(&factory);
    manager.add_scene("c");

    manager.change("b", Vec::new(), Vec::new());
    manager.change("c", Vec::new(), Vec::new());
    manager.update(DT, &factory, &mut globals);

    assert_eq!(active_name(&manager), Some("c".to_string()));
}

#[test]
fn change_to_unknown_scene_is_dropped() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = two_scene_manager(&factory);

    manager.change("nowhere", Vec::new(), Vec::new());
    manager.update(DT, &factory, &mut globals);

    assert_eq!(active_name(&manager), Some("a".to_string()));
    assert!(!manager.is_changing());
}

#[test]
fn quit_is_reported_and_no_frame_runs() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = two_scene_manager(&factory);

    assert!(!manager.update(DT, &factory, &mut globals));
    manager.quit();
    assert!(manager.is_quitting());
    assert!(manager.update(DT, &factory, &mut globals));
    // Quit stays pending; the manager never clears it on its own.
    assert!(manager.update(DT, &factory, &mut globals));
}

#[test]
fn duplicate_scene_names_are_rejected() {
    let mut manager = SceneManager::new();
    assert!(manager.add_scene("a").is_some());
    assert!(manager.add_scene("a").is_none());
    assert_eq!(manager.scene_count(), 1);
}

#[test]
fn rename_scene_follows_the_active_pointer() {
    let factory = ComponentFactory::with_defaults();
    let mut manager = two_scene_manager(&factory);

    assert!(!manager.rename_scene("a", "b")); // taken
    assert!(!manager.rename_scene("missing", "c"));

    assert!(manager.rename_scene("a", "arena"));
    assert!(manager.get_scene("a").is_none());
    assert_eq!(active_name(&manager), Some("arena".to_string()));
}

#[test]
fn removing_the_active_scene_deactivates() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = two_scene_manager(&factory);

    assert!(manager.remove_scene("a"));
    assert!(manager.active_scene().is_none());
    // A frame with no active scene is a quiet no-op.
    assert!(!manager.update(DT, &factory, &mut globals));
}

#[test]
fn scene_start_runs_exactly_once() {
    let mut factory = ComponentFactory::new();
    let counters = register_probe(&mut factory, "probe");

    let mut manager = SceneManager::new();
    let mut globals = GlobalEntities::new();
    {
        let scene = manager.add_scene("a").unwrap();
        let entity = scene.add_entity("greeter");
        entity
            .borrow_mut()
            .add_component(&factory, "probe", &Parameters::new());
        scene.process_new_entities(&mut globals);
    }

    assert!(manager.set_active_scene("a", &factory));
    assert_eq!(counters.starts.get(), 1);

    // Re-activation does not re-run the start pass.
    assert!(manager.set_active_scene("a", &factory));
    assert_eq!(counters.starts.get(), 1);
}

// =============================================================================
// Global entities across transitions
// =============================================================================

/// Manager with scenes "a" and "b"; "a" holds a live, promoted "hero".
fn manager_with_global_hero(
    factory: &ComponentFactory,
    globals: &mut GlobalEntities,
) -> SceneManager {
    let mut manager = two_scene_manager(factory);
    {
        let scene = manager.get_scene_mut("a").unwrap();
        scene.add_entity("hero");
        scene.process_new_entities(globals);
        assert!(scene.promote_to_global("hero"));
    }
    // Drains the promotion into the global store.
    manager.update(DT, factory, globals);
    assert!(globals.find("hero").is_some());
    manager
}

#[test]
fn promoted_entity_survives_a_scene_round_trip() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = manager_with_global_hero(&factory, &mut globals);

    manager.change("b", Vec::new(), Vec::new());
    manager.update(DT, &factory, &mut globals);
    assert_eq!(active_name(&manager), Some("b".to_string()));
    assert!(globals.find("hero").is_some());

    manager.change("a", Vec::new(), Vec::new());
    manager.update(DT, &factory, &mut globals);
    assert_eq!(active_name(&manager), Some("a".to_string()));
    assert!(globals.find("hero").is_some());
}

#[test]
fn awake_list_reattaches_globals_into_the_arriving_scene() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = manager_with_global_hero(&factory, &mut globals);

    manager.change("b", vec!["hero".to_string()], Vec::new());
    manager.update(DT, &factory, &mut globals);

    let scene_b = manager.get_scene("b").unwrap();
    let hero = scene_b.find_entity("hero").unwrap();
    let scene_name = hero.borrow().scene().map(|handle| handle.name());
    assert_eq!(scene_name, Some("b".to_string()));
}

#[test]
fn start_list_runs_start_hooks_on_arrival() {
    let mut factory = ComponentFactory::new();
    let counters = register_probe(&mut factory, "probe");
    let mut globals = GlobalEntities::new();
    let mut manager = manager_with_global_hero(&factory, &mut globals);

    {
        let scene = manager.get_scene_mut("a").unwrap();
        let hero = scene.find_entity("hero").unwrap();
        hero.borrow_mut()
            .add_component(&factory, "probe", &Parameters::new());
    }

    manager.change("b", Vec::new(), vec!["hero".to_string()]);
    manager.update(DT, &factory, &mut globals);

    assert!(manager.get_scene("b").unwrap().find_entity("hero").is_some());
    assert_eq!(counters.starts.get(), 1);
}

#[test]
fn unknown_awake_names_are_skipped() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = manager_with_global_hero(&factory, &mut globals);

    manager.change("b", vec!["stranger".to_string()], Vec::new());
    manager.update(DT, &factory, &mut globals);

    assert_eq!(active_name(&manager), Some("b".to_string()));
    assert!(manager.get_scene("b").unwrap().find_entity("stranger").is_none());
}

#[test]
fn delete_all_scenes_keeps_global_entities_alive() {
    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = manager_with_global_hero(&factory, &mut globals);

    manager.delete_all_scenes();
    assert_eq!(manager.scene_count(), 0);
    assert!(manager.active_scene().is_none());

    let hero = globals.find("hero").unwrap();
    assert_eq!(hero.borrow().name(), "hero");

    globals.clear();
    assert!(globals.is_empty());
}
