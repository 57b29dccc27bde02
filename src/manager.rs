//! Scene manager: the scene registry, the active scene, and the deferred
//! transition protocol.
//!
//! At most one scene is active. A transition request (`change`) never takes
//! effect at the call site — it is recorded as pending and applied at the
//! top of the next `update`, which is the only place the pending flags are
//! consulted. That keeps the destructive part of a switch (abandoning the
//! old scene's member set) out of the middle of a frame's dispatch. Quit
//! works the same way: `quit` records intent, `update` reports it to the
//! caller, and the enclosing loop decides what to do with it.
//!
//! Registry operations (`add_scene`, `remove_scene`, `rename_scene`) mutate
//! immediately; they never interact with in-flight iteration.

use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::factory::ComponentFactory;
use crate::globals::GlobalEntities;
use crate::scene::Scene;

/// A recorded scene-transition request, applied at the next `update`.
struct ChangeRequest {
    target: String,
    /// Global entity names to re-attach into the arriving scene.
    awake: Vec<String>,
    /// Global entity names to re-attach and run `start` on.
    start: Vec<String>,
}

/// Coordinates all scenes and drives the active one each frame.
#[derive(Default)]
pub struct SceneManager {
    scenes: FxHashMap<String, Scene>,
    active: Option<String>,
    pending_change: Option<ChangeRequest>,
    pending_quit: bool,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Scene registry
    // -------------------------------------------------------------------

    /// Create and register a scene. `None` if the name is taken; the
    /// existing scene is left untouched.
    pub fn add_scene(&mut self, name: impl Into<String>) -> Option<&mut Scene> {
        let name = name.into();
        if self.scenes.contains_key(&name) {
            warn!("scene {name:?} already exists");
            return None;
        }
        debug!("scene {name:?} added");
        self.scenes.insert(name.clone(), Scene::new(name.clone()));
        self.scenes.get_mut(&name)
    }

    /// Drop a scene and its member set. Global entities it contained stay
    /// alive in the global store. Deactivates the scene if it was active.
    pub fn remove_scene(&mut self, name: &str) -> bool {
        if self.scenes.remove(name).is_none() {
            return false;
        }
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        debug!("scene {name:?} removed");
        true
    }

    pub fn get_scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn get_scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    /// Re-key a scene. Fails if `old` is absent or `new` is taken. The
    /// active-scene pointer follows the rename.
    pub fn rename_scene(&mut self, old: &str, new: &str) -> bool {
        if !self.scenes.contains_key(old) || self.scenes.contains_key(new) {
            return false;
        }
        let Some(mut scene) = self.scenes.remove(old) else {
            return false;
        };
        scene.set_name(new);
        self.scenes.insert(new.to_string(), scene);
        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
        }
        true
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Drop every scene and deactivate. Global entities survive.
    pub fn delete_all_scenes(&mut self) {
        info!("deleting all {} scenes", self.scenes.len());
        self.scenes.clear();
        self.active = None;
    }

    // -------------------------------------------------------------------
    // Active scene
    // -------------------------------------------------------------------

    /// Activate a scene immediately and run its once-only start pass.
    /// `false` if no such scene exists.
    pub fn set_active_scene(&mut self, name: &str, factory: &ComponentFactory) -> bool {
        if !self.scenes.contains_key(name) {
            warn!("cannot activate unknown scene {name:?}");
            return false;
        }
        info!("active scene set to {name:?}");
        self.active = Some(name.to_string());
        if let Some(scene) = self.scenes.get_mut(name) {
            scene.start(factory);
        }
        true
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.scenes.get(self.active.as_deref()?)
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        let name = self.active.clone()?;
        self.scenes.get_mut(&name)
    }

    // -------------------------------------------------------------------
    // Deferred transitions
    // -------------------------------------------------------------------

    /// Record a scene-transition request; the swap happens at the next
    /// `update`. Calling again before then replaces the earlier request —
    /// only the most recent target takes effect.
    pub fn change(&mut self, target: impl Into<String>, awake: Vec<String>, start: Vec<String>) {
        let target = target.into();
        if let Some(previous) = &self.pending_change {
            debug!(
                "pending scene change to {:?} superseded by {target:?}",
                previous.target
            );
        }
        self.pending_change = Some(ChangeRequest {
            target,
            awake,
            start,
        });
    }

    /// Request application shutdown. Reported by the next `update`; the
    /// manager never terminates the process itself.
    pub fn quit(&mut self) {
        self.pending_quit = true;
    }

    pub fn is_changing(&self) -> bool {
        self.pending_change.is_some()
    }

    pub fn is_quitting(&self) -> bool {
        self.pending_quit
    }

    /// Target of the pending transition, if one is recorded.
    pub fn next_scene(&self) -> Option<&str> {
        self.pending_change.as_ref().map(|c| c.target.as_str())
    }

    // -------------------------------------------------------------------
    // Frame entry point
    // -------------------------------------------------------------------

    /// Run one frame. Returns `true` when a quit has been requested, in
    /// which case no frame work is done and the caller should wind down.
    ///
    /// Otherwise: applies a pending scene change first, then drives the
    /// active scene through its passes in order — `process_new_entities`,
    /// `update`, `late_update`, `refresh`.
    pub fn update(
        &mut self,
        dt: f32,
        factory: &ComponentFactory,
        globals: &mut GlobalEntities,
    ) -> bool {
        if self.pending_quit {
            return true;
        }
        if let Some(request) = self.pending_change.take() {
            self.apply_change(request, factory, globals);
        }
        if let Some(name) = self.active.as_deref() {
            if let Some(scene) = self.scenes.get_mut(name) {
                scene.process_new_entities(globals);
                scene.update(dt, factory);
                scene.late_update(dt, factory);
                scene.refresh();
            }
        }
        false
    }

    /// Apply a recorded transition: swap the active pointer, re-attach the
    /// requested global entities, and start the arriving scene. The old
    /// scene stays registered with its members untouched.
    fn apply_change(
        &mut self,
        request: ChangeRequest,
        factory: &ComponentFactory,
        globals: &mut GlobalEntities,
    ) {
        let ChangeRequest {
            target,
            awake,
            start,
        } = request;
        if !self.scenes.contains_key(&target) {
            warn!("scene change requested to unknown scene {target:?}; request dropped");
            return;
        }
        info!(
            "switching active scene: {:?} -> {target:?}",
            self.active.as_deref()
        );
        self.active = Some(target.clone());
        let Some(scene) = self.scenes.get_mut(&target) else {
            return;
        };
        // Once-only start covers the scene's native members; it runs before
        // the lists so adopted entities are not started twice on a first
        // arrival.
        scene.start(factory);
        for name in awake {
            match globals.find(&name) {
                Some(entity) => scene.adopt(entity),
                None => warn!("awake list names unknown global entity {name:?}"),
            }
        }
        for name in start {
            match globals.find(&name) {
                Some(entity) => {
                    scene.adopt(Rc::clone(&entity));
                    entity.borrow_mut().start(factory);
                }
                None => warn!("start list names unknown global entity {name:?}"),
            }
        }
    }
}
