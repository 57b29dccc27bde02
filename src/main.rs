//! Stagehand demo loop.
//!
//! A headless frame loop exercising the runtime end to end: two scenes, a
//! player promoted to the global store, drones drifting through the player
//! with collision routing, a deferred scene switch halfway through, and a
//! clean quit. The loop owns the context objects (factory, global store,
//! manager) and passes them down by reference — nothing in the runtime is
//! process-global.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 300
//! ```

use clap::Parser;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::rc::Rc;

use stagehand::blueprint::{ComponentBlueprint, EntityBlueprint, SceneBlueprint};
use stagehand::components::{COLLIDER, Collider, HEALTH, RIGIDBODY, TRANSFORM, TTL, Transform};
use stagehand::config::EngineConfig;
use stagehand::entity::EntityRef;
use stagehand::factory::ComponentFactory;
use stagehand::globals::GlobalEntities;
use stagehand::manager::SceneManager;
use stagehand::math::Vec2;
use stagehand::params::Parameters;
use stagehand::scene::Scene;

/// Stagehand scene runtime demo
#[derive(Parser)]
#[command(version, about = "Headless demo of the stagehand scene runtime")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene blueprint (JSON) to load into the opening scene.
    #[arg(long, value_name = "PATH")]
    blueprint: Option<PathBuf>,

    /// Override the number of frames to run.
    #[arg(long, value_name = "N")]
    frames: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults
    if let Some(frames) = cli.frames {
        config.max_frames = frames;
    }
    if cli.blueprint.is_some() {
        config.blueprint = cli.blueprint;
    }

    let factory = ComponentFactory::with_defaults();
    let mut globals = GlobalEntities::new();
    let mut manager = SceneManager::new();

    build_arena(&mut manager, &factory, &config);
    build_aftermath(&mut manager, &factory);
    manager.set_active_scene("arena", &factory);

    let dt = config.frame_dt();
    let mut collisions = CollisionTracker::default();
    let mut frame: u64 = 0;

    info!(
        "running {} frames at {} fps",
        config.max_frames, config.target_fps
    );
    loop {
        if manager.update(dt, &factory, &mut globals) {
            info!("quit requested, shutting down");
            break;
        }
        if let Some(scene) = manager.active_scene() {
            collisions.route(scene, &factory);
        }

        frame += 1;
        if frame == config.max_frames / 2 {
            // Deferred: takes effect at the top of the next update.
            manager.change("aftermath", vec!["player".to_string()], Vec::new());
        }
        if frame >= config.max_frames {
            manager.quit();
        }
    }

    info!(
        "done after {frame} frames; {} global entities survive",
        globals.len()
    );
    manager.delete_all_scenes();
    globals.clear();
}

/// Attach a component, logging instead of propagating a failure.
fn attach(entity: &EntityRef, factory: &ComponentFactory, kind: &str, params: Parameters) {
    let attached = entity
        .borrow_mut()
        .add_component(factory, kind, &params)
        .is_some();
    if !attached {
        warn!("failed to attach {kind:?} to {:?}", entity.borrow().name());
    }
}

/// Opening scene: a player plus a ring of drones drifting through it.
fn build_arena(manager: &mut SceneManager, factory: &ComponentFactory, config: &EngineConfig) {
    let Some(scene) = manager.add_scene("arena") else {
        return;
    };

    let blueprint = match &config.blueprint {
        Some(path) => match SceneBlueprint::load_from_file(path) {
            Ok(blueprint) => blueprint,
            Err(e) => {
                warn!("{e}; falling back to the built-in arena");
                built_in_arena()
            }
        },
        None => built_in_arena(),
    };
    if !scene.push_entities(&blueprint, factory) {
        warn!("arena blueprint loaded with errors");
    }

    // Survives the switch to the aftermath scene. Queued here; the store
    // receives it at the first process_new_entities.
    if !scene.promote_to_global("player") {
        warn!("no player entity to promote");
    }
}

/// Blueprint for the default arena when no file is given.
fn built_in_arena() -> SceneBlueprint {
    let mut blueprint = SceneBlueprint::default();
    blueprint.entities.push(EntityBlueprint {
        name: "player".to_string(),
        components: vec![
            ComponentBlueprint {
                kind: TRANSFORM.to_string(),
                params: Parameters::new().with("x", "0").with("y", "0"),
            },
            ComponentBlueprint {
                kind: COLLIDER.to_string(),
                params: Parameters::new().with("width", "2").with("height", "2"),
            },
            ComponentBlueprint {
                kind: HEALTH.to_string(),
                params: Parameters::new().with("max", "100").with("damage", "5"),
            },
        ],
    });
    for i in 0..6 {
        let angle = fastrand::f32() * std::f32::consts::TAU;
        let distance = 20.0 + fastrand::f32() * 10.0;
        blueprint.entities.push(EntityBlueprint {
            name: format!("drone-{i}"),
            components: vec![
                ComponentBlueprint {
                    kind: TRANSFORM.to_string(),
                    params: Parameters::new()
                        .with("x", (angle.cos() * distance).to_string())
                        .with("y", (angle.sin() * distance).to_string()),
                },
                ComponentBlueprint {
                    kind: RIGIDBODY.to_string(),
                    params: Parameters::new()
                        .with("vx", (-angle.cos() * 4.0).to_string())
                        .with("vy", (-angle.sin() * 4.0).to_string()),
                },
                ComponentBlueprint {
                    kind: COLLIDER.to_string(),
                    params: Parameters::new().with("width", "2").with("height", "2"),
                },
                ComponentBlueprint {
                    kind: TTL.to_string(),
                    params: Parameters::new().with("seconds", "8"),
                },
            ],
        });
    }
    blueprint
}

/// Second scene; the player is re-attached here through the awake list.
fn build_aftermath(manager: &mut SceneManager, factory: &ComponentFactory) {
    let Some(scene) = manager.add_scene("aftermath") else {
        return;
    };
    let beacon = scene.add_entity("beacon");
    attach(
        &beacon,
        factory,
        TRANSFORM,
        Parameters::new().with("x", "5").with("y", "5"),
    );
}

/// Pairwise AABB sweep over the active scene, turning overlap changes into
/// enter/stay/exit deliveries. Stands in for the physics collaborator.
#[derive(Default)]
struct CollisionTracker {
    previous: FxHashSet<(String, String)>,
}

impl CollisionTracker {
    fn route(&mut self, scene: &Scene, factory: &ComponentFactory) {
        let mut bodies: Vec<(String, EntityRef, Vec2, Collider)> = Vec::new();
        for entity in scene.entities() {
            let e = entity.borrow();
            if !e.is_active() {
                continue;
            }
            let (Some(transform), Some(collider)) = (
                e.component::<Transform>(TRANSFORM),
                e.component::<Collider>(COLLIDER),
            ) else {
                continue;
            };
            bodies.push((
                e.name().to_string(),
                Rc::clone(entity),
                transform.position,
                *collider,
            ));
        }

        let mut current: FxHashSet<(String, String)> = FxHashSet::default();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if bodies[i].3.overlaps(bodies[i].2, &bodies[j].3, bodies[j].2) {
                    let key = pair_key(&bodies[i].0, &bodies[j].0);
                    if self.previous.contains(&key) {
                        bodies[i].1.borrow_mut().on_collision_stay(&bodies[j].1, factory);
                        bodies[j].1.borrow_mut().on_collision_stay(&bodies[i].1, factory);
                    } else {
                        debug!("collision enter: {:?} <-> {:?}", bodies[i].0, bodies[j].0);
                        bodies[i].1.borrow_mut().on_collision_enter(&bodies[j].1, factory);
                        bodies[j].1.borrow_mut().on_collision_enter(&bodies[i].1, factory);
                    }
                    current.insert(key);
                } else {
                    let key = pair_key(&bodies[i].0, &bodies[j].0);
                    if self.previous.contains(&key) {
                        debug!("collision exit: {:?} <-> {:?}", bodies[i].0, bodies[j].0);
                        bodies[i].1.borrow_mut().on_collision_exit(&bodies[j].1, factory);
                        bodies[j].1.borrow_mut().on_collision_exit(&bodies[i].1, factory);
                    }
                }
            }
        }
        self.previous = current;
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
