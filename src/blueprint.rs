//! Structured scene-description input for bulk entity population.
//!
//! A blueprint is the in-memory shape consumed by `Scene::push_entities`:
//! an ordered list of entities, each naming the components to attach and the
//! parameters to build them with. The shape is serde-deserializable; the
//! demo loads it from JSON, but no serialization format is part of the
//! contract.
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "name": "player",
//!       "components": [
//!         { "kind": "transform", "params": { "x": "10", "y": "20" } },
//!         { "kind": "health", "params": { "max": "100" } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::params::Parameters;

/// One component to attach: its type name plus construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentBlueprint {
    pub kind: String,
    #[serde(default)]
    pub params: Parameters,
}

/// One entity to build, with its components in attach order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityBlueprint {
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentBlueprint>,
}

/// An ordered collection of entities to bulk-populate a scene with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneBlueprint {
    #[serde(default)]
    pub entities: Vec<EntityBlueprint>,
}

impl SceneBlueprint {
    /// Parse a blueprint from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("failed to parse scene blueprint: {e}"))
    }

    /// Load a blueprint from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read blueprint {}: {e}", path.display()))?;
        Self::from_json_str(&json)
    }
}
