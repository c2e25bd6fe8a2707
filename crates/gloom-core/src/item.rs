//! Item definitions, instances and the rarity-keyed catalog
//!
//! The catalog owns immutable item *definitions* loaded from JSON. Scattering
//! asks it to stamp out *instances*, which the grid then owns and tiles
//! reference by id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::errors::CatalogError;
use crate::rng::GameRng;

/// Unique id of an item instance on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Sentinel for "not placed yet"
    pub const NONE: ItemId = ItemId(0);
}

/// Spawn rarity band
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Weight of this band in the spawn table
    pub const fn spawn_weight(&self) -> u32 {
        match self {
            Rarity::Common => 60,
            Rarity::Uncommon => 25,
            Rarity::Rare => 10,
            Rarity::Epic => 4,
            Rarity::Legendary => 1,
        }
    }

    /// Weight of the "spawn nothing" slot in the spawn table
    pub const NO_SPAWN_WEIGHT: u32 = 10;

    /// Sum of all band weights plus the no-spawn slot
    pub const fn total_spawn_weight() -> u32 {
        60 + 25 + 10 + 4 + 1 + Rarity::NO_SPAWN_WEIGHT
    }
}

/// Immutable description of an item, as loaded from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Stat deltas applied on use, keyed by stat name
    #[serde(default)]
    pub effects: HashMap<String, i32>,
}

fn default_stackable() -> bool {
    true
}

fn default_max_stack() -> u32 {
    99
}

/// A placed item instance
///
/// Carries just enough to render and pick up. Full definition data stays in
/// the catalog, reachable through [`ItemCatalog::find`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Grid-assigned id, [`ItemId::NONE`] until placed
    pub id: ItemId,
    pub name: String,
    pub rarity: Rarity,
}

/// JSON catalog file shape: `{ "items": [ ... ] }`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDef>,
}

/// All known item definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    defs: Vec<ItemDef>,
}

impl ItemCatalog {
    /// Empty catalog, scattering over it places nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| match source {
            CatalogError::Parse { source, .. } => CatalogError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse a catalog from JSON text
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(text).map_err(|source| CatalogError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        Ok(Self { defs: file.items })
    }

    /// A small built-in catalog for demos and tests
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(ItemDef {
            name: "Torch".to_string(),
            description: "A stubby torch. The pitch still smells fresh.".to_string(),
            rarity: Rarity::Common,
            stackable: true,
            max_stack: 10,
            effects: HashMap::new(),
        });
        catalog.register(ItemDef {
            name: "Cave Mushroom".to_string(),
            description: "Pale and rubbery. Probably edible.".to_string(),
            rarity: Rarity::Common,
            stackable: true,
            max_stack: 99,
            effects: HashMap::from([("hunger".to_string(), 10)]),
        });
        catalog.register(ItemDef {
            name: "Waterskin".to_string(),
            description: "A patched leather skin, half full.".to_string(),
            rarity: Rarity::Uncommon,
            stackable: false,
            max_stack: 1,
            effects: HashMap::from([("thirst".to_string(), 25)]),
        });
        catalog.register(ItemDef {
            name: "Miner's Pick".to_string(),
            description: "Notched from years of work on unforgiving stone.".to_string(),
            rarity: Rarity::Uncommon,
            stackable: false,
            max_stack: 1,
            effects: HashMap::new(),
        });
        catalog.register(ItemDef {
            name: "Glowstone Shard".to_string(),
            description: "A sliver of rock with a faint inner light.".to_string(),
            rarity: Rarity::Rare,
            stackable: true,
            max_stack: 5,
            effects: HashMap::new(),
        });
        catalog.register(ItemDef {
            name: "Silver Idol".to_string(),
            description: "A squat figure of an animal no one has named.".to_string(),
            rarity: Rarity::Epic,
            stackable: false,
            max_stack: 1,
            effects: HashMap::new(),
        });
        catalog.register(ItemDef {
            name: "Sunken Crown".to_string(),
            description: "Whoever wore this never left the caves.".to_string(),
            rarity: Rarity::Legendary,
            stackable: false,
            max_stack: 1,
            effects: HashMap::new(),
        });
        catalog
    }

    /// Add a definition
    pub fn register(&mut self, def: ItemDef) {
        self.defs.push(def);
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True when no definitions are loaded
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions, in load order
    pub fn defs(&self) -> &[ItemDef] {
        &self.defs
    }

    /// Look up a definition by name
    pub fn find(&self, name: &str) -> Option<&ItemDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// Definitions in a given rarity band, in load order
    pub fn of_rarity(&self, rarity: Rarity) -> Vec<&ItemDef> {
        self.defs.iter().filter(|d| d.rarity == rarity).collect()
    }

    /// Stamp out an instance of a random definition in `rarity`
    ///
    /// Returns `None` when no definition of that rarity is loaded. The
    /// instance id stays [`ItemId::NONE`] until a grid places it.
    pub fn create_instance(&self, rarity: Rarity, rng: &mut GameRng) -> Option<Item> {
        let candidates = self.of_rarity(rarity);
        let def = rng.choose(&candidates)?;
        Some(Item {
            id: ItemId::NONE,
            name: def.name.clone(),
            rarity: def.rarity,
        })
    }
}
