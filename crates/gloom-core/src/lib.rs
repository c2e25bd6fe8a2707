//! gloom-core: cave generation and visibility for Undergloom
//!
//! This crate builds tile maps (cellular-automata caves with moss, water
//! and scattered items) and runs the soft shadow-casting field of view
//! over them. It does no rendering and no input handling, frontends poll
//! a [`GenerationStatus`] while a worker thread builds the map, then draw
//! the finished [`Grid`] however they like.

pub mod config;
pub mod generation;
pub mod grid;
pub mod item;
pub mod progress;
pub mod region;
pub mod scatter;
pub mod tile;
pub mod visibility;
pub mod worker;

mod errors;
mod line;
mod rng;

pub use config::CaveConfig;
pub use errors::{CatalogError, GenerateError, GridError};
pub use generation::{generate, generate_playable};
pub use grid::Grid;
pub use item::{Item, ItemCatalog, ItemDef, ItemId, Rarity};
pub use line::bresenham_line;
pub use progress::{GenerationPhase, GenerationStatus, Progress};
pub use region::{Region, connect_regions, dominant_region, find_regions};
pub use rng::GameRng;
pub use scatter::{roll_rarity, scatter_items};
pub use tile::{Rgb, Tile, TileKind, WaterProps};
pub use visibility::update_visibility;
pub use worker::{GenerationHandle, spawn_generation};
