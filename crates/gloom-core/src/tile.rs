//! Tile kinds and per-cell tile state
//!
//! Every cell of a [`crate::Grid`] owns its own `Tile` value. Builders copy
//! the kind's template fields into a fresh tile instead of sharing one
//! prototype, so mutating one cell can never bleed into another.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::item::ItemId;

/// RGB color used by renderers.
pub type Rgb = (u8, u8, u8);

/// Terrain kind of a map cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TileKind {
    /// Rough cave wall, blocks movement and most light
    #[default]
    Wall,
    /// Open cave floor
    Floor,
    /// Moss-covered wall, fully opaque
    MossyWall,
    /// Shallow water, passable but dims light
    Water,
}

impl TileKind {
    /// Does this kind block movement?
    pub const fn blocks_movement(&self) -> bool {
        matches!(self, TileKind::Wall | TileKind::MossyWall)
    }

    /// Is this kind wall-like terrain?
    pub const fn is_wall(&self) -> bool {
        matches!(self, TileKind::Wall | TileKind::MossyWall)
    }

    /// Fraction of light passing through a cell of this kind (0.0..=1.0)
    pub const fn transparency(&self) -> f32 {
        match self {
            // 0.1 keeps walls almost opaque while still letting rays
            // bleed one cell deep, which is what draws the soft shadows.
            TileKind::Wall => 0.1,
            TileKind::Floor => 1.0,
            TileKind::MossyWall => 0.0,
            TileKind::Water => 0.4,
        }
    }

    /// Base render color for this kind
    pub const fn base_color(&self) -> Rgb {
        match self {
            TileKind::Wall => (70, 70, 70),
            TileKind::Floor => (120, 100, 90),
            TileKind::MossyWall => (50, 100, 50),
            TileKind::Water => (30, 60, 100),
        }
    }

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            TileKind::Wall => "Cave Wall",
            TileKind::Floor => "Cave Floor",
            TileKind::MossyWall => "Mossy Wall",
            TileKind::Water => "Water",
        }
    }

    /// Flavor text shown when the cell is examined
    pub const fn flavor(&self) -> &'static str {
        match self {
            TileKind::Wall => {
                "The walls close in around you, rough and unyielding. Their cold, \
                 gray surface whispers of the darkness that dwells within."
            }
            TileKind::Floor => {
                "The ground is uneven, scattered with rocks. Every step echoes \
                 like a distant footstep in the vast, empty cavern."
            }
            TileKind::MossyWall => {
                "A thick layer of moss clings to the wall, cold and slick. You \
                 feel an unnatural dampness creeping along the stone."
            }
            TileKind::Water => {
                "The surface of the water reflects the faintest light, but \
                 something stirs beneath, waiting for the right moment to rise."
            }
        }
    }

    /// Map symbol for ASCII output
    pub const fn symbol(&self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::MossyWall => '"',
            TileKind::Water => '~',
        }
    }
}

/// Extra state carried by water cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterProps {
    /// Depth in abstract units, deeper water penalizes movement more
    pub depth: f32,
    /// Current speed, 0.0 for still pools
    pub flow_speed: f32,
}

impl Default for WaterProps {
    fn default() -> Self {
        Self {
            depth: 1.0,
            flow_speed: 0.0,
        }
    }
}

impl WaterProps {
    /// Wetness applied to entities wading through, scales with depth
    pub fn wetness(&self) -> f32 {
        0.1 * self.depth
    }

    /// Human-readable depth band
    pub fn depth_description(&self) -> &'static str {
        if self.depth <= 1.0 {
            "shallow"
        } else if self.depth <= 2.5 {
            "moderately deep"
        } else {
            "very deep"
        }
    }

    /// Human-readable flow band
    pub fn flow_description(&self) -> &'static str {
        if self.flow_speed == 0.0 {
            "still"
        } else if self.flow_speed <= 0.5 {
            "slow-moving"
        } else {
            "rapid"
        }
    }
}

/// One cell of the map
///
/// Movement and light fields are copied from the kind template at build time
/// so later systems (burning moss away, freezing water) can adjust a single
/// cell without touching its kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub kind: TileKind,
    pub color: Rgb,
    pub blocked: bool,
    pub transparency: f32,
    /// Present only on `TileKind::Water` cells
    pub water: Option<WaterProps>,
    /// Items resting on this cell, in placement order
    pub items: Vec<ItemId>,
}

impl Tile {
    /// Build a fresh tile of `kind` at (x, y) from the kind template
    pub fn new(kind: TileKind, x: usize, y: usize) -> Self {
        let water = match kind {
            TileKind::Water => Some(WaterProps::default()),
            _ => None,
        };
        Self {
            x,
            y,
            kind,
            color: kind.base_color(),
            blocked: kind.blocks_movement(),
            transparency: kind.transparency(),
            water,
            items: Vec::new(),
        }
    }

    /// Build a water tile with explicit depth and flow
    pub fn water(x: usize, y: usize, props: WaterProps) -> Self {
        let mut tile = Self::new(TileKind::Water, x, y);
        tile.water = Some(props);
        tile
    }

    /// Does this cell block movement?
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Is this cell wall-like terrain?
    pub fn is_wall(&self) -> bool {
        self.kind.is_wall()
    }

    /// Tile position as a pair
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Can an entity drink from this cell?
    pub fn is_drinkable(&self) -> bool {
        self.water.is_some()
    }

    /// Are any items resting here?
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Append an item reference
    pub fn add_item(&mut self, id: ItemId) {
        self.items.push(id);
    }

    /// Remove an item reference, true if it was present
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if let Some(pos) = self.items.iter().position(|&i| i == id) {
            self.items.remove(pos);
            true
        } else {
            false
        }
    }

    /// Flavor description, including water depth and flow when present
    pub fn examine(&self) -> String {
        match &self.water {
            Some(props) => format!(
                "The {} is {} and {}.",
                self.kind.name(),
                props.depth_description(),
                props.flow_description()
            ),
            None => self.kind.flavor().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_templates() {
        assert!(TileKind::Wall.blocks_movement());
        assert!(TileKind::MossyWall.blocks_movement());
        assert!(!TileKind::Floor.blocks_movement());
        assert!(!TileKind::Water.blocks_movement());

        assert_eq!(TileKind::Wall.transparency(), 0.1);
        assert_eq!(TileKind::Floor.transparency(), 1.0);
        assert_eq!(TileKind::MossyWall.transparency(), 0.0);
        assert_eq!(TileKind::Water.transparency(), 0.4);
    }

    #[test]
    fn test_new_copies_template() {
        let tile = Tile::new(TileKind::Wall, 3, 7);
        assert_eq!(tile.position(), (3, 7));
        assert_eq!(tile.color, (70, 70, 70));
        assert!(tile.blocked);
        assert!(tile.water.is_none());
        assert!(tile.items.is_empty());
    }

    #[test]
    fn test_tiles_do_not_share_state() {
        let mut a = Tile::new(TileKind::Floor, 0, 0);
        let b = Tile::new(TileKind::Floor, 1, 0);
        a.blocked = true;
        a.add_item(ItemId(9));
        assert!(!b.blocked);
        assert!(!b.has_items());
    }

    #[test]
    fn test_water_tile_props() {
        let tile = Tile::new(TileKind::Water, 2, 2);
        assert!(tile.is_drinkable());
        let props = tile.water.unwrap();
        assert_eq!(props.depth, 1.0);
        assert_eq!(props.flow_speed, 0.0);
        assert_eq!(props.wetness(), 0.1);

        let deep = Tile::water(
            4,
            4,
            WaterProps {
                depth: 3.0,
                flow_speed: 0.8,
            },
        );
        // Wetness scales linearly with depth.
        assert!((deep.water.unwrap().wetness() - 0.3).abs() < 1e-6);
        assert_eq!(deep.examine(), "The Water is very deep and rapid.");

        assert!(!Tile::new(TileKind::Floor, 0, 0).is_drinkable());
    }

    #[test]
    fn test_remove_item() {
        let mut tile = Tile::new(TileKind::Floor, 0, 0);
        tile.add_item(ItemId(1));
        tile.add_item(ItemId(2));
        assert!(tile.remove_item(ItemId(1)));
        assert!(!tile.remove_item(ItemId(1)));
        assert_eq!(tile.items, vec![ItemId(2)]);
    }

    #[test]
    fn test_symbols_are_distinct() {
        use strum::IntoEnumIterator;
        let mut symbols: Vec<char> = TileKind::iter().map(|k| k.symbol()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 4);
    }
}
