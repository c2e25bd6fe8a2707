//! Map grid structure
//!
//! A rectangular field of [`Tile`] cells plus the transient visibility plane,
//! the persistent explored plane and the pool of placed item instances.
//! Dimensions are fixed at build time. Every cell owns its tile value, so no
//! two coordinates can ever alias the same tile.

use serde::{Deserialize, Serialize};

use crate::errors::GridError;
use crate::item::{Item, ItemId};
use crate::rng::GameRng;
use crate::tile::{Tile, TileKind};

/// Random spawn probes before falling back to a linear scan.
const WALKABLE_PROBE_ATTEMPTS: usize = 1000;

/// Complete map grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,

    /// Cells in row-major order
    cells: Vec<Tile>,

    /// Currently visible cells (in the viewer's field of view)
    visible: Vec<bool>,

    /// Explored cells (seen at some point)
    explored: Vec<bool>,

    /// Debug switch: when set, visibility updates are skipped entirely
    fully_revealed: bool,

    /// All item instances placed on this grid
    items: Vec<Item>,

    /// Next item id to assign
    next_item_id: u32,
}

impl Grid {
    /// Create a new grid filled with `fill` tiles
    pub fn new(width: usize, height: usize, fill: TileKind) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Tile::new(fill, x, y));
            }
        }
        Self {
            width,
            height,
            cells,
            visible: vec![false; width * height],
            explored: vec![false; width * height],
            fully_revealed: false,
            items: Vec::new(),
            next_item_id: 1,
        }
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Check if position is inside the grid
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Get tile at position, error on out-of-bounds
    pub fn get(&self, x: i32, y: i32) -> Result<&Tile, GridError> {
        if !self.in_bounds(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(&self.cells[self.idx(x as usize, y as usize)])
    }

    /// Get mutable tile at position, error on out-of-bounds
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, GridError> {
        if !self.in_bounds(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.idx(x as usize, y as usize);
        Ok(&mut self.cells[i])
    }

    /// Get tile at position, `None` when out-of-bounds
    ///
    /// Probing flavor of [`Grid::get`] for callers that walk off the edge
    /// on purpose.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.get(x, y).ok()
    }

    /// Direct cell access for generation loops that pre-clip their ranges
    pub(crate) fn cell(&self, x: usize, y: usize) -> &Tile {
        &self.cells[self.idx(x, y)]
    }

    pub(crate) fn cell_mut(&mut self, x: usize, y: usize) -> &mut Tile {
        let i = self.idx(x, y);
        &mut self.cells[i]
    }

    /// Replace a cell with a freshly built tile, positioned by the tile itself
    pub(crate) fn set_cell(&mut self, tile: Tile) {
        let i = self.idx(tile.x, tile.y);
        self.cells[i] = tile;
    }

    /// Check if position can be moved onto
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        match self.tile_at(x, y) {
            Some(tile) => !tile.blocked,
            None => false,
        }
    }

    /// Count all walkable cells
    pub fn count_walkable(&self) -> usize {
        self.cells.iter().filter(|t| !t.blocked).count()
    }

    /// Iterate over all cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter()
    }

    /// Check if a cell is currently visible
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.visible[self.idx(x as usize, y as usize)]
    }

    /// Check if a cell has been seen at some point
    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.explored[self.idx(x as usize, y as usize)]
    }

    /// Mark a cell visible, silently ignoring out-of-bounds
    pub fn set_visible(&mut self, x: i32, y: i32, visible: bool) {
        if self.in_bounds(x, y) {
            let i = self.idx(x as usize, y as usize);
            self.visible[i] = visible;
        }
    }

    /// Mark a cell explored, silently ignoring out-of-bounds
    ///
    /// Exploration never reverts, so there is no way to unset it.
    pub fn set_explored(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let i = self.idx(x as usize, y as usize);
            self.explored[i] = true;
        }
    }

    /// Clear the whole visibility plane
    pub(crate) fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    /// Light the whole visibility plane
    pub(crate) fn fill_visible(&mut self) {
        self.visible.fill(true);
    }

    /// Is the debug reveal switch on?
    pub fn fully_revealed(&self) -> bool {
        self.fully_revealed
    }

    /// Reveal the whole map and stop future visibility updates
    pub fn reveal_all(&mut self) {
        self.fully_revealed = true;
        self.visible.fill(true);
        self.explored.fill(true);
    }

    /// Find a walkable cell, preferring a random one
    ///
    /// Probes random interior positions first (the border ring is always
    /// wall), then falls back to scanning the whole grid. Returns `None`
    /// only when no walkable cell exists at all.
    pub fn find_walkable_tile(&self, rng: &mut GameRng) -> Option<(i32, i32)> {
        if self.width > 2 && self.height > 2 {
            for _ in 0..WALKABLE_PROBE_ATTEMPTS {
                let x = (1 + rng.index(self.width - 2)) as i32;
                let y = (1 + rng.index(self.height - 2)) as i32;
                if self.is_walkable(x, y) {
                    return Some((x, y));
                }
            }
            log::warn!(
                "no walkable cell hit in {WALKABLE_PROBE_ATTEMPTS} probes, scanning"
            );
        }
        self.cells
            .iter()
            .find(|t| !t.blocked)
            .map(|t| (t.x as i32, t.y as i32))
    }

    /// Place an item instance on a cell, assigning its id
    pub fn place_item_at(&mut self, x: i32, y: i32, mut item: Item) -> Result<ItemId, GridError> {
        let id = ItemId(self.next_item_id);
        let tile = self.get_mut(x, y)?;
        item.id = id;
        tile.add_item(id);
        self.items.push(item);
        self.next_item_id += 1;
        Ok(id)
    }

    /// Get item instances resting on a cell, in placement order
    pub fn items_at(&self, x: i32, y: i32) -> Vec<&Item> {
        let Some(tile) = self.tile_at(x, y) else {
            return Vec::new();
        };
        tile.items
            .iter()
            .filter_map(|id| self.items.iter().find(|i| i.id == *id))
            .collect()
    }

    /// Look up an item instance by id
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Remove and return every item resting on a cell
    pub fn take_items_at(&mut self, x: i32, y: i32) -> Vec<Item> {
        let Ok(tile) = self.get_mut(x, y) else {
            return Vec::new();
        };
        let ids = std::mem::take(&mut tile.items);
        let mut taken = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = self.items.iter().position(|i| i.id == id) {
                taken.push(self.items.remove(pos));
            }
        }
        taken
    }

    /// Total item instances on the grid
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
