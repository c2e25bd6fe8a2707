//! Rarity-weighted item scattering

use strum::IntoEnumIterator;

use crate::grid::Grid;
use crate::item::{ItemCatalog, Rarity};
use crate::rng::GameRng;

/// Roll the spawn table: a rarity band, or `None` for the no-spawn slot
pub fn roll_rarity(rng: &mut GameRng) -> Option<Rarity> {
    let mut roll = rng.index(Rarity::total_spawn_weight() as usize) as u32;
    for rarity in Rarity::iter() {
        let weight = rarity.spawn_weight();
        if roll < weight {
            return Some(rarity);
        }
        roll -= weight;
    }
    None
}

/// Scatter catalog items across open cells, one per `density` cells
///
/// Open means walkable and currently item-free, so a single pass never
/// stacks two items on one cell. Returns the number of items placed, which
/// falls short of the target when the spawn table rolls empty or the
/// catalog has no definition for the rolled band.
pub fn scatter_items(
    grid: &mut Grid,
    catalog: &ItemCatalog,
    rng: &mut GameRng,
    density: usize,
) -> usize {
    if density == 0 {
        return 0;
    }
    let target = grid.cell_count() / density;
    if target == 0 {
        return 0;
    }

    let mut open: Vec<(i32, i32)> = grid
        .tiles()
        .filter(|t| !t.blocked && !t.has_items())
        .map(|t| (t.x as i32, t.y as i32))
        .collect();
    rng.shuffle(&mut open);

    let mut placed = 0;
    for &(x, y) in open.iter().take(target) {
        let Some(rarity) = roll_rarity(rng) else {
            continue;
        };
        let Some(item) = catalog.create_instance(rarity, rng) else {
            log::debug!("catalog has no {rarity} items, skipping the draw");
            continue;
        };
        if grid.place_item_at(x, y, item).is_ok() {
            placed += 1;
        }
    }
    log::debug!("scattered {placed} items over {} open cells", open.len());
    placed
}
