//! Cave generation pipeline
//!
//! Noise fill, optional room carving, cellular smoothing, region
//! reconnection, moss and water decoration, then item scattering. Every
//! step draws from a single seeded RNG, so one (config, seed) pair always
//! builds the same map.

use crate::config::CaveConfig;
use crate::errors::GenerateError;
use crate::grid::Grid;
use crate::item::ItemCatalog;
use crate::progress::Progress;
use crate::region::{ORTHOGONAL, connect_regions};
use crate::rng::GameRng;
use crate::scatter::scatter_items;
use crate::tile::{Tile, TileKind, WaterProps};

/// Carved room edge lengths
const ROOM_MIN: u32 = 3;
const ROOM_MAX: u32 = 8;

/// Moss cluster sizes
const MOSS_CLUSTER_MIN: u32 = 2;
const MOSS_CLUSTER_MAX: u32 = 12;

/// Water pool edge lengths
const POOL_MIN: u32 = 1;
const POOL_MAX: u32 = 4;

/// Water pool depth range
const POOL_DEPTH_MIN: f32 = 0.5;
const POOL_DEPTH_MAX: f32 = 3.0;

/// Build a cave map from a config
///
/// `None` for the seed picks one from entropy. A map that smooths down to
/// zero walkable cells is returned as-is with decoration and items skipped,
/// callers that need a playable map use [`generate_playable`].
pub fn generate(
    config: &CaveConfig,
    seed: Option<u64>,
    catalog: &ItemCatalog,
    progress: &mut Progress,
) -> Result<Grid, GenerateError> {
    config.validate()?;
    let mut rng = match seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    log::debug!(
        "generating {}x{} cave, fill={:.2}, seed={}",
        config.width,
        config.height,
        config.fill_percent,
        rng.seed()
    );

    let mut grid = Grid::new(config.width, config.height, TileKind::Wall);

    progress.report("Carving the caverns", 0.0);
    progress.interrupted()?;
    noise_fill(&mut grid, config, &mut rng, progress);
    carve_rooms(&mut grid, config, &mut rng);

    progress.report("Shaping the underground paths", 0.3);
    for i in 0..config.smoothing_iterations {
        progress.interrupted()?;
        progress.advance(0.3 + i as f64 / config.smoothing_iterations as f64 * 0.3);
        if !smooth_pass(&mut grid) {
            log::debug!("smoothing reached a fixed point after {} passes", i + 1);
            break;
        }
    }

    progress.interrupted()?;
    if config.connect_regions {
        progress.report("Linking hidden passages", 0.65);
        connect_regions(&mut grid, &mut rng);
    }

    if grid.count_walkable() == 0 {
        log::warn!("map has no walkable cells, skipping decoration and items");
        progress.report("Exploration begins soon", 1.0);
        return Ok(grid);
    }

    if config.add_moss {
        progress.report("Growing mossy textures", 0.7);
        progress.interrupted()?;
        decorate_moss(&mut grid, config, &mut rng);
    }
    if config.add_water {
        progress.report("Flooding subterranean pools", 0.8);
        progress.interrupted()?;
        decorate_water(&mut grid, config, &mut rng);
    }

    progress.report("Scattering treasures", 0.9);
    progress.interrupted()?;
    scatter_items(&mut grid, catalog, &mut rng, config.item_density);

    progress.report("Exploration begins soon", 1.0);
    Ok(grid)
}

/// Like [`generate`], but an unwalkable result is an error
pub fn generate_playable(
    config: &CaveConfig,
    seed: Option<u64>,
    catalog: &ItemCatalog,
    progress: &mut Progress,
) -> Result<Grid, GenerateError> {
    let grid = generate(config, seed, catalog, progress)?;
    if grid.count_walkable() == 0 {
        return Err(GenerateError::NoFloorRegions);
    }
    Ok(grid)
}

/// Fill the interior with uniform noise, walls below `fill_percent`
///
/// The border ring is left untouched, it stays wall forever.
fn noise_fill(grid: &mut Grid, config: &CaveConfig, rng: &mut GameRng, progress: &mut Progress) {
    let width = config.width;
    let height = config.height;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if rng.fraction() >= config.fill_percent {
                grid.set_cell(Tile::new(TileKind::Floor, x, y));
            }
        }
        progress.advance((y + 1) as f64 / height as f64 * 0.25);
    }
}

/// Carve rectangular floor rooms into the noise
fn carve_rooms(grid: &mut Grid, config: &CaveConfig, rng: &mut GameRng) {
    if config.room_attempts == 0 {
        return;
    }
    let mut carved = 0;
    for _ in 0..config.room_attempts {
        let room_w = rng.range_inclusive(ROOM_MIN, ROOM_MAX) as usize;
        let room_h = rng.range_inclusive(ROOM_MIN, ROOM_MAX) as usize;
        // Needs to fit somewhere strictly inside the border ring.
        if grid.width() < room_w + 2 || grid.height() < room_h + 2 {
            continue;
        }
        let x0 = 1 + rng.index(grid.width() - room_w - 1);
        let y0 = 1 + rng.index(grid.height() - room_h - 1);
        for y in y0..y0 + room_h {
            for x in x0..x0 + room_w {
                grid.set_cell(Tile::new(TileKind::Floor, x, y));
            }
        }
        carved += 1;
    }
    log::debug!("carved {carved} rooms");
}

/// One cellular-automata pass over the interior, true when any cell changed
///
/// Rules read a snapshot of wall-ness taken before the pass: more than four
/// of the eight neighbors wall makes the cell wall, fewer than four makes
/// it floor, exactly four leaves it alone.
fn smooth_pass(grid: &mut Grid) -> bool {
    let width = grid.width();
    let height = grid.height();
    let walls: Vec<bool> = grid.tiles().map(|t| t.is_wall()).collect();
    let mut changed = false;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let neighbors = count_wall_neighbors(&walls, width, x, y);
            let was_wall = walls[y * width + x];
            if neighbors > 4 && !was_wall {
                grid.set_cell(Tile::new(TileKind::Wall, x, y));
                changed = true;
            } else if neighbors < 4 && was_wall {
                grid.set_cell(Tile::new(TileKind::Floor, x, y));
                changed = true;
            }
        }
    }
    changed
}

/// Count wall cells among the eight neighbors, the cell itself excluded
///
/// Callers keep (x, y) strictly inside the border, so all nine indices are
/// valid.
fn count_wall_neighbors(walls: &[bool], width: usize, x: usize, y: usize) -> usize {
    let mut count = 0;
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if nx == x && ny == y {
                continue;
            }
            if walls[ny * width + nx] {
                count += 1;
            }
        }
    }
    count
}

/// Seed moss clusters on plain wall cells
fn decorate_moss(grid: &mut Grid, config: &CaveConfig, rng: &mut GameRng) {
    let width = grid.width();
    let height = grid.height();
    let mut visited = vec![false; width * height];
    let mut grown = 0;

    for y in 0..height {
        for x in 0..width {
            if grid.cell(x, y).kind == TileKind::Wall
                && !visited[y * width + x]
                && rng.chance(config.moss_probability)
            {
                grown += grow_moss_cluster(grid, x, y, &mut visited, rng);
            }
        }
    }
    log::debug!("grew {grown} moss cells");
}

/// Flood moss over connected wall cells up to a random cluster size
fn grow_moss_cluster(
    grid: &mut Grid,
    x: usize,
    y: usize,
    visited: &mut [bool],
    rng: &mut GameRng,
) -> usize {
    let width = grid.width();
    let target = rng.range_inclusive(MOSS_CLUSTER_MIN, MOSS_CLUSTER_MAX) as usize;
    let mut stack = vec![(x, y)];
    visited[y * width + x] = true;
    let mut grown = 0;

    while let Some((cx, cy)) = stack.pop() {
        if grown >= target {
            break;
        }
        if grid.cell(cx, cy).kind == TileKind::Wall {
            grid.set_cell(Tile::new(TileKind::MossyWall, cx, cy));
            grown += 1;
        }
        for (dx, dy) in ORTHOGONAL {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !visited[ny * width + nx] && grid.cell(nx, ny).kind == TileKind::Wall {
                visited[ny * width + nx] = true;
                stack.push((nx, ny));
            }
        }
    }
    grown
}

/// Seed rectangular water pools on open floor
fn decorate_water(grid: &mut Grid, config: &CaveConfig, rng: &mut GameRng) {
    let width = grid.width();
    let height = grid.height();
    let mut visited = vec![false; width * height];
    let mut flooded = 0;

    for y in 0..height {
        for x in 0..width {
            if grid.cell(x, y).kind == TileKind::Floor
                && !visited[y * width + x]
                && rng.chance(config.water_probability)
            {
                flooded += flood_pool(grid, x, y, &mut visited, rng);
            }
        }
    }
    log::debug!("flooded {flooded} water cells");
}

/// Flood one rectangular pool around the seed cell
///
/// The rectangle is clipped to the grid and only floor cells flood, so
/// pools hug the cave shape instead of cutting into walls. The whole pool
/// shares one depth draw.
fn flood_pool(
    grid: &mut Grid,
    x: usize,
    y: usize,
    visited: &mut [bool],
    rng: &mut GameRng,
) -> usize {
    let width = grid.width();
    let pool_w = rng.range_inclusive(POOL_MIN, POOL_MAX) as usize;
    let pool_h = rng.range_inclusive(POOL_MIN, POOL_MAX) as usize;
    let depth = POOL_DEPTH_MIN + rng.fraction() as f32 * (POOL_DEPTH_MAX - POOL_DEPTH_MIN);
    let props = WaterProps {
        depth,
        flow_speed: 0.0,
    };

    let (min_x, max_x) = pool_bounds(x, pool_w, grid.width());
    let (min_y, max_y) = pool_bounds(y, pool_h, grid.height());

    let mut flooded = 0;
    for cy in min_y..=max_y {
        for cx in min_x..=max_x {
            if grid.cell(cx, cy).kind == TileKind::Floor && !visited[cy * width + cx] {
                grid.set_cell(Tile::water(cx, cy, props));
                visited[cy * width + cx] = true;
                flooded += 1;
            }
        }
    }
    flooded
}

/// One axis of a pool window: the seed cell plus `extent - 1` neighbors
///
/// The window covers exactly `extent` cells, shifted right off the low
/// edge and shrunk against the high edge. The seed is always inside.
fn pool_bounds(seed: usize, extent: usize, limit: usize) -> (usize, usize) {
    let min = seed.saturating_sub((extent - 1) / 2);
    let max = (min + extent - 1).min(limit - 1);
    (min, max)
}
