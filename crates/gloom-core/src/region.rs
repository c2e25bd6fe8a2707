//! Floor region analysis and reconnection
//!
//! Cellular caves routinely come out of smoothing as several disconnected
//! pockets. This module finds those pockets and tunnels the small ones into
//! the dominant one so the whole map is reachable.

use crate::grid::Grid;
use crate::line::bresenham_line;
use crate::rng::GameRng;
use crate::tile::{Tile, TileKind};

/// Orthogonal neighbor offsets, the connectivity metric for regions
pub(crate) const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A maximal 4-connected patch of walkable cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    cells: Vec<(usize, usize)>,
}

impl Region {
    /// Number of cells in the patch
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in discovery order
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }
}

/// Find all walkable regions, in scan order of their first cell
pub fn find_regions(grid: &Grid) -> Vec<Region> {
    let width = grid.width();
    let height = grid.height();
    let mut visited = vec![false; width * height];
    let mut regions = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if visited[y * width + x] || grid.cell(x, y).blocked {
                continue;
            }
            regions.push(flood_fill(grid, x, y, &mut visited));
        }
    }
    regions
}

/// Collect one region starting from a walkable seed cell
///
/// Iterative stack walk, recursion depth would scale with map area.
fn flood_fill(grid: &Grid, x: usize, y: usize, visited: &mut [bool]) -> Region {
    let width = grid.width();
    let mut cells = Vec::new();
    let mut stack = vec![(x, y)];
    visited[y * width + x] = true;

    while let Some((cx, cy)) = stack.pop() {
        cells.push((cx, cy));
        for (dx, dy) in ORTHOGONAL {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !visited[ny * width + nx] && !grid.cell(nx, ny).blocked {
                visited[ny * width + nx] = true;
                stack.push((nx, ny));
            }
        }
    }
    Region { cells }
}

/// Index of the largest region, earliest in scan order on ties
pub fn dominant_region(regions: &[Region]) -> Option<usize> {
    if regions.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, region) in regions.iter().enumerate().skip(1) {
        if region.len() > regions[best].len() {
            best = i;
        }
    }
    Some(best)
}

/// Tunnel every isolated region into the dominant one
///
/// Returns the number of tunnels carved. Zero or one region leaves the
/// grid untouched.
pub fn connect_regions(grid: &mut Grid, rng: &mut GameRng) -> usize {
    let regions = find_regions(grid);
    if regions.is_empty() {
        log::warn!("no floor regions found, skipping connection step");
        return 0;
    }
    for (i, region) in regions.iter().enumerate() {
        log::debug!("region {i} size: {}", region.len());
    }
    let Some(dominant) = dominant_region(&regions) else {
        return 0;
    };

    let mut carved = 0;
    for (i, region) in regions.iter().enumerate() {
        if i == dominant {
            continue;
        }
        let Some(&(ax, ay)) = rng.choose(region.cells()) else {
            continue;
        };
        let Some(&(bx, by)) = rng.choose(regions[dominant].cells()) else {
            continue;
        };
        carve_tunnel(grid, (ax as i32, ay as i32), (bx as i32, by as i32));
        carved += 1;
    }
    carved
}

/// Carve a floor tunnel between two walkable cells
///
/// Follows a Bresenham line. A diagonal step gets an extra orthogonal cell
/// so the finished tunnel is itself 4-connected.
fn carve_tunnel(grid: &mut Grid, from: (i32, i32), to: (i32, i32)) {
    let mut prev: Option<(i32, i32)> = None;
    for (x, y) in bresenham_line(from.0, from.1, to.0, to.1) {
        if let Some((px, py)) = prev
            && px != x
            && py != y
        {
            carve_floor(grid, x, py);
        }
        carve_floor(grid, x, y);
        prev = Some((x, y));
    }
}

fn carve_floor(grid: &mut Grid, x: i32, y: i32) {
    if grid.in_bounds(x, y) && grid.cell(x as usize, y as usize).blocked {
        grid.set_cell(Tile::new(TileKind::Floor, x as usize, y as usize));
    }
}
