//! Soft shadow-casting field of view
//!
//! Rays carry a visibility factor instead of a binary blocked flag. Every
//! traversed cell multiplies the factor by its transparency, so a wall at
//! 0.1 is seen itself but kills the ray, while water at 0.4 lets sight fade
//! out over a few cells. The result is soft shadow edges around obstacles.

use crate::grid::Grid;
use crate::line::bresenham_line;

/// Transparency at or below this stops a ray at the cell
pub const OPAQUE_CUTOFF: f32 = 0.1;

/// Accumulated visibility below this counts as fully dark
pub const VISIBILITY_FLOOR: f32 = 0.01;

/// Recompute the visible plane for a viewer at (x, y)
///
/// Every reached cell is also marked explored, and exploration never
/// reverts. A fully revealed grid is relit wholesale without casting a
/// single ray. A viewer outside the grid darkens everything.
///
/// Cost is O(radius^2) rays of O(radius) cells each.
pub fn update_visibility(grid: &mut Grid, viewer_x: i32, viewer_y: i32, radius: u32) {
    if grid.fully_revealed() {
        grid.fill_visible();
        return;
    }

    grid.clear_visible();

    if !grid.in_bounds(viewer_x, viewer_y) {
        return;
    }
    grid.set_visible(viewer_x, viewer_y, true);
    grid.set_explored(viewer_x, viewer_y);

    let radius = radius as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            // Clip the bounding square to a circle.
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let tx = viewer_x + dx;
            let ty = viewer_y + dy;
            if !grid.in_bounds(tx, ty) {
                continue;
            }
            cast_ray(grid, viewer_x, viewer_y, tx, ty);
        }
    }
}

/// Walk one ray, attenuating visibility through each traversed cell
///
/// The viewer's own cell is traversed first, so standing in murky terrain
/// dims everything the viewer sees.
fn cast_ray(grid: &mut Grid, x0: i32, y0: i32, tx: i32, ty: i32) {
    let mut visibility = 1.0f32;
    for (x, y) in bresenham_line(x0, y0, tx, ty) {
        if visibility <= 0.0 {
            break;
        }
        grid.set_visible(x, y, true);
        grid.set_explored(x, y);

        if x == tx && y == ty {
            break;
        }

        // Both endpoints are in bounds, so every ray cell is too.
        let transparency = grid.cell(x as usize, y as usize).transparency;
        visibility *= transparency;
        if transparency <= OPAQUE_CUTOFF || visibility < VISIBILITY_FLOOR {
            break;
        }
    }
}
