//! End-to-end generation and visibility scenarios.

use std::thread;
use std::time::Duration;

use gloom_core::{
    CaveConfig, GameRng, GenerationPhase, Grid, ItemCatalog, Progress, find_regions, generate,
    spawn_generation, update_visibility,
};
use proptest::prelude::*;

fn standard_cave(width: usize, height: usize, seed: u64) -> Grid {
    let config = CaveConfig::sized(width, height);
    generate(
        &config,
        Some(seed),
        &ItemCatalog::builtin(),
        &mut Progress::none(),
    )
    .unwrap()
}

#[test]
fn fifty_by_fifty_seed_42() {
    let grid = standard_cave(50, 50, 42);

    // A healthy cave: open space, one connected region, sealed border.
    assert!(grid.count_walkable() > 0);
    assert_eq!(find_regions(&grid).len(), 1);
    for x in 0..50 {
        assert!(grid.get(x, 0).unwrap().is_wall());
        assert!(grid.get(x, 49).unwrap().is_wall());
    }
    for y in 0..50 {
        assert!(grid.get(0, y).unwrap().is_wall());
        assert!(grid.get(49, y).unwrap().is_wall());
    }

    // One item per 500 cells at most.
    assert!(grid.item_count() <= 5);
    for tile in grid.tiles() {
        if tile.has_items() {
            assert!(!tile.blocked);
            assert_eq!(tile.items.len(), 1);
        }
    }
}

#[test]
fn same_seed_rebuilds_identical_map() {
    let a = standard_cave(50, 50, 42);
    let b = standard_cave(50, 50, 42);
    for (ta, tb) in a.tiles().zip(b.tiles()) {
        assert_eq!(ta.kind, tb.kind);
        assert_eq!(ta.water, tb.water);
        assert_eq!(ta.items.len(), tb.items.len());
    }
}

#[test]
fn field_of_view_stays_inside_radius() {
    let mut grid = standard_cave(50, 50, 42);
    let mut rng = GameRng::new(42);
    let (vx, vy) = grid.find_walkable_tile(&mut rng).unwrap();

    let radius = 8i32;
    update_visibility(&mut grid, vx, vy, radius as u32);

    assert!(grid.is_visible(vx, vy));
    assert!(grid.is_explored(vx, vy));

    let mut lit = 0;
    for tile in grid.tiles() {
        let x = tile.x as i32;
        let y = tile.y as i32;
        if grid.is_visible(x, y) {
            lit += 1;
            let (dx, dy) = (x - vx, y - vy);
            assert!(
                dx * dx + dy * dy <= radius * radius,
                "({x}, {y}) lit outside radius of ({vx}, {vy})"
            );
        }
    }
    assert!(lit > 0);
}

#[test]
fn exploration_only_grows() {
    let mut grid = standard_cave(50, 50, 7);
    let mut rng = GameRng::new(7);

    let mut explored_before = 0;
    for _ in 0..12 {
        let (vx, vy) = grid.find_walkable_tile(&mut rng).unwrap();
        update_visibility(&mut grid, vx, vy, 8);
        let explored_now = (0..50)
            .flat_map(|y| (0..50).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.is_explored(x, y))
            .count();
        assert!(explored_now >= explored_before);
        explored_before = explored_now;
    }
}

#[test]
fn reveal_all_switches_off_fov() {
    let mut grid = standard_cave(50, 50, 42);
    grid.reveal_all();
    assert!(grid.fully_revealed());

    // Updates become no-ops, nothing goes dark again.
    update_visibility(&mut grid, 1, 1, 2);
    for y in 0..50 {
        for x in 0..50 {
            assert!(grid.is_visible(x, y));
            assert!(grid.is_explored(x, y));
        }
    }
}

#[test]
fn worker_reports_monotone_progress() {
    let config = CaveConfig::sized(60, 60);
    let handle = spawn_generation(config, Some(11), ItemCatalog::builtin());
    let status = handle.status();

    let mut last = 0.0f32;
    for _ in 0..4000 {
        let fraction = status.fraction();
        assert!(fraction >= last, "progress went backwards");
        last = fraction;
        if handle.is_finished() {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    assert!(handle.is_finished(), "worker did not finish in time");

    let grid = handle.finish().unwrap();
    assert_eq!(status.phase(), GenerationPhase::Complete);
    assert_eq!(status.fraction(), 1.0);
    assert_eq!(grid.width(), 60);
    assert_eq!(grid.height(), 60);
}

#[test]
fn cancelled_worker_lands_in_cancelled_phase() {
    let config = CaveConfig::sized(400, 400);
    let handle = spawn_generation(config, Some(11), ItemCatalog::builtin());
    handle.request_cancel();
    let status = handle.status();

    assert!(handle.finish().is_err());
    assert_eq!(status.phase(), GenerationPhase::Cancelled);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_generation_is_deterministic(
        seed in any::<u64>(),
        width in 12usize..40,
        height in 12usize..40,
    ) {
        let config = CaveConfig::sized(width, height);
        let catalog = ItemCatalog::builtin();
        let a = generate(&config, Some(seed), &catalog, &mut Progress::none()).unwrap();
        let b = generate(&config, Some(seed), &catalog, &mut Progress::none()).unwrap();
        for (ta, tb) in a.tiles().zip(b.tiles()) {
            prop_assert_eq!(ta.kind, tb.kind);
        }
    }

    #[test]
    fn prop_border_ring_is_always_wall(
        seed in any::<u64>(),
        width in 8usize..48,
        height in 8usize..48,
    ) {
        let grid = generate(
            &CaveConfig::sized(width, height),
            Some(seed),
            &ItemCatalog::builtin(),
            &mut Progress::none(),
        ).unwrap();
        for x in 0..width as i32 {
            prop_assert!(grid.get(x, 0).unwrap().is_wall());
            prop_assert!(grid.get(x, height as i32 - 1).unwrap().is_wall());
        }
        for y in 0..height as i32 {
            prop_assert!(grid.get(0, y).unwrap().is_wall());
            prop_assert!(grid.get(width as i32 - 1, y).unwrap().is_wall());
        }
    }

    #[test]
    fn prop_connected_when_enabled(seed in any::<u64>()) {
        let grid = generate(
            &CaveConfig::sized(36, 36),
            Some(seed),
            &ItemCatalog::builtin(),
            &mut Progress::none(),
        ).unwrap();
        if grid.count_walkable() > 0 {
            prop_assert_eq!(find_regions(&grid).len(), 1);
        }
    }
}
