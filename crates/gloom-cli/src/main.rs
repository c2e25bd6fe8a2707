//! Undergloom cave generator CLI
//!
//! Generates a cave on a background thread, then prints an ASCII
//! preview of what a viewer standing on a random floor tile would see.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;

use gloom_core::{
    CaveConfig, GameRng, Grid, ItemCatalog, TileKind, find_regions, spawn_generation,
    update_visibility,
};

/// Undergloom cave generator
#[derive(Parser, Debug)]
#[command(name = "gloom")]
#[command(about = "Generate cellular automata caves and preview them in the terminal")]
struct Args {
    /// Map width in cells
    #[arg(short = 'W', long, default_value = "100")]
    width: usize,

    /// Map height in cells
    #[arg(short = 'H', long, default_value = "40")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Chance of a cell starting as wall, 0.0 to 1.0
    #[arg(long, default_value = "0.45")]
    fill: f64,

    /// Number of cellular automata smoothing passes
    #[arg(long, default_value = "3")]
    smoothing: u32,

    /// Rectangular rooms to carve before smoothing
    #[arg(long, default_value = "0")]
    rooms: u32,

    /// Leave isolated floor pockets unconnected
    #[arg(long)]
    no_connect: bool,

    /// Skip moss decoration
    #[arg(long)]
    no_moss: bool,

    /// Skip water pools
    #[arg(long)]
    no_water: bool,

    /// Item catalog JSON file (built-in catalog if not specified)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Scatter one item per this many cells
    #[arg(long, default_value = "500")]
    item_density: usize,

    /// Field of view radius for the preview
    #[arg(short, long, default_value = "8")]
    radius: u32,

    /// Reveal the whole map instead of a single field of view
    #[arg(long)]
    reveal: bool,

    /// Print generation statistics
    #[arg(long)]
    stats: bool,

    /// Suppress the progress readout
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    let config = CaveConfig {
        width: args.width,
        height: args.height,
        fill_percent: args.fill,
        smoothing_iterations: args.smoothing,
        room_attempts: args.rooms,
        connect_regions: !args.no_connect,
        add_moss: !args.no_moss,
        add_water: !args.no_water,
        item_density: args.item_density,
        view_radius: args.radius,
        ..CaveConfig::default()
    };
    log::debug!("resolved config: {config:?}");

    let catalog = match &args.items {
        Some(path) => ItemCatalog::load_json(path)?,
        None => ItemCatalog::builtin(),
    };

    if !args.quiet {
        println!(
            "Generating {}x{} cave with seed {}",
            args.width, args.height, seed
        );
    }

    // Generate on a worker thread and poll the shared status.
    let handle = spawn_generation(config, Some(seed), catalog);
    let status = handle.status();
    while !handle.is_finished() {
        if !args.quiet {
            print!("\r  {:3.0}%", f64::from(status.fraction()) * 100.0);
            io::stdout().flush()?;
        }
        thread::sleep(Duration::from_millis(25));
    }
    if !args.quiet {
        println!("\r  done");
    }
    let mut grid = handle.finish()?;

    // Drop the viewer on a random floor tile for the preview.
    let mut rng = GameRng::new(seed);
    let viewer = grid.find_walkable_tile(&mut rng);

    match viewer {
        Some((x, y)) if !args.reveal => update_visibility(&mut grid, x, y, args.radius),
        _ => {
            if viewer.is_none() && !args.quiet {
                println!("No open floor was generated, revealing the whole map");
            }
            grid.reveal_all();
        }
    }

    print!("{}", render(&grid, viewer));

    if args.stats {
        print_stats(&grid, seed);
    }

    Ok(())
}

/// Draw the grid as one character per cell.
///
/// Visible tiles show their glyph, explored-but-dark tiles a dot,
/// unexplored tiles nothing at all.
fn render(grid: &Grid, viewer: Option<(i32, i32)>) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let ch = if viewer == Some((x, y)) {
                '@'
            } else if grid.is_visible(x, y) {
                match grid.tile_at(x, y) {
                    Some(tile) if tile.has_items() => '!',
                    Some(tile) => tile.kind.symbol(),
                    None => ' ',
                }
            } else if grid.is_explored(x, y) {
                '·'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn print_stats(grid: &Grid, seed: u64) {
    let walkable = grid.count_walkable();
    let total = grid.cell_count();
    let regions = find_regions(grid);
    let moss = grid
        .tiles()
        .filter(|t| t.kind == TileKind::MossyWall)
        .count();
    let water = grid.tiles().filter(|t| t.kind == TileKind::Water).count();

    println!("Seed:     {seed}");
    println!("Size:     {}x{}", grid.width(), grid.height());
    println!(
        "Walkable: {} of {} cells ({:.1}%)",
        walkable,
        total,
        100.0 * walkable as f64 / total as f64
    );
    println!("Regions:  {}", regions.len());
    println!("Moss:     {moss}");
    println!("Water:    {water}");
    println!("Items:    {}", grid.item_count());
}
