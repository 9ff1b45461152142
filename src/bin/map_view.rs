//! Minimal top-down map viewer.
//!
//! Walls grey, spawn tile green, grid lines dark.
//!
//! ```bash
//! cargo run --release --bin map_view -- [map file]
//! ```

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};

use gridcast::world::{GridMap, Tile, demo_map, load_map};

const WIDTH: usize = 800;
const HEIGHT: usize = 800;

const WALL: u32 = 0x00_808080;
const SPAWN: u32 = 0x00_00C000;
const FLOOR: u32 = 0x00_202020;
const GRID: u32 = 0x00_404040;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Map file; built-in map if omitted
    map: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    // ─────────── load map ─────────────
    // tile size only matters for world coordinates; 1.0 keeps cells = units
    let map = match &opts.map {
        Some(path) => load_map(path, 1.0).with_context(|| format!("loading map {}", path.display()))?,
        None => demo_map(1.0)?,
    };
    log::info!("{}×{} tiles, spawn {:?}", map.width(), map.height(), map.spawn_tile());

    // ─────────── grid‑space → screen‑space transform ────────────
    let scale = (WIDTH as f32 / map.width() as f32).min(HEIGHT as f32 / map.height() as f32) * 0.9; // 10 % margin
    let offset_x = (WIDTH as f32 - map.width() as f32 * scale) / 2.0;
    let offset_y = (HEIGHT as f32 - map.height() as f32 * scale) / 2.0;
    let to_screen = |col: usize, row: usize| -> (i32, i32) {
        (
            (col as f32 * scale + offset_x) as i32,
            (row as f32 * scale + offset_y) as i32,
        )
    };

    // ─────────── rasterise tiles & grid ────────────
    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    draw_tiles(&mut buffer, &map, &to_screen);

    for col in 0..=map.width() {
        let (x0, y0) = to_screen(col, 0);
        let (x1, y1) = to_screen(col, map.height());
        draw_line(&mut buffer, WIDTH, HEIGHT, x0, y0, x1, y1, GRID);
    }
    for row in 0..=map.height() {
        let (x0, y0) = to_screen(0, row);
        let (x1, y1) = to_screen(map.width(), row);
        draw_line(&mut buffer, WIDTH, HEIGHT, x0, y0, x1, y1, GRID);
    }

    // ─────────── show window ────────────
    let mut window = Window::new("grid map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(30);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

fn draw_tiles(buf: &mut [u32], map: &GridMap, to_screen: &impl Fn(usize, usize) -> (i32, i32)) {
    for (col, row, tile) in map.cells() {
        let colour = match tile {
            Tile::Wall => WALL,
            Tile::Spawn => SPAWN,
            Tile::Empty => FLOOR,
        };
        let (x0, y0) = to_screen(col, row);
        let (x1, y1) = to_screen(col + 1, row + 1);
        for y in y0.max(0)..y1.min(HEIGHT as i32) {
            for x in x0.max(0)..x1.min(WIDTH as i32) {
                buf[y as usize * WIDTH + x as usize] = colour;
            }
        }
    }
}

/// Integer Bresenham line‑drawing algorithm.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    buf: &mut [u32],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
