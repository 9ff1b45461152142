// ──────────────────────────────────────────────────────────────────────────
// world/loader.rs
//
//  *   text map  (file or &str)  ──╮
//  *   tile size (from Config)     │   --->  world::grid::GridMap
//                                  ╯
//
//  Format: one row per line, one digit per tile.  Commas, spaces and
//  brackets between digits are ignored, as are blank lines and lines
//  starting with `#`.
// ──────────────────────────────────────────────────────────────────────────

use std::{fs, path::Path};

use super::grid::{GridMap, MapError};

/// The 10×10 demo level: wall ring, spawn at row 2 / col 2, two pillars.
pub const DEMO_MAP: [[u8; 10]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 2, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

pub fn demo_map(tile_size: f32) -> Result<GridMap, MapError> {
    GridMap::from_rows(&DEMO_MAP, tile_size)
}

/// Parse a text map.  Row numbers in errors count map rows, not file lines.
pub fn parse_map(text: &str, tile_size: f32) -> Result<GridMap, MapError> {
    let mut rows: Vec<Vec<u8>> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = rows.len();
        let mut codes = Vec::with_capacity(line.len());
        for ch in line.chars() {
            match ch {
                ',' | '[' | ']' => {}
                c if c.is_whitespace() => {}
                c => {
                    let code = c
                        .to_digit(10)
                        .map(|d| d as u8)
                        .ok_or(MapError::UnknownTile {
                            row,
                            col: codes.len(),
                            code: c,
                        })?;
                    codes.push(code);
                }
            }
        }
        rows.push(codes);
    }

    GridMap::from_rows(&rows, tile_size)
}

pub fn load_map<P: AsRef<Path>>(path: P, tile_size: f32) -> Result<GridMap, MapError> {
    let text = fs::read_to_string(path)?;
    parse_map(&text, tile_size)
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
