mod grid;
mod loader;

pub use grid::{EMPTY_CODE, GridMap, MapError, SPAWN_CODE, Tile, WALL_CODE};
pub use loader::{DEMO_MAP, demo_map, load_map, parse_map};
