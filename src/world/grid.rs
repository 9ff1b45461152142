use glam::{Vec2, vec2};
use thiserror::Error;

/// Tile codes as they appear in map files.
pub const EMPTY_CODE: u8 = 0;
pub const WALL_CODE: u8 = 1;
pub const SPAWN_CODE: u8 = 2;

/// One cell of the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    /// Player start.  Passable; only read once to seed the player.
    Spawn,
}

impl Tile {
    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            EMPTY_CODE => Some(Tile::Empty),
            WALL_CODE => Some(Tile::Wall),
            SPAWN_CODE => Some(Tile::Spawn),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => EMPTY_CODE,
            Tile::Wall => WALL_CODE,
            Tile::Spawn => SPAWN_CODE,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

/// Reasons a map is refused at load time.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile `{code}` at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, code: char },

    #[error("map has no spawn tile (code 2)")]
    NoSpawn,
}

/// Immutable tile lattice (never mutated after load).
///
/// World coordinates are continuous pixels; cell `(col, row)` covers
/// `[col*tile, (col+1)*tile) × [row*tile, (row+1)*tile)`.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>, // row-major
    spawn: (usize, usize),
    tile_size: f32,
}

impl GridMap {
    /// Build a map from rows of tile codes.
    ///
    /// * all rows must have the same length;
    /// * at least one spawn tile must exist – the first in row-major
    ///   order wins.
    pub fn from_rows<R>(rows: &[R], tile_size: f32) -> Result<Self, MapError>
    where
        R: AsRef<[u8]>,
    {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut spawn = None;

        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found: codes.len(),
                });
            }
            for (col, &code) in codes.iter().enumerate() {
                let tile = Tile::from_code(code).ok_or(MapError::UnknownTile {
                    row,
                    col,
                    code: char::from(b'0'.saturating_add(code)),
                })?;
                if tile == Tile::Spawn && spawn.is_none() {
                    spawn = Some((col, row));
                }
                tiles.push(tile);
            }
        }

        let spawn = spawn.ok_or(MapError::NoSpawn)?;
        Ok(Self {
            width,
            height,
            tiles,
            spawn,
            tile_size,
        })
    }

    /*──────────────────────── dimensions ───────────────────────────*/

    /// Columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the whole lattice in world pixels.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32) * self.tile_size
    }

    /*──────────────────────── lookups ──────────────────────────────*/

    /// Grid cell containing world point `p` (floor division, may be
    /// negative or past the edge).
    #[inline]
    pub fn cell_of(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.tile_size).floor() as i64,
            (p.y / self.tile_size).floor() as i64,
        )
    }

    /// Tile at `(col, row)`, or `None` outside the lattice.
    #[inline]
    pub fn tile(&self, col: i64, row: i64) -> Option<Tile> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(self.tiles[row as usize * self.width + col as usize])
    }

    /// `true` if cell `(col, row)` blocks.  The border outside the
    /// lattice is solid.
    #[inline]
    pub fn is_wall_cell(&self, col: i64, row: i64) -> bool {
        self.tile(col, row).is_none_or(Tile::is_wall)
    }

    /// `true` if world point `(x, y)` lies inside a wall tile or outside
    /// the map.
    #[inline]
    pub fn is_wall(&self, x: f32, y: f32) -> bool {
        let (col, row) = self.cell_of(vec2(x, y));
        self.is_wall_cell(col, row)
    }

    /// First spawn tile in row-major order, as `(col, row)`.
    #[inline]
    pub fn spawn_tile(&self) -> (usize, usize) {
        self.spawn
    }

    /// World-space centre of the spawn tile.
    pub fn spawn_point(&self) -> Vec2 {
        let (col, row) = self.spawn;
        (vec2(col as f32, row as f32) + 0.5) * self.tile_size
    }

    /// Row-major iterator over `(col, row, tile)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (i % self.width, i / self.width, t))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
