use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGB colour.  Serialised as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Add `amount` to every channel, saturating at 255.
    #[inline]
    pub fn brighten(self, amount: u8) -> Self {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }

    /// Frame-buffer pixel (0x00RRGGBB).
    #[inline]
    pub fn to_u32(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

/// `#rrggbb`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Viewport dimensions; mutable on resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
}

impl Screen {
    #[inline]
    pub fn half_w(&self) -> f32 {
        self.w as f32 * 0.5
    }

    /// Width of one ray column when `rays` columns span the viewport.
    #[inline]
    pub fn column_width(&self, rays: usize) -> f32 {
        self.w as f32 / rays.max(1) as f32
    }
}

/// First wall struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// Grid cell `(col, row)` of the wall tile.
    pub cell: (i64, i64),
    /// Hit point in world pixels.
    pub point: Vec2,
    /// Euclidean distance from the ray origin.
    pub distance: f32,
}

/// Groups segments so a whole frame can be cleared at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

pub const WALL_TAG: Tag = Tag("wall");

/// One vertical wall slice, ready for the surface.
///
/// The slice covers `[x_left, x_right)`; neighbouring columns share the
/// exact same edge value so they tile without gaps or overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub column: usize,
    pub x_left: f32,
    pub x_right: f32,
    pub y_top: f32,
    pub y_bottom: f32,
    pub color: Rgb,
}

impl DrawCommand {
    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.x_right - self.x_left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_bottom - self.y_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_formats_as_hex() {
        assert_eq!(Rgb(0x5A, 0x5A, 0x5A).to_string(), "#5a5a5a");
        assert_eq!(Rgb(0xA1, 0x66, 0x2F).to_u32(), 0x00_A1662F);
    }

    #[test]
    fn brighten_saturates() {
        assert_eq!(Rgb(250, 128, 0).brighten(10), Rgb(255, 138, 10));
    }
}
