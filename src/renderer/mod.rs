//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*
//! Each redraw emits one [`DrawCommand`] per ray hit, grouped under a
//! [`Tag`], into a type that implements [`Surface`].  The surface keeps
//! what it was given until the tag is cleared, so idle ticks need no
//! drawing at all.

use crate::engine::{DrawCommand, Tag};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// What the engine needs from a display.
pub trait Surface {
    /// Current viewport `(width, height)` in pixels.
    fn viewport(&self) -> (usize, usize);

    /// Add one opaque vertical slice under `tag`.
    fn draw_vertical_segment(&mut self, cmd: &DrawCommand, tag: Tag);

    /// Drop every slice previously added under `tag`.
    fn clear_tagged(&mut self, tag: Tag);
}

pub mod software;

pub use software::Software;
