//! Hit distance → screen column.
//!
//! ```text
//! lineHeight = K · viewportHeight / distance      (distance 0 → full height)
//! top        = (viewportHeight − lineHeight) / 2
//! brightness = clamp(max − distance, min, max)
//! colour     = wallColour + brightness  (per channel, saturating)
//! ```

use super::{DrawCommand, HitResult, Rgb, Screen};
use crate::config::Config;

#[derive(Clone, Copy, Debug)]
pub struct Projector {
    height_constant: f32,
    min_brightness: f32,
    max_brightness: f32,
    wall_color: Rgb,
    fisheye_correction: bool,
}

impl Projector {
    pub fn new(height_constant: f32, min_brightness: f32, max_brightness: f32, wall_color: Rgb) -> Self {
        Self {
            height_constant,
            min_brightness,
            max_brightness,
            wall_color,
            fisheye_correction: false,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            fisheye_correction: cfg.fisheye_correction,
            ..Self::new(
                cfg.height_constant,
                cfg.min_brightness,
                cfg.max_brightness,
                cfg.wall_color,
            )
        }
    }

    /// On-screen height of a wall slice at `distance`.
    #[inline]
    pub fn line_height(&self, distance: f32, viewport_h: usize) -> f32 {
        let h = viewport_h as f32;
        if distance > 0.0 {
            self.height_constant * h / distance
        } else {
            h
        }
    }

    /// Fog contribution at `distance`, within `[min, max]`.
    #[inline]
    pub fn brightness(&self, distance: f32) -> f32 {
        (self.max_brightness - distance).clamp(self.min_brightness, self.max_brightness)
    }

    #[inline]
    pub fn shade(&self, distance: f32) -> Rgb {
        self.wall_color
            .brighten(self.brightness(distance).min(255.0) as u8)
    }

    /// Build the draw command for one hit.
    ///
    /// * `ray_offset` – ray angle minus heading; only used for fisheye
    ///   correction.
    /// * `column` / `rays` – slot of this ray inside the fan.
    pub fn project(
        &self,
        hit: &HitResult,
        ray_offset: f32,
        column: usize,
        rays: usize,
        screen: Screen,
    ) -> DrawCommand {
        let distance = if self.fisheye_correction {
            hit.distance * ray_offset.cos()
        } else {
            hit.distance
        };

        let line_h = self.line_height(distance, screen.h);
        let y_top = (screen.h as f32 - line_h) * 0.5;

        let col_w = screen.column_width(rays);
        DrawCommand {
            column,
            x_left: column as f32 * col_w,
            x_right: (column + 1) as f32 * col_w,
            y_top,
            y_bottom: y_top + line_h,
            color: self.shade(distance),
        }
    }
}

/// Hands out column slots left to right, wrapping after the last ray.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnCursor {
    index: usize,
    count: usize,
}

impl ColumnCursor {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// Change the fan size (viewport resize).  Restarts at slot 0.
    pub fn reset(&mut self, count: usize) {
        self.index = 0;
        self.count = count;
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.index
    }

    /// Current slot; then step to the next one.
    #[inline]
    pub fn advance(&mut self) -> usize {
        let col = self.index;
        self.index += 1;
        if self.index >= self.count {
            self.index = 0;
        }
        col
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
