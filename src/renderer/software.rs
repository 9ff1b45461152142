//! ---------------------------------------------------------------------------
//! Retained-mode software (CPU) surface
//!
//! * Keeps the tagged wall slices it was handed.
//! * `present` rasterises sky/ground and then every slice, in insertion
//!   order, into a **0x00RRGGBB** frame-buffer and loans it to the caller.
//! * Slice edges are rounded to the nearest pixel boundary, so two slices
//!   sharing an edge value never overlap or leave a seam.
//! ---------------------------------------------------------------------------

use crate::{
    engine::{DrawCommand, Rgb, Tag},
    renderer::{Rgba, Surface},
};

pub struct Software {
    scratch: Vec<Rgba>,
    segments: Vec<(Tag, DrawCommand)>,
    width: usize,
    height: usize,
    sky: Rgba,
    ground: Rgba,
}

impl Software {
    pub fn new(width: usize, height: usize, sky: Rgb, ground: Rgb) -> Self {
        Self {
            scratch: vec![0; width * height],
            segments: Vec::new(),
            width,
            height,
            sky: sky.to_u32(),
            ground: ground.to_u32(),
        }
    }

    /// (Re)allocate for a new resolution.  Retained slices are kept.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.scratch.resize(width * height, 0);
        }
    }

    /// Slices currently held under `tag`.
    pub fn segment_count(&self, tag: Tag) -> usize {
        self.segments.iter().filter(|(t, _)| *t == tag).count()
    }

    /// Rasterise and **loan** the finished buffer to `submit`.
    pub fn present<F, R>(&mut self, submit: F) -> R
    where
        F: FnOnce(&[Rgba], usize, usize) -> R,
    {
        self.fill_background();
        for i in 0..self.segments.len() {
            let cmd = self.segments[i].1;
            self.fill_slice(&cmd);
        }
        submit(&self.scratch, self.width, self.height)
    }

    fn fill_background(&mut self) {
        let half = (self.height / 2) * self.width;
        let (sky, ground) = self.scratch.split_at_mut(half);
        sky.fill(self.sky);
        ground.fill(self.ground);
    }

    fn fill_slice(&mut self, cmd: &DrawCommand) {
        let clamp = |v: f32, hi: usize| -> usize {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, hi as f32) as usize
            }
        };
        let x0 = clamp(cmd.x_left, self.width);
        let x1 = clamp(cmd.x_right, self.width);
        let y0 = clamp(cmd.y_top, self.height);
        let y1 = clamp(cmd.y_bottom, self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let colour = cmd.color.to_u32();
        for y in y0..y1 {
            let row = y * self.width;
            self.scratch[row + x0..row + x1].fill(colour);
        }
    }
}

/*──────────────────────── Surface trait impl ─────────────────────────*/
impl Surface for Software {
    fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn draw_vertical_segment(&mut self, cmd: &DrawCommand, tag: Tag) {
        self.segments.push((tag, *cmd));
    }

    fn clear_tagged(&mut self, tag: Tag) {
        self.segments.retain(|(t, _)| *t != tag);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
