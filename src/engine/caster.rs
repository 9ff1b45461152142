//! Ray → first wall cell.
//!
//! Two interchangeable strategies share one contract: return the first
//! wall cell along the ray and a hit point on (or within one step of) the
//! face the ray entered through, or `None` once the ray leaves the map.
//!
//! * [`CastMethod::March`] – advance a sample point by a fixed step and
//!   test the containing cell.  Hit error is bounded by the step length.
//! * [`CastMethod::Dda`]   – exact cell-boundary traversal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::HitResult;
use crate::{config::Config, world::GridMap};

/// Upper bound on samples per marched ray, whatever the step length.
const MAX_MARCH_STEPS: u64 = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastMethod {
    #[default]
    March,
    Dda,
}

#[derive(Clone, Copy, Debug)]
pub struct RayCaster {
    method: CastMethod,
    step: f32, // march step, pixels
}

impl RayCaster {
    pub fn new(method: CastMethod, step: f32) -> Self {
        Self { method, step }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.cast_method, cfg.step_len())
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Cast from `origin` along `angle` (radians, 0 = +X, CCW towards +Y).
    pub fn cast(&self, map: &GridMap, origin: Vec2, angle: f32) -> Option<HitResult> {
        let (s, c) = angle.sin_cos();
        let dir = Vec2::new(c, s);
        match self.method {
            CastMethod::March => march(map, origin, dir, self.step),
            CastMethod::Dda => dda(map, origin, dir),
        }
    }
}

/*──────────────────────── fixed-step marcher ─────────────────────────*/

fn march(map: &GridMap, origin: Vec2, dir: Vec2, step: f32) -> Option<HitResult> {
    // no ray inside the map can travel further than the diagonal
    let max_steps = ((map.extent().length() / step).ceil() as u64)
        .saturating_add(2)
        .min(MAX_MARCH_STEPS);

    for i in 0..=max_steps {
        // recompute from the origin instead of accumulating rounding error
        let p = origin + dir * (i as f32 * step);
        let (col, row) = map.cell_of(p);
        match map.tile(col, row) {
            None => return None,
            Some(t) if t.is_wall() => {
                return Some(HitResult {
                    cell: (col, row),
                    point: p,
                    distance: (p - origin).length(),
                });
            }
            Some(_) => {}
        }
    }
    None
}

/*──────────────────────── grid traversal (DDA) ───────────────────────*/

fn dda(map: &GridMap, origin: Vec2, dir: Vec2) -> Option<HitResult> {
    let tile = map.tile_size();
    let (mut col, mut row) = map.cell_of(origin);

    match map.tile(col, row) {
        None => return None,
        Some(t) if t.is_wall() => {
            return Some(HitResult {
                cell: (col, row),
                point: origin,
                distance: 0.0,
            });
        }
        Some(_) => {}
    }

    // per axis: cell step, distance to the first boundary, boundary spacing
    let axis = |o: f32, d: f32, cell: i64| -> (i64, f32, f32) {
        if d > 0.0 {
            (1, ((cell + 1) as f32 * tile - o) / d, tile / d)
        } else if d < 0.0 {
            (-1, (cell as f32 * tile - o) / d, -tile / d)
        } else {
            (0, f32::INFINITY, f32::INFINITY)
        }
    };
    let (step_x, mut t_max_x, t_delta_x) = axis(origin.x, dir.x, col);
    let (step_y, mut t_max_y, t_delta_y) = axis(origin.y, dir.y, row);

    let max_cells = map.width() + map.height() + 2;
    for _ in 0..max_cells {
        let t = if t_max_x < t_max_y {
            col += step_x;
            let t = t_max_x;
            t_max_x += t_delta_x;
            t
        } else {
            row += step_y;
            let t = t_max_y;
            t_max_y += t_delta_y;
            t
        };
        if !t.is_finite() {
            return None;
        }

        match map.tile(col, row) {
            None => return None,
            Some(tl) if tl.is_wall() => {
                let point = origin + dir * t;
                return Some(HitResult {
                    cell: (col, row),
                    point,
                    distance: t,
                });
            }
            Some(_) => {}
        }
    }
    None
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
