//! Tunable parameters of the engine, gathered in one place.
//!
//! Every formula constant (sensitivity, fog clamp, march step, height
//! constant, …) lives here with its unit.  A `Config` is only handed to the
//! engine after [`Config::validate`] accepted it.
//!
//! ```toml
//! tile_size = 16.0
//! fov_degrees = 80.0
//! cast_method = "dda"
//! wall_color = [128, 128, 128]
//!
//! [keys]
//! forward = "Up"
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{CastMethod, Rgb};

/// Smallest accepted march step, as a fraction of a tile edge.
pub const MIN_STEP_FRACTION: f32 = 1e-3;

/// Errors raised while reading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Logical key names for the movement and turn intents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub back: String,
    pub strafe_left: String,
    pub strafe_right: String,
    pub turn_left: String,
    pub turn_right: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "W".into(),
            back: "S".into(),
            strafe_left: "A".into(),
            strafe_right: "D".into(),
            turn_left: "Left".into(),
            turn_right: "Right".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /* world ------------------------------------------------------------ */
    /// Pixels per tile edge, shared by collision and rendering.
    pub tile_size: f32,

    /* player ----------------------------------------------------------- */
    /// Length of one movement vector, pixels per tick.
    pub move_speed: f32,
    /// Radians of heading per pixel of pointer displacement.
    pub look_sensitivity: f32,
    /// Radians of heading per tick while a turn key is held.
    pub turn_speed: f32,
    /// Initial heading in radians (normalised on spawn).
    pub spawn_heading: f32,

    /* ray fan ---------------------------------------------------------- */
    pub fov_degrees: f32,
    /// Minimum number of rays, whatever the viewport width.
    pub ray_floor: usize,
    /// Viewport pixels per ray above the floor.
    pub ray_divisor: usize,
    /// March step as a fraction of one tile edge.
    pub step_fraction: f32,
    pub cast_method: CastMethod,

    /* projection / shading -------------------------------------------- */
    /// `K` in `lineHeight = K * viewportHeight / distance`.
    pub height_constant: f32,
    /// Project with the distance perpendicular to the view plane.
    pub fisheye_correction: bool,
    /// Fog contribution at distance 0 (channel units).
    pub max_brightness: f32,
    /// Fog contribution floor (channel units).
    pub min_brightness: f32,
    pub wall_color: Rgb,
    pub sky_color: Rgb,
    pub ground_color: Rgb,

    /* driver ----------------------------------------------------------- */
    /// Fixed delay between the end of one tick and the next, milliseconds.
    pub tick_ms: u64,
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            move_speed: 5.0,
            look_sensitivity: 3e-4,
            turn_speed: 0.1,
            spawn_heading: 0.0,
            fov_degrees: 80.0,
            ray_floor: 120,
            ray_divisor: 10,
            step_fraction: 0.00625, // 0.1 px at 16 px tiles
            cast_method: CastMethod::March,
            height_constant: 10.0,
            fisheye_correction: false,
            max_brightness: 127.0,
            min_brightness: 10.0,
            wall_color: Rgb(128, 128, 128),
            sky_color: Rgb(0x5A, 0x5A, 0x5A),
            ground_color: Rgb(0xA1, 0x66, 0x2F),
            tick_ms: 60,
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Read and validate a TOML file.  Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject parameter sets the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason })
            }
        }

        check(
            self.tile_size.is_finite() && self.tile_size >= 1.0,
            "tile_size",
            "must be at least one pixel",
        )?;
        check(
            self.move_speed.is_finite() && self.move_speed >= 0.0,
            "move_speed",
            "must be finite and non-negative",
        )?;
        check(
            self.look_sensitivity.is_finite(),
            "look_sensitivity",
            "must be finite",
        )?;
        check(
            self.turn_speed.is_finite() && self.turn_speed >= 0.0,
            "turn_speed",
            "must be finite and non-negative",
        )?;
        check(
            self.spawn_heading.is_finite(),
            "spawn_heading",
            "must be finite",
        )?;
        check(
            self.fov_degrees > 0.0 && self.fov_degrees < 180.0,
            "fov_degrees",
            "must lie in (0, 180)",
        )?;
        check(self.ray_floor > 0, "ray_floor", "must be positive")?;
        check(self.ray_divisor > 0, "ray_divisor", "must be positive")?;
        check(
            (MIN_STEP_FRACTION..=1.0).contains(&self.step_fraction),
            "step_fraction",
            "must lie in [0.001, 1]",
        )?;
        check(
            self.height_constant.is_finite() && self.height_constant > 0.0,
            "height_constant",
            "must be positive",
        )?;
        check(
            self.min_brightness >= 0.0,
            "min_brightness",
            "must be non-negative",
        )?;
        check(
            self.max_brightness.is_finite() && self.max_brightness >= self.min_brightness,
            "max_brightness",
            "must not be below min_brightness",
        )?;
        check(self.tick_ms > 0, "tick_ms", "must be positive")?;
        Ok(())
    }

    /*──────────────────────── derived values ───────────────────────*/

    /// Horizontal field of view in radians.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// March step length in pixels.
    #[inline]
    pub fn step_len(&self) -> f32 {
        self.step_fraction * self.tile_size
    }

    /// Rays per frame for a viewport `width` pixels wide.
    #[inline]
    pub fn ray_count(&self, width: usize) -> usize {
        self.ray_floor.max(width / self.ray_divisor)
    }

    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
