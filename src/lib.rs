//! First-person raycaster over a 2D tile grid.
//!
//! * [`world`]    – immutable tile lattice + spawn lookup.
//! * [`sim`]      – player pose, look and movement controllers.
//! * [`engine`]   – ray caster, projector/shader, event queue, frame driver.
//! * [`renderer`] – the [`renderer::Surface`] contract and a CPU back-end.
//! * [`platform`] – minifb window glue.

pub mod config;
pub mod engine;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod world;

pub use config::{Config, ConfigError};
