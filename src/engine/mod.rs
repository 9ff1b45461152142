mod caster;
mod frame;
mod projection;
mod scheduler;
mod types;

pub use caster::{CastMethod, RayCaster};
pub use frame::{Game, TickOutcome};
pub use projection::{ColumnCursor, Projector};
pub use scheduler::{Event, Scheduler};
pub use types::{DrawCommand, HitResult, Rgb, Screen, Tag, WALL_TAG};
