mod components;
mod look;
mod movement;

pub use components::{Intents, Player, normalize_angle};
pub use look::{LookController, Pointer};
pub use movement::{MoveOutcome, displacement, try_move};
