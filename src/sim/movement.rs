//! Held intents → displacement, gated by the grid.
//!
//! All-or-nothing: if the candidate position is inside a wall the whole
//! displacement is dropped.  No per-axis sliding.

use glam::Vec2;

use super::{Intents, Player};
use crate::world::GridMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Nothing held, or the held intents cancelled out.
    Idle,
    Moved { delta: Vec2 },
    /// Candidate landed in a wall; position untouched.
    Blocked { delta: Vec2 },
}

/// Sum of the independent forward and strafe vectors.  Diagonals are not
/// renormalised.
pub fn displacement(player: &Player, intents: Intents) -> Vec2 {
    let fwd = player.forward() * player.speed;
    let side = player.right() * player.speed;

    let mut delta = Vec2::ZERO;
    if intents.contains(Intents::FORWARD) {
        delta += fwd;
    }
    if intents.contains(Intents::BACK) {
        delta -= fwd;
    }
    if intents.contains(Intents::STRAFE_RIGHT) {
        delta += side;
    }
    if intents.contains(Intents::STRAFE_LEFT) {
        delta -= side;
    }
    delta
}

/// Apply one tick of movement.
pub fn try_move(player: &mut Player, intents: Intents, map: &GridMap) -> MoveOutcome {
    let delta = displacement(player, intents);
    if delta == Vec2::ZERO {
        return MoveOutcome::Idle;
    }

    let target = player.pos + delta;
    if map.is_wall(target.x, target.y) {
        return MoveOutcome::Blocked { delta };
    }

    player.pos = target;
    MoveOutcome::Moved { delta }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
