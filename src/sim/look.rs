//! Pointer and turn keys → heading.
//!
//! The pointer is pushed back to the viewport centre after every sample,
//! so each sample is a displacement from the centre rather than an
//! absolute position.  The warp itself produces one pointer notification
//! (the *echo*), which must not be read as movement.
//!
//! Held turn intents add a fixed angle per tick on top of the pointer
//! displacement.  Both reach the heading through [`LookController::apply`].

use super::{Intents, Player};

/// Platform hook used after every accepted sample.
pub trait Pointer {
    /// Move the pointer to the viewport centre.  Expected to produce
    /// exactly one pointer notification at the centre.
    fn warp_to_center(&mut self);
}

#[derive(Clone, Copy, Debug)]
pub struct LookController {
    sensitivity: f32, // rad / px
    turn_speed: f32,  // rad / tick while a turn intent is held
    pending_dx: f32,  // px accumulated since the last tick
    suppress_next: bool,
}

impl LookController {
    pub fn new(sensitivity: f32, turn_speed: f32) -> Self {
        Self {
            sensitivity,
            turn_speed,
            pending_dx: 0.0,
            suppress_next: false,
        }
    }

    /// Feed one pointer notification at horizontal position `x`.
    ///
    /// Returns `true` when the caller must warp the pointer back to
    /// `center_x`.
    pub fn on_pointer_moved(&mut self, x: f32, center_x: f32) -> bool {
        if self.suppress_next {
            self.suppress_next = false;
            return false;
        }
        let dx = x - center_x;
        if dx == 0.0 {
            return false;
        }
        self.pending_dx += dx;
        self.suppress_next = true;
        true
    }

    /// Pixels of displacement not yet applied.
    #[inline]
    pub fn pending(&self) -> f32 {
        self.pending_dx
    }

    /// Consume the accumulated displacement, plus one tick of any held
    /// turn intent, into `player`'s heading.  Returns `true` if the
    /// heading was touched.
    pub fn apply(&mut self, player: &mut Player, intents: Intents) -> bool {
        let mut delta = self.pending_dx * self.sensitivity;
        self.pending_dx = 0.0;
        if intents.contains(Intents::TURN_RIGHT) {
            delta += self.turn_speed;
        }
        if intents.contains(Intents::TURN_LEFT) {
            delta -= self.turn_speed;
        }
        if delta == 0.0 {
            return false;
        }
        player.turn(delta);
        true
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::TAU;

    #[test]
    fn echo_of_warp_is_ignored() {
        let mut look = LookController::new(1e-3, 0.1);
        assert!(look.on_pointer_moved(110.0, 100.0), "real motion must warp");
        // the warp lands on the centre: dropped without a new warp
        assert!(!look.on_pointer_moved(100.0, 100.0));
        // a later real motion counts again
        assert!(look.on_pointer_moved(95.0, 100.0));
        assert_eq!(look.pending(), 5.0);
    }

    #[test]
    fn only_the_next_sample_is_suppressed() {
        let mut look = LookController::new(1e-3, 0.1);
        look.on_pointer_moved(120.0, 100.0);
        look.on_pointer_moved(140.0, 100.0); // swallowed as the echo
        look.on_pointer_moved(130.0, 100.0);
        assert_eq!(look.pending(), 50.0);
    }

    #[test]
    fn centred_pointer_needs_no_warp() {
        let mut look = LookController::new(1e-3, 0.1);
        assert!(!look.on_pointer_moved(100.0, 100.0));
        assert_eq!(look.pending(), 0.0);
    }

    #[test]
    fn apply_is_proportional_and_consumes() {
        let mut look = LookController::new(3e-4, 0.1);
        let mut p = Player::new(Vec2::ZERO, 1.0, 5.0);
        look.on_pointer_moved(200.0, 100.0);
        assert!(look.apply(&mut p, Intents::empty()));
        assert!((p.heading() - (1.0 + 100.0 * 3e-4)).abs() < 1e-6);
        assert!(!look.apply(&mut p, Intents::empty()), "second apply must be a no-op");
    }

    #[test]
    fn held_turn_keys_rotate_each_tick() {
        let mut look = LookController::new(3e-4, 0.1);
        let mut p = Player::new(Vec2::ZERO, 0.0, 5.0);

        // no pointer travel needed: a full turn from the keys alone
        for _ in 0..63 {
            assert!(look.apply(&mut p, Intents::TURN_RIGHT));
        }
        assert!((p.heading() - (6.3 - TAU)).abs() < 1e-3, "{}", p.heading());

        assert!(look.apply(&mut p, Intents::TURN_LEFT));
        assert!((p.heading() - (6.2 - TAU).rem_euclid(TAU)).abs() < 1e-3);
    }

    #[test]
    fn opposite_turn_keys_cancel() {
        let mut look = LookController::new(3e-4, 0.1);
        let mut p = Player::new(Vec2::ZERO, 1.0, 5.0);
        assert!(!look.apply(&mut p, Intents::TURN_LEFT | Intents::TURN_RIGHT));
        assert_eq!(p.heading(), 1.0);
    }

    #[test]
    fn turn_keys_add_to_pointer_travel() {
        let mut look = LookController::new(1e-3, 0.1);
        let mut p = Player::new(Vec2::ZERO, 1.0, 5.0);
        look.on_pointer_moved(150.0, 100.0);
        look.apply(&mut p, Intents::TURN_LEFT | Intents::FORWARD);
        assert!((p.heading() - (1.0 + 0.05 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn leftward_motion_wraps_heading() {
        let mut look = LookController::new(1e-2, 0.1);
        let mut p = Player::new(Vec2::ZERO, 0.0, 5.0);
        look.on_pointer_moved(90.0, 100.0);
        look.apply(&mut p, Intents::empty());
        assert!((p.heading() - (TAU - 0.1)).abs() < 1e-5);
    }
}
