use std::f32::consts::TAU;

use bitflags::bitflags;
use glam::Vec2;

use crate::world::GridMap;

bitflags! {
    /// Direction and turn intents currently held by the player.
    ///
    /// Opposite pairs are *not* exclusive: each flag contributes its own
    /// signed vector (or signed turn) and the sum cancels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Intents: u8 {
        const FORWARD      = 0x01;
        const BACK         = 0x02;
        const STRAFE_LEFT  = 0x04;
        const STRAFE_RIGHT = 0x08;
        const TURN_LEFT    = 0x10;
        const TURN_RIGHT   = 0x20;
    }
}

/// Wrap `angle` into `[0, 2π)`.
///
/// `rem_euclid` alone can round a tiny negative input up to exactly `TAU`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU { 0.0 } else { a }
}

/// Player pose.  Lives for the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Continuous world position, pixels.
    pub pos: Vec2,
    heading: f32, // radians, [0, 2π); 0 = +X, grows towards +Y
    /// Pixels per tick.
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            pos,
            heading: normalize_angle(heading),
            speed,
        }
    }

    /// Place a player at the centre of the map's spawn tile.
    pub fn spawn(map: &GridMap, heading: f32, speed: f32) -> Self {
        Self::new(map.spawn_point(), heading, speed)
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_angle(heading);
    }

    /// Rotate by `delta` radians, keeping the heading normalised.
    #[inline]
    pub fn turn(&mut self, delta: f32) {
        self.set_heading(self.heading + delta);
    }

    /// Unit vector along the heading.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.heading.sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector at heading + π/2 (strafe-right direction).
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
