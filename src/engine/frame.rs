//! One tick of the game, and the context that survives between ticks.
//!
//! Per tick:
//! 1. apply the pointer displacement gathered since the last tick and
//!    any held turn keys;
//! 2. move (all-or-nothing against the grid);
//! 3. if position and heading equal the last drawn pose → idle;
//! 4. otherwise clear the wall slices, cast the ray fan, emit one
//!    [`DrawCommand`](super::DrawCommand) per hit, remember the pose;
//! 5. re-arm the tick timer (always).

use std::time::Duration;

use glam::Vec2;

use super::{ColumnCursor, Event, Projector, RayCaster, Scheduler, Screen, WALL_TAG};
use crate::{
    config::Config,
    renderer::Surface,
    sim::{Intents, LookController, MoveOutcome, Player, Pointer, try_move},
    world::GridMap,
};

/// Pose compared between ticks for the dirty-flag redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Pose {
    pos: Vec2,
    heading: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Pose unchanged; nothing cast, nothing drawn.
    Idle,
    Redraw { rays: usize, hits: usize },
}

impl TickOutcome {
    #[inline]
    pub fn redrew(self) -> bool {
        matches!(self, TickOutcome::Redraw { .. })
    }
}

/// Everything one session mutates, owned in one place.
pub struct Game {
    map: GridMap,
    player: Player,
    look: LookController,
    intents: Intents,
    caster: RayCaster,
    projector: Projector,
    columns: ColumnCursor,
    screen: Screen,
    fov: f32,
    ray_floor: usize,
    ray_divisor: usize,
    tick_delay: Duration,
    drawn: Option<Pose>,
}

impl Game {
    /// `cfg` must already be validated.
    pub fn new(cfg: &Config, map: GridMap, viewport: (usize, usize)) -> Self {
        let player = Player::spawn(&map, cfg.spawn_heading, cfg.move_speed);
        let screen = Screen {
            w: viewport.0,
            h: viewport.1,
        };
        let rays = cfg.ray_count(screen.w);
        Self {
            map,
            player,
            look: LookController::new(cfg.look_sensitivity, cfg.turn_speed),
            intents: Intents::empty(),
            caster: RayCaster::from_config(cfg),
            projector: Projector::from_config(cfg),
            columns: ColumnCursor::new(rays),
            screen,
            fov: cfg.fov(),
            ray_floor: cfg.ray_floor,
            ray_divisor: cfg.ray_divisor,
            tick_delay: cfg.tick(),
            drawn: None,
        }
    }

    /*──────────────────────── accessors ────────────────────────────*/

    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[inline]
    pub fn intents(&self) -> Intents {
        self.intents
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Rays per frame for the current viewport.
    #[inline]
    pub fn ray_count(&self) -> usize {
        self.ray_floor.max(self.screen.w / self.ray_divisor)
    }

    /// Angles of the current fan, left to right, evenly spaced across the
    /// field of view and centred on the heading.
    pub fn ray_angles(&self) -> impl Iterator<Item = f32> + use<> {
        let n = self.ray_count();
        let heading = self.player.heading();
        let fov = self.fov;
        (0..n).map(move |i| heading + fov * ((i as f32 + 0.5) / n as f32 - 0.5))
    }

    /*──────────────────────── event dispatch ───────────────────────*/

    /// Handle one queued event.  Returns the tick outcome for `Tick`.
    pub fn dispatch<P>(&mut self, ev: Event, platform: &mut P, sched: &mut Scheduler) -> Option<TickOutcome>
    where
        P: Surface + Pointer,
    {
        match ev {
            Event::KeyDown(i) => self.intents.insert(i),
            Event::KeyUp(i) => self.intents.remove(i),
            Event::PointerMoved { x } => {
                if self.look.on_pointer_moved(x, self.screen.half_w()) {
                    platform.warp_to_center();
                }
            }
            Event::Resized { width, height } => self.resize(width, height),
            Event::Tick => {
                let outcome = self.tick(platform);
                sched.schedule_tick(self.tick_delay);
                return Some(outcome);
            }
        }
        None
    }

    /// New viewport.  Player state is untouched; the next tick redraws
    /// with the new ray density.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.screen = Screen {
            w: width,
            h: height,
        };
        let rays = self.ray_count();
        self.columns.reset(rays);
        self.drawn = None;
        log::debug!("viewport {width}×{height}, {rays} rays");
    }

    /*──────────────────────── the tick ─────────────────────────────*/

    pub fn tick<S: Surface>(&mut self, surface: &mut S) -> TickOutcome {
        self.look.apply(&mut self.player, self.intents);
        if let MoveOutcome::Blocked { delta } = try_move(&mut self.player, self.intents, &self.map) {
            log::trace!("move {delta} blocked");
        }

        let pose = Pose {
            pos: self.player.pos,
            heading: self.player.heading(),
        };
        if self.drawn == Some(pose) {
            return TickOutcome::Idle;
        }

        let outcome = self.draw_fan(surface);
        self.drawn = Some(pose);
        log::trace!("redraw at {} heading {:.4}", pose.pos, pose.heading);
        outcome
    }

    fn draw_fan<S: Surface>(&mut self, surface: &mut S) -> TickOutcome {
        surface.clear_tagged(WALL_TAG);

        let rays = self.ray_count();
        let heading = self.player.heading();
        let origin = self.player.pos;
        let mut hits = 0;

        for angle in self.ray_angles() {
            // escaped rays still consume their slot
            let column = self.columns.advance();
            if let Some(hit) = self.caster.cast(&self.map, origin, angle) {
                let cmd = self
                    .projector
                    .project(&hit, angle - heading, column, rays, self.screen);
                surface.draw_vertical_segment(&cmd, WALL_TAG);
                hits += 1;
            }
        }
        TickOutcome::Redraw { rays, hits }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{DrawCommand, Tag},
        world::{GridMap, demo_map},
    };
    use glam::vec2;
    use std::f32::consts::{FRAC_PI_2, TAU};
    use std::time::Instant;

    /// Records everything the engine asks of the platform.  A warp
    /// generates one echo notification at the centre, like a real
    /// pointer warp does.
    #[derive(Default)]
    struct FakePlatform {
        size: (usize, usize),
        segments: Vec<(Tag, DrawCommand)>,
        clears: usize,
        warps: usize,
        echoes: Vec<Event>,
    }

    impl FakePlatform {
        fn new(w: usize, h: usize) -> Self {
            Self {
                size: (w, h),
                ..Default::default()
            }
        }
    }

    impl Surface for FakePlatform {
        fn viewport(&self) -> (usize, usize) {
            self.size
        }
        fn draw_vertical_segment(&mut self, cmd: &DrawCommand, tag: Tag) {
            self.segments.push((tag, *cmd));
        }
        fn clear_tagged(&mut self, tag: Tag) {
            self.clears += 1;
            self.segments.retain(|(t, _)| *t != tag);
        }
    }

    impl Pointer for FakePlatform {
        fn warp_to_center(&mut self) {
            self.warps += 1;
            self.echoes.push(Event::PointerMoved {
                x: self.size.0 as f32 * 0.5,
            });
        }
    }

    /* tiny helpers ---------------------------------------------------*/
    fn game(w: usize, h: usize) -> Game {
        let cfg = Config::default();
        Game::new(&cfg, demo_map(cfg.tile_size).unwrap(), (w, h))
    }

    /// Drain the queue (plus any warp echoes) like the main loop does.
    fn pump(g: &mut Game, fake: &mut FakePlatform, sched: &mut Scheduler) -> Vec<TickOutcome> {
        let mut out = Vec::new();
        loop {
            for ev in fake.echoes.drain(..) {
                sched.push(ev);
            }
            let Some(ev) = sched.pop() else { break };
            out.extend(g.dispatch(ev, fake, sched));
        }
        out
    }

    /*------------------------------------------------------------------*/
    /* Spawn and first frame                                            */
    /*------------------------------------------------------------------*/
    #[test]
    fn spawns_at_tile_centre() {
        let g = game(1280, 800);
        let ts = g.map().tile_size();
        assert_eq!(g.map().spawn_tile(), (2, 2));
        assert!((g.player().pos - vec2(2.0 * ts + ts / 2.0, 2.0 * ts + ts / 2.0)).length() < 1e-4);
    }

    #[test]
    fn first_tick_draws_full_fan_in_column_order() {
        let mut g = game(1280, 800);
        let mut fake = FakePlatform::new(1280, 800);
        let outcome = g.tick(&mut fake);

        assert_eq!(outcome, TickOutcome::Redraw { rays: 128, hits: 128 });
        let cols: Vec<usize> = fake.segments.iter().map(|(_, c)| c.column).collect();
        assert_eq!(cols, (0..128).collect::<Vec<_>>());
        assert!(fake.segments.iter().all(|(t, _)| *t == WALL_TAG));
    }

    #[test]
    fn fan_is_centred_on_heading() {
        let g = game(1280, 800);
        let angles: Vec<f32> = g.ray_angles().collect();
        let n = angles.len() as f32;
        let mean = angles.iter().sum::<f32>() / n;
        assert!((mean - g.player().heading()).abs() < 1e-4);
        let span = angles[angles.len() - 1] - angles[0];
        assert!((span - 80f32.to_radians() * (n - 1.0) / n).abs() < 1e-4);
    }

    /*------------------------------------------------------------------*/
    /* Dirty-flag redraw                                                */
    /*------------------------------------------------------------------*/
    #[test]
    fn unchanged_pose_skips_the_fan() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        assert!(g.tick(&mut fake).redrew());
        let drawn = fake.segments.len();

        assert_eq!(g.tick(&mut fake), TickOutcome::Idle);
        assert_eq!(fake.clears, 1, "idle tick must not clear");
        assert_eq!(fake.segments.len(), drawn, "idle tick must keep the frame");
    }

    #[test]
    fn movement_triggers_redraw_and_replaces_slices() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        g.tick(&mut fake);

        g.intents = Intents::FORWARD;
        assert!(g.tick(&mut fake).redrew());
        assert_eq!(fake.clears, 2);
        assert_eq!(fake.segments.len(), g.ray_count());
    }

    #[test]
    fn resize_changes_density_and_keeps_player() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        g.intents = Intents::FORWARD;
        g.tick(&mut fake);
        g.intents = Intents::empty();
        let before = *g.player();

        g.resize(2000, 1000);
        fake.size = (2000, 1000);
        let outcome = g.tick(&mut fake);
        assert_eq!(outcome, TickOutcome::Redraw { rays: 200, hits: 200 });
        assert_eq!(*g.player(), before);
        let last = fake.segments.last().unwrap().1;
        assert_eq!(last.column, 199);
        assert!((last.x_right - 2000.0).abs() < 1e-2);
    }

    /*------------------------------------------------------------------*/
    /* Event queue: look, warp echo, rescheduling                       */
    /*------------------------------------------------------------------*/
    #[test]
    fn pointer_sample_applies_on_next_tick_and_echo_is_ignored() {
        let mut g = game(1000, 600);
        let mut fake = FakePlatform::new(1000, 600);
        let mut sched = Scheduler::new(Instant::now());
        let h0 = g.player().heading();

        sched.push(Event::PointerMoved { x: 600.0 }); // +100 px
        pump(&mut g, &mut fake, &mut sched);
        assert_eq!(fake.warps, 1, "echo must not trigger a second warp");
        assert_eq!(g.player().heading(), h0, "heading only changes on tick");

        sched.push(Event::Tick);
        pump(&mut g, &mut fake, &mut sched);
        let expected = (h0 + 100.0 * Config::default().look_sensitivity).rem_euclid(TAU);
        assert!((g.player().heading() - expected).abs() < 1e-6);
    }

    #[test]
    fn tick_uses_fresh_heading_for_movement() {
        let mut g = game(1000, 600);
        let mut fake = FakePlatform::new(1000, 600);
        let mut sched = Scheduler::new(Instant::now());
        let start = g.player().pos;

        // turn a quarter (in px) then step forward in the same tick
        let px = FRAC_PI_2 / Config::default().look_sensitivity;
        sched.push(Event::PointerMoved { x: 500.0 + px });
        sched.push(Event::KeyDown(Intents::FORWARD));
        sched.push(Event::Tick);
        pump(&mut g, &mut fake, &mut sched);

        let moved = g.player().pos - start;
        assert!(moved.x.abs() < 1e-2 && (moved.y - 5.0).abs() < 1e-2, "moved {moved}");
    }

    #[test]
    fn every_tick_rearms_the_timer() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        let t0 = Instant::now();
        let mut sched = Scheduler::new(t0);

        sched.push(Event::Tick);
        let out = pump(&mut g, &mut fake, &mut sched);
        assert!(out[0].redrew());
        assert!(sched.tick_pending());

        sched.advance(t0); // deadline fixed once control is back in the loop
        sched.advance(t0 + Duration::from_secs(1));
        let out = pump(&mut g, &mut fake, &mut sched);
        assert_eq!(out, vec![TickOutcome::Idle]);
        assert!(sched.tick_pending(), "idle ticks re-arm too");
    }

    #[test]
    fn key_up_releases_intent() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        let mut sched = Scheduler::new(Instant::now());
        sched.push(Event::KeyDown(Intents::FORWARD));
        sched.push(Event::KeyDown(Intents::STRAFE_LEFT));
        sched.push(Event::KeyUp(Intents::FORWARD));
        pump(&mut g, &mut fake, &mut sched);
        assert_eq!(g.intents(), Intents::STRAFE_LEFT);
    }

    #[test]
    fn held_turn_key_turns_every_tick_without_moving() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        let mut sched = Scheduler::new(Instant::now());
        let start = *g.player();
        let turn = Config::default().turn_speed;

        sched.push(Event::KeyDown(Intents::TURN_RIGHT));
        sched.push(Event::Tick);
        let out = pump(&mut g, &mut fake, &mut sched);
        assert!(out[0].redrew(), "turning must redraw");
        assert!((g.player().heading() - (start.heading() + turn)).abs() < 1e-6);
        assert_eq!(g.player().pos, start.pos);

        // still held: keeps turning
        g.tick(&mut fake);
        assert!((g.player().heading() - (start.heading() + 2.0 * turn)).abs() < 1e-6);

        sched.push(Event::KeyUp(Intents::TURN_RIGHT));
        pump(&mut g, &mut fake, &mut sched);
        assert_eq!(g.tick(&mut fake), TickOutcome::Idle);
    }

    #[test]
    fn releasing_every_intent_at_once() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        let mut sched = Scheduler::new(Instant::now());
        sched.push(Event::KeyDown(Intents::FORWARD));
        sched.push(Event::KeyDown(Intents::TURN_LEFT));
        sched.push(Event::KeyUp(Intents::all()));
        pump(&mut g, &mut fake, &mut sched);
        assert_eq!(g.intents(), Intents::empty());
    }

    /*------------------------------------------------------------------*/
    /* End-to-end scenarios                                             */
    /*------------------------------------------------------------------*/
    #[test]
    fn corridor_ray_hits_known_wall() {
        let mut g = game(1280, 800);
        g.player_mut().set_heading(FRAC_PI_2);
        let origin = g.player().pos;

        let hit = g.caster.cast(g.map(), origin, FRAC_PI_2).expect("hit");
        assert_eq!(hit.cell, (2, 9));
        let face = vec2(origin.x, 9.0 * g.map().tile_size());
        assert!((hit.distance - (face - origin).length()).abs() <= g.caster.step() + 1e-3);
    }

    #[test]
    fn diagonal_walk_is_unnormalised_vector_sum() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        g.player_mut().set_heading(0.0);
        let start = g.player().pos;

        g.intents = Intents::FORWARD | Intents::STRAFE_LEFT;
        g.tick(&mut fake);

        let p = g.player();
        let expected = p.forward() * p.speed - p.right() * p.speed;
        assert!((p.pos - start - expected).length() < 1e-4);
    }

    #[test]
    fn walking_into_wall_stops_dead() {
        let mut g = game(640, 480);
        let mut fake = FakePlatform::new(640, 480);
        // heading west from the spawn; the border wall is 24 px away
        g.player_mut().set_heading(std::f32::consts::PI);
        g.intents = Intents::FORWARD;
        for _ in 0..10 {
            g.tick(&mut fake);
        }
        let last = g.player().pos;
        assert!(!g.map().is_wall(last.x, last.y));
        assert!((last.x - 20.0).abs() < 1e-3, "stopped at {last}");
        g.tick(&mut fake);
        assert_eq!(g.player().pos, last);
    }

    #[test]
    fn escaped_rays_leave_their_column_empty() {
        let cfg = Config::default();
        // no border: rays pointing away from the single wall escape
        let map = GridMap::from_rows(&[[0u8, 0, 0, 0], [0, 2, 0, 1], [0, 0, 0, 0]], cfg.tile_size)
            .unwrap();
        let mut g = Game::new(&cfg, map, (1200, 800));
        let mut fake = FakePlatform::new(1200, 800);
        let TickOutcome::Redraw { rays, hits } = g.tick(&mut fake) else {
            panic!("first tick must draw");
        };
        assert!(hits > 0 && hits < rays);
        // slots still follow ray order
        let cols: Vec<usize> = fake.segments.iter().map(|(_, c)| c.column).collect();
        assert!(cols.windows(2).all(|w| w[0] < w[1]));
    }
}
