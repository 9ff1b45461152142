//! minifb window glue.
//!
//! * key-down / key-up edges of the bound keys → [`Event::KeyDown`] /
//!   [`Event::KeyUp`];
//! * pointer motion → [`Event::PointerMoved`];
//! * window size change → [`Event::Resized`];
//! * [`Software`] surface presented with `update_with_buffer`.
//!
//! minifb cannot move the OS cursor, so the pointer is tracked as a
//! *virtual* position driven by raw motion deltas.  Warping snaps the
//! virtual position to the centre and emits the echo notification a real
//! warp would, on the next poll.  The OS cursor still stops at the screen
//! edge, which caps mouse look to about one screen width of travel; the
//! turn keys have no such limit.
//!
//! Edges missed while the window is unfocused are repaired on every focus
//! change: all intents are released, then the keys still down re-pressed.

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use thiserror::Error;

use crate::{
    config::{Config, KeyBindings},
    engine::{DrawCommand, Event, Scheduler, Tag},
    renderer::{Software, Surface},
    sim::{Intents, Pointer},
};

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("unknown key name `{0}` in bindings")]
    UnknownKey(String),
}

pub struct Platform {
    window: Window,
    surface: Software,
    bindings: [(Key, Intents); 6],
    focused: bool,
    pointer_x: f32,        // virtual pointer, viewport px
    last_raw: Option<f32>, // last OS pointer sample
    pending: Vec<Event>,   // warp echoes, delivered on the next poll
}

impl Platform {
    pub fn open(title: &str, width: usize, height: usize, cfg: &Config) -> Result<Self, PlatformError> {
        let bindings = resolve_bindings(&cfg.keys)?;

        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        window.set_cursor_visibility(false);
        // pacing comes from the tick scheduler
        window.set_target_fps(0);

        Ok(Self {
            window,
            surface: Software::new(width, height, cfg.sky_color, cfg.ground_color),
            bindings,
            focused: true,
            pointer_x: width as f32 * 0.5,
            last_raw: None,
            pending: Vec::new(),
        })
    }

    /// Open and Escape not held.
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Translate everything minifb saw since the last poll into events.
    pub fn poll(&mut self, sched: &mut Scheduler) {
        for ev in self.pending.drain(..) {
            sched.push(ev);
        }

        /* resize ---------------------------------------------------------- */
        let (w, h) = self.window.get_size();
        if (w, h) != self.surface.viewport() && w > 0 && h > 0 {
            self.surface.resize(w, h);
            self.pointer_x = w as f32 * 0.5;
            sched.push(Event::Resized {
                width: w,
                height: h,
            });
        }

        /* keys ------------------------------------------------------------ */
        let active = self.window.is_active();
        if active != self.focused {
            self.focused = active;
            sched.push(Event::KeyUp(Intents::all()));
            if active {
                let window = &self.window;
                let held = held_intents(&self.bindings, |k| window.is_key_down(k));
                if !held.is_empty() {
                    sched.push(Event::KeyDown(held));
                }
            }
            log::debug!("focus {}, intents resynced", if active { "gained" } else { "lost" });
        }
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            if let Some(intent) = self.intent_for(key) {
                sched.push(Event::KeyDown(intent));
            }
        }
        for key in self.window.get_keys_released() {
            if let Some(intent) = self.intent_for(key) {
                sched.push(Event::KeyUp(intent));
            }
        }

        /* pointer --------------------------------------------------------- */
        if let Some((raw_x, _)) = self.window.get_mouse_pos(MouseMode::Pass) {
            if let Some(last) = self.last_raw {
                let dx = raw_x - last;
                if dx != 0.0 {
                    self.pointer_x += dx;
                    sched.push(Event::PointerMoved { x: self.pointer_x });
                }
            }
            self.last_raw = Some(raw_x);
        }
    }

    /// Rasterise the retained frame and show it.
    pub fn present(&mut self) -> Result<(), minifb::Error> {
        let window = &mut self.window;
        self.surface
            .present(|fb, w, h| window.update_with_buffer(fb, w, h))
    }

    /// Pump window events without a new frame.
    pub fn update(&mut self) {
        self.window.update();
    }

    fn intent_for(&self, key: Key) -> Option<Intents> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, i)| i)
    }
}

impl Surface for Platform {
    fn viewport(&self) -> (usize, usize) {
        self.surface.viewport()
    }

    fn draw_vertical_segment(&mut self, cmd: &DrawCommand, tag: Tag) {
        self.surface.draw_vertical_segment(cmd, tag);
    }

    fn clear_tagged(&mut self, tag: Tag) {
        self.surface.clear_tagged(tag);
    }
}

impl Pointer for Platform {
    fn warp_to_center(&mut self) {
        let (w, _) = self.surface.viewport();
        self.pointer_x = w as f32 * 0.5;
        self.pending.push(Event::PointerMoved { x: self.pointer_x });
    }
}

/*──────────────────────── key names ──────────────────────────────────*/

fn resolve_bindings(keys: &KeyBindings) -> Result<[(Key, Intents); 6], PlatformError> {
    let lookup = |name: &str| key_from_name(name).ok_or_else(|| PlatformError::UnknownKey(name.to_owned()));
    Ok([
        (lookup(&keys.forward)?, Intents::FORWARD),
        (lookup(&keys.back)?, Intents::BACK),
        (lookup(&keys.strafe_left)?, Intents::STRAFE_LEFT),
        (lookup(&keys.strafe_right)?, Intents::STRAFE_RIGHT),
        (lookup(&keys.turn_left)?, Intents::TURN_LEFT),
        (lookup(&keys.turn_right)?, Intents::TURN_RIGHT),
    ])
}

/// Union of the intents whose key `is_down` reports held.
fn held_intents(bindings: &[(Key, Intents)], is_down: impl Fn(Key) -> bool) -> Intents {
    bindings
        .iter()
        .filter(|&&(k, _)| is_down(k))
        .fold(Intents::empty(), |acc, &(_, i)| acc | i)
}

/// Case-insensitive key name → minifb key (letters, arrows, a few extras).
pub fn key_from_name(name: &str) -> Option<Key> {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];

    let lower = name.trim().to_ascii_lowercase();
    if let [c @ b'a'..=b'z'] = lower.as_bytes() {
        return Some(LETTERS[(c - b'a') as usize]);
    }
    match lower.as_str() {
        "up" => Some(Key::Up),
        "down" => Some(Key::Down),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        "space" => Some(Key::Space),
        "lshift" | "leftshift" => Some(Key::LeftShift),
        "lctrl" | "leftctrl" => Some(Key::LeftCtrl),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_wasd_and_arrows() {
        let b = resolve_bindings(&KeyBindings::default()).unwrap();
        assert_eq!(b[0], (Key::W, Intents::FORWARD));
        assert_eq!(b[1], (Key::S, Intents::BACK));
        assert_eq!(b[2], (Key::A, Intents::STRAFE_LEFT));
        assert_eq!(b[3], (Key::D, Intents::STRAFE_RIGHT));
        assert_eq!(b[4], (Key::Left, Intents::TURN_LEFT));
        assert_eq!(b[5], (Key::Right, Intents::TURN_RIGHT));
    }

    #[test]
    fn turn_keys_are_rebindable() {
        let keys = KeyBindings {
            turn_left: "Q".into(),
            turn_right: "e".into(),
            ..KeyBindings::default()
        };
        let b = resolve_bindings(&keys).unwrap();
        assert_eq!(b[4], (Key::Q, Intents::TURN_LEFT));
        assert_eq!(b[5], (Key::E, Intents::TURN_RIGHT));
    }

    #[test]
    fn held_keys_rebuild_intents() {
        let b = resolve_bindings(&KeyBindings::default()).unwrap();
        let held = held_intents(&b, |k| matches!(k, Key::W | Key::Right | Key::Space));
        assert_eq!(held, Intents::FORWARD | Intents::TURN_RIGHT);
        assert_eq!(held_intents(&b, |_| false), Intents::empty());
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(key_from_name("q"), Some(Key::Q));
        assert_eq!(key_from_name(" UP "), Some(Key::Up));
    }

    #[test]
    fn unknown_binding_is_reported() {
        let keys = KeyBindings {
            forward: "Hyper".into(),
            ..KeyBindings::default()
        };
        let err = resolve_bindings(&keys).unwrap_err();
        assert!(matches!(err, PlatformError::UnknownKey(name) if name == "Hyper"));
    }
}
