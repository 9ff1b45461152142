//! Single event queue shared by input and the tick timer.
//!
//! Input notifications and ticks are dispatched strictly in arrival order
//! from one loop, so pointer samples are always consumed before (or by)
//! the tick that uses the heading.  The tick timer is fixed-delay: the
//! delay is counted from the moment control returns to the loop after the
//! previous tick, not from a fixed clock.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::sim::Intents;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    KeyDown(Intents),
    KeyUp(Intents),
    /// Pointer notification; horizontal position in viewport pixels.
    PointerMoved { x: f32 },
    Resized { width: usize, height: usize },
    Tick,
}

#[derive(Clone, Copy, Debug)]
enum Timer {
    /// Re-armed by the running handler; deadline fixed on the next advance.
    Armed(Duration),
    Due(Instant),
}

#[derive(Debug)]
pub struct Scheduler {
    queue: VecDeque<Event>,
    now: Instant,
    timer: Option<Timer>,
}

impl Scheduler {
    pub fn new(now: Instant) -> Self {
        Self {
            queue: VecDeque::new(),
            now,
            timer: None,
        }
    }

    #[inline]
    pub fn push(&mut self, ev: Event) {
        self.queue.push_back(ev);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Arm the tick timer `delay` after the current handler returns.
    /// Replaces any pending tick.
    pub fn schedule_tick(&mut self, delay: Duration) {
        self.timer = Some(Timer::Armed(delay));
    }

    #[inline]
    pub fn tick_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Move the clock to `now`, queueing the tick if it is due.
    pub fn advance(&mut self, now: Instant) {
        self.now = now;
        if let Some(Timer::Armed(delay)) = self.timer {
            self.timer = Some(Timer::Due(now + delay));
        }
        if let Some(Timer::Due(at)) = self.timer {
            if now >= at {
                self.timer = None;
                self.queue.push_back(Event::Tick);
            }
        }
    }

    /// When the loop next has work to do, if a tick is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.timer? {
            Timer::Armed(delay) => Some(self.now + delay),
            Timer::Due(at) => Some(at),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
