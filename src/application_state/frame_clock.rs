//! # Frame Clock
//!
//! Measures the time between redraws in milliseconds.

use web_time::Instant;

/// Delta timer for the render loop. The first tick always reports 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
}

impl FrameClock {
    /// A clock that has not ticked yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous tick at `now`.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f32() * 1000.0,
            None => 0.0,
        };
        self.last_tick = Some(now);
        dt
    }

    /// Milliseconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }
}
