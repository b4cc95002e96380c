//! Time facilities for the render loop.
//!
//! A [`Clock`] is the single source of "now" for a monogram. The windowed
//! app uses [`SystemClock`]; tests use [`ManualClock`] and step it by hand,
//! which makes the timer and breathing fully deterministic.
//!
//! [`Time`] turns successive clock readings into per-frame values:
//!
//! ```ignore
//! let clock = SystemClock::new();
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! time.update(clock.now());
//!
//! println!("Elapsed: {:.2}s", time.elapsed());
//! println!("FPS: {:.1}", time.fps());
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time since an arbitrary fixed epoch.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock, with the epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Per-frame timing derived from clock readings.
#[derive(Debug)]
pub struct Time {
    /// Clock reading of the last update, if any.
    last: Option<Duration>,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Duration,
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        Self {
            last: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Duration::ZERO,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Update timing values from a clock reading. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self, now: Duration) -> (f32, f32) {
        let last = *self.last.get_or_insert(now);
        self.delta_secs = now.saturating_sub(last).as_secs_f32();
        self.elapsed_secs = now.as_secs_f32();
        self.last = Some(now);
        self.frame_count += 1;

        let fps_elapsed = now.saturating_sub(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Clock time in seconds at the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time between the last two updates, in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
