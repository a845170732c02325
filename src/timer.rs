//! Frame timing and throughput instrumentation.

use std::{
    cell::Cell,
    fmt,
    time::{Duration, Instant},
};

use itertools::Itertools;

/// Measures how long an operation takes, averaged over all runs since it was last displayed.
///
/// Displaying the timer with `{}` prints `name: <runs>x<average>ms` and starts a new averaging
/// window.
pub struct Timer {
    name: &'static str,
    runs: Cell<u32>,
    total: Cell<Duration>,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            runs: Cell::new(0),
            total: Cell::new(Duration::ZERO),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes `op`, recording the time it takes.
    pub fn time<T>(&mut self, op: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        op()
    }

    /// Starts timing an operation; it ends when the returned guard is dropped.
    pub fn start(&mut self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    /// Returns the number of runs recorded in the current window.
    pub fn runs(&self) -> u32 {
        self.runs.get()
    }

    /// Returns the average duration of the runs in the current window.
    pub fn average(&self) -> Duration {
        match self.runs.get() {
            0 => Duration::ZERO,
            n => self.total.get() / n,
        }
    }

    fn record(&self, duration: Duration) {
        self.runs.set(self.runs.get().saturating_add(1));
        self.total.set(self.total.get().saturating_add(duration));
    }

    fn reset(&self) {
        self.runs.set(0);
        self.total.set(Duration::ZERO);
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avg_ms = self.average().as_secs_f32() * 1000.0;
        let runs = self.runs.get();
        self.reset();
        write!(f, "{}: {runs}x{avg_ms:.01}ms", self.name)
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("runs", &self.runs.get())
            .field("total", &self.total.get())
            .finish()
    }
}

/// Guard returned by [`Timer::start`].
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a mut Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.start.elapsed());
    }
}

/// Logs the number of processed frames once per second.
pub struct FpsCounter {
    name: String,
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            window_start: Instant::now(),
        }
    }

    /// Counts a frame, logging the frame rate if a second has passed.
    pub fn tick(&mut self) {
        self.tick_with(std::iter::empty::<&Timer>());
    }

    /// Counts a frame, logging the frame rate followed by `extra` (typically [`Timer`]s) if a
    /// second has passed.
    ///
    /// `extra` is only formatted when something is logged, which also resets any timers in it.
    pub fn tick_with<D, I>(&mut self, extra: I)
    where
        D: fmt::Display,
        I: IntoIterator<Item = D>,
    {
        self.frames += 1;
        if self.window_start.elapsed() < Duration::from_secs(1) {
            return;
        }

        let mut extra = extra.into_iter().peekable();
        if extra.peek().is_some() {
            log::debug!("{}: {} FPS ({})", self.name, self.frames, extra.join(", "));
        } else {
            log::debug!("{}: {} FPS", self.name, self.frames);
        }
        self.frames = 0;
        self.window_start = Instant::now();
    }
}

/// Instantaneous frame rate, computed from the time between consecutive frames.
///
/// This is what gets drawn onto annotated frames; [`FpsCounter`] is the smoothed, logged variant.
#[derive(Debug, Default)]
pub struct FrameRate {
    last: Option<Instant>,
}

impl FrameRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a new frame and returns the rate implied by the time since the previous
    /// one.
    ///
    /// Returns 0.0 for the very first frame.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let fps = match self.last {
            Some(last) => {
                let secs = now.saturating_duration_since(last).as_secs_f32();
                if secs > 0.0 {
                    1.0 / secs
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last = Some(now);
        fps
    }
}
