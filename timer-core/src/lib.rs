//! Pure stopwatch logic with no platform dependencies.
//! Callers read the clock and hand the instant in, so everything here is
//! deterministic under test.

pub mod clock;

use std::time::Duration;

pub use clock::{ClockSource, Instant, ManualClock, MonotonicClock};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Stopped,
    Running,
}

#[derive(Debug)]
pub struct TimerCore {
    state: TimerState,
    segment_start: Instant,
    accumulated: Duration,
    displayed: Duration,
}

impl TimerCore {
    pub fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            segment_start: Instant::default(),
            accumulated: Duration::ZERO,
            displayed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Total of all completed segments.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Value computed by the most recent start/stop/reset/tick.
    pub fn displayed(&self) -> Duration {
        self.displayed
    }

    /// Begins a new segment. Ignored while already running, so an open
    /// segment is never discarded.
    pub fn start(&mut self, now: Instant) {
        if self.state == TimerState::Running {
            return;
        }
        self.segment_start = now;
        self.state = TimerState::Running;
    }

    /// Closes the open segment into `accumulated`. A stop while stopped only
    /// refreshes `displayed`.
    pub fn stop(&mut self, now: Instant) -> Duration {
        if self.state == TimerState::Running {
            self.accumulated += now.saturating_duration_since(self.segment_start);
            self.state = TimerState::Stopped;
        }
        self.displayed = self.accumulated;
        self.displayed
    }

    /// Zeroes the counter without touching the run state. A running timer
    /// keeps its segment start, so the next tick counts from there again.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.displayed = Duration::ZERO;
    }

    pub fn tick(&mut self, now: Instant) -> Duration {
        self.displayed = self.elapsed(now);
        self.displayed
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.state {
            TimerState::Running => {
                self.accumulated + now.saturating_duration_since(self.segment_start)
            }
            TimerState::Stopped => self.accumulated,
        }
    }
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as "HH:MM:SS.cc". Hours grow past two digits as needed;
/// centiseconds are truncated.
pub fn format_hms_cs(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let cs = elapsed.subsec_millis() / 10;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
}
