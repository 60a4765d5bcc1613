use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use timer_core::{format_hms_cs, ClockSource, TimerCore, TimerState};

use crate::error::AppResult;
use crate::ticker::Ticker;

pub type TimerId = u64;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Receives the formatted elapsed time whenever a timer recomputes it.
pub trait DisplaySink: Send + Sync {
    fn publish(&self, id: TimerId, text: &str);
}

/// State shared between the owning thread and the ticker thread. Every
/// operation holds `core` for its whole duration, publish included.
struct Shared {
    id: TimerId,
    core: Mutex<TimerCore>,
    clock: Arc<dyn ClockSource>,
    sink: Arc<dyn DisplaySink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) {
        let mut core = self.lock();
        let shown = core.tick(self.clock.now());
        self.sink.publish(self.id, &format_hms_cs(shown));
    }
}

/// A stopwatch timer with its own refresh schedule.
pub struct Timer {
    shared: Arc<Shared>,
    ticker: Ticker,
}

impl Timer {
    pub fn new(
        clock: Arc<dyn ClockSource>,
        sink: Arc<dyn DisplaySink>,
        period: Duration,
    ) -> AppResult<Self> {
        let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(Shared {
            id,
            core: Mutex::new(TimerCore::new()),
            clock,
            sink,
        });
        let on_tick = {
            let shared = Arc::clone(&shared);
            move || shared.tick()
        };
        let ticker = Ticker::spawn(format!("timer-{}", id), period, on_tick)?;
        log::debug!("timer {} created, refresh every {:?}", id, period);
        Ok(Self { shared, ticker })
    }

    pub fn id(&self) -> TimerId {
        self.shared.id
    }

    pub fn start(&mut self) {
        let mut core = self.shared.lock();
        core.start(self.shared.clock.now());
        self.ticker.resume();
    }

    pub fn stop(&mut self) {
        self.ticker.pause();
        let mut core = self.shared.lock();
        let shown = core.stop(self.shared.clock.now());
        self.shared.sink.publish(self.shared.id, &format_hms_cs(shown));
    }

    /// Zeroes the count. A running timer keeps running.
    pub fn reset(&mut self) {
        let mut core = self.shared.lock();
        core.reset();
        self.shared.sink.publish(self.shared.id, &format_hms_cs(core.displayed()));
    }

    /// Recomputes and publishes the display. Normally driven by the ticker.
    pub fn tick(&self) {
        self.shared.tick();
    }

    pub fn state(&self) -> TimerState {
        self.shared.lock().state()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().is_running()
    }

    pub fn accumulated(&self) -> Duration {
        self.shared.lock().accumulated()
    }

    pub fn displayed(&self) -> Duration {
        self.shared.lock().displayed()
    }

    pub fn display(&self) -> String {
        format_hms_cs(self.displayed())
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::debug!("timer {} destroyed", self.shared.id);
    }
}
