//! Pausable periodic callback running on its own thread.
//!
//! The thread blocks on its control channel while paused and waits for the
//! next deadline while running. Deadlines advance by whole periods from the
//! previous deadline, so the cadence does not drift with callback latency.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};

#[derive(Debug)]
enum TickerOp {
    Resume,
    Pause,
    Shutdown,
}

pub struct Ticker {
    conn: Sender<TickerOp>,
    thread: Option<JoinHandle<()>>,
    running: bool,
}

impl Ticker {
    /// Spawns the ticker thread, initially paused.
    pub fn spawn<F>(name: String, period: Duration, on_tick: F) -> AppResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        if period.is_zero() {
            return Err(AppError::InvalidConfig("tick period must be non-zero".to_string()));
        }
        let (conn, ops) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || ticker_thread(ops, period, on_tick))
            .map_err(AppError::TickerSpawn)?;
        Ok(Self {
            conn,
            thread: Some(thread),
            running: false,
        })
    }

    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            self.conn.send(TickerOp::Resume).ok();
        }
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.conn.send(TickerOp::Pause).ok();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.conn.send(TickerOp::Shutdown).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("ticker thread panicked");
            }
        }
    }
}

fn ticker_thread<F: FnMut()>(ops: Receiver<TickerOp>, period: Duration, mut on_tick: F) {
    let mut deadline: Option<Instant> = None;

    loop {
        let op = match deadline {
            Some(due) => match ops.recv_timeout(due.saturating_duration_since(Instant::now())) {
                Ok(op) => op,
                Err(RecvTimeoutError::Timeout) => {
                    on_tick();
                    deadline = Some(next_deadline(due, period, Instant::now()));
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            // Block-wait while paused
            None => match ops.recv() {
                Ok(op) => op,
                Err(_) => break,
            },
        };

        match op {
            TickerOp::Resume => {
                if deadline.is_none() {
                    deadline = Some(Instant::now() + period);
                }
            }
            TickerOp::Pause => deadline = None,
            TickerOp::Shutdown => break,
        }
    }
    log::debug!("ticker thread exiting");
}

/// First deadline after `now` on the grid `due + k * period`. Missed periods
/// are skipped, not replayed.
fn next_deadline(due: Instant, period: Duration, now: Instant) -> Instant {
    let behind = now.saturating_duration_since(due);
    let periods = behind.as_nanos() / period.as_nanos() + 1;
    due + period.saturating_mul(u32::try_from(periods).unwrap_or(u32::MAX))
}
