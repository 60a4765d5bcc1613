use crate::stopwatch::Stopwatch;

/// Stopwatches in display order. Only the most recent one can be removed.
#[derive(Default)]
pub struct TimerCollection {
    stopwatches: Vec<Stopwatch>,
}

impl TimerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, stopwatch: Stopwatch) {
        self.stopwatches.push(stopwatch);
    }

    /// Drops the last stopwatch, which also shuts down its ticker.
    /// Returns `false` if there was nothing to remove.
    pub fn remove_last(&mut self) -> bool {
        match self.stopwatches.pop() {
            Some(removed) => {
                log::debug!(
                    "removing timer {} at {:?}",
                    removed.timer.id(),
                    removed.timer.accumulated()
                );
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.stopwatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwatches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stopwatch> {
        self.stopwatches.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Stopwatch> {
        self.stopwatches.get_mut(index)
    }

    pub fn last(&self) -> Option<&Stopwatch> {
        self.stopwatches.last()
    }

    pub fn any_running(&self) -> bool {
        self.stopwatches.iter().any(|sw| sw.timer.is_running())
    }
}
