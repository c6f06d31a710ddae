use serde::{Deserialize, Serialize};

/// Identifies one scheduled tick.
///
/// Handles become stale when the timer restarts, stops, or has already counted that tick, so a
/// callback that fires late is ignored instead of double counting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle {
    generation: u32,
    seq: u32,
}

/// Elapsed-seconds counter driven by an external one-second cadence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    elapsed_secs: u32,
    generation: u32,
    running: bool,
}

impl GameTimer {
    pub const fn new() -> Self {
        Self {
            elapsed_secs: 0,
            generation: 0,
            running: false,
        }
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Cancels pending ticks, resets to 0 and starts counting.
    pub fn restart(&mut self) -> TickHandle {
        self.generation = self.generation.wrapping_add(1);
        self.elapsed_secs = 0;
        self.running = true;
        self.handle()
    }

    /// Cancels pending ticks and freezes the count.
    pub fn stop(&mut self) {
        if self.running {
            self.generation = self.generation.wrapping_add(1);
            self.running = false;
        }
    }

    /// The tick that should be scheduled next, `None` while stopped.
    pub fn next_tick(&self) -> Option<TickHandle> {
        self.running.then(|| self.handle())
    }

    /// Counts one second if `handle` is the pending tick, returns whether it did.
    pub fn tick(&mut self, handle: TickHandle) -> bool {
        if self.next_tick() != Some(handle) {
            log::trace!("Ignoring stale tick {:?}", handle);
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    fn handle(&self) -> TickHandle {
        TickHandle {
            generation: self.generation,
            seq: self.elapsed_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_stopped() {
        let timer = GameTimer::new();

        assert_eq!(timer.elapsed_secs(), 0);
        assert_eq!(timer.next_tick(), None);
    }

    #[test]
    fn ticks_count_while_running() {
        let mut timer = GameTimer::new();
        let first = timer.restart();

        assert!(timer.tick(first));
        let second = timer.next_tick().unwrap();
        assert!(timer.tick(second));

        assert_eq!(timer.elapsed_secs(), 2);
    }

    #[test]
    fn same_tick_counts_once() {
        let mut timer = GameTimer::new();
        let handle = timer.restart();

        assert!(timer.tick(handle));
        assert!(!timer.tick(handle));
        assert_eq!(timer.elapsed_secs(), 1);
    }

    #[test]
    fn stop_freezes_and_cancels() {
        let mut timer = GameTimer::new();
        let handle = timer.restart();
        timer.tick(handle);
        let pending = timer.next_tick().unwrap();

        timer.stop();

        assert!(!timer.tick(pending));
        assert_eq!(timer.elapsed_secs(), 1);
        assert_eq!(timer.next_tick(), None);
    }

    #[test]
    fn restart_cancels_previous_schedule() {
        let mut timer = GameTimer::new();
        let old = timer.restart();

        let new = timer.restart();

        assert_ne!(old, new);
        assert!(!timer.tick(old));
        assert!(timer.tick(new));
        assert_eq!(timer.elapsed_secs(), 1);
    }
}
