use std::time::{Duration, Instant};

use sweeper_core::TickHandle;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Holds the one pending timer tick of the event loop.
///
/// Whenever the session asks for a different tick than the pending one, the pending one is
/// dropped and the new one is due a full interval later.
#[derive(Debug, Default)]
pub struct TickSchedule {
    pending: Option<(TickHandle, Instant)>,
    last_fired: Option<Instant>,
}

impl TickSchedule {
    pub fn sync(&mut self, next: Option<TickHandle>, now: Instant) {
        let current = self.pending.map(|(handle, _)| handle);
        if current == next {
            return;
        }

        if current.is_some() {
            log::trace!("Cancelled tick {:?}", current);
        }

        // consecutive ticks keep their cadence, anything else starts a fresh interval
        let base = self.last_fired.take().unwrap_or(now);
        self.pending = next.map(|handle| (handle, base + TICK_INTERVAL));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, due)| due)
    }

    /// Takes the pending tick if it is due.
    pub fn fire(&mut self, now: Instant) -> Option<TickHandle> {
        match self.pending {
            Some((handle, due)) if due <= now => {
                self.pending = None;
                self.last_fired = Some(due);
                Some(handle)
            }
            _ => None,
        }
    }
}
