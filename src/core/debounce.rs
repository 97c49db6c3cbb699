//! Trailing-edge debouncing for repeated triggers.
//!
//! Every trigger pushes the deadline back and bumps a generation counter. A
//! pass fires once the deadline passes without a new trigger; its generation
//! lets the caller drop results that were superseded while it ran.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use super::cache::Clock;

/// Delay between the last trigger and the pass it schedules.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

pub struct Debouncer {
    delay: Duration,
    clock: Arc<dyn Clock>,
    generation: u64,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay,
            clock,
            generation: 0,
            deadline: None,
        }
    }

    /// Schedules a pass, replacing any pending one. Returns the new generation.
    pub fn trigger(&mut self) -> u64 {
        self.generation += 1;
        self.deadline = Some(self.clock.now() + self.delay);
        self.generation
    }

    /// Generation of the pass due now, if any. A due pass fires only once.
    pub fn poll(&mut self) -> Option<u64> {
        let deadline = self.deadline?;
        if self.clock.now() < deadline {
            return None;
        }
        self.deadline = None;
        Some(self.generation)
    }

    /// Time left before the pending pass is due; `None` when nothing is
    /// pending.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    /// Whether a pass of `generation` may still publish its results.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::ManualClock;

    fn debouncer(clock: &ManualClock) -> Debouncer {
        Debouncer::new(DEFAULT_DELAY, Arc::new(clock.clone()))
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let clock = ManualClock::new();
        let mut debouncer = debouncer(&clock);
        assert_eq!(debouncer.poll(), None);

        let generation = debouncer.trigger();
        clock.advance(Duration::from_millis(999));
        assert_eq!(debouncer.poll(), None);
        assert_eq!(debouncer.time_until_due(), Some(Duration::from_millis(1)));

        clock.advance(Duration::from_millis(1));
        assert_eq!(debouncer.poll(), Some(generation));
        // Fires once
        assert_eq!(debouncer.poll(), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_trigger_resets_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = debouncer(&clock);

        debouncer.trigger();
        clock.advance(Duration::from_millis(800));
        let latest = debouncer.trigger();
        clock.advance(Duration::from_millis(800));
        assert_eq!(debouncer.poll(), None);

        clock.advance(Duration::from_millis(200));
        assert_eq!(debouncer.poll(), Some(latest));
    }

    #[test]
    fn test_superseded_pass_is_not_current() {
        let clock = ManualClock::new();
        let mut debouncer = debouncer(&clock);

        debouncer.trigger();
        clock.advance(DEFAULT_DELAY);
        let running = debouncer.poll().unwrap();
        assert!(debouncer.is_current(running));

        // A trigger while the pass runs invalidates its results
        debouncer.trigger();
        assert!(!debouncer.is_current(running));
    }
}
