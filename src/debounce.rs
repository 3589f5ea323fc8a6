use std::time::{Duration, Instant};

/// Cooperative single-slot timer polled from the event loop. Re-scheduling
/// always replaces the pending deadline, so a burst of keystrokes yields
/// exactly one fire after the quiet period.
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed. Returns true at most once per
    /// schedule.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.schedule_at(start);
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(100)));
        assert!(debouncer.fire_if_due(start + DELAY));
        // Consumed; does not fire again
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(10)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn reschedule_replaces_instead_of_stacking() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        // Types "a", then "ab" 100ms later
        debouncer.schedule_at(start);
        debouncer.schedule_at(start + Duration::from_millis(100));

        // The first deadline never fires
        assert!(!debouncer.fire_if_due(start + DELAY));
        // Only the replacement does
        assert!(debouncer.fire_if_due(start + Duration::from_millis(100) + DELAY));
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.schedule_at(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(10)));
    }
}
