use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of "now" for timing answers and driving the refresh timer
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Production clock backed by the monotonic system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test clock that moves forward by `step` every time it is read
#[derive(Debug)]
pub struct SteppingClock {
    current: Cell<Instant>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            current: Cell::new(Instant::now()),
            step,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Instant {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Fires at most once per `interval`; polled between prompts.
#[derive(Clone, Copy, Debug)]
pub struct RefreshTimer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true and re-arms when the interval has elapsed.
    /// The first poll only arms the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_fired {
            None => {
                self.last_fired = Some(now);
                false
            }
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_fired = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock_advances_on_read() {
        let clock = SteppingClock::new(Duration::from_secs(2));
        let a = clock.now();
        let b = clock.now();
        assert_eq!(b.duration_since(a), Duration::from_secs(2));
    }

    #[test]
    fn test_stepping_clock_manual_advance() {
        let clock = SteppingClock::new(Duration::ZERO);
        let a = clock.now();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now().duration_since(a), Duration::from_millis(1500));
    }

    #[test]
    fn test_timer_first_poll_only_arms() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(!timer.poll(start));
        assert!(!timer.poll(start + Duration::from_secs(4)));
    }

    #[test]
    fn test_timer_fires_after_interval_and_rearms() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        let start = Instant::now();
        timer.poll(start);
        assert!(timer.poll(start + Duration::from_secs(5)));
        assert!(!timer.poll(start + Duration::from_secs(9)));
        assert!(timer.poll(start + Duration::from_secs(10)));
    }
}
