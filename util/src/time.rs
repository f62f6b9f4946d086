//! General time utility functions and cycle timers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Instant;

use chrono;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A one-shot elapsed-time gate.
///
/// The timer is constructed with a duration and the construction instant.
/// Each call to [`ElapsedTimer::update`] recomputes the elapsed flag from
/// that same start instant, so with a monotonic clock the flag stays true
/// once it has fired. The timer is not reusable: construct a new instance
/// for each interval to be gated.
pub struct ElapsedTimer {
    duration_s: f64,
    start: Instant,
    elapsed: bool,
}

/// A periodic gate which re-arms itself each time it fires.
///
/// Used to run work at a lower rate than the control cycle, e.g. telemetry
/// emission.
pub struct RateTimer {
    period_s: f64,
    last: Instant,
    fired: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ElapsedTimer {
    /// Create a new timer which elapses `duration_s` seconds after `now`.
    pub fn new(duration_s: f64, now: Instant) -> Self {
        Self {
            duration_s,
            start: now,
            elapsed: false,
        }
    }

    /// Recompute the elapsed flag for the given instant.
    pub fn update(&mut self, now: Instant) {
        self.elapsed = now.duration_since(self.start).as_secs_f64() > self.duration_s;
    }

    /// True once the timer's duration has passed.
    pub fn is_elapsed(&self) -> bool {
        self.elapsed
    }
}

impl RateTimer {
    /// Create a new timer firing every `period_s` seconds from `now`.
    pub fn new(period_s: f64, now: Instant) -> Self {
        Self {
            period_s,
            last: now,
            fired: false,
        }
    }

    /// Update the timer, re-arming it if the period has passed.
    pub fn update(&mut self, now: Instant) {
        if now.duration_since(self.last).as_secs_f64() > self.period_s {
            self.last = now;
            self.fired = true;
        }
        else {
            self.fired = false;
        }
    }

    /// True on the single update in which the period elapsed.
    pub fn fired(&self) -> bool {
        self.fired
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_timer() {
        let start = Instant::now();
        let mut timer = ElapsedTimer::new(5.0, start);

        assert!(!timer.is_elapsed());

        timer.update(start + Duration::from_secs_f64(4.9));
        assert!(!timer.is_elapsed());

        timer.update(start + Duration::from_secs_f64(5.1));
        assert!(timer.is_elapsed());

        // Flag holds under a monotonic clock
        timer.update(start + Duration::from_secs_f64(6.0));
        assert!(timer.is_elapsed());
    }

    #[test]
    fn test_rate_timer_rearms() {
        let start = Instant::now();
        let mut timer = RateTimer::new(1.0, start);

        timer.update(start + Duration::from_secs_f64(0.5));
        assert!(!timer.fired());

        timer.update(start + Duration::from_secs_f64(1.1));
        assert!(timer.fired());

        // Re-armed from the firing instant
        timer.update(start + Duration::from_secs_f64(1.2));
        assert!(!timer.fired());

        timer.update(start + Duration::from_secs_f64(2.2));
        assert!(timer.fired());
    }
}
