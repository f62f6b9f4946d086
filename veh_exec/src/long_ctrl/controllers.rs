//! # Longitudinal controllers module
//!
//! This module provides the PID controller used by LongCtrl for velocity
//! tracking, including its error bookkeeping.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::time::Instant;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Clone, Debug, Default, Serialize)]
pub struct PidController {
    /// Previous instant that the error was passed in
    #[serde(skip)]
    prev_time: Option<Instant>,

    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral: 0f64,
            prev_time: None,
            prev_error: None,
        }
    }

    /// Get the value of the controller for the given error at the given
    /// instant.
    pub fn get(&mut self, error: f64, now: Instant) -> f64 {
        // Calculate dt
        let dt = self
            .prev_time
            .map(|t0| now.duration_since(t0).as_secs_f64());

        // Accumulate the integral term.
        //
        // If there's no time difference then we don't accumulate the
        // integral. The other option is to add on the error and that will
        // produce a large spike in integral compared to normal operation, so
        // we don't do this.
        self.integral += match dt {
            Some(t) => error * t,
            None => 0f64,
        };

        // Calculate the derivative.
        //
        // If there's no time difference again we assume no derivative, for
        // the same reasons as for integral.
        let deriv = match (self.prev_error, dt) {
            (Some(e), Some(t)) if t > 0f64 => (error - e) / t,
            _ => 0f64,
        };

        // Calculate the output
        let out = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        // Remember the previous error and time
        self.prev_error = Some(error);
        self.prev_time = Some(now);

        out
    }

    /// Clear the accumulated state, used when the controller disengages.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
        self.prev_time = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_proportional_term() {
        let mut pid = PidController::new(2.0, 0.0, 0.0);
        let t0 = Instant::now();

        assert_eq!(pid.get(1.5, t0), 3.0);
        assert_eq!(pid.get(-0.5, t0 + Duration::from_millis(100)), -1.0);
    }

    #[test]
    fn test_integral_accumulates_over_time() {
        let mut pid = PidController::new(0.0, 1.0, 0.0);
        let t0 = Instant::now();

        // First sample has no dt, so no accumulation
        assert_eq!(pid.get(2.0, t0), 0.0);

        // One second at a constant error of 2 integrates to 2
        let out = pid.get(2.0, t0 + Duration::from_secs(1));
        assert!((out - 2.0).abs() < 1e-9, "got {}", out);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pid = PidController::new(0.0, 1.0, 0.0);
        let t0 = Instant::now();

        pid.get(2.0, t0);
        pid.get(2.0, t0 + Duration::from_secs(1));
        pid.reset();

        // Behaves like a fresh controller
        assert_eq!(pid.get(2.0, t0 + Duration::from_secs(2)), 0.0);
    }
}
