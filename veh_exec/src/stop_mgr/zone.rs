//! Controller zones

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The zone the controller is currently operating in.
///
/// Zones progress in order as the vehicle closes on the active stop waypoint:
/// `Inactive → Driving → InArea → Approaching → Stopping → Stopped → Resume`,
/// with `Resume` returning to `Driving` (or `Inactive` once the route has
/// ended), and a `Driving → Inactive` back-edge when the deactivation
/// hysteresis fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Zone {
    /// No stop is being managed, the controller asserts nothing.
    Inactive,

    /// A stop waypoint is within the activation distance.
    Driving,

    /// Within the in-area distance of the stop.
    InArea,

    /// Within the approaching distance of the stop.
    Approaching,

    /// Within the stopping distance, braking to a halt.
    Stopping,

    /// Halted at the stop, dwell timer running.
    Stopped,

    /// Dwell complete, accelerating away from the stop.
    Resume,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Zone {
    fn default() -> Self {
        Zone::Inactive
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            Zone::Inactive => "OFF",
            Zone::Driving => "DRI",
            Zone::InArea => "IN_A",
            Zone::Approaching => "APPR",
            Zone::Stopping => "STPG",
            Zone::Stopped => "STP",
            Zone::Resume => "RES",
        };
        write!(f, "{}", tag)
    }
}
