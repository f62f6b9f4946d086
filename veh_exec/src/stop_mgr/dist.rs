//! Distance-to-target providers
//!
//! Two interchangeable ways of measuring how far the vehicle is from the
//! active stop waypoint, selected once at init:
//!
//! - `Gps`: the great-circle distance between the live GPS position and the
//!   target, recomputed every cycle. Self-correcting but sensitive to
//!   positioning noise.
//! - `Odometry`: a countdown from a planned stop offset on the vehicle's
//!   cumulative odometer, captured when the provider is armed. Drift-free
//!   between arming points but relies on the odometer input being accurate.
//!
//! Both return meters, negative once the target has been overshot. The zone
//! state machine is agnostic to which provider is wired in.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::loc::VehicleState;
use super::Waypoint;
use util::maths::haversine_km;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which distance-to-target measurement the controller uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    Gps,
    Odometry,
}

/// The active distance-to-target provider.
#[derive(Clone, Copy, Debug)]
pub enum DistanceProvider {
    /// Live GPS error to the target waypoint.
    Gps,

    /// Countdown from a planned stop offset on the odometer. Unarmed until
    /// the first snapshot is seen.
    Odometry {
        /// Odometer reading at which the vehicle is planned to stop.
        ///
        /// Units: meters
        planned_stop_odo_m: Option<f64>,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DistanceMode {
    fn default() -> Self {
        DistanceMode::Gps
    }
}

impl Default for DistanceProvider {
    fn default() -> Self {
        DistanceProvider::Gps
    }
}

impl DistanceProvider {
    /// Create the provider for the given mode. An odometry provider starts
    /// unarmed.
    pub fn new(mode: DistanceMode) -> Self {
        match mode {
            DistanceMode::Gps => DistanceProvider::Gps,
            DistanceMode::Odometry => DistanceProvider::Odometry {
                planned_stop_odo_m: None,
            },
        }
    }

    /// True if the provider can produce a distance. GPS providers are always
    /// armed.
    pub fn is_armed(&self) -> bool {
        match self {
            DistanceProvider::Gps => true,
            DistanceProvider::Odometry { planned_stop_odo_m } => {
                planned_stop_odo_m.is_some()
            }
        }
    }

    /// Arm the provider against the current odometer reading.
    ///
    /// The planned stop offset is placed `activation_dist_m` ahead of the
    /// current reading. No-op for GPS providers. Called at the first cycle,
    /// at each activation, and whenever the route advances to a new stop.
    pub fn arm(&mut self, odometer_m: f64, activation_dist_m: f64) {
        if let DistanceProvider::Odometry {
            ref mut planned_stop_odo_m,
        } = self
        {
            *planned_stop_odo_m = Some(odometer_m + activation_dist_m);
        }
    }

    /// Distance from the vehicle to the target stop waypoint.
    ///
    /// Units: meters, negative once overshot. An unarmed odometry provider
    /// reports infinity so the controller cannot activate on it.
    pub fn distance_to_target_m(
        &self,
        veh_state: &VehicleState,
        target: &Waypoint,
    ) -> f64 {
        match self {
            DistanceProvider::Gps => {
                haversine_km(
                    veh_state.position.lat_deg,
                    veh_state.position.lon_deg,
                    target.lat_deg,
                    target.lon_deg,
                ) * 1000.0
            }
            DistanceProvider::Odometry { planned_stop_odo_m } => {
                match planned_stop_odo_m {
                    Some(planned) => planned - veh_state.odometer_m,
                    None => f64::INFINITY,
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::GeoPoint;
    use crate::stop_mgr::WaypointKind;
    use util::maths::offset_km;

    fn state_at(lat_deg: f64, lon_deg: f64, odometer_m: f64) -> VehicleState {
        VehicleState {
            position: GeoPoint { lat_deg, lon_deg },
            speed_ms: 0.0,
            odometer_m,
            wheel_speeds_ms: None,
        }
    }

    #[test]
    fn test_gps_distance_matches_haversine() {
        let target = Waypoint {
            lat_deg: 51.4545,
            lon_deg: -2.5879,
            kind: WaypointKind::Stop,
        };

        // Synthesize a position 250 m due south of the target
        let (lat, lon) = offset_km(target.lat_deg, target.lon_deg, 0.25, 180.0);
        let provider = DistanceProvider::new(DistanceMode::Gps);

        let d = provider.distance_to_target_m(&state_at(lat, lon, 0.0), &target);
        assert!((d - 250.0).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_odometry_countdown() {
        let target = Waypoint {
            lat_deg: 0.0,
            lon_deg: 0.0,
            kind: WaypointKind::Stop,
        };
        let mut provider = DistanceProvider::new(DistanceMode::Odometry);

        // Unarmed providers report infinity
        assert!(provider
            .distance_to_target_m(&state_at(0.0, 0.0, 500.0), &target)
            .is_infinite());

        provider.arm(500.0, 100.0);
        assert!(provider.is_armed());

        let d = provider.distance_to_target_m(&state_at(0.0, 0.0, 540.0), &target);
        assert_eq!(d, 60.0);

        // Negative once overshot
        let d = provider.distance_to_target_m(&state_at(0.0, 0.0, 620.0), &target);
        assert_eq!(d, -20.0);
    }
}
