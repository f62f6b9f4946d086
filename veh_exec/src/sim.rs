//! # Simulated vehicle-state source
//!
//! A small kinematic model standing in for the vehicle during development
//! runs. Each cycle it integrates the longitudinal acceleration demand (or a
//! simple cruise-control law when no demand is asserted) and advances the
//! simulated GPS position along the bearing to the current stop waypoint,
//! producing the [`VehicleState`] snapshot the control modules consume.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::loc::{GeoPoint, VehicleState, NUM_WHEELS};
use crate::params::SimParams;
use crate::stop_mgr::Waypoint;
use util::maths::{bearing_deg, offset_km};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The simulated vehicle.
pub struct VehSim {
    params: SimParams,

    position: GeoPoint,

    /// Units: meters/second
    speed_ms: f64,

    /// Units: meters
    odometer_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehSim {
    /// Create a new simulated vehicle at the configured start position.
    pub fn new(params: SimParams) -> Self {
        Self {
            position: GeoPoint {
                lat_deg: params.start_lat_deg,
                lon_deg: params.start_lon_deg,
            },
            speed_ms: params.start_speed_kph / 3.6,
            odometer_m: 0.0,
            params,
        }
    }

    /// Advance the simulation by one cycle.
    ///
    /// `accel_dem_ms2` is the longitudinal demand from LongCtrl; when `None`
    /// the simulated cruise control accelerates toward its cruise speed.
    /// The vehicle moves along the bearing to `target` if one is given.
    pub fn step(&mut self, dt_s: f64, accel_dem_ms2: Option<f64>, target: Option<Waypoint>) {
        let cruise_speed_ms = self.params.cruise_speed_kph / 3.6;

        let accel_ms2 = match accel_dem_ms2 {
            Some(a) => a,
            None => {
                if self.speed_ms < cruise_speed_ms {
                    self.params.cruise_accel_ms2
                } else {
                    0.0
                }
            }
        };

        self.speed_ms = (self.speed_ms + accel_ms2 * dt_s).max(0.0);

        // Cruise control never exceeds its own cruise speed
        if accel_dem_ms2.is_none() && self.speed_ms > cruise_speed_ms {
            self.speed_ms = cruise_speed_ms;
        }

        let step_m = self.speed_ms * dt_s;
        self.odometer_m += step_m;

        if let Some(target) = target {
            if step_m > 0.0 {
                let bearing = bearing_deg(
                    self.position.lat_deg,
                    self.position.lon_deg,
                    target.lat_deg,
                    target.lon_deg,
                );
                let (lat_deg, lon_deg) = offset_km(
                    self.position.lat_deg,
                    self.position.lon_deg,
                    step_m / 1000.0,
                    bearing,
                );
                self.position = GeoPoint { lat_deg, lon_deg };
            }
        }
    }

    /// The snapshot for the cycle just stepped.
    pub fn state(&self) -> VehicleState {
        VehicleState {
            position: self.position,
            speed_ms: self.speed_ms,
            odometer_m: self.odometer_m,
            wheel_speeds_ms: Some([self.speed_ms; NUM_WHEELS]),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stop_mgr::WaypointKind;
    use util::maths::haversine_km;

    fn test_sim() -> VehSim {
        VehSim::new(SimParams {
            start_lat_deg: 51.4545,
            start_lon_deg: -2.5879,
            start_speed_kph: 0.0,
            cruise_speed_kph: 36.0,
            cruise_accel_ms2: 1.0,
        })
    }

    #[test]
    fn test_cruise_control_holds_cruise_speed() {
        let mut sim = test_sim();

        // 1 m/s^2 from rest reaches the 10 m/s cruise speed in 10 s and
        // holds it there
        for _ in 0..150 {
            sim.step(0.1, None, None);
        }

        assert!((sim.state().speed_ms - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_braking_demand_stops_vehicle() {
        let mut sim = test_sim();
        for _ in 0..150 {
            sim.step(0.1, None, None);
        }

        for _ in 0..200 {
            sim.step(0.1, Some(-1.0), None);
        }

        let state = sim.state();
        assert_eq!(state.speed_ms, 0.0);
        assert_eq!(state.wheel_speeds_ms, Some([0.0; NUM_WHEELS]));
    }

    #[test]
    fn test_moves_toward_target() {
        let mut sim = test_sim();
        let target = Waypoint {
            lat_deg: 51.46,
            lon_deg: -2.5879,
            kind: WaypointKind::Stop,
        };

        let d_before = haversine_km(
            sim.state().position.lat_deg,
            sim.state().position.lon_deg,
            target.lat_deg,
            target.lon_deg,
        );

        for _ in 0..100 {
            sim.step(0.1, None, Some(target));
        }

        let state = sim.state();
        let d_after = haversine_km(
            state.position.lat_deg,
            state.position.lon_deg,
            target.lat_deg,
            target.lon_deg,
        );

        assert!(d_after < d_before);
        assert!(state.odometer_m > 0.0);
    }
}
