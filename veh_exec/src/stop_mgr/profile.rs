//! Speed and acceleration profile generation
//!
//! Maps the current zone, distance-to-target and zone-entry conditions to a
//! target velocity and acceleration. Two profile shapes are supported:
//!
//! - `Constant`: each zone holds its configured cruise speed for the whole
//!   zone.
//! - `Ramp`: the target interpolates linearly from the speed the vehicle had
//!   on zone entry down to the zone's target speed at the zone's exit
//!   distance.
//!
//! In RESUME the target is the cruise speed the vehicle had just before
//! slowing down (captured at the `Driving → InArea` transition), so the
//! vehicle returns to its pre-stop cruise rather than a fixed constant.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{Params, Zone};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which speed profile shape is generated within a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileShape {
    Constant,
    Ramp,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-cycle inputs to the profile generator.
#[derive(Clone, Copy, Debug)]
pub struct ProfileCtx {
    /// Zone after this cycle's transition has been applied.
    pub zone: Zone,

    /// Distance to the active stop waypoint.
    ///
    /// Units: meters
    pub dist_to_target_m: f64,

    /// Vehicle speed captured on entry to the current zone.
    ///
    /// Units: kilometers/hour
    pub entry_speed_kph: f64,

    /// Distance-to-target captured on entry to the current zone.
    ///
    /// Units: meters
    pub entry_dist_m: f64,

    /// Cruise speed the vehicle had before it began slowing for this stop.
    ///
    /// Units: kilometers/hour
    pub cruise_speed_kph: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ProfileShape {
    fn default() -> Self {
        ProfileShape::Constant
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the target velocity for the current zone.
///
/// `None` means the controller asserts no velocity this cycle and the caller
/// falls back to its own cruise target.
///
/// Units: kilometers/hour
pub fn target_velocity_kph(
    shape: ProfileShape,
    params: &Params,
    ctx: &ProfileCtx,
) -> Option<f64> {
    match ctx.zone {
        Zone::Inactive | Zone::Driving => None,
        Zone::InArea => Some(zone_velocity(
            shape,
            ctx,
            params.in_area_speed_kph,
            params.approaching_dist_m,
        )),
        Zone::Approaching => Some(zone_velocity(
            shape,
            ctx,
            params.approaching_speed_kph,
            params.stopping_dist_m,
        )),
        Zone::Stopping => {
            let v = zone_velocity(shape, ctx, 0.0, 0.0);

            // Floor noisy or slightly negative values to an exact zero
            if v <= params.zero_threshold_speed_kph {
                Some(0.0)
            } else {
                Some(v)
            }
        }
        Zone::Stopped => Some(0.0),
        Zone::Resume => Some(ctx.cruise_speed_kph),
    }
}

/// Compute the target acceleration for the current zone.
///
/// Fixed outputs in STOPPING/STOPPED and RESUME; elsewhere a deceleration
/// hint is asserted only when the velocity target is below the vehicle's
/// current speed.
///
/// Units: meters/second^2
pub fn target_accel_ms2(
    params: &Params,
    zone: Zone,
    target_velocity_kph: Option<f64>,
    current_speed_kph: f64,
) -> Option<f64> {
    match zone {
        Zone::Stopping | Zone::Stopped => Some(params.stopping_accel_ms2),
        Zone::Resume => Some(params.resume_accel_ms2),
        Zone::Inactive | Zone::Driving | Zone::InArea | Zone::Approaching => {
            match target_velocity_kph {
                Some(v) if current_speed_kph.floor() > v => {
                    Some(params.reduce_accel_ms2)
                }
                _ => None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Velocity within a single zone, for the given zone target speed and zone
/// exit distance.
fn zone_velocity(
    shape: ProfileShape,
    ctx: &ProfileCtx,
    zone_speed_kph: f64,
    exit_dist_m: f64,
) -> f64 {
    match shape {
        ProfileShape::Constant => zone_speed_kph,
        ProfileShape::Ramp => {
            // A zone entered exactly on its exit threshold has no distance
            // to ramp over
            if ctx.entry_dist_m <= exit_dist_m {
                return zone_speed_kph;
            }

            let v = lin_map(
                (ctx.entry_dist_m, exit_dist_m),
                (ctx.entry_speed_kph, zone_speed_kph),
                ctx.dist_to_target_m,
            );

            v.max(0.0).min(ctx.entry_speed_kph)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> Params {
        Params {
            in_area_dist_m: 60.0,
            approaching_dist_m: 30.0,
            stopping_dist_m: 15.0,
            activation_dist_m: 100.0,
            in_area_speed_kph: 20.0,
            approaching_speed_kph: 10.0,
            zero_threshold_speed_kph: 2.0,
            stopping_accel_ms2: -1.0,
            reduce_accel_ms2: -0.5,
            resume_accel_ms2: 0.8,
            ..Default::default()
        }
    }

    fn ctx(zone: Zone, d_m: f64) -> ProfileCtx {
        ProfileCtx {
            zone,
            dist_to_target_m: d_m,
            entry_speed_kph: 40.0,
            entry_dist_m: 60.0,
            cruise_speed_kph: 40.0,
        }
    }

    #[test]
    fn test_constant_zone_speeds() {
        let p = test_params();

        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Inactive, 150.0)),
            None
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Driving, 80.0)),
            None
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::InArea, 50.0)),
            Some(20.0)
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Approaching, 20.0)),
            Some(10.0)
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Stopping, 10.0)),
            Some(0.0)
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Stopped, 0.0)),
            Some(0.0)
        );
        assert_eq!(
            target_velocity_kph(ProfileShape::Constant, &p, &ctx(Zone::Resume, 0.0)),
            Some(40.0)
        );
    }

    #[test]
    fn test_ramp_interpolates_between_entry_and_exit() {
        let p = test_params();

        // Entered InArea at 60 m doing 40 kph, zone target is 20 kph at the
        // approaching threshold (30 m)
        let at_entry = target_velocity_kph(ProfileShape::Ramp, &p, &ctx(Zone::InArea, 60.0));
        assert_eq!(at_entry, Some(40.0));

        let mid = target_velocity_kph(ProfileShape::Ramp, &p, &ctx(Zone::InArea, 45.0));
        assert_eq!(mid, Some(30.0));

        let at_exit = target_velocity_kph(ProfileShape::Ramp, &p, &ctx(Zone::InArea, 30.0));
        assert_eq!(at_exit, Some(20.0));
    }

    #[test]
    fn test_ramp_clamps_to_entry_speed() {
        let p = test_params();

        // A GPS jump back above the entry marker must not demand more than
        // the entry speed
        let v = target_velocity_kph(ProfileShape::Ramp, &p, &ctx(Zone::InArea, 70.0));
        assert_eq!(v, Some(40.0));
    }

    #[test]
    fn test_stopping_floors_to_zero() {
        let p = test_params();
        let c = ProfileCtx {
            zone: Zone::Stopping,
            dist_to_target_m: 1.5,
            entry_speed_kph: 10.0,
            entry_dist_m: 15.0,
            cruise_speed_kph: 40.0,
        };

        // Raw ramp value here is 1.0 kph, at or below the 2 kph zero
        // threshold, so the output must be exactly zero
        assert_eq!(target_velocity_kph(ProfileShape::Ramp, &p, &c), Some(0.0));
    }

    #[test]
    fn test_ramp_degenerate_entry_on_exit_threshold() {
        let p = test_params();
        let c = ProfileCtx {
            zone: Zone::InArea,
            dist_to_target_m: 30.0,
            entry_speed_kph: 40.0,
            entry_dist_m: 30.0,
            cruise_speed_kph: 40.0,
        };

        assert_eq!(target_velocity_kph(ProfileShape::Ramp, &p, &c), Some(20.0));
    }

    #[test]
    fn test_accel_policy() {
        let p = test_params();

        // Fixed outputs
        assert_eq!(
            target_accel_ms2(&p, Zone::Stopping, Some(0.0), 10.0),
            Some(-1.0)
        );
        assert_eq!(
            target_accel_ms2(&p, Zone::Stopped, Some(0.0), 0.0),
            Some(-1.0)
        );
        assert_eq!(
            target_accel_ms2(&p, Zone::Resume, Some(40.0), 5.0),
            Some(0.8)
        );

        // Deceleration hint only when the target is below the current speed
        assert_eq!(
            target_accel_ms2(&p, Zone::InArea, Some(20.0), 40.0),
            Some(-0.5)
        );
        assert_eq!(target_accel_ms2(&p, Zone::InArea, Some(20.0), 15.0), None);
        assert_eq!(target_accel_ms2(&p, Zone::Driving, None, 40.0), None);
    }
}
