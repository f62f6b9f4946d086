//! Implementations for the StopMgr state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Instant;

// Internal
use super::{
    profile, DistanceProvider, Params, Route, StopMgrError, Waypoint, Zone,
};
use crate::loc::VehicleState;
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
    time::ElapsedTimer,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Stop manager module state.
///
/// The distance-triggered stop/resume controller: tracks the active stop
/// waypoint of the route, steps the zone state machine once per cycle from
/// the measured distance-to-target, and generates the velocity/acceleration
/// targets for the longitudinal controller.
#[derive(Default)]
pub struct StopMgr {
    pub(crate) params: Params,

    route: Route,
    dist_provider: DistanceProvider,

    zone: Zone,

    /// The stop waypoint that triggered activation.
    activation_anchor: Option<Waypoint>,

    /// Vehicle speed captured at the last zone transition.
    ///
    /// Units: kilometers/hour
    entry_speed_kph: f64,

    /// Distance-to-target captured at the last zone transition.
    ///
    /// Units: meters
    entry_dist_m: f64,

    /// Cruise speed captured on entering IN_AREA, restored in RESUME.
    ///
    /// Units: kilometers/hour
    cruise_speed_kph: f64,

    /// Dwell gate, present only while in STOPPED.
    dwell_timer: Option<ElapsedTimer>,

    /// Set once every stop has been serviced on a non-cyclic route.
    ended: bool,

    initialised: bool,

    output: OutputData,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to the stop manager.
pub struct InputData {
    /// The vehicle state snapshot for this cycle.
    pub veh_state: VehicleState,

    /// The monotonic instant of this cycle.
    pub now: Instant,
}

/// Output targets from the stop manager.
///
/// `None` means the controller asserts no setpoint this cycle and the caller
/// falls back to its own cruise target. This is a deliberate three-state
/// contract (assert-low / assert-value / no-opinion), not an error.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OutputData {
    /// Target velocity.
    ///
    /// Units: kilometers/hour
    pub velocity_kph: Option<f64>,

    /// Target acceleration.
    ///
    /// Units: meters/second^2
    pub accel_ms2: Option<f64>,
}

/// Status report for stop manager processing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// Zone at the end of the cycle.
    pub zone: Zone,

    /// Distance to the active stop, `None` when no target is available.
    ///
    /// Units: meters
    pub dist_to_target_m: Option<f64>,

    /// Velocity target issued this cycle.
    ///
    /// Units: kilometers/hour
    pub velocity_kph: Option<f64>,

    /// Acceleration target issued this cycle.
    ///
    /// Units: meters/second^2
    pub accel_ms2: Option<f64>,

    /// True if the cycle was skipped due to a malformed snapshot, in which
    /// case the previous outputs were repeated.
    pub tick_skipped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for StopMgr {
    type InitData = &'static str;
    type InitError = StopMgrError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = StopMgrError;

    /// Initialise the stop manager.
    ///
    /// Expected init data is the path to the parameter file. The route file
    /// named by the parameters is loaded here too; both are then immutable
    /// for the module's lifetime.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        let params: Params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(StopMgrError::ParamLoadError(e)),
        };

        // Load the route named by the parameters
        let route = match Route::from_json_file(&params.route_file) {
            Ok(r) => r,
            Err(e) => return Err(StopMgrError::RouteLoadError(e)),
        };

        *self = Self::from_parts(params, route)?;

        info!(
            "StopMgr initialised: {} waypoints ({} stops), {:?} distance, {:?} profile",
            self.route.waypoints().len(),
            self.route.num_stops(),
            self.params.distance_mode,
            self.params.profile
        );

        // Keep a copy of the loaded parameters with the session
        session.save("stop_mgr_params.json", self.params.clone());

        // Create the arch folder for stop_mgr
        let mut arch_path = session.arch_root.clone();
        arch_path.push("stop_mgr");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archiver
        self.arch_report = Archiver::from_path(
            session, "stop_mgr/status_report.csv"
        ).unwrap();

        Ok(())
    }

    /// Perform cyclic processing of the stop manager.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // An uninitialised module or a route with no stops stays permanently
        // inactive and asserts nothing
        if !self.initialised || self.route.num_stops() == 0 {
            self.output = OutputData::default();
            self.report = StatusReport::default();
            return Ok((self.output, self.report));
        }

        let veh_state = &input_data.veh_state;

        // A malformed snapshot would propagate NaN into the zone
        // comparisons, so skip the cycle and repeat the previous outputs
        if !veh_state.is_valid() {
            warn!("Malformed vehicle state snapshot, skipping cycle");
            self.report = StatusReport {
                zone: self.zone,
                dist_to_target_m: None,
                velocity_kph: self.output.velocity_kph,
                accel_ms2: self.output.accel_ms2,
                tick_skipped: true,
            };
            return Ok((self.output, self.report));
        }

        // An odometry provider arms itself against the first snapshot seen
        if !self.dist_provider.is_armed() {
            self.dist_provider
                .arm(veh_state.odometer_m, self.params.activation_dist_m);
        }

        let target = match self.route.current_target() {
            Ok(t) => *t,
            Err(e) => return Err(StopMgrError::RouteLoadError(e)),
        };

        let dist_m = self.dist_provider.distance_to_target_m(veh_state, &target);
        let speed_kph = veh_state.speed_ms * 3.6;

        // Step the zone state machine, at most one transition per cycle
        self.step_zone(dist_m, speed_kph, veh_state, input_data.now);

        // Generate the velocity/acceleration targets for the new zone
        let ctx = profile::ProfileCtx {
            zone: self.zone,
            dist_to_target_m: dist_m,
            entry_speed_kph: self.entry_speed_kph,
            entry_dist_m: self.entry_dist_m,
            cruise_speed_kph: self.cruise_speed_kph,
        };
        let velocity_kph =
            profile::target_velocity_kph(self.params.profile, &self.params, &ctx);
        let accel_ms2 =
            profile::target_accel_ms2(&self.params, self.zone, velocity_kph, speed_kph);

        self.output = OutputData {
            velocity_kph,
            accel_ms2,
        };
        self.report = StatusReport {
            zone: self.zone,
            dist_to_target_m: Some(dist_m),
            velocity_kph,
            accel_ms2,
            tick_skipped: false,
        };

        debug!("{}", self.report.brief());

        Ok((self.output, self.report))
    }
}

impl Archived for StopMgr {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

impl StopMgr {
    /// Build a stop manager from already-loaded parameters and route.
    ///
    /// Rejects parameters violating the zone threshold ordering. A route
    /// with no stop waypoints is accepted but leaves the controller
    /// permanently inactive.
    pub fn from_parts(params: Params, route: Route) -> Result<Self, StopMgrError> {
        params.validate()?;

        if route.num_stops() == 0 {
            warn!("Route has no stop waypoints, stop manager will stay inactive");
        }

        Ok(Self {
            dist_provider: DistanceProvider::new(params.distance_mode),
            params,
            route,
            initialised: true,
            ..Default::default()
        })
    }

    /// The zone the controller is currently in.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The stop waypoint currently targeted, if any.
    pub fn current_target(&self) -> Option<Waypoint> {
        self.route.current_target().ok().copied()
    }

    /// True once every stop of a non-cyclic route has been serviced.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Apply at most one zone transition for this cycle.
    ///
    /// `dist_m` is the distance-to-target in meters, `speed_kph` the vehicle
    /// speed in km/h. Thresholds are entered with `<=` so a vehicle sitting
    /// exactly on a boundary progresses rather than oscillates.
    fn step_zone(
        &mut self,
        dist_m: f64,
        speed_kph: f64,
        veh_state: &VehicleState,
        now: Instant,
    ) {
        let prev_zone = self.zone;

        match self.zone {
            Zone::Inactive => {
                if !self.ended && dist_m <= self.params.activation_dist_m {
                    self.zone = Zone::Driving;
                    self.activation_anchor = self.current_target();
                    self.entry_speed_kph = speed_kph;
                    self.dist_provider
                        .arm(veh_state.odometer_m, self.params.activation_dist_m);
                }
            }
            Zone::Driving => {
                // Deactivation is measured against the point that triggered
                // activation, not the (possibly advanced) current target
                let anchor_dist_m = match self.activation_anchor {
                    Some(ref anchor) => {
                        self.dist_provider.distance_to_target_m(veh_state, anchor)
                    }
                    None => dist_m,
                };
                let deactivate = match self.params.deactivation_dist_m {
                    Some(deact_m) => anchor_dist_m > deact_m,
                    None => false,
                };

                if deactivate {
                    self.zone = Zone::Inactive;
                    self.activation_anchor = None;
                    self.route.reset();
                } else if dist_m <= self.params.in_area_dist_m {
                    self.zone = Zone::InArea;
                    self.entry_speed_kph = speed_kph.floor();
                    self.entry_dist_m = dist_m;
                    self.cruise_speed_kph = speed_kph.floor();
                }
            }
            Zone::InArea => {
                if dist_m <= self.params.approaching_dist_m {
                    self.zone = Zone::Approaching;
                    self.entry_speed_kph = speed_kph;
                    self.entry_dist_m = dist_m;
                }
            }
            Zone::Approaching => {
                if dist_m <= self.params.stopping_dist_m {
                    self.zone = Zone::Stopping;
                    self.entry_speed_kph = speed_kph;
                    self.entry_dist_m = dist_m;
                }
            }
            Zone::Stopping => {
                if is_stopped(veh_state, speed_kph, self.params.zero_threshold_speed_kph) {
                    self.zone = Zone::Stopped;
                    self.dwell_timer =
                        Some(ElapsedTimer::new(self.params.stop_time_s, now));
                }
            }
            Zone::Stopped => {
                if let Some(ref mut timer) = self.dwell_timer {
                    timer.update(now);
                    if timer.is_elapsed() {
                        self.zone = Zone::Resume;
                        self.dwell_timer = None;

                        let wrapped = self.route.advance();
                        if wrapped && !self.params.cyclic {
                            self.ended = true;
                            info!("Last stop of the route serviced");
                        }

                        // Re-plan the odometry countdown for the new target
                        self.dist_provider
                            .arm(veh_state.odometer_m, self.params.activation_dist_m);
                    }
                }
            }
            Zone::Resume => {
                if speed_kph >= self.params.resume_speed_kph {
                    self.zone = if self.ended {
                        Zone::Inactive
                    } else {
                        Zone::Driving
                    };
                }
            }
        }

        if self.zone != prev_zone {
            info!(
                "Zone {} -> {} (d = {:.1} m, v = {:.1} kph)",
                prev_zone, self.zone, dist_m, speed_kph
            );
        }
    }
}

impl StatusReport {
    /// One-line human-readable brief of the cycle, sent to the telemetry
    /// relay.
    pub fn brief(&self) -> String {
        let ds = match self.dist_to_target_m {
            Some(d) => format!("{:.3}", d),
            None => String::from("--.--"),
        };
        let v = match self.velocity_kph {
            Some(v) => format!("{:.1}", v),
            None => String::from("--.--"),
        };
        let a = match self.accel_ms2 {
            Some(a) => format!("{:.2}", a),
            None => String::from("--.--"),
        };

        format!("[Ds]={}::[v]={}::[a]={}::[st]={}", ds, v, a, self.zone)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Stopped-detection: all wheels at zero when the snapshot carries wheel
/// speeds, otherwise speed below the zero threshold.
fn is_stopped(veh_state: &VehicleState, speed_kph: f64, zero_threshold_kph: f64) -> bool {
    match veh_state.wheel_speeds_ms {
        Some(ws) => ws.iter().all(|&w| w == 0.0),
        None => speed_kph < zero_threshold_kph,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::GeoPoint;
    use crate::stop_mgr::{DistanceMode, ProfileShape, WaypointKind};
    use std::time::Duration;
    use util::maths::offset_km;

    const STOP_LAT: f64 = 51.4545;
    const STOP_LON: f64 = -2.5879;

    fn test_params() -> Params {
        Params {
            distance_mode: DistanceMode::Gps,
            profile: ProfileShape::Constant,
            route_file: String::new(),
            cyclic: true,
            activation_dist_m: 100.0,
            deactivation_dist_m: None,
            in_area_dist_m: 60.0,
            approaching_dist_m: 30.0,
            stopping_dist_m: 15.0,
            stop_time_s: 5.0,
            in_area_speed_kph: 20.0,
            approaching_speed_kph: 10.0,
            zero_threshold_speed_kph: 2.0,
            resume_speed_kph: 30.0,
            stopping_accel_ms2: -1.0,
            reduce_accel_ms2: -0.5,
            resume_accel_ms2: 0.8,
        }
    }

    fn one_stop_route() -> Route {
        Route::new(vec![Waypoint {
            lat_deg: STOP_LAT,
            lon_deg: STOP_LON,
            kind: WaypointKind::Stop,
        }])
    }

    /// Snapshot placed `d_m` meters due south of the stop waypoint.
    fn snapshot(d_m: f64, speed_kph: f64) -> VehicleState {
        let (lat_deg, lon_deg) = offset_km(STOP_LAT, STOP_LON, d_m / 1000.0, 180.0);
        VehicleState {
            position: GeoPoint { lat_deg, lon_deg },
            speed_ms: speed_kph / 3.6,
            odometer_m: 0.0,
            wheel_speeds_ms: None,
        }
    }

    fn input(d_m: f64, speed_kph: f64, now: Instant) -> InputData {
        InputData {
            veh_state: snapshot(d_m, speed_kph),
            now,
        }
    }

    #[test]
    fn test_approach_walks_zones_in_order() {
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        // Approach from 150 m at 40 kph, 1 m per cycle, recording each zone
        let mut zones = vec![mgr.zone()];
        let mut d = 150.0;
        while d >= 2.0 {
            mgr.proc(&input(d, 40.0, t0)).unwrap();
            if *zones.last().unwrap() != mgr.zone() {
                zones.push(mgr.zone());
            }
            d -= 1.0;
        }

        assert_eq!(
            zones,
            vec![
                Zone::Inactive,
                Zone::Driving,
                Zone::InArea,
                Zone::Approaching,
                Zone::Stopping
            ]
        );
    }

    #[test]
    fn test_one_transition_per_cycle() {
        // Boot already deep inside the stopping distance: the machine must
        // still traverse the intermediate zones one cycle at a time
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        for expected in [
            Zone::Driving,
            Zone::InArea,
            Zone::Approaching,
            Zone::Stopping,
        ] {
            mgr.proc(&input(5.0, 40.0, t0)).unwrap();
            assert_eq!(mgr.zone(), expected);
        }
    }

    #[test]
    fn test_unchanged_snapshot_is_idempotent() {
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        mgr.proc(&input(80.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);

        // Same snapshot again: no transition without a satisfied condition
        let (out_a, _) = mgr.proc(&input(80.0, 40.0, t0)).unwrap();
        let (out_b, _) = mgr.proc(&input(80.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);
        assert_eq!(out_a.velocity_kph, out_b.velocity_kph);
        assert_eq!(out_a.accel_ms2, out_b.accel_ms2);
    }

    #[test]
    fn test_full_stop_cycle() {
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        // Drive into the stopping zone at 40.5 kph, which floors to a 40 kph
        // cruise capture on entering the in-area zone
        for d in [150.0, 90.0, 50.0, 20.0, 10.0] {
            mgr.proc(&input(d, 40.5, t0)).unwrap();
        }
        assert_eq!(mgr.zone(), Zone::Stopping);

        // Slow below the zero threshold: stopped, dwell timer armed
        mgr.proc(&input(1.0, 1.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Stopped);

        // Dwell not yet complete
        let (out, _) = mgr
            .proc(&input(1.0, 0.0, t0 + Duration::from_secs_f64(4.9)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Stopped);
        assert_eq!(out.velocity_kph, Some(0.0));
        assert_eq!(out.accel_ms2, Some(-1.0));

        // First cycle past the dwell time resumes
        let (out, _) = mgr
            .proc(&input(1.0, 0.0, t0 + Duration::from_secs_f64(5.1)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Resume);
        assert_eq!(out.accel_ms2, Some(0.8));

        // Resume target is the pre-slowdown cruise speed (40 kph floor)
        assert_eq!(out.velocity_kph, Some(40.0));

        // Once back up to the resume speed the cyclic route drives on
        mgr.proc(&input(1.0, 35.0, t0 + Duration::from_secs(6)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);
        assert!(!mgr.is_ended());
    }

    #[test]
    fn test_non_cyclic_route_ends_inactive() {
        let mut params = test_params();
        params.cyclic = false;
        let mut mgr = StopMgr::from_parts(params, one_stop_route()).unwrap();
        let t0 = Instant::now();

        for d in [90.0, 50.0, 20.0, 10.0] {
            mgr.proc(&input(d, 40.0, t0)).unwrap();
        }
        mgr.proc(&input(1.0, 1.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Stopped);

        mgr.proc(&input(1.0, 0.0, t0 + Duration::from_secs(6)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Resume);
        assert!(mgr.is_ended());

        // Leaving resume on an ended route deactivates, and the controller
        // must not re-activate
        mgr.proc(&input(1.0, 35.0, t0 + Duration::from_secs(7)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Inactive);

        let (out, _) = mgr
            .proc(&input(50.0, 35.0, t0 + Duration::from_secs(8)))
            .unwrap();
        assert_eq!(mgr.zone(), Zone::Inactive);
        assert_eq!(out.velocity_kph, None);
        assert_eq!(out.accel_ms2, None);
    }

    #[test]
    fn test_route_cycles_through_all_stops() {
        let stops: Vec<Waypoint> = (0..3)
            .map(|i| Waypoint {
                lat_deg: STOP_LAT + 0.01 * i as f64,
                lon_deg: STOP_LON,
                kind: WaypointKind::Stop,
            })
            .collect();
        let mut route = Route::new(stops.clone());

        for expected in [&stops[1], &stops[2], &stops[0]] {
            route.advance();
            assert_eq!(route.current_target().unwrap(), expected);
        }
    }

    #[test]
    fn test_deactivation_hysteresis() {
        let mut params = test_params();
        params.deactivation_dist_m = Some(120.0);
        let mut mgr = StopMgr::from_parts(params, one_stop_route()).unwrap();
        let t0 = Instant::now();

        mgr.proc(&input(90.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);

        // Drifting just past the activation distance is inside the
        // hysteresis band
        mgr.proc(&input(110.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);

        // Beyond the deactivation distance the controller re-arms
        mgr.proc(&input(130.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Inactive);
    }

    #[test]
    fn test_wheel_speeds_gate_stopped_detection() {
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        for d in [90.0, 50.0, 20.0, 10.0] {
            mgr.proc(&input(d, 40.0, t0)).unwrap();
        }
        assert_eq!(mgr.zone(), Zone::Stopping);

        // GPS speed noise below the zero threshold, but a wheel still turns:
        // not stopped
        let mut veh_state = snapshot(1.0, 1.0);
        veh_state.wheel_speeds_ms = Some([0.0, 0.0, 0.3, 0.0]);
        mgr.proc(&InputData { veh_state, now: t0 }).unwrap();
        assert_eq!(mgr.zone(), Zone::Stopping);

        let mut veh_state = snapshot(1.0, 1.0);
        veh_state.wheel_speeds_ms = Some([0.0; 4]);
        mgr.proc(&InputData { veh_state, now: t0 }).unwrap();
        assert_eq!(mgr.zone(), Zone::Stopped);
    }

    #[test]
    fn test_malformed_snapshot_skips_cycle() {
        let mut mgr = StopMgr::from_parts(test_params(), one_stop_route()).unwrap();
        let t0 = Instant::now();

        mgr.proc(&input(50.0, 40.0, t0)).unwrap();
        mgr.proc(&input(50.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::InArea);
        let (prev_out, _) = mgr.proc(&input(50.0, 40.0, t0)).unwrap();

        let mut veh_state = snapshot(50.0, 40.0);
        veh_state.position.lat_deg = f64::NAN;
        let (out, report) = mgr.proc(&InputData { veh_state, now: t0 }).unwrap();

        assert!(report.tick_skipped);
        assert_eq!(mgr.zone(), Zone::InArea);
        assert_eq!(out.velocity_kph, prev_out.velocity_kph);
        assert_eq!(out.accel_ms2, prev_out.accel_ms2);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut params = test_params();
        params.stopping_dist_m = 45.0;

        assert!(matches!(
            StopMgr::from_parts(params, one_stop_route()),
            Err(StopMgrError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_empty_route_stays_inactive() {
        let mut mgr = StopMgr::from_parts(test_params(), Route::new(vec![])).unwrap();
        let t0 = Instant::now();

        let (out, report) = mgr.proc(&input(50.0, 40.0, t0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Inactive);
        assert_eq!(out.velocity_kph, None);
        assert_eq!(out.accel_ms2, None);
        assert_eq!(report.dist_to_target_m, None);
    }

    #[test]
    fn test_odometry_mode_full_approach() {
        let mut params = test_params();
        params.distance_mode = DistanceMode::Odometry;
        let mut mgr = StopMgr::from_parts(params, one_stop_route()).unwrap();
        let t0 = Instant::now();

        let odo_input = |odometer_m: f64, speed_kph: f64| InputData {
            veh_state: VehicleState {
                position: GeoPoint {
                    lat_deg: STOP_LAT,
                    lon_deg: STOP_LON,
                },
                speed_ms: speed_kph / 3.6,
                odometer_m,
                wheel_speeds_ms: None,
            },
            now: t0,
        };

        // First cycle arms the countdown at odometer 0, planning the stop
        // 100 m ahead, so the controller activates immediately
        mgr.proc(&odo_input(0.0, 40.0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Driving);

        mgr.proc(&odo_input(45.0, 40.0)).unwrap();
        assert_eq!(mgr.zone(), Zone::InArea);

        mgr.proc(&odo_input(75.0, 30.0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Approaching);

        mgr.proc(&odo_input(90.0, 20.0)).unwrap();
        assert_eq!(mgr.zone(), Zone::Stopping);
    }
}
