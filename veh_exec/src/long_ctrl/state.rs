//! Implementations for the LongCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use std::time::Instant;

// Internal
use super::{LongCtrlError, Params, PidController};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Longitudinal control module state
#[derive(Default)]
pub struct LongCtrl {
    pub(crate) params: Params,

    vel_ctrl: PidController,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    output: OutputData,
    arch_output: Archiver,
}

/// Input data to longitudinal control.
pub struct InputData {
    /// Velocity target from the stop manager, `None` if it asserts nothing
    /// this cycle.
    ///
    /// Units: kilometers/hour
    pub target_velocity_kph: Option<f64>,

    /// Acceleration asserted by the stop manager, capping the demand.
    ///
    /// Units: meters/second^2
    pub accel_cap_ms2: Option<f64>,

    /// Current vehicle speed.
    ///
    /// Units: meters/second
    pub current_speed_ms: f64,

    /// The monotonic instant of this cycle.
    pub now: Instant,
}

/// Output demand from LongCtrl.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OutputData {
    /// Acceleration demand for the vehicle, `None` when no velocity target
    /// is being tracked.
    ///
    /// Units: meters/second^2
    pub accel_dem_ms2: Option<f64>,
}

/// Status report for LongCtrl processing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// Velocity tracking error, `None` when disengaged.
    ///
    /// Units: meters/second
    pub error_ms: Option<f64>,

    /// True if the demand hit a configured limit this cycle.
    pub demand_saturated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LongCtrl {
    type InitData = &'static str;
    type InitError = LongCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = LongCtrlError;

    /// Initialise the LongCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(LongCtrlError::ParamLoadError(e)),
        };

        self.vel_ctrl =
            PidController::new(self.params.k_p, self.params.k_i, self.params.k_d);

        // Create the arch folder for long_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("long_ctrl");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archivers
        self.arch_report = Archiver::from_path(
            session, "long_ctrl/status_report.csv"
        ).unwrap();
        self.arch_output = Archiver::from_path(
            session, "long_ctrl/output.csv"
        ).unwrap();

        Ok(())
    }

    /// Perform cyclic processing of longitudinal control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        let output = match input_data.target_velocity_kph {
            Some(target_kph) => {
                let error_ms = target_kph / 3.6 - input_data.current_speed_ms;
                self.report.error_ms = Some(error_ms);

                let mut demand_ms2 = self.vel_ctrl.get(error_ms, input_data.now);

                // The stop manager's asserted acceleration caps the demand:
                // at least its deceleration while braking, at most its
                // acceleration while resuming
                if let Some(cap_ms2) = input_data.accel_cap_ms2 {
                    demand_ms2 = demand_ms2.min(cap_ms2);
                }

                // Saturate to the vehicle's capabilities
                if demand_ms2 > self.params.max_accel_ms2 {
                    demand_ms2 = self.params.max_accel_ms2;
                    self.report.demand_saturated = true;
                }
                if demand_ms2 < self.params.min_accel_ms2 {
                    demand_ms2 = self.params.min_accel_ms2;
                    self.report.demand_saturated = true;
                }

                if !demand_ms2.is_finite() {
                    return Err(LongCtrlError::NonFiniteDemand { demand_ms2 });
                }

                OutputData {
                    accel_dem_ms2: Some(demand_ms2),
                }
            }
            None => {
                // Disengaged: clear the controller so the next engagement
                // starts without stale integral
                self.vel_ctrl.reset();

                OutputData { accel_dem_ms2: None }
            }
        };

        trace!("LongCtrl accel demand: {:?} m/s^2", output.accel_dem_ms2);

        self.output = output;

        Ok((output, self.report))
    }
}

impl Archived for LongCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_ctrl() -> LongCtrl {
        LongCtrl {
            params: Params {
                k_p: 0.5,
                k_i: 0.0,
                k_d: 0.0,
                max_accel_ms2: 1.5,
                min_accel_ms2: -3.0,
            },
            vel_ctrl: PidController::new(0.5, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn input(
        target_velocity_kph: Option<f64>,
        accel_cap_ms2: Option<f64>,
        current_speed_ms: f64,
    ) -> InputData {
        InputData {
            target_velocity_kph,
            accel_cap_ms2,
            current_speed_ms,
            now: Instant::now(),
        }
    }

    #[test]
    fn test_tracks_target_sign() {
        let mut ctrl = test_ctrl();

        // 36 kph target from standstill: accelerate
        let (out, _) = ctrl.proc(&input(Some(36.0), None, 0.0)).unwrap();
        assert!(out.accel_dem_ms2.unwrap() > 0.0);

        // Standstill target at 10 m/s: decelerate
        let (out, _) = ctrl.proc(&input(Some(0.0), None, 10.0)).unwrap();
        assert!(out.accel_dem_ms2.unwrap() < 0.0);
    }

    #[test]
    fn test_asserted_accel_caps_demand() {
        let mut ctrl = test_ctrl();

        // Tracking alone would give 0.5 * (10 - 8) = 1.0, the stopping
        // deceleration forces at least -1.0
        let (out, _) = ctrl.proc(&input(Some(36.0), Some(-1.0), 8.0)).unwrap();
        assert_eq!(out.accel_dem_ms2, Some(-1.0));

        // A resume cap limits how hard the controller accelerates
        let (out, _) = ctrl.proc(&input(Some(72.0), Some(0.8), 0.0)).unwrap();
        assert_eq!(out.accel_dem_ms2, Some(0.8));
    }

    #[test]
    fn test_demand_saturates_to_limits() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&input(Some(0.0), None, 50.0)).unwrap();
        assert_eq!(out.accel_dem_ms2, Some(-3.0));
        assert!(report.demand_saturated);
    }

    #[test]
    fn test_no_target_no_demand() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&input(None, None, 10.0)).unwrap();
        assert_eq!(out.accel_dem_ms2, None);
        assert_eq!(report.error_ms, None);
    }
}
