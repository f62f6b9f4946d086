//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{loc::VehicleState, long_ctrl, stop_mgr};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Localisation
    /// The vehicle state snapshot for this cycle, `None` if the source
    /// produced nothing.
    pub veh_state: Option<VehicleState>,

    // StopMgr
    pub stop_mgr: stop_mgr::StopMgr,
    pub stop_mgr_output: stop_mgr::OutputData,
    pub stop_mgr_report: stop_mgr::StatusReport,

    // LongCtrl
    pub long_ctrl: long_ctrl::LongCtrl,
    pub long_ctrl_output: long_ctrl::OutputData,
    pub long_ctrl_report: long_ctrl::StatusReport,

    // Monitoring counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.veh_state = None;
        self.stop_mgr_output = stop_mgr::OutputData::default();
        self.stop_mgr_report = stop_mgr::StatusReport::default();
        self.long_ctrl_report = long_ctrl::StatusReport::default();
    }
}
