//! Stop manager module
//!
//! The distance-triggered stop/resume speed controller. Given the vehicle
//! state snapshot and a route of stop waypoints, the module decelerates the
//! vehicle on approach to the active stop, holds it there for the configured
//! dwell time, then resumes cruising toward the next stop, cycling through
//! the route.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod dist;
mod params;
mod profile;
mod route;
mod state;
mod zone;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use dist::*;
pub use params::*;
pub use profile::*;
pub use route::*;
pub use state::*;
pub use zone::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during StopMgr operation.
#[derive(Debug, thiserror::Error)]
pub enum StopMgrError {
    #[error("Could not load the stop manager parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Could not load the route: {0}")]
    RouteLoadError(RouteError),

    #[error(
        "Invalid zone thresholds: expected stopping ({stopping_dist_m} m) \
         < approaching ({approaching_dist_m} m) < in-area ({in_area_dist_m} m) \
         <= activation ({activation_dist_m} m)"
    )]
    InvalidThresholds {
        stopping_dist_m: f64,
        approaching_dist_m: f64,
        in_area_dist_m: f64,
        activation_dist_m: f64,
    },
}
