//! Route model
//!
//! A route is an ordered list of geographic waypoints loaded from a JSON file
//! under the software root. The controller only ever targets the `Stop`-kind
//! waypoints; the cursor over that sub-sequence is the one piece of mutable
//! state here and wraps modulo the stop count each time a stop is serviced.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::fs::read_to_string;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single route waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// Latitude.
    ///
    /// Units: degrees
    pub lat_deg: f64,

    /// Longitude.
    ///
    /// Units: degrees
    pub lon_deg: f64,

    /// What kind of waypoint this is.
    pub kind: WaypointKind,
}

/// An ordered sequence of waypoints plus the derived stop sub-sequence.
#[derive(Clone, Debug, Default)]
pub struct Route {
    waypoints: Vec<Waypoint>,

    /// Only the `Stop`-kind waypoints, in route order.
    stops: Vec<Waypoint>,

    /// Cursor into `stops` giving the active target.
    next_stop_idx: usize,
}

/// The raw shape of one record in the route JSON file.
#[derive(Deserialize)]
struct WaypointRecord {
    lat: f64,
    long: f64,

    /// Absent means a regular (non-stop) waypoint.
    #[serde(rename = "type")]
    kind: Option<String>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What kind of waypoint a route entry is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaypointKind {
    /// A shape point of the route, never targeted by the controller.
    Regular,

    /// A waypoint the vehicle must stop at.
    Stop,
}

/// Possible errors when loading or querying a route.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("The software root environment variable (SHUTTLE_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the route file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot parse the route file: {0}")]
    ParseError(serde_json::Error),

    #[error("The route contains no stop waypoints")]
    EmptyRoute,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Route {
    /// Build a route from an already-loaded waypoint sequence.
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        let stops = waypoints
            .iter()
            .filter(|w| w.kind == WaypointKind::Stop)
            .copied()
            .collect();

        Self {
            waypoints,
            stops,
            next_stop_idx: 0,
        }
    }

    /// Load a route from a JSON file relative to the software root.
    ///
    /// Each record is `{"lat": .., "long": ..}` with an optional
    /// `"type": "STOP"` key; records without the key are regular waypoints.
    pub fn from_json_file(route_file_path: &str) -> Result<Self, RouteError> {
        let mut path = util::host::get_shuttle_sw_root()
            .map_err(|_| RouteError::SwRootNotSet)?;
        path.push(route_file_path);

        let route_str = match read_to_string(path) {
            Ok(s) => s,
            Err(e) => return Err(RouteError::FileLoadError(e)),
        };

        let records: Vec<WaypointRecord> = match serde_json::from_str(&route_str) {
            Ok(r) => r,
            Err(e) => return Err(RouteError::ParseError(e)),
        };

        let waypoints = records
            .iter()
            .map(|r| Waypoint {
                lat_deg: r.lat,
                lon_deg: r.long,
                kind: match r.kind.as_deref() {
                    Some("STOP") => WaypointKind::Stop,
                    _ => WaypointKind::Regular,
                },
            })
            .collect();

        Ok(Self::new(waypoints))
    }

    /// The full waypoint sequence.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of stop waypoints in the route.
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    /// The stop waypoint the controller is currently targeting.
    pub fn current_target(&self) -> Result<&Waypoint, RouteError> {
        match self.stops.get(self.next_stop_idx) {
            Some(w) => Ok(w),
            None => Err(RouteError::EmptyRoute),
        }
    }

    /// Advance the cursor to the next stop, wrapping modulo the stop count.
    ///
    /// Returns true if the cursor wrapped past the last stop, so that
    /// non-cyclic deployments can flag the route as ended.
    pub fn advance(&mut self) -> bool {
        if self.stops.is_empty() {
            return false;
        }

        self.next_stop_idx += 1;
        if self.next_stop_idx >= self.stops.len() {
            self.next_stop_idx = 0;
            true
        } else {
            false
        }
    }

    /// Re-arm the route at its first stop.
    pub fn reset(&mut self) {
        self.next_stop_idx = 0;
    }
}
