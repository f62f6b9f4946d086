//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Mean Earth radius used for great-circle calculations.
///
/// Units: kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Great-circle distance between two coordinates using the haversine
/// formula.
///
/// Inputs are latitude/longitude pairs in degrees, the output is in
/// kilometers. Total for finite inputs; NaN or out-of-range coordinates must
/// be rejected by the caller.
pub fn haversine_km(lat_0_deg: f64, lon_0_deg: f64, lat_1_deg: f64, lon_1_deg: f64) -> f64 {
    let dlat_rad = (lat_1_deg - lat_0_deg).to_radians();
    let dlon_rad = (lon_1_deg - lon_0_deg).to_radians();

    let a = (dlat_rad / 2.0).sin().powi(2)
        + lat_0_deg.to_radians().cos()
        * lat_1_deg.to_radians().cos()
        * (dlon_rad / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Get the coordinate a given distance along a bearing from a start
/// coordinate.
///
/// Uses the flat-step approximation, which is accurate for the sub-kilometer
/// offsets the route tooling and simulation need.
pub fn offset_km(
    lat_deg: f64,
    lon_deg: f64,
    dist_km: f64,
    bearing_deg: f64
) -> (f64, f64) {
    let bearing_rad = bearing_deg.to_radians();

    let new_lat_deg = lat_deg
        + (dist_km / EARTH_RADIUS_KM).to_degrees() * bearing_rad.cos();
    let new_lon_deg = lon_deg
        + (dist_km / EARTH_RADIUS_KM).to_degrees()
        * bearing_rad.sin() / lat_deg.to_radians().cos();

    (new_lat_deg, new_lon_deg)
}

/// Initial bearing from one coordinate towards another.
///
/// Units: degrees in [0, 360)
pub fn bearing_deg(lat_0_deg: f64, lon_0_deg: f64, lat_1_deg: f64, lon_1_deg: f64) -> f64 {
    let lat_0_rad = lat_0_deg.to_radians();
    let lat_1_rad = lat_1_deg.to_radians();
    let dlon_rad = (lon_1_deg - lon_0_deg).to_radians();

    let y = dlon_rad.sin() * lat_1_rad.cos();
    let x = lat_0_rad.cos() * lat_1_rad.sin()
        - lat_0_rad.sin() * lat_1_rad.cos() * dlon_rad.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 1.0), (0.0, 10.0), 0.5), 5.0);
        assert_eq!(lin_map((60.0, 30.0), (40.0, 20.0), 60.0), 40.0);
        assert_eq!(lin_map((60.0, 30.0), (40.0, 20.0), 30.0), 20.0);
    }

    #[test]
    fn test_haversine_identity_and_symmetry() {
        let points = [(0.0, 0.0), (51.4545, -2.5879), (-33.8688, 151.2093)];

        for &(lat, lon) in points.iter() {
            assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
        }

        let d_ab = haversine_km(points[0].0, points[0].1, points[1].0, points[1].1);
        let d_ba = haversine_km(points[1].0, points[1].1, points[0].0, points[0].1);
        assert!((d_ab - d_ba).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_known_distance() {
        // One degree of latitude is ~111.19 km on the mean-radius sphere
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_offset_round_trip() {
        let (lat, lon) = (51.4545, -2.5879);

        for &bearing in [0.0, 45.0, 90.0, 180.0, 270.0].iter() {
            let (new_lat, new_lon) = offset_km(lat, lon, 0.1, bearing);
            let d = haversine_km(lat, lon, new_lat, new_lon);
            assert!((d - 0.1).abs() < 1e-3, "bearing {}: got {}", bearing, d);
        }
    }

    #[test]
    fn test_bearing() {
        assert!((bearing_deg(0.0, 0.0, 1.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(1.0, 0.0, 0.0, 0.0) - 180.0).abs() < 1e-9);
    }
}
