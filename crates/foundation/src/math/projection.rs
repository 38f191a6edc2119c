//! Spherical Web Mercator (EPSG:3857).
//!
//! Projected units equal meters only along the equator; away from it one unit
//! covers `cos(lat)` meters on the ground. Use a locally derived scale factor
//! when real distances matter.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use super::{GeoPoint, Vec2, WGS84_A};

/// Project geographic degrees to Web Mercator units.
///
/// The poles map to `±inf` and latitudes outside `[-90, 90]` map to NaN. The
/// function never panics.
pub fn lon_lat_to_mercator(geo: GeoPoint) -> Vec2 {
    let x = WGS84_A * geo.lon_deg.to_radians();
    let y = WGS84_A * (FRAC_PI_4 + geo.lat_deg.to_radians() / 2.0).tan().ln();
    Vec2::new(x, y)
}

/// Inverse of [`lon_lat_to_mercator`].
pub fn mercator_to_lon_lat(p: Vec2) -> GeoPoint {
    let lon = (p.x / WGS84_A).to_degrees();
    let lat = (2.0 * (p.y / WGS84_A).exp().atan() - FRAC_PI_2).to_degrees();
    GeoPoint::new(lon, lat)
}
