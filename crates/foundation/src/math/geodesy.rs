use geo::orient::Direction;
use geo::{
    Coord, Destination, Distance, Geodesic, GeodesicArea, LineString, Orient, Point, Polygon,
};
use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// Compass bearing of due east, in degrees clockwise from north.
pub const BEARING_EAST_DEG: f64 = 90.0;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon_deg, self.lat_deg)
    }

    fn from_point(p: Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

/// Ellipsoidal (WGS84) geodesic distance in meters.
pub fn geodesic_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    Geodesic.distance(a.to_point(), b.to_point())
}

/// Point reached by travelling `distance_m` along the geodesic leaving `origin`
/// at `bearing_deg` (clockwise from north).
pub fn geodesic_destination(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    GeoPoint::from_point(Geodesic.destination(origin.to_point(), bearing_deg, distance_m))
}

/// Unsigned geodesic area of a ring in square meters. The ring may be open or
/// closed; winding order does not matter.
pub fn geodesic_ring_area(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|p| Coord {
            x: p.lon_deg,
            y: p.lat_deg,
        })
        .collect();
    Polygon::new(LineString::new(coords), vec![])
        .orient(Direction::Default)
        .geodesic_area_unsigned()
}
