use crate::math::GeoPoint;

/// Axis-aligned bounding box. `min`/`max` are `[x, y]`, or `[lon, lat]` for
/// geographic boxes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Geographic bounds of a point set, `None` when empty.
    pub fn from_geo_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Aabb2::new(
            [first.lon_deg, first.lat_deg],
            [first.lon_deg, first.lat_deg],
        );
        for p in rest {
            bounds.min[0] = bounds.min[0].min(p.lon_deg);
            bounds.min[1] = bounds.min[1].min(p.lat_deg);
            bounds.max[0] = bounds.max[0].max(p.lon_deg);
            bounds.max[1] = bounds.max[1].max(p.lat_deg);
        }
        Some(bounds)
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }
}
