//! Conversions between geographic degrees, Web Mercator units and local
//! anchor-relative frames.
//!
//! Every function here is pure. Malformed input is logged and answered with an
//! empty value; callers treat that as "nothing drawn yet".

use foundation::math::{
    BEARING_EAST_DEG, GeoPoint, Vec2, Vec3, geodesic_destination, geodesic_distance,
    lon_lat_to_mercator, mercator_to_lon_lat,
};
use tracing::{debug, warn};

use crate::error::GeometryError;
use crate::path::AnchoredPath;
use crate::ring::{Feature, Role, close_ring, distinct_vertex_count};

pub fn to_projected(geo: GeoPoint) -> Vec2 {
    lon_lat_to_mercator(geo)
}

pub fn to_geographic(p: Vec2) -> GeoPoint {
    mercator_to_lon_lat(p)
}

/// Projected distance covered by one ground meter heading east from `anchor`.
///
/// Only valid near `anchor`: Web Mercator stretches with latitude, so this has
/// to be recomputed for every anchor.
pub fn projected_units_per_meter(anchor: GeoPoint) -> f64 {
    let here = to_projected(anchor);
    let east = to_projected(geodesic_destination(anchor, BEARING_EAST_DEG, 1.0));
    let scale = here.distance(east);
    debug!(
        lon = anchor.lon_deg,
        lat = anchor.lat_deg,
        scale,
        "projected units per meter"
    );
    scale
}

/// Ground meters covered by one projected unit near `anchor`.
pub fn meters_per_projected_unit(anchor: GeoPoint) -> f64 {
    1.0 / projected_units_per_meter(anchor)
}

/// Anchor a drawn ring on its first vertex.
///
/// Every vertex, including a closing duplicate, becomes an offset from the
/// projected first vertex with `z = 0`. Returns `None` for rings with fewer
/// than two distinct vertices or with vertices outside the projection domain.
pub fn anchor_path_from_geographic_ring(ring: &[GeoPoint]) -> Option<AnchoredPath> {
    let distinct = distinct_vertex_count(ring);
    if distinct < 2 {
        let err = GeometryError::malformed(format!("ring has {distinct} distinct vertices"));
        warn!("rejecting ring: {err}");
        return None;
    }

    let mut projected = Vec::with_capacity(ring.len());
    for geo in ring {
        let p = to_projected(*geo);
        if !p.is_finite() {
            let err = GeometryError::OutOfDomainProjection {
                lon_deg: geo.lon_deg,
                lat_deg: geo.lat_deg,
            };
            warn!("rejecting ring: {err}");
            return None;
        }
        projected.push(p);
    }

    let origin = projected[0];
    let points = projected.into_iter().map(|p| (p - origin).extend(0.0)).collect();
    debug!(x = origin.x, y = origin.y, "anchored ring");
    Some(AnchoredPath::new(origin, points))
}

/// Geographic ring of an anchored path, always closed.
pub fn geographic_ring_from_anchored_path(path: &AnchoredPath) -> Vec<GeoPoint> {
    if path.is_empty() {
        warn!("skipping path: {}", GeometryError::malformed("anchored path has no points"));
        return Vec::new();
    }
    if !path.origin.is_finite() {
        let err = GeometryError::malformed("anchored path origin is not finite");
        warn!("skipping path: {err}");
        return Vec::new();
    }

    let mut ring: Vec<GeoPoint> = path
        .absolute_points()
        .map(|p| to_geographic(p.xy()))
        .collect();
    close_ring(&mut ring);
    ring
}

/// Closed, role-tagged feature for an anchored path. `None` when the path is empty.
pub fn feature_from_anchored_path(role: Role, path: &AnchoredPath) -> Option<Feature> {
    let ring = geographic_ring_from_anchored_path(path);
    if ring.is_empty() {
        return None;
    }
    Some(Feature::new(role, ring))
}

/// Metric offsets of every path point from the path's first absolute point.
///
/// Offsets are measured as geodesic distances along the anchor's parallel (x)
/// and meridian (y), so projection stretch never leaks into the result.
/// x is positive when the point's longitude is >= the anchor's, y when its
/// latitude is >= the anchor's. Elevation is carried through unchanged.
///
/// Paths crossing the antimeridian are not unwrapped: a point just east of
/// 180° from an anchor near it gets a large negative x.
pub fn local_meters_from_anchored_path(path: &AnchoredPath) -> Vec<Vec3> {
    if !path.origin.is_finite() {
        let err = GeometryError::malformed("anchored path origin is not finite");
        warn!("skipping path: {err}");
        return Vec::new();
    }
    let absolute: Vec<Vec3> = path.absolute_points().collect();
    let Some(first) = absolute.first() else {
        warn!("skipping path: {}", GeometryError::malformed("anchored path has no points"));
        return Vec::new();
    };
    let anchor = to_geographic(first.xy());

    absolute
        .iter()
        .map(|p| {
            let geo = to_geographic(p.xy());
            let on_parallel = GeoPoint::new(geo.lon_deg, anchor.lat_deg);
            let on_meridian = GeoPoint::new(anchor.lon_deg, geo.lat_deg);
            let along_parallel = geodesic_distance(anchor, on_parallel);
            let along_meridian = geodesic_distance(anchor, on_meridian);
            let x = if geo.lon_deg >= anchor.lon_deg {
                along_parallel
            } else {
                -along_parallel
            };
            let y = if geo.lat_deg >= anchor.lat_deg {
                along_meridian
            } else {
                -along_meridian
            };
            Vec3::new(x, y, p.z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        anchor_path_from_geographic_ring, feature_from_anchored_path,
        geographic_ring_from_anchored_path, local_meters_from_anchored_path,
        meters_per_projected_unit, projected_units_per_meter, to_geographic, to_projected,
    };
    use crate::path::AnchoredPath;
    use crate::ring::{Role, close_ring, is_closed};
    use foundation::math::{GeoPoint, Vec2, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn scenario_path() -> AnchoredPath {
        AnchoredPath::new(
            Vec2::new(100.0, 200.0),
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(0.0, 10.0, 0.0),
            ],
        )
    }

    #[test]
    fn projection_round_trip() {
        let samples = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-180.0, -85.0),
            GeoPoint::new(180.0, 85.0),
            GeoPoint::new(13.404_954, 52.520_008),
            GeoPoint::new(-73.985_428, 40.748_817),
            GeoPoint::new(151.209_29, -33.868_82),
            GeoPoint::new(0.0, 89.9),
        ];
        for g in samples {
            let rt = to_geographic(to_projected(g));
            assert_close(rt.lon_deg, g.lon_deg, 1e-9);
            assert_close(rt.lat_deg, g.lat_deg, 1e-9);
        }
    }

    #[test]
    fn scale_factor_is_one_at_equator() {
        assert_close(projected_units_per_meter(GeoPoint::new(0.0, 0.0)), 1.0, 1e-6);
        assert_close(meters_per_projected_unit(GeoPoint::new(0.0, 0.0)), 1.0, 1e-6);
    }

    #[test]
    fn scale_factor_depends_on_anchor() {
        let equator = projected_units_per_meter(GeoPoint::new(10.0, 0.0));
        let north = projected_units_per_meter(GeoPoint::new(10.0, 60.0));
        assert_close(north, 1.995, 2e-3);
        assert!(north - equator > 0.5);

        let oslo = projected_units_per_meter(GeoPoint::new(10.75, 59.91));
        let rome = projected_units_per_meter(GeoPoint::new(12.5, 41.9));
        assert!((oslo - rome).abs() > 0.1);
        assert_close(meters_per_projected_unit(GeoPoint::new(10.0, 60.0)) * north, 1.0, 1e-12);
    }

    #[test]
    fn anchor_is_first_vertex() {
        let ring = vec![
            GeoPoint::new(2.35, 48.85),
            GeoPoint::new(2.36, 48.85),
            GeoPoint::new(2.36, 48.86),
            GeoPoint::new(2.35, 48.85),
        ];
        let path = anchor_path_from_geographic_ring(&ring).expect("anchored");
        assert_eq!(path.len(), 4);
        assert_eq!(path.points[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(path.origin, to_projected(ring[0]));
        assert!(path.points[1].x > 0.0);
        assert_close(path.points[1].y, 0.0, 1e-6);
        assert!(path.points.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(anchor_path_from_geographic_ring(&[]).is_none());
        assert!(anchor_path_from_geographic_ring(&[GeoPoint::new(1.0, 1.0)]).is_none());
        assert!(anchor_path_from_geographic_ring(&[GeoPoint::new(1.0, 1.0); 4]).is_none());
        assert!(
            anchor_path_from_geographic_ring(&[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, -90.0)])
                .is_none()
        );
    }

    #[test]
    fn scenario_path_survives_round_trip() {
        let original = scenario_path();
        let ring = geographic_ring_from_anchored_path(&original);
        assert_eq!(ring.len(), 5);
        assert!(is_closed(&ring));

        let rebuilt = anchor_path_from_geographic_ring(&ring).expect("anchored");
        assert_close(rebuilt.origin.x, 100.0, 1e-6);
        assert_close(rebuilt.origin.y, 200.0, 1e-6);
        for (a, b) in original.points.iter().zip(&rebuilt.points) {
            assert_close(a.x, b.x, 1e-6);
            assert_close(a.y, b.y, 1e-6);
        }
        assert_close(rebuilt.points[4].x, 0.0, 1e-9);
        assert_close(rebuilt.points[4].y, 0.0, 1e-9);
    }

    #[test]
    fn shifting_points_against_origin_keeps_ring() {
        let path = scenario_path();
        let shift = Vec3::new(37.5, -12.25, 0.0);
        let shifted = AnchoredPath::new(
            path.origin - shift.xy(),
            path.points.iter().map(|p| *p + shift).collect(),
        );
        let a = geographic_ring_from_anchored_path(&path);
        let b = geographic_ring_from_anchored_path(&shifted);
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            assert_close(p.lon_deg, q.lon_deg, 1e-12);
            assert_close(p.lat_deg, q.lat_deg, 1e-12);
        }

        let reanchored = geographic_ring_from_anchored_path(&path.reanchor(Vec2::new(-5.0, 7.0)));
        for (p, q) in a.iter().zip(&reanchored) {
            assert_close(p.lon_deg, q.lon_deg, 1e-12);
            assert_close(p.lat_deg, q.lat_deg, 1e-12);
        }
    }

    #[test]
    fn closed_path_is_not_closed_twice() {
        let mut path = scenario_path();
        path.points.push(Vec3::new(0.0, 0.0, 0.0));
        let ring = geographic_ring_from_anchored_path(&path);
        assert_eq!(ring.len(), 5);

        let mut again = ring.clone();
        close_ring(&mut again);
        assert_eq!(again, ring);
    }

    #[test]
    fn empty_path_gives_empty_ring() {
        let empty = AnchoredPath::new(Vec2::new(1.0, 2.0), Vec::new());
        assert!(geographic_ring_from_anchored_path(&empty).is_empty());
        assert!(local_meters_from_anchored_path(&empty).is_empty());
        assert!(feature_from_anchored_path(Role::Site, &empty).is_none());

        let bad_origin = AnchoredPath::new(Vec2::new(f64::NAN, 0.0), vec![Vec3::default()]);
        assert!(geographic_ring_from_anchored_path(&bad_origin).is_empty());
    }

    #[test]
    fn non_finite_origin_gives_no_local_meters() {
        let points = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)];
        for origin in [
            Vec2::new(f64::NAN, 0.0),
            Vec2::new(0.0, f64::INFINITY),
            Vec2::new(f64::NEG_INFINITY, 0.0),
        ] {
            let path = AnchoredPath::new(origin, points.clone());
            assert!(local_meters_from_anchored_path(&path).is_empty());
            assert!(geographic_ring_from_anchored_path(&path).is_empty());
        }
    }

    #[test]
    fn feature_carries_role_and_closure() {
        let feature =
            feature_from_anchored_path(Role::Envelope, &scenario_path()).expect("feature");
        assert_eq!(feature.role, Role::Envelope);
        assert!(is_closed(&feature.ring));
    }

    #[test]
    fn local_meters_near_equator_match_projected_offsets() {
        let local = local_meters_from_anchored_path(&scenario_path());
        assert_eq!(local.len(), 4);
        assert_eq!(local[0], Vec3::new(0.0, 0.0, 0.0));
        assert_close(local[1].x, 10.0, 1e-3);
        assert_close(local[1].y, 0.0, 1e-6);
        assert_close(local[2].x, 10.0, 1e-3);
        assert_close(local[2].y, 10.0 * 0.9933, 0.05);
        assert_close(local[3].x, 0.0, 1e-6);
    }

    #[test]
    fn local_meters_correct_for_latitude_stretch() {
        let anchor = GeoPoint::new(10.0, 60.0);
        let origin = to_projected(anchor);
        let scale = projected_units_per_meter(anchor);
        let path = AnchoredPath::new(
            origin,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(100.0 * scale, 0.0, 4.0),
                Vec3::new(-50.0 * scale, 0.0, 0.0),
            ],
        );
        let local = local_meters_from_anchored_path(&path);
        assert_close(local[1].x, 100.0, 0.01);
        assert_close(local[1].z, 4.0, 0.0);
        assert_close(local[2].x, -50.0, 0.01);
    }

    #[test]
    fn local_meters_sign_follows_compass() {
        let ring = [
            GeoPoint::new(5.0, 45.0),
            GeoPoint::new(4.999, 44.999),
            GeoPoint::new(5.001, 45.001),
        ];
        let path = anchor_path_from_geographic_ring(&ring).expect("anchored");
        let local = local_meters_from_anchored_path(&path);
        assert!(local[1].x < 0.0 && local[1].y < 0.0);
        assert!(local[2].x > 0.0 && local[2].y > 0.0);
        assert_close(local[1].y, -111.1, 1.0);
    }
}
