//! Real-world lengths and areas of geographic rings, and their map labels.
//!
//! Lengths and areas both come from the WGS84 geodesic, so the edge labels of
//! a ring always agree with its area label.

use foundation::math::{GeoPoint, format_fixed, geodesic_distance, geodesic_ring_area};

use crate::config::LabelConfig;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Geodesic length of one edge, in meters.
pub fn edge_length(a: GeoPoint, b: GeoPoint) -> f64 {
    geodesic_distance(a, b)
}

/// Length of every consecutive edge of `ring`. A closed ring yields one entry
/// per side; an open one omits the closing side.
pub fn edge_lengths(ring: &[GeoPoint]) -> Vec<f64> {
    ring.windows(2).map(|w| edge_length(w[0], w[1])).collect()
}

/// Geodesic area enclosed by `ring`, in square meters. Zero for fewer than
/// three vertices.
pub fn ring_area(ring: &[GeoPoint]) -> f64 {
    geodesic_ring_area(ring)
}

pub fn perimeter(ring: &[GeoPoint]) -> f64 {
    edge_lengths(ring).iter().sum()
}

/// `"<value> m"`.
pub fn format_length(meters: f64, config: &LabelConfig) -> String {
    format!("{} m", format_fixed(meters, config.edge_decimals))
}

/// `"<value> m²"`, switching to `"<value> ha"` above the hectare threshold.
pub fn format_area(square_meters: f64, config: &LabelConfig) -> String {
    if square_meters > config.hectare_threshold_m2 {
        format!(
            "{} ha",
            format_fixed(square_meters / SQUARE_METERS_PER_HECTARE, config.area_decimals)
        )
    } else {
        format!("{} m²", format_fixed(square_meters, config.area_decimals))
    }
}

/// Labels for one drawn ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLabels {
    pub edges: Vec<String>,
    pub area: String,
}

pub fn ring_labels(ring: &[GeoPoint], config: &LabelConfig) -> RingLabels {
    RingLabels {
        edges: edge_lengths(ring)
            .into_iter()
            .map(|len| format_length(len, config))
            .collect(),
        area: format_area(ring_area(ring), config),
    }
}
