//! Geographic rings and the role-tagged features drawn on the site map.

use std::collections::BTreeSet;

use foundation::Aabb2;
use foundation::math::{GeoPoint, round_to_decimals};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeometryError;

/// Decimal degrees kept when comparing ring vertices (~0.1 mm).
pub const CLOSURE_DECIMALS: u32 = 9;

fn vertex_key(p: GeoPoint) -> (u64, u64) {
    (
        round_to_decimals(p.lon_deg, CLOSURE_DECIMALS).to_bits(),
        round_to_decimals(p.lat_deg, CLOSURE_DECIMALS).to_bits(),
    )
}

/// Vertex equality after rounding to [`CLOSURE_DECIMALS`].
pub fn same_vertex(a: GeoPoint, b: GeoPoint) -> bool {
    vertex_key(a) == vertex_key(b)
}

pub fn is_closed(ring: &[GeoPoint]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() > 1 && same_vertex(*first, *last),
        _ => false,
    }
}

/// Append the first vertex when the ring does not already end on it.
/// Applying this twice is the same as applying it once.
pub fn close_ring(ring: &mut Vec<GeoPoint>) {
    if ring.is_empty() || is_closed(ring) {
        return;
    }
    let first = ring[0];
    ring.push(first);
}

pub fn distinct_vertex_count(ring: &[GeoPoint]) -> usize {
    ring.iter()
        .map(|p| vertex_key(*p))
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn bounds(ring: &[GeoPoint]) -> Option<Aabb2> {
    Aabb2::from_geo_points(ring)
}

/// What a drawn shape stands for in the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Site,
    Envelope,
    Block,
    #[serde(untagged)]
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Site => "site",
            Role::Envelope => "envelope",
            Role::Block => "block",
            Role::Other(s) => s,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "site" => Role::Site,
            "envelope" => Role::Envelope,
            "block" => Role::Block,
            other => Role::Other(other.to_string()),
        }
    }
}

/// A closed geographic ring tagged with its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub role: Role,
    pub ring: Vec<GeoPoint>,
}

impl Feature {
    /// Build a feature, closing the ring if needed.
    pub fn new(role: Role, mut ring: Vec<GeoPoint>) -> Self {
        close_ring(&mut ring);
        Self { role, ring }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Vec<Self>, GeometryError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| GeometryError::malformed(format!("JSON parse error: {e}")))?;
        Self::from_geojson_value(&value)
    }

    /// Accepts a single Feature or a FeatureCollection. Polygon features use
    /// their outer ring; LineString features are treated as open rings.
    pub fn from_geojson_value(value: &Value) -> Result<Vec<Self>, GeometryError> {
        let obj = value
            .as_object()
            .ok_or_else(|| GeometryError::malformed("GeoJSON must be an object"))?;
        match obj.get("type").and_then(|v| v.as_str()) {
            Some("Feature") => Ok(vec![parse_feature(obj)?]),
            Some("FeatureCollection") => {
                let features = obj
                    .get("features")
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| GeometryError::malformed("FeatureCollection without features"))?;
                features
                    .iter()
                    .enumerate()
                    .map(|(index, f)| {
                        let fobj = f.as_object().ok_or_else(|| {
                            GeometryError::malformed(format!("feature {index} must be an object"))
                        })?;
                        parse_feature(fobj)
                    })
                    .collect()
            }
            other => Err(GeometryError::malformed(format!(
                "expected Feature or FeatureCollection, got {other:?}"
            ))),
        }
    }

    pub fn to_geojson_value(&self) -> Value {
        let ring: Vec<Value> = self
            .ring
            .iter()
            .map(|p| Value::from(vec![p.lon_deg, p.lat_deg]))
            .collect();

        let mut geometry = Map::new();
        geometry.insert("type".to_string(), Value::String("Polygon".to_string()));
        geometry.insert("coordinates".to_string(), Value::Array(vec![Value::Array(ring)]));

        let mut properties = Map::new();
        properties.insert(
            "role".to_string(),
            Value::String(self.role.as_str().to_string()),
        );

        let mut root = Map::new();
        root.insert("type".to_string(), Value::String("Feature".to_string()));
        root.insert("properties".to_string(), Value::Object(properties));
        root.insert("geometry".to_string(), Value::Object(geometry));
        Value::Object(root)
    }
}

fn parse_feature(obj: &Map<String, Value>) -> Result<Feature, GeometryError> {
    let role = obj
        .get("properties")
        .and_then(|v| v.get("role"))
        .and_then(|v| v.as_str())
        .map(Role::from)
        .unwrap_or(Role::Site);

    let geometry = obj
        .get("geometry")
        .and_then(|v| v.as_object())
        .ok_or_else(|| GeometryError::malformed("feature missing geometry"))?;
    let coords = geometry
        .get("coordinates")
        .ok_or_else(|| GeometryError::malformed("geometry missing coordinates"))?;

    let ring_val = match geometry.get("type").and_then(|v| v.as_str()) {
        Some("Polygon") => coords
            .as_array()
            .and_then(|rings| rings.first())
            .ok_or_else(|| GeometryError::malformed("polygon without rings"))?,
        Some("LineString") => coords,
        other => {
            return Err(GeometryError::malformed(format!(
                "unsupported geometry type: {other:?}"
            )));
        }
    };

    let ring = parse_positions(ring_val)?;
    Ok(Feature::new(role, ring))
}

fn parse_positions(value: &Value) -> Result<Vec<GeoPoint>, GeometryError> {
    let arr = value
        .as_array()
        .ok_or_else(|| GeometryError::malformed("coordinates must be an array"))?;
    arr.iter()
        .map(|pos| {
            let pair = pos.as_array().filter(|p| p.len() >= 2).ok_or_else(|| {
                GeometryError::malformed("position must be [lon, lat]")
            })?;
            let lon = pair[0].as_f64();
            let lat = pair[1].as_f64();
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
                _ => Err(GeometryError::malformed("position values must be numbers")),
            }
        })
        .collect()
}
