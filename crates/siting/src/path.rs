use foundation::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A polyline stored as offsets from a projected origin.
///
/// `points` are always relative to `origin`. Changing the origin means every
/// point has to be recomputed, see [`AnchoredPath::reanchor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchoredPath {
    pub origin: Vec2,
    pub points: Vec<Vec3>,
}

impl AnchoredPath {
    pub fn new(origin: Vec2, points: Vec<Vec3>) -> Self {
        Self { origin, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Absolute projected positions (`origin + point`), elevation kept in `z`.
    pub fn absolute_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let origin = self.origin.extend(0.0);
        self.points.iter().map(move |p| origin + *p)
    }

    /// Same shape expressed against another origin.
    pub fn reanchor(&self, origin: Vec2) -> Self {
        let delta = (self.origin - origin).extend(0.0);
        Self {
            origin,
            points: self.points.iter().map(|p| *p + delta).collect(),
        }
    }

    /// Absolute form written to the project store.
    pub fn to_persisted(&self) -> PersistedPath {
        PersistedPath {
            origin: self.origin,
            points: self.absolute_points().collect(),
        }
    }
}

/// Stored form of an [`AnchoredPath`]: the origin plus absolute points.
///
/// Keeping absolute coordinates in storage means a reload never applies the
/// origin offset twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPath {
    pub origin: Vec2,
    pub points: Vec<Vec3>,
}

impl PersistedPath {
    pub fn to_anchored(&self) -> AnchoredPath {
        let origin = self.origin.extend(0.0);
        AnchoredPath {
            origin: self.origin,
            points: self.points.iter().map(|p| *p - origin).collect(),
        }
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, GeometryError> {
        let path: PersistedPath = serde_json::from_value(value)
            .map_err(|e| GeometryError::malformed(format!("stored path: {e}")))?;
        if path.points.is_empty() {
            return Err(GeometryError::malformed("stored path has no points"));
        }
        Ok(path)
    }
}
