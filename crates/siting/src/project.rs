use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeometryError;
use crate::path::{AnchoredPath, PersistedPath};
use crate::solver::{SolverInput, inputs_from_json};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Residential,
    Acoustic,
    Urban,
}

/// A stored design project: where it sits and the inputs last sent to the
/// solver. Site shapes are kept in absolute form only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_bounds: Option<PersistedPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_envelope: Option<PersistedPath>,
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProjectKind::default(),
            relative_location: None,
            site_bounds: None,
            site_envelope: None,
            inputs: Map::new(),
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, GeometryError> {
        serde_json::from_str(payload)
            .map_err(|e| GeometryError::malformed(format!("project record: {e}")))
    }

    pub fn set_site_bounds(&mut self, path: &AnchoredPath) {
        self.site_bounds = Some(path.to_persisted());
    }

    pub fn set_site_envelope(&mut self, path: &AnchoredPath) {
        self.site_envelope = Some(path.to_persisted());
    }

    pub fn solver_inputs(&self) -> Vec<(String, SolverInput)> {
        inputs_from_json(&self.inputs)
    }
}
