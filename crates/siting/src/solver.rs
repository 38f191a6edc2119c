//! Payloads exchanged with the Grasshopper solver.
//!
//! Site geometry travels as text fields: one `"x,y,z"` triple per point in
//! local meters, points joined by `;`. Scalar inputs are wrapped in
//! single-branch data trees the way Rhino Compute expects them.

use std::collections::BTreeMap;

use base64::Engine as _;
use foundation::math::{Vec3, format_fixed};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::path::AnchoredPath;
use crate::transform::local_meters_from_anchored_path;

/// Decimals per coordinate in solver text fields.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Branch path used for single-value inputs.
pub const ROOT_BRANCH: &str = "{0;0}";

pub const TYPE_DOUBLE: &str = "System.Double";
pub const TYPE_STRING: &str = "System.String";

/// `"x,y,z"` with `decimals` digits each.
pub fn format_anchor(p: Vec3, decimals: u32) -> String {
    format!(
        "{},{},{}",
        format_fixed(p.x, decimals),
        format_fixed(p.y, decimals),
        format_fixed(p.z, decimals)
    )
}

/// Semicolon-joined `"x,y,z"` triples.
pub fn format_local_points(points: &[Vec3], decimals: u32) -> String {
    points
        .iter()
        .map(|p| format_anchor(*p, decimals))
        .collect::<Vec<_>>()
        .join(";")
}

/// Solver text field for a drawn site: local meters anchored at the first
/// point. Empty when the path is empty or its origin is not finite.
pub fn site_polyline_field(path: &AnchoredPath, decimals: u32) -> String {
    format_local_points(&local_meters_from_anchored_path(path), decimals)
}

/// A scalar solver input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolverInput {
    Number(f64),
    Text(String),
    /// Null, list or object, forwarded verbatim as a string-typed item.
    Json(Value),
}

impl SolverInput {
    /// Numbers and booleans become doubles, everything else is string-typed.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => SolverInput::Number(v),
                None => SolverInput::Json(value.clone()),
            },
            Value::Bool(b) => SolverInput::Number(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => SolverInput::Text(s.clone()),
            other => SolverInput::Json(other.clone()),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            SolverInput::Number(_) => TYPE_DOUBLE,
            SolverInput::Text(_) | SolverInput::Json(_) => TYPE_STRING,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            SolverInput::Number(n) => Value::from(*n),
            SolverInput::Text(s) => Value::String(s.clone()),
            SolverInput::Json(v) => v.clone(),
        }
    }
}

/// Named inputs from a JSON object, in the object's insertion order.
pub fn inputs_from_json(object: &serde_json::Map<String, Value>) -> Vec<(String, SolverInput)> {
    object
        .iter()
        .map(|(name, value)| {
            let input = SolverInput::from_json(value);
            if matches!(input, SolverInput::Json(_)) {
                debug!(param = %name, "forwarding structured input as text");
            }
            (name.clone(), input)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTreeItem {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTreeParam {
    #[serde(rename = "ParamName")]
    pub param_name: String,
    #[serde(rename = "InnerTree")]
    pub inner_tree: BTreeMap<String, Vec<DataTreeItem>>,
}

impl DataTreeParam {
    pub fn single(name: impl Into<String>, input: &SolverInput) -> Self {
        let item = DataTreeItem {
            type_name: input.type_name().to_string(),
            data: input.to_value(),
        };
        let mut inner_tree = BTreeMap::new();
        inner_tree.insert(ROOT_BRANCH.to_string(), vec![item]);
        Self {
            param_name: name.into(),
            inner_tree,
        }
    }

    /// Items of every branch, in branch order.
    pub fn items(&self) -> impl Iterator<Item = &DataTreeItem> {
        self.inner_tree.values().flatten()
    }
}

/// Request body for a Grasshopper solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Base64 of the Grasshopper definition file.
    pub algo: String,
    pub pointer: Option<String>,
    pub values: Vec<DataTreeParam>,
}

impl ComputeRequest {
    pub fn new<I>(definition: &[u8], inputs: I) -> Self
    where
        I: IntoIterator<Item = (String, SolverInput)>,
    {
        Self {
            algo: base64::engine::general_purpose::STANDARD.encode(definition),
            pointer: None,
            values: inputs
                .into_iter()
                .map(|(name, input)| DataTreeParam::single(name, &input))
                .collect(),
        }
    }

    /// Add or replace one input.
    pub fn set_input(&mut self, name: &str, input: &SolverInput) {
        let param = DataTreeParam::single(name, input);
        match self.values.iter_mut().find(|p| p.param_name == name) {
            Some(existing) => *existing = param,
            None => self.values.push(param),
        }
    }
}

/// Reply from a Grasshopper solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeResponse {
    #[serde(default)]
    pub values: Vec<DataTreeParam>,
}

impl ComputeResponse {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Items of the output parameter `name` across all branches.
    pub fn outputs_named(&self, name: &str) -> Vec<&DataTreeItem> {
        self.values
            .iter()
            .filter(|p| p.param_name == name)
            .flat_map(|p| p.items())
            .collect()
    }
}
