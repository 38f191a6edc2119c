use std::fmt;

/// Reasons a piece of site geometry was rejected.
///
/// Transform operations log these and fall back to an empty result; parsers
/// return them to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    MalformedGeometry { reason: String },
    OutOfDomainProjection { lon_deg: f64, lat_deg: f64 },
}

impl GeometryError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        GeometryError::MalformedGeometry {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::MalformedGeometry { reason } => {
                write!(f, "malformed geometry: {reason}")
            }
            GeometryError::OutOfDomainProjection { lon_deg, lat_deg } => {
                write!(f, "({lon_deg}, {lat_deg}) is outside the projection domain")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
