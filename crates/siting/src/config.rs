use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SITING_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub edge_decimals: u32,
    pub area_decimals: u32,
    /// Areas strictly above this are labelled in hectares.
    pub hectare_threshold_m2: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            edge_decimals: 2,
            area_decimals: 2,
            hectare_threshold_m2: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Grasshopper definition sent with each request.
    pub definition: String,
    /// Input parameter receiving the site polyline field.
    pub site_param: String,
    /// Decimals per coordinate in polyline fields.
    pub decimals: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            definition: "form_io_main_002.gh".to_string(),
            site_param: "site_polyline".to_string(),
            decimals: 3,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitingConfig {
    pub labels: LabelConfig,
    pub solver: SolverConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, err: std::io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, err } => write!(f, "read {}: {err}", path.display()),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SitingConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        Self::from_json_str(&payload)
    }

    /// Load `explicit`, else the file named by [`CONFIG_ENV`], else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SitingConfig};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = SitingConfig::from_json_str("{}").expect("parse");
        assert_eq!(cfg, SitingConfig::default());
        assert_eq!(cfg.labels.hectare_threshold_m2, 10_000.0);
        assert_eq!(cfg.solver.decimals, 3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let payload = r#"{"labels":{"edge_decimals":1},"solver":{"site_param":"boundary"}}"#;
        let cfg = SitingConfig::from_json_str(payload).expect("parse");
        assert_eq!(cfg.labels.edge_decimals, 1);
        assert_eq!(cfg.labels.area_decimals, 2);
        assert_eq!(cfg.solver.site_param, "boundary");
        assert_eq!(cfg.solver.definition, "form_io_main_002.gh");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = SitingConfig::from_json_str("{labels").expect_err("parse error");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file_and_explicit_resolve() {
        let mut path = std::env::temp_dir();
        path.push(format!("siting_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"labels":{"area_decimals":0}}"#).expect("write config");

        let cfg = SitingConfig::resolve(Some(path.as_path())).expect("load");
        assert_eq!(cfg.labels.area_decimals, 0);
        let _ = fs::remove_file(&path);

        let err = SitingConfig::load(&path).expect_err("missing file");
        assert!(err.to_string().starts_with("read "));
    }
}
