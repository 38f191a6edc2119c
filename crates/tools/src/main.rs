use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use foundation::math::GeoPoint;
use serde_json::json;
use siting::metrics::ring_labels;
use siting::ring::bounds;
use siting::solver::{ComputeRequest, SolverInput, inputs_from_json, site_polyline_field};
use siting::{
    AnchoredPath, Feature, Role, SitingConfig, anchor_path_from_geographic_ring,
    feature_from_anchored_path, projected_units_per_meter,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "siting", about = "Site geometry conversions for the design solver")]
struct Cli {
    /// JSON config file (defaults to $SITING_CONFIG, then built-in defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Anchor a drawn GeoJSON ring on its first vertex.
    Anchor {
        input: PathBuf,
        /// Pick the feature with this role.
        #[arg(long)]
        role: Option<String>,
    },
    /// Closed GeoJSON feature for an anchored path.
    Ring {
        input: PathBuf,
        #[arg(long, default_value = "site")]
        role: String,
    },
    /// Solver polyline field (local meters) for an anchored path.
    Local { input: PathBuf },
    /// Edge and area labels for every feature of a GeoJSON file.
    Measure { input: PathBuf },
    /// Projection units per ground meter at an anchor.
    Scale {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },
    /// Build a solver request from a definition, inputs and optional site.
    Request {
        #[arg(long)]
        definition: Option<PathBuf>,
        #[arg(long)]
        inputs: PathBuf,
        #[arg(long)]
        site: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = SitingConfig::resolve(cli.config.as_deref()).map_err(|e| e.to_string())?;

    match cli.command {
        Command::Anchor { input, role } => cmd_anchor(&input, role.as_deref()),
        Command::Ring { input, role } => cmd_ring(&input, &role),
        Command::Local { input } => cmd_local(&input, &config),
        Command::Measure { input } => cmd_measure(&input, &config),
        Command::Scale { lon, lat } => {
            let anchor = GeoPoint::new(lon, lat);
            println!("{}", projected_units_per_meter(anchor));
            Ok(())
        }
        Command::Request {
            definition,
            inputs,
            site,
        } => cmd_request(definition.as_deref(), &inputs, site.as_deref(), &config),
    }
}

fn read_features(path: &Path) -> Result<Vec<Feature>, String> {
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    Feature::from_geojson_str(&payload).map_err(|e| format!("parse {path:?}: {e}"))
}

fn read_anchored(path: &Path) -> Result<AnchoredPath, String> {
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    serde_json::from_str(&payload).map_err(|e| format!("parse {path:?}: {e}"))
}

fn pick_feature(features: Vec<Feature>, role: Option<&str>) -> Result<Feature, String> {
    let wanted = role.map(Role::from);
    features
        .into_iter()
        .find(|f| wanted.as_ref().is_none_or(|r| &f.role == r))
        .ok_or_else(|| match role {
            Some(r) => format!("no feature with role {r:?}"),
            None => "no features in input".to_string(),
        })
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn cmd_anchor(input: &Path, role: Option<&str>) -> Result<(), String> {
    let feature = pick_feature(read_features(input)?, role)?;
    let path = anchor_path_from_geographic_ring(&feature.ring)
        .ok_or_else(|| format!("{input:?}: ring cannot be anchored"))?;
    info!(role = feature.role.as_str(), points = path.len(), "anchored ring");
    print_json(&path)
}

fn cmd_ring(input: &Path, role: &str) -> Result<(), String> {
    let path = read_anchored(input)?;
    let feature = feature_from_anchored_path(Role::from(role), &path)
        .ok_or_else(|| format!("{input:?}: path has no points"))?;
    print_json(&feature.to_geojson_value())
}

fn cmd_local(input: &Path, config: &SitingConfig) -> Result<(), String> {
    let path = read_anchored(input)?;
    println!("{}", site_polyline_field(&path, config.solver.decimals));
    Ok(())
}

fn cmd_measure(input: &Path, config: &SitingConfig) -> Result<(), String> {
    let features = read_features(input)?;
    let report: Vec<serde_json::Value> = features
        .iter()
        .map(|f| {
            let labels = ring_labels(&f.ring, &config.labels);
            let center = bounds(&f.ring).map(|b| b.center());
            json!({
                "role": f.role.as_str(),
                "edges": labels.edges,
                "area": labels.area,
                "center": center,
            })
        })
        .collect();
    print_json(&report)
}

fn cmd_request(
    definition: Option<&Path>,
    inputs: &Path,
    site: Option<&Path>,
    config: &SitingConfig,
) -> Result<(), String> {
    let definition = definition
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.solver.definition));
    let definition_bytes =
        fs::read(&definition).map_err(|e| format!("read {definition:?}: {e}"))?;

    let inputs_payload = fs::read_to_string(inputs).map_err(|e| format!("read {inputs:?}: {e}"))?;
    let inputs_value: serde_json::Value =
        serde_json::from_str(&inputs_payload).map_err(|e| format!("parse {inputs:?}: {e}"))?;
    let inputs_obj = inputs_value
        .as_object()
        .ok_or_else(|| format!("{inputs:?}: inputs must be a JSON object"))?;

    let mut request = ComputeRequest::new(&definition_bytes, inputs_from_json(inputs_obj));

    if let Some(site) = site {
        let feature = pick_feature(read_features(site)?, Some(Role::Site.as_str()))?;
        let path = anchor_path_from_geographic_ring(&feature.ring)
            .ok_or_else(|| format!("{site:?}: ring cannot be anchored"))?;
        let field = site_polyline_field(&path, config.solver.decimals);
        request.set_input(&config.solver.site_param, &SolverInput::Text(field));
    }

    info!(params = request.values.len(), "built solver request");
    print_json(&request)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, pick_feature};
    use clap::Parser;
    use foundation::math::GeoPoint;
    use siting::{Feature, Role};

    fn feature(role: Role) -> Feature {
        Feature::new(
            role,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(1.0, 0.0),
                GeoPoint::new(1.0, 1.0),
            ],
        )
    }

    #[test]
    fn picks_first_feature_without_role() {
        let picked = pick_feature(vec![feature(Role::Block), feature(Role::Site)], None)
            .expect("feature");
        assert_eq!(picked.role, Role::Block);
    }

    #[test]
    fn picks_feature_by_role() {
        let picked = pick_feature(
            vec![feature(Role::Block), feature(Role::Envelope)],
            Some("envelope"),
        )
        .expect("feature");
        assert_eq!(picked.role, Role::Envelope);
        assert!(pick_feature(vec![feature(Role::Block)], Some("site")).is_err());
        assert!(pick_feature(Vec::new(), None).is_err());
    }

    #[test]
    fn scale_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["siting", "scale", "--lon", "-73.98", "--lat", "-33.87"])
            .expect("parse");
        match cli.command {
            Command::Scale { lon, lat } => {
                assert_eq!(lon, -73.98);
                assert_eq!(lat, -33.87);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
