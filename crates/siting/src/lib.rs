//! Site geometry for the parametric design front end: reconciles map
//! coordinates, Web Mercator units and the solver's local meter frame.

pub mod config;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod path;
pub mod project;
pub mod ring;
pub mod site;
pub mod solver;
pub mod transform;

pub use config::*;
pub use error::*;
pub use frame::*;
pub use path::*;
pub use project::*;
pub use ring::{Feature, Role};
pub use site::*;
pub use transform::*;
