//! Run configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const LATEST_VERSION: u32 = 1;

pub const DEFAULT_MAX_SNAPSHOT_PROBE: u64 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Run name, prefix of every output file.
    pub name: String,
    /// Directory holding the solver output.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Record kind tags to probe, highest priority first.
    #[serde(default = "default_scan")]
    pub scan: Vec<String>,
    /// Highest snapshot number tried by a forward snapshot search.
    #[serde(default = "default_max_snapshot_probe")]
    pub max_snapshot_probe: u64,
    #[serde(default)]
    pub par: Parameters,
}

impl RunConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            path: path.into(),
            suffix: String::new(),
            scan: default_scan(),
            max_snapshot_probe: DEFAULT_MAX_SNAPSHOT_PROBE,
            par: Parameters::default(),
        }
    }
}

/// Solver parameters relevant to reading its output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Parameters {
    #[serde(default)]
    pub geometry: GeometryPar,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometryPar {
    /// Declared domain shape, matched case-insensitively.
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Inner boundary radius; negative or missing means no inner boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_cmb: Option<f64>,
}

impl Default for GeometryPar {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            r_cmb: None,
        }
    }
}

impl GeometryPar {
    pub fn domain_shape(&self) -> Result<DomainShape, UnknownShape> {
        self.shape.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainShape {
    Cartesian,
    Cylindrical,
    Spherical,
    Axisymmetric,
}

impl DomainShape {
    pub fn as_str(self) -> &'static str {
        match self {
            DomainShape::Cartesian => "cartesian",
            DomainShape::Cylindrical => "cylindrical",
            DomainShape::Spherical => "spherical",
            DomainShape::Axisymmetric => "axisymmetric",
        }
    }
}

impl fmt::Display for DomainShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown domain shape: '{0}'")]
pub struct UnknownShape(pub String);

impl FromStr for DomainShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" => Ok(DomainShape::Cartesian),
            "cylindrical" => Ok(DomainShape::Cylindrical),
            "spherical" => Ok(DomainShape::Spherical),
            "axisymmetric" => Ok(DomainShape::Axisymmetric),
            _ => Err(UnknownShape(s.to_string())),
        }
    }
}

fn default_version() -> u32 {
    LATEST_VERSION
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_scan() -> Vec<String> {
    ["t", "vp", "c", "eta", "rho", "str", "sx", "age"]
        .iter()
        .map(|tag| tag.to_string())
        .collect()
}

fn default_max_snapshot_probe() -> u64 {
    DEFAULT_MAX_SNAPSHOT_PROBE
}

fn default_shape() -> String {
    DomainShape::Cartesian.as_str().to_string()
}
