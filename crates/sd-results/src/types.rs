//! Data types exchanged with the output parser.

use ndarray::{Array2, Array4};
use sd_core::{IStep, Real};
use serde::{Deserialize, Serialize};

/// Dense field values indexed by `(x, y, z, block)`.
pub type RawField = Array4<Real>;

/// A named physical field as cached for a step.
pub type Field = RawField;

/// Header of a binary field record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHeader {
    /// Cells per spatial axis.
    pub nts: [usize; 3],
    /// Number of blocks (2 for yin-yang grids).
    #[serde(default = "default_blocks")]
    pub ntb: usize,
    /// Domain aspect ratio along the two horizontal axes.
    #[serde(default)]
    pub aspect: [Real; 2],
    /// Inner boundary radius; negative for Cartesian domains, missing in
    /// old record versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rcmb: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub istep: Option<IStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Real>,
    #[serde(default)]
    pub e1_coord: Vec<Real>,
    #[serde(default)]
    pub e2_coord: Vec<Real>,
    #[serde(default)]
    pub e3_coord: Vec<Real>,
}

fn default_blocks() -> usize {
    1
}

/// One line of the time series file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub istep: IStep,
    pub time: Real,
    #[serde(default)]
    pub scalars: Vec<Real>,
}

/// One radial profile block: a table of `(depth level, variable)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub istep: IStep,
    pub time: Real,
    pub table: Array2<Real>,
}
