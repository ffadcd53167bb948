//! sd-results: lazy access to a simulation's time-stepped output.
//!
//! Steps (dense solver iterations) and snapshots (sparse numbers of the
//! steps that wrote fields) are resolved on demand and cached for the
//! lifetime of a [`SimulationDataset`]. Nothing is pre-scanned: the first
//! touch of a step, snapshot, field or geometry does the I/O, every later
//! touch is a cache hit.
//!
//! File decoding is delegated to an [`OutputParser`] implementation.

pub mod catalog;
pub mod dataset;
pub mod fields;
pub mod geometry;
pub mod index;
pub mod parser;
pub mod registry;
pub mod series;
pub mod step;
pub mod types;

pub use catalog::{FieldCatalogEntry, ProfileVariable, RecordKind};
pub use dataset::{SimulationDataset, output_path};
pub use fields::FieldCache;
pub use geometry::{Axis, Frame, Geometry};
pub use index::SparseIndex;
pub use parser::OutputParser;
pub use registry::{SnapshotRegistry, Snaps, StepIter, StepRange, StepRegistry, Steps};
pub use series::{RadialProfile, RadialProfiles, Series, TimeInfo, TimeSeries};
pub use step::Step;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error(transparent)]
    Core(#[from] sd_core::CoreError),

    #[error("Configuration error: {0}")]
    Project(#[from] sd_project::ProjectError),

    #[error("Unknown field variable: '{name}'")]
    UnknownFieldKind { name: String },

    #[error("Unknown radial profile variable: '{name}'")]
    UnknownProfileVariable { name: String },

    #[error("Inconsistent lengths in {what} (expected {expected}, found {found})")]
    InconsistentSeriesLength {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sd_project::ValidationError> for ResultsError {
    fn from(err: sd_project::ValidationError) -> Self {
        ResultsError::Project(err.into())
    }
}
