//! Parsing service seam.
//!
//! Decoding the solver's files is not this crate's job; a dataset is
//! handed an [`OutputParser`] and only ever asks it for structured data.
//! Every method returns `Ok(None)` when the file does not exist: sparse
//! output directories are the normal case, not a failure.

use std::path::Path;

use sd_core::IStep;

use crate::ResultsResult;
use crate::types::{FieldHeader, ProfileRecord, RawField, TimeSeriesRow};

pub trait OutputParser {
    /// Header of a field record, without decoding its payload.
    fn parse_header(&self, path: &Path) -> ResultsResult<Option<FieldHeader>>;

    /// Time step recorded in a field file header.
    ///
    /// Defaults to a header parse; implementations that can read the step
    /// number alone should override it.
    fn parse_step_number(&self, path: &Path) -> ResultsResult<Option<IStep>> {
        Ok(self.parse_header(path)?.and_then(|header| header.istep))
    }

    /// Header and every raw array bundled in a field record, in record order.
    fn parse_full(&self, path: &Path) -> ResultsResult<Option<(FieldHeader, Vec<RawField>)>>;

    fn parse_time_series(&self, path: &Path) -> ResultsResult<Option<Vec<TimeSeriesRow>>>;

    fn parse_radial_profiles(&self, path: &Path) -> ResultsResult<Option<Vec<ProfileRecord>>>;
}
