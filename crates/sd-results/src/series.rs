//! Whole-run series: time series of global scalars and radial profiles.

use std::rc::Rc;

use ndarray::{Array1, Array2, ArrayView1};
use sd_core::{IStep, Real};

use crate::catalog::lookup_profile_variable;
use crate::types::{ProfileRecord, TimeSeriesRow};
use crate::{ResultsError, ResultsResult};

/// Immutable table of per-row data with parallel `times` and `isteps`.
#[derive(Debug, Clone)]
pub struct Series<T> {
    data: Vec<T>,
    times: Vec<Real>,
    isteps: Vec<IStep>,
}

impl<T> Series<T> {
    pub fn new(data: Vec<T>, times: Vec<Real>, isteps: Vec<IStep>) -> ResultsResult<Self> {
        check_len("series times", data.len(), times.len())?;
        check_len("series isteps", data.len(), isteps.len())?;
        Ok(Self {
            data,
            times,
            isteps,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&T> {
        self.data.get(row)
    }

    /// Simulation time of each row.
    pub fn times(&self) -> &[Real] {
        &self.times
    }

    /// Time step of each row.
    pub fn isteps(&self) -> &[IStep] {
        &self.isteps
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> ResultsResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ResultsError::InconsistentSeriesLength {
            what,
            expected,
            found,
        })
    }
}

/// Global scalars per time step, one row per line of the time file.
pub type TimeSeries = Series<Array1<Real>>;

/// Horizontally averaged profiles, one table per output step.
pub type RadialProfiles = Series<Array2<Real>>;

impl Series<Array1<Real>> {
    /// Build from parsed rows; every row must carry the same number of scalars.
    pub fn from_rows(rows: Vec<TimeSeriesRow>) -> ResultsResult<Self> {
        let width = rows.first().map(|row| row.scalars.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len());
        let mut times = Vec::with_capacity(rows.len());
        let mut isteps = Vec::with_capacity(rows.len());
        for row in rows {
            check_len("time series row", width, row.scalars.len())?;
            isteps.push(row.istep);
            times.push(row.time);
            data.push(Array1::from(row.scalars));
        }
        Series::new(data, times, isteps)
    }
}

impl Series<Array2<Real>> {
    /// Build from parsed profile blocks; every table must have the same
    /// number of columns.
    pub fn from_records(records: Vec<ProfileRecord>) -> ResultsResult<Self> {
        let ncols = records.first().map(|rec| rec.table.ncols()).unwrap_or(0);
        let mut data = Vec::with_capacity(records.len());
        let mut times = Vec::with_capacity(records.len());
        let mut isteps = Vec::with_capacity(records.len());
        for record in records {
            check_len("radial profile columns", ncols, record.table.ncols())?;
            isteps.push(record.istep);
            times.push(record.time);
            data.push(record.table);
        }
        Series::new(data, times, isteps)
    }
}

/// Time series row of one step.
#[derive(Debug, Clone)]
pub struct TimeInfo {
    series: Rc<TimeSeries>,
    row: usize,
}

impl TimeInfo {
    pub(crate) fn new(series: Rc<TimeSeries>, row: usize) -> Option<Self> {
        (row < series.len()).then_some(Self { series, row })
    }

    pub fn itsnap(&self) -> usize {
        self.row
    }

    pub fn istep(&self) -> IStep {
        self.series.isteps[self.row]
    }

    pub fn time(&self) -> Real {
        self.series.times[self.row]
    }

    pub fn values(&self) -> &Array1<Real> {
        &self.series.data[self.row]
    }
}

/// Radial profile table of one step.
#[derive(Debug, Clone)]
pub struct RadialProfile {
    series: Rc<RadialProfiles>,
    row: usize,
}

impl RadialProfile {
    pub(crate) fn new(series: Rc<RadialProfiles>, row: usize) -> Option<Self> {
        (row < series.len()).then_some(Self { series, row })
    }

    pub fn irsnap(&self) -> usize {
        self.row
    }

    pub fn istep(&self) -> IStep {
        self.series.isteps[self.row]
    }

    pub fn time(&self) -> Real {
        self.series.times[self.row]
    }

    /// Full table, rows are depth levels.
    pub fn table(&self) -> &Array2<Real> {
        &self.series.data[self.row]
    }

    /// Column of a cataloged profile variable; `None` when this table is
    /// too narrow to hold it.
    pub fn column(&self, name: &str) -> ResultsResult<Option<ArrayView1<'_, Real>>> {
        let var = lookup_profile_variable(name).ok_or_else(|| {
            ResultsError::UnknownProfileVariable {
                name: name.to_string(),
            }
        })?;
        let table = self.table();
        Ok((var.column < table.ncols()).then(|| table.column(var.column)))
    }
}
