#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ndarray::{Array2, Array4};
use sd_core::{ISnap, IStep};
use sd_project::RunConfig;
use sd_results::*;

/// Parser calls made by a dataset, shared with the test after the mock is
/// moved into it.
#[derive(Debug, Default)]
pub struct Calls {
    pub header: Cell<usize>,
    pub step_number: Cell<usize>,
    pub full: Cell<usize>,
    pub time_series: Cell<usize>,
    pub profiles: Cell<usize>,
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

/// In-memory output directory.
#[derive(Debug)]
pub struct MockOutput {
    pub config: RunConfig,
    pub header: FieldHeader,
    records: HashMap<PathBuf, (FieldHeader, Vec<RawField>)>,
    broken: HashSet<PathBuf>,
    time_series: Option<Vec<TimeSeriesRow>>,
    profiles: Option<Vec<ProfileRecord>>,
    calls: Rc<Calls>,
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Cartesian 2-D header: 4 x 1 x 2 cells.
pub fn cartesian_header() -> FieldHeader {
    FieldHeader {
        nts: [4, 1, 2],
        ntb: 1,
        aspect: [1.0, 1.0],
        rcmb: Some(-1.0),
        istep: None,
        time: None,
        e1_coord: vec![0.125, 0.375, 0.625, 0.875],
        e2_coord: vec![0.0],
        e3_coord: vec![0.25, 0.75],
    }
}

impl MockOutput {
    pub fn new() -> Self {
        init_logging();
        let mut config = RunConfig::new("test", "/runs/mock");
        config.max_snapshot_probe = 16;
        Self {
            config,
            header: cartesian_header(),
            records: HashMap::new(),
            broken: HashSet::new(),
            time_series: None,
            profiles: None,
            calls: Rc::new(Calls::default()),
        }
    }

    /// Write records of `kinds` for snapshot `isnap`, holding step `istep`.
    ///
    /// Array `k` of a record is filled with `isnap * 10 + k`.
    pub fn snapshot(mut self, isnap: ISnap, istep: IStep, kinds: &[RecordKind]) -> Self {
        let mut header = self.header.clone();
        header.istep = Some(istep);
        header.time = Some(istep as f64 * 0.01);
        let shape = (header.nts[0], header.nts[1], header.nts[2], header.ntb);
        for &kind in kinds {
            let arrays = (0..kind.field_names().len())
                .map(|k| Array4::from_elem(shape, (isnap * 10) as f64 + k as f64))
                .collect();
            let path = output_path(&self.config, kind.tag(), Some(isnap), &self.config.suffix);
            self.records.insert(path, (header.clone(), arrays));
        }
        self
    }

    /// Keep only the first `arrays` arrays of the record of `kind` at `isnap`.
    pub fn short_record(mut self, kind: RecordKind, isnap: ISnap, arrays: usize) -> Self {
        let path = output_path(&self.config, kind.tag(), Some(isnap), &self.config.suffix);
        if let Some((_, stored)) = self.records.get_mut(&path) {
            stored.truncate(arrays);
        }
        self
    }

    /// Make the record of `kind` at `isnap` fail to parse.
    pub fn broken(mut self, kind: RecordKind, isnap: ISnap) -> Self {
        let path = output_path(&self.config, kind.tag(), Some(isnap), &self.config.suffix);
        self.broken.insert(path);
        self
    }

    /// Time series with one row per step, `scalars` columns wide.
    pub fn time_series(mut self, isteps: &[IStep], scalars: usize) -> Self {
        let rows = isteps
            .iter()
            .map(|&istep| TimeSeriesRow {
                istep,
                time: istep as f64 * 0.01,
                scalars: vec![istep as f64; scalars],
            })
            .collect();
        self.time_series = Some(rows);
        self
    }

    pub fn time_rows(mut self, rows: Vec<TimeSeriesRow>) -> Self {
        self.time_series = Some(rows);
        self
    }

    /// Profiles of `levels` depth levels with columns `r, t, tmin`.
    pub fn profiles(mut self, isteps: &[IStep], levels: usize) -> Self {
        let records = isteps
            .iter()
            .map(|&istep| ProfileRecord {
                istep,
                time: istep as f64 * 0.01,
                table: Array2::from_shape_fn((levels, 3), |(level, col)| {
                    level as f64 + col as f64 * 100.0
                }),
            })
            .collect();
        self.profiles = Some(records);
        self
    }

    pub fn calls(&self) -> Rc<Calls> {
        self.calls.clone()
    }

    pub fn into_dataset(self) -> (SimulationDataset, Rc<Calls>) {
        let calls = self.calls();
        let config = self.config.clone();
        let sdat = SimulationDataset::new(config, self).unwrap();
        (sdat, calls)
    }

    fn check(&self, path: &Path) -> ResultsResult<()> {
        if self.broken.contains(path) {
            return Err(ResultsError::Parse {
                path: path.to_path_buf(),
                message: "truncated record".to_string(),
            });
        }
        Ok(())
    }
}

impl OutputParser for MockOutput {
    fn parse_header(&self, path: &Path) -> ResultsResult<Option<FieldHeader>> {
        bump(&self.calls.header);
        self.check(path)?;
        Ok(self.records.get(path).map(|(header, _)| header.clone()))
    }

    fn parse_step_number(&self, path: &Path) -> ResultsResult<Option<IStep>> {
        bump(&self.calls.step_number);
        self.check(path)?;
        Ok(self.records.get(path).and_then(|(header, _)| header.istep))
    }

    fn parse_full(&self, path: &Path) -> ResultsResult<Option<(FieldHeader, Vec<RawField>)>> {
        bump(&self.calls.full);
        self.check(path)?;
        Ok(self.records.get(path).cloned())
    }

    fn parse_time_series(&self, _path: &Path) -> ResultsResult<Option<Vec<TimeSeriesRow>>> {
        bump(&self.calls.time_series);
        Ok(self.time_series.clone())
    }

    fn parse_radial_profiles(&self, _path: &Path) -> ResultsResult<Option<Vec<ProfileRecord>>> {
        bump(&self.calls.profiles);
        Ok(self.profiles.clone())
    }
}
