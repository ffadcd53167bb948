//! Dataset facade over a run's output directory.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use sd_core::{ISnap, IStep, Resolution};
use sd_project::{DomainShape, RunConfig, validate_config};
use tracing::{debug, info, warn};

use crate::ResultsResult;
use crate::catalog::RecordKind;
use crate::parser::OutputParser;
use crate::registry::{SnapshotRegistry, Snaps, StepRegistry, Steps};
use crate::series::{RadialProfiles, TimeSeries};
use crate::step::Step;

const TIME_SERIES_FILE: &str = "time.dat";
const RADIAL_PROFILES_FILE: &str = "rprof.dat";

/// `{path}/{name}_{fname}[{number:05}]{suffix}`
pub fn output_path(config: &RunConfig, fname: &str, number: Option<u64>, suffix: &str) -> PathBuf {
    let file = match number {
        Some(number) => format!("{}_{fname}{number:05}{suffix}", config.name),
        None => format!("{}_{fname}{suffix}", config.name),
    };
    config.path.join(file)
}

/// Lazy view of one simulation run.
///
/// Owns every cache of the run: steps, the snapshot index and both
/// whole-run series. Nothing is read until asked for. Single-threaded by
/// construction (`!Sync`); open one dataset per thread if needed.
pub struct SimulationDataset {
    config: RunConfig,
    shape: DomainShape,
    parser: Box<dyn OutputParser>,
    scan: Vec<RecordKind>,
    steps: StepRegistry,
    snaps: SnapshotRegistry,
    tseries: RefCell<Resolution<Rc<TimeSeries>>>,
    rprof: RefCell<Resolution<Rc<RadialProfiles>>>,
}

impl SimulationDataset {
    pub fn new(config: RunConfig, parser: impl OutputParser + 'static) -> ResultsResult<Self> {
        validate_config(&config)?;
        // validated above
        let shape = config
            .par
            .geometry
            .domain_shape()
            .unwrap_or(DomainShape::Cartesian);
        let scan = relevant_kinds(&config.scan);
        if scan.is_empty() {
            warn!(scan = ?config.scan, "no known record kind to scan, snapshots will all be missing");
        }
        Ok(Self {
            config,
            shape,
            parser: Box::new(parser),
            scan,
            steps: StepRegistry::default(),
            snaps: SnapshotRegistry::default(),
            tseries: RefCell::new(Resolution::Unresolved),
            rprof: RefCell::new(Resolution::Unresolved),
        })
    }

    /// Dataset described by a YAML run configuration.
    pub fn open(config_path: &Path, parser: impl OutputParser + 'static) -> ResultsResult<Self> {
        let config = sd_project::load_yaml(config_path)?;
        Self::new(config, parser)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn domain_shape(&self) -> DomainShape {
        self.shape
    }

    /// Record kinds probed for headers and step numbers, in priority order:
    /// the configured tags the field catalog knows about.
    pub fn scan(&self) -> &[RecordKind] {
        &self.scan
    }

    pub fn parser(&self) -> &dyn OutputParser {
        self.parser.as_ref()
    }

    pub fn steps(&self) -> Steps<'_> {
        Steps::new(self)
    }

    pub fn snaps(&self) -> Snaps<'_> {
        Snaps::new(self)
    }

    pub fn step_registry(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn snapshot_registry(&self) -> &SnapshotRegistry {
        &self.snaps
    }

    pub fn filename(&self, fname: &str, number: Option<u64>, suffix: &str) -> PathBuf {
        output_path(&self.config, fname, number, suffix)
    }

    pub fn record_path(&self, kind: RecordKind, number: u64) -> PathBuf {
        self.filename(kind.tag(), Some(number), &self.config.suffix)
    }

    pub(crate) fn step_at(&self, istep: IStep) -> Step<'_> {
        Step::live(self, self.steps.get_or_create(istep))
    }

    pub(crate) fn snap_at(&self, isnap: ISnap) -> Step<'_> {
        match self.resolve_snapshot(isnap) {
            Some(istep) => self.step_at(istep),
            None => Step::missing(self),
        }
    }

    /// Step number stored in snapshot `isnap`.
    ///
    /// Only an unindexed snapshot costs I/O: step numbers are read from the
    /// scanned record kinds in turn, and the outcome, found or not, goes
    /// into the index.
    pub(crate) fn resolve_snapshot(&self, isnap: ISnap) -> Option<IStep> {
        match self.snaps.lookup(isnap) {
            Resolution::Resolved(istep) => return Some(istep),
            Resolution::Absent => return None,
            Resolution::Unresolved => {}
        }

        for &kind in &self.scan {
            let path = self.record_path(kind, isnap);
            match self.parser.parse_step_number(&path) {
                Ok(Some(istep)) => {
                    debug!(isnap, istep, path = %path.display(), "snapshot resolved");
                    self.bind(isnap, istep);
                    return Some(istep);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(isnap, path = %path.display(), error = %err, "unreadable snapshot header");
                }
            }
        }

        debug!(isnap, "snapshot missing");
        self.snaps.record(isnap, None);
        None
    }

    fn bind(&self, isnap: ISnap, istep: IStep) {
        self.snaps.record(isnap, Some(istep));
        self.steps.get_or_create(istep).bind_snapshot(isnap);
    }

    /// Walk snapshots from 0 until one lands at or past `istep`.
    ///
    /// Every snapshot visited is indexed, so later searches for nearby
    /// steps mostly hit the cache.
    pub(crate) fn search_snapshot_of(&self, istep: IStep) {
        let ceiling = self.config.max_snapshot_probe;
        debug!(istep, ceiling, "forward snapshot search");
        for isnap in 0..ceiling {
            if let Some(found) = self.resolve_snapshot(isnap)
                && found >= istep
            {
                return;
            }
        }
        debug!(istep, ceiling, "snapshot search exhausted");
    }

    /// Time series of the run, parsed on first call.
    ///
    /// The row index of every listed step is recorded on that step. A
    /// missing time file yields `None`, and is not looked for again.
    pub fn tseries(&self) -> ResultsResult<Option<Rc<TimeSeries>>> {
        let current = self.tseries.borrow().clone();
        if !current.is_unresolved() {
            return Ok(current.value());
        }

        let path = self.filename(TIME_SERIES_FILE, None, "");
        let series = match self.parser.parse_time_series(&path)? {
            Some(rows) => {
                let series = Rc::new(TimeSeries::from_rows(rows)?);
                for (row, &istep) in series.isteps().iter().enumerate() {
                    self.steps.get_or_create(istep).bind_time_row(Some(row));
                }
                info!(rows = series.len(), path = %path.display(), "time series loaded");
                Some(series)
            }
            None => {
                debug!(path = %path.display(), "no time series file");
                None
            }
        };
        self.tseries.borrow_mut().settle(series.clone());
        Ok(series)
    }

    /// Radial profiles of the run, parsed on first call.
    pub fn rprof(&self) -> ResultsResult<Option<Rc<RadialProfiles>>> {
        let current = self.rprof.borrow().clone();
        if !current.is_unresolved() {
            return Ok(current.value());
        }

        let path = self.filename(RADIAL_PROFILES_FILE, None, "");
        let profiles = match self.parser.parse_radial_profiles(&path)? {
            Some(records) => {
                let profiles = Rc::new(RadialProfiles::from_records(records)?);
                for (row, &istep) in profiles.isteps().iter().enumerate() {
                    self.steps.get_or_create(istep).bind_profile_row(Some(row));
                }
                info!(profiles = profiles.len(), path = %path.display(), "radial profiles loaded");
                Some(profiles)
            }
            None => {
                debug!(path = %path.display(), "no radial profiles file");
                None
            }
        };
        self.rprof.borrow_mut().settle(profiles.clone());
        Ok(profiles)
    }
}

fn relevant_kinds(tags: &[String]) -> Vec<RecordKind> {
    let mut kinds = Vec::new();
    for tag in tags {
        match RecordKind::from_tag(tag) {
            Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Some(_) => {}
            None => debug!(tag = %tag, "scan tag is not a field record kind, ignored"),
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_and_plain_file_names() {
        let mut config = RunConfig::new("test", "/data/run");
        assert_eq!(
            output_path(&config, "vp", Some(42), ""),
            PathBuf::from("/data/run/test_vp00042")
        );
        assert_eq!(
            output_path(&config, "time.dat", None, ""),
            PathBuf::from("/data/run/test_time.dat")
        );
        config.suffix = ".h5".to_string();
        assert_eq!(
            output_path(&config, "t", Some(123_456), &config.suffix),
            PathBuf::from("/data/run/test_t123456.h5")
        );
    }

    #[test]
    fn scan_keeps_known_kinds_in_order() {
        let tags: Vec<String> = ["vp", "time", "t", "vp", "cs"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            relevant_kinds(&tags),
            vec![RecordKind::VelocityPressure, RecordKind::Temperature]
        );
    }
}
