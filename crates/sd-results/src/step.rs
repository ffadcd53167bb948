//! Time step handles.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use sd_core::{ISnap, IStep, Resolution};

use crate::catalog::lookup_field;
use crate::dataset::SimulationDataset;
use crate::fields::FieldCache;
use crate::geometry::Geometry;
use crate::series::{RadialProfile, TimeInfo};
use crate::types::Field;
use crate::{ResultsError, ResultsResult};

/// Cached state of one time step, owned by the step registry.
///
/// Each index leaves `Unresolved` once and then never changes, except that
/// a snapshot found holding the step replaces an earlier failed search:
/// that search may have stopped at the probe ceiling below the snapshot.
#[derive(Debug)]
pub(crate) struct StepState {
    istep: IStep,
    isnap: Cell<Resolution<ISnap>>,
    itsnap: Cell<Resolution<usize>>,
    irsnap: Cell<Resolution<usize>>,
    fields: FieldCache,
}

impl StepState {
    pub(crate) fn new(istep: IStep) -> Self {
        Self {
            istep,
            isnap: Cell::new(Resolution::Unresolved),
            itsnap: Cell::new(Resolution::Unresolved),
            irsnap: Cell::new(Resolution::Unresolved),
            fields: FieldCache::default(),
        }
    }

    pub(crate) fn bind_snapshot(&self, isnap: ISnap) -> bool {
        if let Resolution::Resolved(_) = self.isnap.get() {
            return false;
        }
        self.isnap.set(Resolution::Resolved(isnap));
        true
    }

    pub(crate) fn snapshot_not_found(&self) -> bool {
        settle_cell(&self.isnap, None)
    }

    pub(crate) fn bind_time_row(&self, itsnap: Option<usize>) -> bool {
        settle_cell(&self.itsnap, itsnap)
    }

    pub(crate) fn bind_profile_row(&self, irsnap: Option<usize>) -> bool {
        settle_cell(&self.irsnap, irsnap)
    }
}

fn settle_cell<T: Copy>(cell: &Cell<Resolution<T>>, value: Option<T>) -> bool {
    let mut state = cell.get();
    let changed = state.settle(value);
    cell.set(state);
    changed
}

#[derive(Clone)]
enum Slot {
    Live(Rc<StepState>),
    /// Stand-in for a snapshot that does not exist.
    Missing,
}

/// A time step of a [`SimulationDataset`].
///
/// Cheap to clone; clones of the same `istep` share one cache. A step
/// obtained from a snapshot number that has no output is a placeholder:
/// every accessor on it returns "unavailable" (`None`), never an error.
#[derive(Clone)]
pub struct Step<'d> {
    sdat: &'d SimulationDataset,
    slot: Slot,
}

impl<'d> Step<'d> {
    pub(crate) fn live(sdat: &'d SimulationDataset, state: Rc<StepState>) -> Self {
        Self {
            sdat,
            slot: Slot::Live(state),
        }
    }

    pub(crate) fn missing(sdat: &'d SimulationDataset) -> Self {
        Self {
            sdat,
            slot: Slot::Missing,
        }
    }

    fn state(&self) -> Option<&Rc<StepState>> {
        match &self.slot {
            Slot::Live(state) => Some(state),
            Slot::Missing => None,
        }
    }

    pub fn istep(&self) -> Option<IStep> {
        self.state().map(|state| state.istep)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.slot, Slot::Missing)
    }

    /// Whether both handles share the same cached step.
    pub fn same_step(&self, other: &Step<'_>) -> bool {
        match (self.state(), other.state()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn fields(&self) -> Option<&FieldCache> {
        self.state().map(|state| &state.fields)
    }

    /// Snapshot holding this step's fields.
    ///
    /// Unless already bound by a snapshot lookup, this searches snapshots
    /// forward from 0 until one at or beyond this step turns up.
    pub fn isnap(&self) -> Option<ISnap> {
        let state = self.state()?;
        if state.isnap.get().is_unresolved() {
            self.sdat.search_snapshot_of(state.istep);
            state.snapshot_not_found();
        }
        state.isnap.get().value()
    }

    /// Row of this step in the time series.
    pub fn itsnap(&self) -> ResultsResult<Option<usize>> {
        let Some(state) = self.state() else {
            return Ok(None);
        };
        if state.itsnap.get().is_unresolved() {
            self.sdat.tseries()?;
            state.bind_time_row(None);
        }
        Ok(state.itsnap.get().value())
    }

    /// Row of this step in the radial profiles.
    pub fn irsnap(&self) -> ResultsResult<Option<usize>> {
        let Some(state) = self.state() else {
            return Ok(None);
        };
        if state.irsnap.get().is_unresolved() {
            self.sdat.rprof()?;
            state.bind_profile_row(None);
        }
        Ok(state.irsnap.get().value())
    }

    pub fn timeinfo(&self) -> ResultsResult<Option<TimeInfo>> {
        let Some(row) = self.itsnap()? else {
            return Ok(None);
        };
        Ok(self
            .sdat
            .tseries()?
            .and_then(|series| TimeInfo::new(series, row)))
    }

    pub fn rprof(&self) -> ResultsResult<Option<RadialProfile>> {
        let Some(row) = self.irsnap()? else {
            return Ok(None);
        };
        Ok(self
            .sdat
            .rprof()?
            .and_then(|series| RadialProfile::new(series, row)))
    }

    /// Named field of this step.
    ///
    /// Fails only for names missing from the field catalog; a field whose
    /// record was not written for this step is `None`.
    pub fn field(&self, name: &str) -> ResultsResult<Option<Rc<Field>>> {
        let Some(state) = self.state() else {
            return Ok(None);
        };
        let entry = lookup_field(name).ok_or_else(|| ResultsError::UnknownFieldKind {
            name: name.to_string(),
        })?;
        if let Some(field) = state.fields.cached(entry.name) {
            return Ok(Some(field));
        }
        let Some(isnap) = self.isnap() else {
            return Ok(None);
        };
        Ok(state.fields.load(self.sdat, entry, isnap))
    }

    pub fn geom(&self) -> Option<Rc<Geometry>> {
        let state = self.state()?;
        state.fields.geometry(self.sdat, self.isnap())
    }
}

impl fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            Some(state) => f
                .debug_struct("Step")
                .field("istep", &state.istep)
                .field("isnap", &state.isnap.get())
                .finish(),
            None => f.write_str("Step(missing)"),
        }
    }
}
