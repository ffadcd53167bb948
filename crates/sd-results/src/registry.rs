//! Step and snapshot registries.
//!
//! Both are append-only caches owned by a dataset. [`Steps`] and [`Snaps`]
//! are the borrowed views callers index through.

use std::cell::RefCell;
use std::collections::HashMap;
use std::iter::StepBy;
use std::ops::Range;
use std::rc::Rc;

use sd_core::{ISnap, IStep, NumberRange, Resolution, parse_step_number, step_number};

use crate::ResultsResult;
use crate::dataset::SimulationDataset;
use crate::index::SparseIndex;
use crate::step::{Step, StepState};

/// Every step touched so far, created on first request and never evicted.
#[derive(Debug, Default)]
pub struct StepRegistry {
    steps: RefCell<HashMap<IStep, Rc<StepState>>>,
}

impl StepRegistry {
    /// Cached state of `istep`, created if absent.
    pub(crate) fn get_or_create(&self, istep: IStep) -> Rc<StepState> {
        self.steps
            .borrow_mut()
            .entry(istep)
            .or_insert_with(|| Rc::new(StepState::new(istep)))
            .clone()
    }

    pub fn contains(&self, istep: IStep) -> bool {
        self.steps.borrow().contains_key(&istep)
    }

    pub fn len(&self) -> usize {
        self.steps.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.borrow().is_empty()
    }
}

/// Known snapshot numbers, including those known to have no output.
#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    index: RefCell<SparseIndex>,
}

impl SnapshotRegistry {
    pub fn lookup(&self, isnap: ISnap) -> Resolution<IStep> {
        self.index.borrow().lookup(isnap)
    }

    pub(crate) fn record(&self, isnap: ISnap, istep: Option<IStep>) -> bool {
        self.index.borrow_mut().insert(isnap, istep)
    }

    pub fn len(&self) -> usize {
        self.index.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.borrow().is_empty()
    }

    /// Snapshot → step pairs discovered so far, in snapshot order.
    pub fn known(&self) -> Vec<(ISnap, Option<IStep>)> {
        self.index.borrow().iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Step,
    Snapshot,
}

impl Numbering {
    fn fetch<'d>(self, sdat: &'d SimulationDataset, number: u64) -> Step<'d> {
        match self {
            Numbering::Step => sdat.step_at(number),
            Numbering::Snapshot => sdat.snap_at(number),
        }
    }
}

/// `dataset.steps()`: access by time step number.
#[derive(Clone, Copy)]
pub struct Steps<'d> {
    sdat: &'d SimulationDataset,
}

impl<'d> Steps<'d> {
    pub(crate) fn new(sdat: &'d SimulationDataset) -> Self {
        Self { sdat }
    }

    /// Step `istep`; fails with `InvalidStepNumber` when negative.
    pub fn get(&self, istep: i64) -> ResultsResult<Step<'d>> {
        Ok(self.sdat.step_at(step_number(istep)?))
    }

    /// Step named by `text`, e.g. a user-supplied `"1200"`.
    pub fn parse(&self, text: &str) -> ResultsResult<Step<'d>> {
        Ok(self.sdat.step_at(parse_step_number(text)?))
    }

    /// Steps `start, start + stride, ...` below `stop`.
    pub fn range(&self, start: u64, stop: u64, stride: u64) -> ResultsResult<StepRange<'d>> {
        Ok(StepRange {
            sdat: self.sdat,
            numbers: NumberRange::new(start, stop, stride)?,
            numbering: Numbering::Step,
        })
    }

    pub fn len(&self) -> usize {
        self.sdat.step_registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sdat.step_registry().is_empty()
    }
}

/// `dataset.snaps()`: access by snapshot number.
#[derive(Clone, Copy)]
pub struct Snaps<'d> {
    sdat: &'d SimulationDataset,
}

impl<'d> Snaps<'d> {
    pub(crate) fn new(sdat: &'d SimulationDataset) -> Self {
        Self { sdat }
    }

    /// Step stored in snapshot `isnap`, or a placeholder step when that
    /// snapshot has no output.
    pub fn get(&self, isnap: i64) -> ResultsResult<Step<'d>> {
        Ok(self.sdat.snap_at(step_number(isnap)?))
    }

    pub fn parse(&self, text: &str) -> ResultsResult<Step<'d>> {
        Ok(self.sdat.snap_at(parse_step_number(text)?))
    }

    pub fn range(&self, start: u64, stop: u64, stride: u64) -> ResultsResult<StepRange<'d>> {
        Ok(StepRange {
            sdat: self.sdat,
            numbers: NumberRange::new(start, stop, stride)?,
            numbering: Numbering::Snapshot,
        })
    }

    pub fn len(&self) -> usize {
        self.sdat.snapshot_registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sdat.snapshot_registry().is_empty()
    }
}

/// Lazy, restartable range of steps. Nothing is resolved until iterated.
#[derive(Clone, Copy)]
pub struct StepRange<'d> {
    sdat: &'d SimulationDataset,
    numbers: NumberRange,
    numbering: Numbering,
}

impl<'d> StepRange<'d> {
    pub fn iter(&self) -> StepIter<'d> {
        StepIter {
            sdat: self.sdat,
            numbers: self.numbers.iter(),
            numbering: self.numbering,
        }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl<'d> IntoIterator for StepRange<'d> {
    type Item = Step<'d>;
    type IntoIter = StepIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'d> IntoIterator for &StepRange<'d> {
    type Item = Step<'d>;
    type IntoIter = StepIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone)]
pub struct StepIter<'d> {
    sdat: &'d SimulationDataset,
    numbers: StepBy<Range<u64>>,
    numbering: Numbering,
}

impl<'d> Iterator for StepIter<'d> {
    type Item = Step<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let number = self.numbers.next()?;
        Some(self.numbering.fetch(self.sdat, number))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.numbers.size_hint()
    }
}
