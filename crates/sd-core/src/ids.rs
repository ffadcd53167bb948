use crate::{CoreError, CoreResult};
use std::iter::StepBy;
use std::ops::Range;

/// Logical time step counter of the solver (dense-ish).
pub type IStep = u64;

/// Snapshot counter, assigned only to steps whose fields were written.
pub type ISnap = u64;

/// Validate a signed step or snapshot number coming from a caller.
pub fn step_number(value: i64) -> CoreResult<IStep> {
    u64::try_from(value).map_err(|_| CoreError::InvalidStepNumber {
        value: value.to_string(),
    })
}

/// Parse a textual step number, rejecting signs, fractions and garbage.
pub fn parse_step_number(text: &str) -> CoreResult<IStep> {
    let trimmed = text.trim();
    let parsed: i64 = trimmed.parse().map_err(|_| CoreError::InvalidStepNumber {
        value: trimmed.to_string(),
    })?;
    step_number(parsed)
}

/// Half-open `[start, stop)` range of numbers walked with a fixed stride.
///
/// Cheap to copy; every call to [`NumberRange::iter`] restarts from `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberRange {
    start: u64,
    stop: u64,
    stride: u64,
}

impl NumberRange {
    pub fn new(start: u64, stop: u64, stride: u64) -> CoreResult<Self> {
        if stride == 0 {
            return Err(CoreError::InvalidStride);
        }
        Ok(Self {
            start,
            stop,
            stride,
        })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn len(&self) -> usize {
        if self.stop <= self.start {
            return 0;
        }
        (self.stop - self.start).div_ceil(self.stride) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> StepBy<Range<u64>> {
        (self.start..self.stop).step_by(self.stride as usize)
    }
}
