//! Three-valued state of a lazily computed attribute.
//!
//! `Unresolved` is the only state from which work is attempted. `Absent`
//! ("computed, nothing there") and `Resolved` are terminal: once left,
//! `Unresolved` is never re-entered and the settled value never changes.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution<T> {
    #[default]
    Unresolved,
    Absent,
    Resolved(T),
}

impl<T> Resolution<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Resolution::Resolved(v),
            None => Resolution::Absent,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Unresolved)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Resolution::Absent)
    }

    pub fn as_ref(&self) -> Resolution<&T> {
        match self {
            Resolution::Unresolved => Resolution::Unresolved,
            Resolution::Absent => Resolution::Absent,
            Resolution::Resolved(v) => Resolution::Resolved(v),
        }
    }

    /// Settled value; `None` both for absent and for not yet resolved.
    pub fn value(self) -> Option<T> {
        match self {
            Resolution::Resolved(v) => Some(v),
            _ => None,
        }
    }

    /// Leave `Unresolved` for `value`. Returns `false` (and keeps the
    /// current state) when already settled: first writer wins.
    pub fn settle(&mut self, value: Option<T>) -> bool {
        if !self.is_unresolved() {
            return false;
        }
        *self = Resolution::from_option(value);
        true
    }
}
