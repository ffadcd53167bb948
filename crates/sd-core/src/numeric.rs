use crate::CoreError;

/// Floating point type used for coordinates, fields and series.
pub type Real = f64;

/// `v` itself, or `NonFinite` naming `what` for NaN and infinities.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}
