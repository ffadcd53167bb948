//! sd-core: stable foundation for stagdata.
//!
//! Contains:
//! - numeric (Real + finiteness check)
//! - ids (step and snapshot numbering)
//! - lazy (three-valued resolution state for lazily computed attributes)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod lazy;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use lazy::Resolution;
pub use numeric::*;
