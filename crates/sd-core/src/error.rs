use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Time step should be a non-negative integer, got {value}")]
    InvalidStepNumber { value: String },

    #[error("Range stride must be non-zero")]
    InvalidStride,

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
