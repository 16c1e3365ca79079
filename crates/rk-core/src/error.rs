use thiserror::Error;

pub type RkResult<T> = Result<T, RkError>;

#[derive(Error, Debug)]
pub enum RkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
