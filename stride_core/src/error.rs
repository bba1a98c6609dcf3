use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    #[error("step size underflow: {current} + {step} == {current}")]
    Underflow { current: f64, step: f64 },
    #[error("{0} exhausted before the stepper finished")]
    SequenceExhausted(&'static str),
    #[error("strategy needs a value for every attempt")]
    MissingValue,
    #[error("curvature scoring needs at least 3 samples, have {0}")]
    TooFewSamples(usize),
    #[error("solver error: {0}")]
    Solver(String),
    #[error("max attempts ({0}) exceeded")]
    MaxAttempts(u64),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("missing range")]
    MissingRange,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("unknown curvature scale {0:?} (expected \"dl\" or \"dy\")")]
    UnknownScale(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
