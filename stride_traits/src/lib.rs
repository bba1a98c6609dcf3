//! Seam between a stepper and the computation it paces.
//!
//! The stepper never evaluates anything itself. Whatever the caller runs over
//! a proposed interval (a PDE sweep, a sampled function, ...) implements
//! [`Solver`] and hands back an [`Evaluation`] describing how it went.

/// Outcome of evaluating one proposed interval.
///
/// Both fields are optional; which ones matter depends on the strategy.
/// Error-driven strategies read `error` (normalized so that 1 is the
/// acceptance threshold), curvature-driven ones read `value`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evaluation {
    pub value: Option<f64>,
    pub error: Option<f64>,
}

impl Evaluation {
    pub fn new(value: Option<f64>, error: Option<f64>) -> Self {
        Self { value, error }
    }

    /// Evaluation carrying only a value.
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }
}

pub trait Solver {
    /// Evaluate the interval `[begin, end)` without committing to it.
    fn solve(
        &mut self,
        begin: f64,
        end: f64,
    ) -> Result<Evaluation, Box<dyn std::error::Error + Send + Sync>>;

    /// Called after the stepper accepted the last evaluation.
    fn commit(&mut self, _begin: f64, _end: f64) {}
}

impl<T: Solver + ?Sized> Solver for Box<T> {
    fn solve(
        &mut self,
        begin: f64,
        end: f64,
    ) -> Result<Evaluation, Box<dyn std::error::Error + Send + Sync>> {
        (**self).solve(begin, end)
    }

    fn commit(&mut self, begin: f64, end: f64) {
        (**self).commit(begin, end);
    }
}
