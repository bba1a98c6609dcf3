//! The pluggable decision points of a stepper.
//!
//! A [`Stepper`](crate::Stepper) owns the history, the bounds and the
//! pull/report protocol. Everything that differs between adaptation schemes
//! lives behind [`Strategy`]: the next size after a success or a failure,
//! what counts as a success, when the run is complete, and how a step is
//! limited by the end of the range.

use crate::bounds;
use crate::error::Result;
use crate::history::History;

/// Read-only view of the stepper handed to strategy hooks.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub start: f64,
    pub stop: f64,
    /// Last confirmed position.
    pub current: f64,
    pub min_step: f64,
    /// The inclusive bootstrap step (ending exactly at `start`) is still pending.
    pub bootstrapping: bool,
    pub history: &'a History,
}

pub trait Strategy: core::fmt::Debug {
    /// Trailing history entries the formulas look back on.
    fn needs(&self) -> usize {
        1
    }

    /// Whether `error > 1` fails an attempt unless the caller says otherwise.
    fn default_limiting(&self) -> bool {
        false
    }

    /// Limiting flag the success predicate hard-wires, if any.
    ///
    /// Builders reject a caller-supplied flag that contradicts it.
    fn fixed_limiting(&self) -> Option<bool> {
        None
    }

    /// Whether the first step lands on `start` unless the caller says otherwise.
    fn default_inclusive(&self) -> bool {
        false
    }

    /// Strategies that revisit their whole sample set opt out of purging.
    fn requires_full_history(&self) -> bool {
        false
    }

    /// Initial size used to seed the synthetic history when none is configured.
    fn suggested_size(&mut self, _start: f64) -> Option<f64> {
        None
    }

    /// Next size to try after a successful attempt.
    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        Ok(ctx.history.last_size())
    }

    /// Next size to try after a failed attempt.
    fn after_failure(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        Ok(ctx.history.last_size())
    }

    /// Verdict for a reported error. A missing error counts as 0.
    fn is_success(&self, error: Option<f64>, limiting: bool) -> bool {
        !limiting || error.unwrap_or(0.0) <= 1.0
    }

    fn is_complete(&mut self, ctx: &StepContext<'_>) -> bool {
        ctx.current == ctx.stop
    }

    /// Absolute position the last requested size was computed to reach.
    ///
    /// When the request passes through the bounds unchanged the step ends
    /// exactly here instead of at `current + size`.
    fn target(&self) -> Option<f64> {
        None
    }

    /// Limit `size` by the end of range; returns the step and any saved request.
    fn upper_bound(&self, current: f64, stop: f64, size: f64) -> (f64, Option<f64>) {
        bounds::clamp_to_stop(current, stop, size)
    }
}

impl<T: Strategy + ?Sized> Strategy for Box<T> {
    fn needs(&self) -> usize {
        (**self).needs()
    }
    fn default_limiting(&self) -> bool {
        (**self).default_limiting()
    }
    fn fixed_limiting(&self) -> Option<bool> {
        (**self).fixed_limiting()
    }
    fn default_inclusive(&self) -> bool {
        (**self).default_inclusive()
    }
    fn requires_full_history(&self) -> bool {
        (**self).requires_full_history()
    }
    fn suggested_size(&mut self, start: f64) -> Option<f64> {
        (**self).suggested_size(start)
    }
    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        (**self).after_success(ctx)
    }
    fn after_failure(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        (**self).after_failure(ctx)
    }
    fn is_success(&self, error: Option<f64>, limiting: bool) -> bool {
        (**self).is_success(error, limiting)
    }
    fn is_complete(&mut self, ctx: &StepContext<'_>) -> bool {
        (**self).is_complete(ctx)
    }
    fn target(&self) -> Option<f64> {
        (**self).target()
    }
    fn upper_bound(&self, current: f64, stop: f64, size: f64) -> (f64, Option<f64>) {
        (**self).upper_bound(current, stop, size)
    }
}
