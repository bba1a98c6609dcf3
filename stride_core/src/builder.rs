//! Type-state builder for `Stepper`.
//!
//! The builder enforces at compile time that the range is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use crate::bounds;
use crate::error::{BuildError, Result};
use crate::history::History;
use crate::stepper::Stepper;
use crate::strategy::Strategy;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Stepper`. All fields are validated on `build()`.
pub struct StepperBuilder<S: Strategy, R> {
    strategy: S,
    range: Option<(f64, f64)>,
    size: Option<f64>,
    min_step: Option<f64>,
    inclusive: Option<bool>,
    record: bool,
    limiting: Option<bool>,
    _r: PhantomData<R>,
}

impl<S: Strategy> Stepper<S> {
    /// Start building a stepper around `strategy`.
    pub fn builder(strategy: S) -> StepperBuilder<S, Missing> {
        StepperBuilder {
            strategy,
            range: None,
            size: None,
            min_step: None,
            inclusive: None,
            record: false,
            limiting: None,
            _r: PhantomData,
        }
    }
}

/// Validate configuration and construct a `Stepper` with seeded history.
///
/// This is the single source of truth for validation and construction.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<S: Strategy>(
    mut strategy: S,
    start: f64,
    stop: f64,
    size: Option<f64>,
    min_step: Option<f64>,
    inclusive: Option<bool>,
    record: bool,
    limiting: Option<bool>,
) -> Result<Stepper<S>> {
    // ── Validation ───────────────────────────────────────────────────────────
    if !start.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "start must be finite",
        )));
    }
    if stop.is_nan() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "stop must not be NaN",
        )));
    }
    if size.is_some_and(|s| !(s.is_finite() && s != 0.0)) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "size must be finite and non-zero",
        )));
    }
    if min_step.is_some_and(|m| !(m.is_finite() && m >= 0.0)) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "min_step must be finite and >= 0",
        )));
    }

    // ── Precompute ───────────────────────────────────────────────────────────
    let needs = strategy.needs().max(1);
    let size = size
        .or_else(|| strategy.suggested_size(start))
        .filter(|s| *s != 0.0)
        .unwrap_or(stop - start);
    let min_step = min_step.unwrap_or_else(|| bounds::default_min_step(start, stop));
    let record = record || strategy.requires_full_history();
    let inclusive = inclusive.unwrap_or_else(|| strategy.default_inclusive());
    let limiting = match (strategy.fixed_limiting(), limiting) {
        (Some(fixed), Some(asked)) if fixed != asked => {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "limiting flag contradicts the strategy",
            )));
        }
        (Some(fixed), _) => fixed,
        (None, asked) => asked.unwrap_or_else(|| strategy.default_limiting()),
    };

    tracing::debug!(
        start,
        stop,
        size,
        min_step,
        inclusive,
        record,
        limiting,
        needs,
        "stepper built"
    );

    Ok(Stepper {
        strategy,
        start,
        stop,
        min_step,
        current: start,
        inclusive,
        record,
        limiting,
        needs,
        history: History::seeded(start, size, needs),
        save_step: None,
        done: false,
    })
}

impl<S: Strategy, R> StepperBuilder<S, R> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Stepper<S>> {
        let (start, stop) = self
            .range
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRange))?;
        validate_and_build(
            self.strategy,
            start,
            stop,
            self.size,
            self.min_step,
            self.inclusive,
            self.record,
            self.limiting,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<S: Strategy, R> StepperBuilder<S, R> {
    /// Initial step guess (defaults to the whole range).
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }
    /// Floor on step magnitude (defaults to `(stop - start) * eps`).
    pub fn with_min_step(mut self, min_step: f64) -> Self {
        self.min_step = Some(min_step);
        self
    }
    pub fn with_inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = Some(inclusive);
        self
    }
    pub fn with_record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }
    pub fn with_limiting(mut self, limiting: bool) -> Self {
        self.limiting = Some(limiting);
        self
    }
}

// Setters that advance type-state
impl<S: Strategy> StepperBuilder<S, Missing> {
    pub fn with_range(self, start: f64, stop: f64) -> StepperBuilder<S, Set> {
        StepperBuilder {
            strategy: self.strategy,
            range: Some((start, stop)),
            size: self.size,
            min_step: self.min_step,
            inclusive: self.inclusive,
            record: self.record,
            limiting: self.limiting,
            _r: PhantomData,
        }
    }
}

impl<S: Strategy> StepperBuilder<S, Set> {
    /// Validate and build the stepper. Only available once the range is set.
    pub fn build(self) -> Result<Stepper<S>> {
        self.try_build()
    }
}
