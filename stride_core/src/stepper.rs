//! The step/attempt state machine.
//!
//! A caller pulls a [`Step`] with [`Stepper::next_step`], evaluates its own
//! computation over `[begin, end)`, and reports back through
//! [`Step::succeeded`]. The stepper records the attempt, advances on
//! success, and asks its [`Strategy`] what to try next.

use crate::bounds;
use crate::error::Result;
use crate::history::{Attempt, History};
use crate::strategy::{StepContext, Strategy};

/// Verdict of one reported attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted; the stepper advanced to the step's end.
    Success,
    /// Rejected; the next step retries from the same position.
    Failure,
}

impl Outcome {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Result of pulling from a stepper.
#[derive(Debug)]
pub enum StepStatus<'a, S: Strategy> {
    /// Evaluate this step and report on it.
    Next(Step<'a, S>),
    /// Objective reached; every later pull returns this again.
    Complete,
}

/// One proposed interval `[begin, end)`.
///
/// Holds the stepper mutably until the outcome is reported, so pulls and
/// reports strictly alternate.
pub struct Step<'a, S: Strategy> {
    begin: f64,
    end: f64,
    want: f64,
    stepper: &'a mut Stepper<S>,
}

impl<S: Strategy> core::fmt::Debug for Step<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Step")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("want", &self.want)
            .finish()
    }
}

impl<S: Strategy> Step<'_, S> {
    pub fn begin(&self) -> f64 {
        self.begin
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn size(&self) -> f64 {
        self.end - self.begin
    }

    /// The size the strategy asked for before any bound was applied.
    pub fn want(&self) -> f64 {
        self.want
    }

    /// Report how the attempt went and get the verdict.
    ///
    /// `value` and `error` are optional; which ones a stepper uses depends on
    /// its strategy.
    pub fn succeeded(self, value: Option<f64>, error: Option<f64>) -> Outcome {
        self.stepper.report(self.begin, self.end, value, error)
    }
}

/// Adaptive stepper over `[start, stop]` driven by strategy `S`.
#[derive(Debug)]
pub struct Stepper<S: Strategy> {
    pub(crate) strategy: S,
    pub(crate) start: f64,
    pub(crate) stop: f64,
    pub(crate) min_step: f64,
    pub(crate) current: f64,
    // inclusive bootstrap still pending
    pub(crate) inclusive: bool,
    pub(crate) record: bool,
    pub(crate) limiting: bool,
    pub(crate) needs: usize,
    pub(crate) history: History,
    pub(crate) save_step: Option<f64>,
    pub(crate) done: bool,
}

impl<S: Strategy> Stepper<S> {
    /// Pull the next step, or learn that the objective has been reached.
    ///
    /// Fails with [`StepError::Underflow`](crate::error::StepError::Underflow) when the next step can no longer
    /// move the current position, and with strategy errors such as
    /// [`StepError::SequenceExhausted`](crate::error::StepError::SequenceExhausted).
    pub fn next_step(&mut self) -> Result<StepStatus<'_, S>> {
        let ctx = StepContext {
            start: self.start,
            stop: self.stop,
            current: self.current,
            min_step: self.min_step,
            bootstrapping: self.inclusive,
            history: &self.history,
        };
        if self.done || self.strategy.is_complete(&ctx) {
            self.done = true;
            return Ok(StepStatus::Complete);
        }

        let carried = self.save_step.is_some();
        let requested = match self.save_step {
            Some(saved) => saved,
            None => {
                if self.history.last_success() {
                    self.strategy.after_success(&ctx)?
                } else {
                    self.strategy.after_failure(&ctx)?
                }
            }
        };

        let want = requested;
        let size = bounds::lower_bound(self.current, requested, self.min_step)
            .map_err(eyre::Report::new)?;
        let (size, saved) = self.strategy.upper_bound(self.current, self.stop, size);
        self.save_step = saved;

        // pin ends that must be hit exactly rather than trusting `current + size`
        let (begin, end) = if self.inclusive {
            (self.current - size, self.current)
        } else if saved.is_some() || size == self.stop - self.current {
            (self.current, self.stop)
        } else {
            match self.strategy.target() {
                Some(target) if !carried && size == requested => (self.current, target),
                _ => (self.current, self.current + size),
            }
        };

        if !self.record {
            self.history.purge(self.needs);
        }

        tracing::trace!(begin, end, want, "step");
        Ok(StepStatus::Next(Step {
            begin,
            end,
            want,
            stepper: self,
        }))
    }

    fn report(&mut self, begin: f64, end: f64, value: Option<f64>, error: Option<f64>) -> Outcome {
        let mut success = self.strategy.is_success(error, self.limiting);
        if self.inclusive {
            success = true;
            self.inclusive = false;
        }

        self.history.push(Attempt {
            position: end,
            size: end - begin,
            success,
            value,
            error: bounds::floor_error(error.unwrap_or(0.0)),
        });

        if success {
            self.current = end;
        } else {
            self.save_step = None;
        }
        tracing::trace!(begin, end, ?value, ?error, success, "reported");

        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    /// Whether completion has been observed. Sticky once true.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Last confirmed position.
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    pub fn is_limiting(&self) -> bool {
        self.limiting
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    pub fn needs(&self) -> usize {
        self.needs
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Ends of every retained attempt.
    pub fn positions(&self) -> &[f64] {
        self.history.positions()
    }

    pub fn sizes(&self) -> &[f64] {
        self.history.sizes()
    }

    pub fn successes(&self) -> &[bool] {
        self.history.successes()
    }

    pub fn values(&self) -> &[Option<f64>] {
        self.history.values()
    }

    pub fn errors(&self) -> &[f64] {
        self.history.errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Fixed;

    fn fixed(start: f64, stop: f64, size: f64) -> Stepper<Fixed> {
        Stepper::builder(Fixed)
            .with_range(start, stop)
            .with_size(size)
            .with_record(true)
            .build()
            .unwrap()
    }

    #[test]
    fn walks_range_and_stops_exactly() {
        let mut s = fixed(0.0, 10.0, 3.0);
        let mut ends = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            ends.push(step.end());
            assert!(step.succeeded(None, None).is_success());
        }
        assert_eq!(ends, vec![3.0, 6.0, 9.0, 10.0]);
        assert_eq!(s.current(), 10.0);
        assert!(s.is_done());
    }

    #[test]
    fn clamped_step_remembers_what_was_wanted() {
        let mut s = fixed(0.0, 10.0, 4.0);
        for _ in 0..2 {
            if let StepStatus::Next(step) = s.next_step().unwrap() {
                step.succeeded(None, None);
            }
        }
        match s.next_step().unwrap() {
            StepStatus::Next(step) => {
                assert_eq!(step.size(), 2.0);
                assert_eq!(step.want(), 4.0);
            }
            StepStatus::Complete => panic!("expected a clamped step"),
        }
        assert_eq!(s.save_step, Some(4.0));
    }

    #[test]
    fn inclusive_bootstrap_lands_on_start() {
        let mut s = Stepper::builder(Fixed)
            .with_range(5.0, 10.0)
            .with_size(1.0)
            .with_inclusive(true)
            .build()
            .unwrap();
        match s.next_step().unwrap() {
            StepStatus::Next(step) => {
                assert_eq!(step.end(), 5.0);
                assert_eq!(step.begin(), 4.0);
                assert!(step.succeeded(None, Some(1e9)).is_success());
            }
            StepStatus::Complete => panic!("expected bootstrap step"),
        }
        assert_eq!(s.current(), 5.0);
    }

    #[test]
    fn dropped_bootstrap_is_pulled_again_unchanged() {
        let mut s = Stepper::builder(Fixed)
            .with_range(5.0, 10.0)
            .with_size(1.0)
            .with_inclusive(true)
            .build()
            .unwrap();
        for _ in 0..2 {
            match s.next_step().unwrap() {
                StepStatus::Next(step) => assert_eq!((step.begin(), step.end()), (4.0, 5.0)),
                StepStatus::Complete => panic!("expected bootstrap step"),
            }
            assert_eq!(s.current(), 5.0);
        }
        assert!(s.positions().is_empty());
    }

    #[test]
    fn pulling_never_moves_current() {
        let mut s = fixed(0.0, 10.0, 3.0);
        if let StepStatus::Next(step) = s.next_step().unwrap() {
            step.succeeded(None, None);
        }
        let StepStatus::Next(step) = s.next_step().unwrap() else {
            panic!("expected a step");
        };
        assert_eq!(step.begin(), 3.0);
        drop(step);
        assert_eq!(s.current(), 3.0);
    }

    #[test]
    fn errors_are_floored_above_zero() {
        let mut s = fixed(0.0, 1.0, 1.0);
        if let StepStatus::Next(step) = s.next_step().unwrap() {
            step.succeeded(Some(0.0), Some(0.0));
        }
        assert_eq!(s.errors(), &[f64::EPSILON]);
        assert_eq!(s.values(), &[Some(0.0)]);
    }

    #[test]
    fn completion_is_sticky() {
        let mut s = fixed(0.0, 1.0, 1.0);
        if let StepStatus::Next(step) = s.next_step().unwrap() {
            step.succeeded(None, None);
        }
        for _ in 0..3 {
            assert!(matches!(s.next_step().unwrap(), StepStatus::Complete));
        }
    }
}
