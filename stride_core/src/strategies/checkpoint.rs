use std::iter::Peekable;

use crate::error::{BuildError, Result, StepError};
use crate::strategy::{StepContext, Strategy};

type Stops = Peekable<Box<dyn Iterator<Item = f64> + Send>>;

/// Lands exactly on each of a sequence of absolute positions.
///
/// The stops may be lazy and unbounded. The run is complete once `stop` is
/// reached or the last stop has been landed on.
pub struct Checkpoints {
    stops: Stops,
    // stop the last requested size aims for
    target: Option<f64>,
}

impl core::fmt::Debug for Checkpoints {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Checkpoints").finish_non_exhaustive()
    }
}

impl Checkpoints {
    /// Fails with [`BuildError::InvalidConfig`] if `stops` yields nothing.
    pub fn new<I>(stops: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Send + 'static,
    {
        let boxed: Box<dyn Iterator<Item = f64> + Send> = Box::new(stops.into_iter());
        let mut stops = boxed.peekable();
        if stops.peek().is_none() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "checkpoint sequence is empty",
            )));
        }
        Ok(Self {
            stops,
            target: None,
        })
    }
}

impl Strategy for Checkpoints {
    fn suggested_size(&mut self, start: f64) -> Option<f64> {
        self.stops.peek().map(|s| s - start)
    }

    fn fixed_limiting(&self) -> Option<bool> {
        Some(false)
    }

    fn is_success(&self, _error: Option<f64>, _limiting: bool) -> bool {
        true
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        // the bootstrap step lands on `start` itself
        if ctx.bootstrapping {
            self.target = None;
            return Ok(0.0);
        }
        let next = self
            .stops
            .next()
            .ok_or_else(|| eyre::Report::new(StepError::SequenceExhausted("checkpoints")))?;
        self.target = Some(next);
        Ok(next - ctx.current)
    }

    fn target(&self) -> Option<f64> {
        self.target
    }

    fn is_complete(&mut self, ctx: &StepContext<'_>) -> bool {
        // a stop we are already standing on has been landed
        if !ctx.bootstrapping {
            while self.stops.next_if_eq(&ctx.current).is_some() {}
        }
        ctx.current == ctx.stop || (ctx.history.last_success() && self.stops.peek().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepper::{StepStatus, Stepper};

    #[test]
    fn empty_stops_are_rejected() {
        let err = Checkpoints::new(Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::InvalidConfig("checkpoint sequence is empty"))
        );
    }

    #[test]
    fn lands_on_every_stop_then_completes() {
        let mut s = Stepper::builder(Checkpoints::new(vec![1.0, 2.5, 7.0]).unwrap())
            .with_range(0.0, f64::INFINITY)
            .build()
            .unwrap();
        let mut ends = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            ends.push(step.end());
            step.succeeded(None, Some(50.0));
        }
        assert_eq!(ends, vec![1.0, 2.5, 7.0]);
        assert_eq!(s.current(), 7.0);
    }

    #[test]
    fn stops_at_the_current_position_are_skipped() {
        let mut s = Stepper::builder(Checkpoints::new(vec![0.0, 1.0, 1.0, 2.0]).unwrap())
            .with_range(0.0, f64::INFINITY)
            .build()
            .unwrap();
        let mut ends = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            ends.push(step.end());
            step.succeeded(None, None);
        }
        assert_eq!(ends, vec![1.0, 2.0]);
    }

    #[test]
    fn inclusive_run_evaluates_a_stop_at_start_once() {
        let mut s = Stepper::builder(Checkpoints::new(vec![0.0, 3.0]).unwrap())
            .with_range(0.0, 10.0)
            .with_inclusive(true)
            .build()
            .unwrap();
        let mut ends = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            ends.push(step.end());
            step.succeeded(None, None);
        }
        assert_eq!(ends, vec![0.0, 3.0]);
    }

    #[test]
    fn stop_cuts_an_infinite_sequence() {
        let stops = (1..).map(|i| i as f64 * 10.0);
        let mut s = Stepper::builder(Checkpoints::new(stops).unwrap())
            .with_range(0.0, 25.0)
            .build()
            .unwrap();
        let mut ends = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            ends.push(step.end());
            step.succeeded(None, None);
        }
        assert_eq!(ends, vec![10.0, 20.0, 25.0]);
    }
}
