use std::iter::Peekable;

use crate::error::{BuildError, Result, StepError};
use crate::strategy::{StepContext, Strategy};

type Sizes = Peekable<Box<dyn Iterator<Item = f64> + Send>>;

/// Takes successive sizes from a caller-supplied sequence.
pub struct Sequence {
    sizes: Sizes,
}

impl core::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl Sequence {
    /// Fails with [`BuildError::InvalidConfig`] if `sizes` yields nothing.
    pub fn new<I>(sizes: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Send + 'static,
    {
        let boxed: Box<dyn Iterator<Item = f64> + Send> = Box::new(sizes.into_iter());
        let mut sizes = boxed.peekable();
        if sizes.peek().is_none() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "size sequence is empty",
            )));
        }
        Ok(Self { sizes })
    }
}

impl Strategy for Sequence {
    fn suggested_size(&mut self, _start: f64) -> Option<f64> {
        self.sizes.peek().copied()
    }

    fn fixed_limiting(&self) -> Option<bool> {
        Some(false)
    }

    fn is_success(&self, _error: Option<f64>, _limiting: bool) -> bool {
        true
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let next = if ctx.bootstrapping {
            self.sizes.peek().copied()
        } else {
            self.sizes.next()
        };
        next.ok_or_else(|| eyre::Report::new(StepError::SequenceExhausted("size sequence")))
    }

    fn is_complete(&mut self, ctx: &StepContext<'_>) -> bool {
        ctx.current == ctx.stop || (ctx.history.last_success() && self.sizes.peek().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepper::{StepStatus, Stepper};

    #[test]
    fn takes_sizes_in_order() {
        let mut s = Stepper::builder(Sequence::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap())
            .with_range(0.0, 8.0)
            .build()
            .unwrap();
        let mut sizes = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            sizes.push(step.size());
            step.succeeded(None, None);
        }
        // last size clamped to the range end
        assert_eq!(sizes, vec![1.0, 2.0, 3.0, 2.0]);
    }

    #[test]
    fn inclusive_bootstrap_does_not_consume() {
        let mut s = Stepper::builder(Sequence::new(vec![2.0, 5.0]).unwrap())
            .with_range(0.0, 100.0)
            .with_inclusive(true)
            .build()
            .unwrap();
        let mut steps = Vec::new();
        while let StepStatus::Next(step) = s.next_step().unwrap() {
            steps.push((step.begin(), step.end()));
            step.succeeded(None, None);
        }
        assert_eq!(steps, vec![(-2.0, 0.0), (0.0, 2.0), (2.0, 7.0)]);
        assert_eq!(s.current(), 7.0);
    }

    #[test]
    fn empty_sizes_are_rejected() {
        assert!(Sequence::new(std::iter::empty()).is_err());
    }
}
