use crate::error::{BuildError, Result};
use crate::strategy::{StepContext, Strategy};

/// Grows the last size by a constant factor on success, shrinks it on failure.
#[derive(Debug, Clone, Copy)]
pub struct Scaled {
    grow_factor: f64,
    shrink_factor: f64,
}

impl Default for Scaled {
    fn default() -> Self {
        Self {
            grow_factor: 1.2,
            shrink_factor: 0.5,
        }
    }
}

impl Scaled {
    pub fn new(grow_factor: f64, shrink_factor: f64) -> Result<Self> {
        if !(grow_factor.is_finite() && grow_factor > 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "grow_factor must be > 1",
            )));
        }
        if !(shrink_factor > 0.0 && shrink_factor < 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "shrink_factor must be in (0, 1)",
            )));
        }
        Ok(Self {
            grow_factor,
            shrink_factor,
        })
    }

    pub fn grow_factor(&self) -> f64 {
        self.grow_factor
    }

    pub fn shrink_factor(&self) -> f64 {
        self.shrink_factor
    }
}

impl Strategy for Scaled {
    fn fixed_limiting(&self) -> Option<bool> {
        Some(true)
    }

    fn is_success(&self, error: Option<f64>, _limiting: bool) -> bool {
        error.unwrap_or(0.0) <= 1.0
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        Ok(ctx.history.last_size() * self.grow_factor)
    }

    fn after_failure(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        Ok(ctx.history.last_size() * self.shrink_factor)
    }
}
