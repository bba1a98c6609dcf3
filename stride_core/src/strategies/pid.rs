use crate::error::{BuildError, Result};
use crate::strategy::{StepContext, Strategy};

/// PID step controller after Valli, Carey and Coutinho (2005).
///
/// On success the next size is
/// `(e₂/e₁)^kP · (1/e₁)^kI · (e₂²/(e₁·e₃))^kD` times the previous
/// controlled step, where `e₁` is the latest error. On failure it retries
/// with `min(1/e₁, 0.8)` times the failed size.
#[derive(Debug, Clone, Copy)]
pub struct Pid {
    proportional: f64,
    integral: f64,
    derivative: f64,
    // None until the stepper's floor is known
    prev_step: Option<f64>,
}

impl Default for Pid {
    fn default() -> Self {
        Self {
            proportional: 0.075,
            integral: 0.175,
            derivative: 0.01,
            prev_step: None,
        }
    }
}

impl Pid {
    pub fn new(proportional: f64, integral: f64, derivative: f64) -> Result<Self> {
        if ![proportional, integral, derivative]
            .iter()
            .all(|k| k.is_finite())
        {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "PID coefficients must be finite",
            )));
        }
        Ok(Self {
            proportional,
            integral,
            derivative,
            prev_step: None,
        })
    }

    /// `(kP, kI, kD)`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.proportional, self.integral, self.derivative)
    }

    fn prev_or(&self, fallback: f64) -> f64 {
        match self.prev_step {
            Some(p) if p != 0.0 => p,
            _ => fallback,
        }
    }
}

impl Strategy for Pid {
    fn needs(&self) -> usize {
        3
    }

    fn default_limiting(&self) -> bool {
        true
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let h = ctx.history;
        let (e1, e2, e3) = (h.error_back(1), h.error_back(2), h.error_back(3));
        let factor = (e2 / e1).powf(self.proportional)
            * (1.0 / e1).powf(self.integral)
            * (e2 * e2 / (e1 * e3)).powf(self.derivative);
        let mut base = self.prev_or(ctx.min_step);
        if base == 0.0 {
            base = h.last_size();
        }
        let step = factor * base;
        self.prev_step = Some(step);
        Ok(step)
    }

    fn after_failure(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let h = ctx.history;
        let last = h.last_size();
        self.prev_step = Some(last * last / self.prev_or(ctx.min_step));
        Ok((1.0 / h.last_error()).min(0.8) * last)
    }
}
