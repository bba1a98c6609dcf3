use crate::error::{BuildError, Result};
use crate::strategy::{StepContext, Strategy};

/// Step control modelled on the `rkqs` quality-controlled Runge-Kutta driver.
#[derive(Debug, Clone, Copy)]
pub struct PseudoRkqs {
    safety: f64,
    pgrow: f64,
    pshrink: f64,
    maxgrow: f64,
    minshrink: f64,
    // error below which growth saturates at `maxgrow`
    errcon: f64,
}

impl Default for PseudoRkqs {
    fn default() -> Self {
        Self::with_factors(0.9, -0.2, -0.25, 5.0, 0.1)
    }
}

impl PseudoRkqs {
    pub fn new(safety: f64, pgrow: f64, pshrink: f64, maxgrow: f64, minshrink: f64) -> Result<Self> {
        if !(safety > 0.0 && safety <= 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "safety must be in (0, 1]",
            )));
        }
        if !(pgrow < 0.0 && pgrow.is_finite()) || !(pshrink < 0.0 && pshrink.is_finite()) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "pgrow and pshrink must be negative",
            )));
        }
        if !(maxgrow > 1.0 && maxgrow.is_finite()) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "maxgrow must be > 1",
            )));
        }
        if !(minshrink > 0.0 && minshrink < 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "minshrink must be in (0, 1)",
            )));
        }
        Ok(Self::with_factors(safety, pgrow, pshrink, maxgrow, minshrink))
    }

    fn with_factors(safety: f64, pgrow: f64, pshrink: f64, maxgrow: f64, minshrink: f64) -> Self {
        Self {
            safety,
            pgrow,
            pshrink,
            maxgrow,
            minshrink,
            errcon: (maxgrow / safety).powf(1.0 / pgrow),
        }
    }

    pub fn errcon(&self) -> f64 {
        self.errcon
    }
}

impl Strategy for PseudoRkqs {
    fn default_limiting(&self) -> bool {
        true
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let e = ctx.history.last_error();
        let factor = if e > self.errcon {
            self.safety * e.powf(self.pgrow)
        } else {
            self.maxgrow
        };
        Ok(factor * ctx.history.last_size())
    }

    fn after_failure(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let e = ctx.history.last_error();
        let factor = (self.safety * e.powf(self.pshrink)).max(self.minshrink);
        Ok(factor * ctx.history.last_size())
    }
}
