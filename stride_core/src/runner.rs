//! Drive a stepper against a [`Solver`] until the objective is reached.

use stride_traits::{Evaluation, Solver};

use crate::error::{Result, StepError};
use crate::stepper::{StepStatus, Stepper};
use crate::strategy::Strategy;

/// Knobs for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunParams {
    /// Give up after this many attempts. `None` retries for as long as the
    /// stepper keeps proposing steps.
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub successes: u64,
    pub attempts: u64,
    pub final_position: f64,
}

/// Map a solver failure into the typed error space.
pub fn map_solver_error(e: &(dyn std::error::Error + Send + Sync)) -> eyre::Report {
    eyre::Report::new(StepError::Solver(e.to_string()))
}

/// Pull, solve, report and commit until the stepper completes.
pub fn run<S, V>(stepper: &mut Stepper<S>, solver: &mut V, params: RunParams) -> Result<RunSummary>
where
    S: Strategy,
    V: Solver + ?Sized,
{
    tracing::info!(
        start = stepper.start(),
        stop = stepper.stop(),
        max_attempts = ?params.max_attempts,
        "run start"
    );
    let mut successes = 0u64;
    let mut attempts = 0u64;

    loop {
        let step = match stepper.next_step()? {
            StepStatus::Next(step) => step,
            StepStatus::Complete => break,
        };
        if let Some(max) = params.max_attempts
            && attempts >= max
        {
            tracing::warn!(max, "max attempts exceeded");
            return Err(eyre::Report::new(StepError::MaxAttempts(max)));
        }
        let (begin, end) = (step.begin(), step.end());
        let Evaluation { value, error } = solver
            .solve(begin, end)
            .map_err(|e| map_solver_error(e.as_ref()))?;
        attempts += 1;
        if step.succeeded(value, error).is_success() {
            successes += 1;
            solver.commit(begin, end);
        }
    }

    let summary = RunSummary {
        successes,
        attempts,
        final_position: stepper.current(),
    };
    tracing::info!(
        successes = summary.successes,
        attempts = summary.attempts,
        final_position = summary.final_position,
        "run complete"
    );
    Ok(summary)
}
