//! The `run` and `check` commands: build a stepper from config and drive it.

use std::error::Error;

use stride_config::Config;
use stride_core::{DynStepper, RunParams, RunSummary, StrategyKind, build_stepper};
use stride_traits::{Evaluation, Solver};

/// `tanh` front centred on the middle of the range.
///
/// The error of an attempt is how far the value moved since the last
/// committed attempt, in units of `error_scale`.
#[derive(Debug, Clone)]
pub struct TanhFront {
    start: f64,
    span: f64,
    width: f64,
    error_scale: f64,
    old: f64,
    pending: Option<(f64, f64)>,
}

impl TanhFront {
    pub fn new(start: f64, stop: f64, width: f64, error_scale: f64) -> eyre::Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            eyre::bail!("--width must be > 0");
        }
        if !(error_scale.is_finite() && error_scale > 0.0) {
            eyre::bail!("--error-scale must be > 0");
        }
        // unbounded checkpoint runs get a unit-length front
        let span = if (stop - start).is_finite() {
            stop - start
        } else {
            1.0
        };
        Ok(Self {
            start,
            span,
            width,
            error_scale,
            old: -1.0,
            pending: None,
        })
    }

    pub fn value_at(&self, t: f64) -> f64 {
        (((t - self.start) / self.span - 0.5) / (2.0 * self.width)).tanh()
    }
}

impl Solver for TanhFront {
    fn solve(&mut self, _begin: f64, end: f64) -> Result<Evaluation, Box<dyn Error + Send + Sync>> {
        let new = self.value_at(end);
        if !new.is_finite() {
            return Err(format!("front is not finite at {end}").into());
        }
        self.pending = Some((end, new));
        Ok(Evaluation::new(
            Some(new),
            Some((new - self.old).abs() / self.error_scale),
        ))
    }

    fn commit(&mut self, _begin: f64, end: f64) {
        if let Some((at, new)) = self.pending.take()
            && at == end
        {
            self.old = new;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOpts {
    pub width: f64,
    pub error_scale: f64,
    pub max_attempts: Option<u64>,
    pub attempts: bool,
}

/// Build the stepper and run it against the tanh front.
pub fn run_stride(cfg: &Config, opts: RunOpts, json: bool) -> eyre::Result<RunSummary> {
    let kind = StrategyKind::of(&cfg.strategy);
    let mut stepper = build_stepper(cfg)?;
    let mut front = TanhFront::new(
        stepper.start(),
        stepper.stop(),
        opts.width,
        opts.error_scale,
    )?;
    let summary = stride_core::run(
        &mut stepper,
        &mut front,
        RunParams {
            max_attempts: opts.max_attempts,
        },
    )?;

    if opts.attempts {
        print_attempts(&stepper, json);
    }
    if json {
        println!(
            "{}",
            serde_json::json!({
                "strategy": kind.name(),
                "start": stepper.start(),
                "stop": stepper.stop(),
                "successes": summary.successes,
                "attempts": summary.attempts,
                "final_position": summary.final_position,
            })
        );
    } else {
        println!(
            "{} successful steps in {} attempts",
            summary.successes, summary.attempts
        );
        println!("final position: {}", summary.final_position);
    }
    Ok(summary)
}

fn print_attempts(stepper: &DynStepper, json: bool) {
    if !stepper.is_recording() {
        tracing::warn!("set range.record = true to list every attempt");
    }
    let rows = stepper
        .positions()
        .iter()
        .zip(stepper.sizes())
        .zip(stepper.successes())
        .zip(stepper.values())
        .zip(stepper.errors());
    for ((((position, size), ok), value), error) in rows {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "position": position,
                    "size": size,
                    "success": ok,
                    "value": value,
                    "error": error,
                })
            );
        } else {
            let value = value.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"));
            let mark = if *ok { "ok" } else { "retry" };
            println!("{position:>14.6} {size:>14.6e} {value:>10} {error:>12.4e} {mark}");
        }
    }
}

/// Validate and build without stepping.
pub fn check(cfg: &Config, json: bool) -> eyre::Result<()> {
    let stepper = build_stepper(cfg)?;
    let kind = StrategyKind::of(&cfg.strategy);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "strategy": kind.name(),
                "start": stepper.start(),
                "stop": stepper.stop(),
                "min_step": stepper.min_step(),
                "limiting": stepper.is_limiting(),
                "record": stepper.is_recording(),
            })
        );
    } else {
        println!(
            "config ok: {} stepper over [{}, {}]",
            kind,
            stepper.start(),
            stepper.stop()
        );
    }
    Ok(())
}
