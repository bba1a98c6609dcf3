//! Human-readable error descriptions and structured JSON error formatting.

use stride_core::error::{BuildError, StepError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(se) = err.downcast_ref::<StepError>() {
        return match se {
            StepError::Underflow { current, step } => format!(
                "What happened: Step size underflow ({current} + {step} == {current}).\nLikely causes: The error keeps failing attempts until the step no longer moves the position, or min_step is below the float resolution at this position.\nHow to fix: Raise range.min_step, loosen --error-scale, or check the evaluated function for discontinuities."
            ),
            StepError::SequenceExhausted(what) => format!(
                "What happened: The {what} ran out before the stepper finished.\nLikely causes: strategy.stops or strategy.sizes ends early.\nHow to fix: Extend the sequence or lower range.stop."
            ),
            StepError::MissingValue => "What happened: A value-driven strategy was given an attempt without a value.\nLikely causes: The solver reported only an error.\nHow to fix: Report a value for every attempt when using the parsimonious strategy.".to_string(),
            StepError::TooFewSamples(n) => format!(
                "What happened: Curvature scoring needs at least 3 samples, had {n}.\nLikely causes: strategy.min_steps too small.\nHow to fix: Use min_steps >= 3."
            ),
            StepError::Solver(msg) => format!(
                "What happened: The solver failed ({msg}).\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug for details."
            ),
            StepError::MaxAttempts(n) => format!(
                "What happened: Gave up after {n} attempts.\nLikely causes: A tight --error-scale or a very sharp front.\nHow to fix: Raise --max-attempts or loosen the tolerance."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        let cause = err
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        return match be {
            BuildError::MissingRange => {
                "What happened: No range was configured.\nLikely causes: [range] lacks start or stop.\nHow to fix: Set range.start and range.stop in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) if cause.is_empty() => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}: {cause}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
            BuildError::UnknownScale(s) => format!(
                "What happened: Unknown curvature scale {s:?}.\nLikely causes: Typo in strategy.scale.\nHow to fix: Use \"dl\" or \"dy\"."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    // Sequence CSV header special-case
    if lower.contains("sequence csv must have header") {
        return "Invalid header in sequence CSV. Expected 'value'.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per failure class.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(se) = err.downcast_ref::<StepError>() {
        return match se {
            StepError::Underflow { .. } => 3,
            StepError::SequenceExhausted(_) => 4,
            StepError::MaxAttempts(_) => 5,
            StepError::Solver(_) => 6,
            StepError::MissingValue | StepError::TooFewSamples(_) => 1,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    1
}

/// Stable machine-readable name of the failure class.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(se) = err.downcast_ref::<StepError>() {
        return match se {
            StepError::Underflow { .. } => "Underflow",
            StepError::SequenceExhausted(_) => "SequenceExhausted",
            StepError::MissingValue => "MissingValue",
            StepError::TooFewSamples(_) => "TooFewSamples",
            StepError::Solver(_) => "Solver",
            StepError::MaxAttempts(_) => "MaxAttempts",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    match err.downcast_ref::<StepError>() {
        Some(StepError::Underflow { current, step }) => json!({
            "reason": reason_name(err),
            "details": { "current": current, "step": step },
            "message": msg,
        }),
        Some(StepError::MaxAttempts(n)) => json!({
            "reason": reason_name(err),
            "details": { "max_attempts": n },
            "message": msg,
        }),
        _ => json!({ "reason": reason_name(err), "message": msg }),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        let e = |se: StepError| exit_code_for_error(&eyre::Report::new(se));
        assert_eq!(e(StepError::Underflow { current: 1.0, step: 0.0 }), 3);
        assert_eq!(e(StepError::SequenceExhausted("checkpoints")), 4);
        assert_eq!(e(StepError::MaxAttempts(9)), 5);
        assert_eq!(e(StepError::Solver("x".into())), 6);
        assert_eq!(
            exit_code_for_error(&eyre::Report::new(BuildError::MissingRange)),
            2
        );
        assert_eq!(exit_code_for_error(&eyre::eyre!("boom")), 1);
    }

    #[test]
    fn wrapped_build_error_keeps_its_cause() {
        let err = eyre::eyre!("range.stop must differ from range.start")
            .wrap_err(BuildError::InvalidConfig("config failed validation"));
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(humanize(&err).contains("range.stop must differ"));
    }

    #[test]
    fn json_error_carries_details() {
        let err = eyre::Report::new(StepError::MaxAttempts(7));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "MaxAttempts");
        assert_eq!(v["details"]["max_attempts"], 7);
    }
}
