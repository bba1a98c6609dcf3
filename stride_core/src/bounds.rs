//! Numeric helpers shared by the stepper core and the strategies.

use crate::error::StepError;

/// Machine epsilon for `f64`.
pub const MACHINE_EPSILON: f64 = f64::EPSILON;

/// Default floor on step magnitude: the range scaled by machine epsilon.
///
/// Unbounded ranges (checkpoint steppers default `stop` to +inf) fall back
/// to the resolution of `start` itself, never below epsilon.
#[inline]
pub fn default_min_step(start: f64, stop: f64) -> f64 {
    let span = stop - start;
    if span.is_finite() {
        span * MACHINE_EPSILON
    } else {
        start.abs().max(1.0) * MACHINE_EPSILON
    }
}

/// Errors are stored with an epsilon floor so a perfect match is never 0.
#[inline]
pub fn floor_error(error: f64) -> f64 {
    error + MACHINE_EPSILON
}

/// Raise `step` to at least `min_step` in magnitude, keeping its direction.
///
/// Fails with [`StepError::Underflow`] when the bounded step no longer moves
/// `current` in floating point.
pub fn lower_bound(current: f64, step: f64, min_step: f64) -> Result<f64, StepError> {
    let sign = if step < 0.0 { -1.0 } else { 1.0 };
    let bounded = sign * step.abs().max(min_step.abs());
    if current + bounded == current {
        tracing::warn!(current, step = bounded, "step size underflow");
        return Err(StepError::Underflow {
            current,
            step: bounded,
        });
    }
    Ok(bounded)
}

/// Clamp `step` to the distance remaining to `stop`.
///
/// Returns the clamped step and, when clamping happened, the original
/// request so it can be retried once the end of range no longer binds.
pub fn clamp_to_stop(current: f64, stop: f64, step: f64) -> (f64, Option<f64>) {
    let max_step = stop - current;
    if step.abs() > max_step.abs() {
        tracing::debug!(
            want = step,
            clamped = max_step,
            "step clamped to stop; saving request"
        );
        (max_step, Some(step))
    } else {
        (step, None)
    }
}

/// `n` evenly spaced points from `a` to `b` inclusive.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let step = (b - a) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|i| a + i as f64 * step).collect();
            v[n - 1] = b;
            v
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bound_keeps_direction() {
        assert_eq!(lower_bound(0.0, -1e-20, 1e-6), Ok(-1e-6));
        assert_eq!(lower_bound(0.0, 1e-20, 1e-6), Ok(1e-6));
        assert_eq!(lower_bound(0.0, 0.0, 1e-6), Ok(1e-6));
        assert_eq!(lower_bound(0.0, 2.0, 1e-6), Ok(2.0));
    }

    #[test]
    fn lower_bound_detects_stall() {
        let err = lower_bound(1e20, 1.0, 1e-3).unwrap_err();
        assert!(matches!(err, StepError::Underflow { current, .. } if current == 1e20));
    }

    #[test]
    fn clamp_saves_original_request() {
        assert_eq!(clamp_to_stop(990.0, 1000.0, 45.0), (10.0, Some(45.0)));
        assert_eq!(clamp_to_stop(0.0, 1000.0, 45.0), (45.0, None));
        // descending ranges clamp on magnitude
        assert_eq!(clamp_to_stop(-990.0, -1000.0, -45.0), (-10.0, Some(-45.0)));
    }

    #[test]
    fn default_min_step_handles_unbounded_range() {
        assert_eq!(default_min_step(0.0, 1000.0), 1000.0 * f64::EPSILON);
        assert_eq!(default_min_step(0.0, f64::INFINITY), f64::EPSILON);
        assert_eq!(default_min_step(-50.0, f64::INFINITY), 50.0 * f64::EPSILON);
    }

    #[test]
    fn linspace_hits_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
