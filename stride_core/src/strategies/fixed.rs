use crate::strategy::Strategy;

/// Repeats the initial size and accepts every attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixed;

impl Strategy for Fixed {
    fn fixed_limiting(&self) -> Option<bool> {
        Some(false)
    }

    fn is_success(&self, _error: Option<f64>, _limiting: bool) -> bool {
        true
    }
}
