//! Attempt bookkeeping for a stepper.
//!
//! Every attempt, successful or not, is one entry across five parallel
//! sequences. The first entries are synthetic seeds so strategies can always
//! look back `needs` attempts, even before anything real happened.

/// One attempt as recorded by the stepper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    /// End of the attempted interval.
    pub position: f64,
    pub size: f64,
    pub success: bool,
    pub value: Option<f64>,
    /// Reported error plus the epsilon floor.
    pub error: f64,
}

#[derive(Debug, Clone)]
pub struct History {
    positions: Vec<f64>,
    sizes: Vec<f64>,
    successes: Vec<bool>,
    values: Vec<Option<f64>>,
    errors: Vec<f64>,
    // synthetic entries still at the front
    seeded: usize,
}

impl History {
    /// Seed `needs` neutral, successful attempts of `size` ending just before `start`.
    pub(crate) fn seeded(start: f64, size: f64, needs: usize) -> Self {
        let needs = needs.max(1);
        let positions = (0..needs)
            .map(|i| start - (needs - i) as f64 * size)
            .collect();
        Self {
            positions,
            sizes: vec![size; needs],
            successes: vec![true; needs],
            values: vec![None; needs],
            errors: vec![1.0; needs],
            seeded: needs,
        }
    }

    pub(crate) fn push(&mut self, attempt: Attempt) {
        self.positions.push(attempt.position);
        self.sizes.push(attempt.size);
        self.successes.push(attempt.success);
        self.values.push(attempt.value);
        self.errors.push(attempt.error);
    }

    /// Drop failed attempts and all but the last `keep` successful ones.
    pub(crate) fn purge(&mut self, keep: usize) {
        let ok: Vec<usize> = (0..self.len()).filter(|&i| self.successes[i]).collect();
        let kept = &ok[ok.len().saturating_sub(keep)..];
        if kept.len() == self.len() {
            return;
        }
        fn pick<T: Copy>(v: &[T], idx: &[usize]) -> Vec<T> {
            idx.iter().map(|&i| v[i]).collect()
        }
        self.seeded = kept.iter().filter(|&&i| i < self.seeded).count();
        self.positions = pick(&self.positions, kept);
        self.sizes = pick(&self.sizes, kept);
        self.successes = pick(&self.successes, kept);
        self.values = pick(&self.values, kept);
        self.errors = pick(&self.errors, kept);
    }

    /// Number of entries, synthetic seeds included.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of retained real attempts.
    pub fn attempts(&self) -> usize {
        self.len() - self.seeded
    }

    /// The `k`-th most recent entry (`k = 1` is the latest), seeds included.
    pub fn back(&self, k: usize) -> Option<Attempt> {
        let i = self.len().checked_sub(k)?;
        if k == 0 {
            return None;
        }
        Some(Attempt {
            position: self.positions[i],
            size: self.sizes[i],
            success: self.successes[i],
            value: self.values[i],
            error: self.errors[i],
        })
    }

    /// Error of the `k`-th most recent entry. Seeds guarantee `k <= needs` exists.
    pub fn error_back(&self, k: usize) -> f64 {
        self.back(k).map_or(1.0, |a| a.error)
    }

    pub fn last_size(&self) -> f64 {
        self.sizes.last().copied().unwrap_or(0.0)
    }

    pub fn last_error(&self) -> f64 {
        self.error_back(1)
    }

    pub fn last_success(&self) -> bool {
        self.successes.last().copied().unwrap_or(true)
    }

    // Introspection over real attempts only.

    pub fn positions(&self) -> &[f64] {
        &self.positions[self.seeded..]
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes[self.seeded..]
    }

    pub fn successes(&self) -> &[bool] {
        &self.successes[self.seeded..]
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values[self.seeded..]
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors[self.seeded..]
    }

    /// `(position, value)` of every real attempt, in attempt order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, Option<f64>)> + '_ {
        self.positions()
            .iter()
            .copied()
            .zip(self.values().iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(position: f64, success: bool) -> Attempt {
        Attempt {
            position,
            size: 1.0,
            success,
            value: Some(position),
            error: 0.5,
        }
    }

    #[test]
    fn seeds_trail_start() {
        let h = History::seeded(10.0, 2.0, 3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.attempts(), 0);
        assert!(h.positions().is_empty());
        assert_eq!(h.back(1).map(|a| a.position), Some(8.0));
        assert_eq!(h.back(3).map(|a| a.position), Some(4.0));
        assert_eq!(h.error_back(3), 1.0);
        assert!(h.last_success());
    }

    #[test]
    fn purge_drops_failures_and_old_successes() {
        let mut h = History::seeded(0.0, 1.0, 1);
        h.push(attempt(1.0, true));
        h.push(attempt(3.0, false));
        h.push(attempt(2.0, true));
        h.purge(2);
        assert_eq!(h.len(), 2);
        assert_eq!(h.positions(), &[1.0, 2.0]);
        assert_eq!(h.successes(), &[true, true]);
    }

    #[test]
    fn purge_keeps_seeds_while_they_are_needed() {
        let mut h = History::seeded(0.0, 1.0, 3);
        h.push(attempt(1.0, true));
        h.purge(3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.attempts(), 1);
        assert_eq!(h.positions(), &[1.0]);
    }

    #[test]
    fn back_out_of_range_is_none() {
        let h = History::seeded(0.0, 1.0, 1);
        assert!(h.back(0).is_none());
        assert!(h.back(2).is_none());
    }
}
