//! Curvature-directed sampling of a fixed budget of points.
//!
//! Starts from an evenly spaced pool over the range. Once the pool is spent,
//! each new point is the midpoint of the sampled interval with the largest
//! curvature score, so positions can move backwards as well as forwards.

use std::collections::VecDeque;
use std::str::FromStr;

use crate::bounds;
use crate::error::{BuildError, Result, StepError};
use crate::history::History;
use crate::strategy::{StepContext, Strategy};

/// How an interval's curvature is weighted when picking the next sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurvatureScale {
    /// `√(dx² + dy²) · √|y''|`
    #[default]
    ArcLength,
    /// `|dy| · |y''|`
    Rise,
}

impl FromStr for CurvatureScale {
    type Err = BuildError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dl" => Ok(Self::ArcLength),
            "dy" => Ok(Self::Rise),
            other => Err(BuildError::UnknownScale(other.to_string())),
        }
    }
}

impl core::fmt::Display for CurvatureScale {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::ArcLength => "dl",
            Self::Rise => "dy",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Parsimonious {
    n: usize,
    scale: CurvatureScale,
    min_steps: usize,
    max_initial: usize,
    // filled on first use, once the range is known
    pool: Option<VecDeque<f64>>,
}

impl Parsimonious {
    /// Sample `n` points in total.
    pub fn new(n: usize, scale: CurvatureScale) -> Result<Self> {
        if n == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "parsimonious sample count must be >= 1",
            )));
        }
        Ok(Self {
            n,
            scale,
            min_steps: 4,
            max_initial: 11,
            pool: None,
        })
    }

    /// Bounds on the size of the initial evenly spaced pool.
    pub fn with_initial_bounds(mut self, min_steps: usize, max_initial: usize) -> Result<Self> {
        if min_steps < 3 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "min_steps must be >= 3",
            )));
        }
        if max_initial < min_steps {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_initial must be >= min_steps",
            )));
        }
        self.min_steps = min_steps;
        self.max_initial = max_initial;
        Ok(self)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn scale(&self) -> CurvatureScale {
        self.scale
    }

    fn initial_count(&self) -> usize {
        self.min_steps.max(self.n / 3).min(self.max_initial)
    }
}

impl Strategy for Parsimonious {
    fn default_inclusive(&self) -> bool {
        true
    }

    fn requires_full_history(&self) -> bool {
        true
    }

    fn fixed_limiting(&self) -> Option<bool> {
        Some(false)
    }

    fn is_success(&self, _error: Option<f64>, _limiting: bool) -> bool {
        true
    }

    fn after_success(&mut self, ctx: &StepContext<'_>) -> Result<f64> {
        let count = self.initial_count();
        let scale = self.scale;
        let pool = self
            .pool
            .get_or_insert_with(|| bounds::linspace(ctx.start, ctx.stop, count).into());
        if pool.is_empty() {
            let x = find_candidate(ctx.history, scale).map_err(eyre::Report::new)?;
            tracing::debug!(x, "curvature candidate");
            pool.push_back(x);
        }
        match pool.pop_front() {
            Some(x) => Ok(x - ctx.current),
            None => Err(eyre::Report::new(StepError::SequenceExhausted(
                "candidate pool",
            ))),
        }
    }

    fn is_complete(&mut self, ctx: &StepContext<'_>) -> bool {
        ctx.history.attempts() >= self.n
    }

    // candidates may lie anywhere in the range, including behind `current`
    fn upper_bound(&self, _current: f64, _stop: f64, size: f64) -> (f64, Option<f64>) {
        (size, None)
    }
}

/// Midpoint of the sampled interval with the highest curvature score.
fn find_candidate(history: &History, scale: CurvatureScale) -> std::result::Result<f64, StepError> {
    let mut pts = history
        .samples()
        .map(|(x, y)| y.map(|y| (x, y)).ok_or(StepError::MissingValue))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if pts.len() < 3 {
        return Err(StepError::TooFewSamples(pts.len()));
    }
    pts.sort_by(|a, b| a.0.total_cmp(&b.0));

    // second differences, halved at the ends so there is one per sample
    let inner: Vec<f64> = pts
        .windows(3)
        .map(|w| w[2].1 - 2.0 * w[1].1 + w[0].1)
        .collect();
    let mut d2 = Vec::with_capacity(pts.len());
    d2.push(inner[0] / 2.0);
    d2.extend_from_slice(&inner);
    d2.push(inner[inner.len() - 1] / 2.0);

    let mut best: Option<(f64, f64)> = None;
    for (i, w) in pts.windows(2).enumerate() {
        let dx = w[1].0 - w[0].0;
        let dy = w[1].1 - w[0].1;
        let curvature = ((d2[i] + d2[i + 1]) / 2.0).abs();
        let score = match scale {
            CurvatureScale::ArcLength => dx.hypot(dy) * curvature.sqrt(),
            CurvatureScale::Rise => dy.abs() * curvature,
        };
        let mid = w[0].0 + dx / 2.0;
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, mid));
        }
    }
    // windows(2) over >= 3 points is never empty
    best.map(|(_, mid)| mid).ok_or(StepError::TooFewSamples(pts.len()))
}
