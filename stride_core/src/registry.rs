//! Runtime selection of a strategy by name or from a [`Config`].

use stride_config::{Config, StrategyCfg};

use crate::error::{BuildError, Result};
use crate::stepper::Stepper;
use crate::strategies::{
    Checkpoints, CurvatureScale, Fixed, Parsimonious, Pid, PseudoRkqs, Scaled, Sequence,
};
use crate::strategy::Strategy;

/// A stepper whose strategy was chosen at runtime.
pub type DynStepper = Stepper<Box<dyn Strategy + Send>>;

/// The built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Fixed,
    Scaled,
    Pid,
    PseudoRkqs,
    Checkpoint,
    Sequence,
    Parsimonious,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::Fixed,
        StrategyKind::Scaled,
        StrategyKind::Pid,
        StrategyKind::PseudoRkqs,
        StrategyKind::Checkpoint,
        StrategyKind::Sequence,
        StrategyKind::Parsimonious,
    ];

    /// Stable name, as used for `strategy.kind` in config files.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Fixed => "fixed",
            StrategyKind::Scaled => "scaled",
            StrategyKind::Pid => "pid",
            StrategyKind::PseudoRkqs => "pseudo_rkqs",
            StrategyKind::Checkpoint => "checkpoint",
            StrategyKind::Sequence => "sequence",
            StrategyKind::Parsimonious => "parsimonious",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn of(cfg: &StrategyCfg) -> Self {
        match cfg {
            StrategyCfg::Fixed => StrategyKind::Fixed,
            StrategyCfg::Scaled(_) => StrategyKind::Scaled,
            StrategyCfg::Pid(_) => StrategyKind::Pid,
            StrategyCfg::PseudoRkqs(_) => StrategyKind::PseudoRkqs,
            StrategyCfg::Checkpoint(_) => StrategyKind::Checkpoint,
            StrategyCfg::Sequence(_) => StrategyKind::Sequence,
            StrategyCfg::Parsimonious(_) => StrategyKind::Parsimonious,
        }
    }
}

impl core::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the strategy section of a config, loading any CSV sequences.
pub fn strategy_from_config(cfg: &StrategyCfg) -> Result<Box<dyn Strategy + Send>> {
    let strategy: Box<dyn Strategy + Send> = match cfg {
        StrategyCfg::Fixed => Box::new(Fixed),
        StrategyCfg::Scaled(c) => Box::new(Scaled::new(c.grow_factor, c.shrink_factor)?),
        StrategyCfg::Pid(c) => Box::new(Pid::new(c.proportional, c.integral, c.derivative)?),
        StrategyCfg::PseudoRkqs(c) => Box::new(PseudoRkqs::new(
            c.safety,
            c.pgrow,
            c.pshrink,
            c.maxgrow,
            c.minshrink,
        )?),
        StrategyCfg::Checkpoint(c) => {
            let stops = match &c.stops_csv {
                Some(path) => stride_config::load_sequence_csv(path)?,
                None => c.stops.clone(),
            };
            Box::new(Checkpoints::new(stops)?)
        }
        StrategyCfg::Sequence(c) => {
            let sizes = match &c.sizes_csv {
                Some(path) => stride_config::load_sequence_csv(path)?,
                None => c.sizes.clone(),
            };
            Box::new(Sequence::new(sizes)?)
        }
        StrategyCfg::Parsimonious(c) => {
            let scale: CurvatureScale = c.scale.parse().map_err(eyre::Report::new)?;
            Box::new(
                Parsimonious::new(c.n, scale)?.with_initial_bounds(c.min_steps, c.max_initial)?,
            )
        }
    };
    Ok(strategy)
}

/// Build a runtime-selected stepper from a config.
///
/// The config is validated first; checkpoint steppers default `stop` to +inf.
pub fn build_stepper(cfg: &Config) -> Result<DynStepper> {
    cfg.validate()
        .map_err(|e| e.wrap_err(BuildError::InvalidConfig("config failed validation")))?;
    let r = &cfg.range;
    let stop = match (r.stop, &cfg.strategy) {
        (Some(stop), _) => stop,
        (None, StrategyCfg::Checkpoint(_)) => f64::INFINITY,
        (None, _) => return Err(eyre::Report::new(BuildError::MissingRange)),
    };
    let kind = StrategyKind::of(&cfg.strategy);
    tracing::debug!(%kind, start = r.start, stop, "building stepper from config");

    let mut b = Stepper::builder(strategy_from_config(&cfg.strategy)?)
        .with_range(r.start, stop)
        .with_record(r.record);
    if let Some(size) = r.size {
        b = b.with_size(size);
    }
    if let Some(min_step) = r.min_step {
        b = b.with_min_step(min_step);
    }
    if let Some(inclusive) = r.inclusive {
        b = b.with_inclusive(inclusive);
    }
    if let Some(limiting) = r.limiting {
        b = b.with_limiting(limiting);
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(StrategyKind::from_name("rk45"), None);
    }
}
