#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and sequence parsing for adaptive steppers.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Sequence CSV loader enforces a `value` header and rejects non-finite rows.
use serde::Deserialize;
use std::path::PathBuf;

/// Range and bookkeeping options shared by every strategy.
#[derive(Debug, Deserialize, Clone)]
pub struct RangeCfg {
    pub start: f64,
    /// Required by every strategy except `checkpoint` (defaults to +inf there).
    #[serde(default)]
    pub stop: Option<f64>,
    /// Initial step guess; defaults to the whole range.
    #[serde(default)]
    pub size: Option<f64>,
    /// Floor on step magnitude; defaults to `(stop - start) * eps`.
    #[serde(default)]
    pub min_step: Option<f64>,
    /// Evaluate exactly at `start` first. Strategy default when absent.
    #[serde(default)]
    pub inclusive: Option<bool>,
    /// Keep every attempt instead of only what the strategy needs.
    #[serde(default)]
    pub record: bool,
    /// Treat `error > 1` as failure. Strategy default when absent.
    #[serde(default)]
    pub limiting: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScaledCfg {
    pub grow_factor: f64,
    pub shrink_factor: f64,
}

impl Default for ScaledCfg {
    fn default() -> Self {
        Self {
            grow_factor: 1.2,
            shrink_factor: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PidCfg {
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
}

impl Default for PidCfg {
    fn default() -> Self {
        Self {
            proportional: 0.075,
            integral: 0.175,
            derivative: 0.01,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RkqsCfg {
    pub safety: f64,
    pub pgrow: f64,
    pub pshrink: f64,
    pub maxgrow: f64,
    pub minshrink: f64,
}

impl Default for RkqsCfg {
    fn default() -> Self {
        Self {
            safety: 0.9,
            pgrow: -0.2,
            pshrink: -0.25,
            maxgrow: 5.0,
            minshrink: 0.1,
        }
    }
}

/// Checkpoints come inline or from a CSV file; the file wins when both are set.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CheckpointCfg {
    pub stops: Vec<f64>,
    pub stops_csv: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SequenceCfg {
    pub sizes: Vec<f64>,
    pub sizes_csv: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParsimoniousCfg {
    /// Number of samples to take.
    #[serde(alias = "N")]
    pub n: usize,
    /// Curvature weighting: "dl" (arc length) or "dy" (rise).
    #[serde(default = "default_scale")]
    pub scale: String,
    #[serde(default = "default_min_steps", alias = "minsteps")]
    pub min_steps: usize,
    #[serde(default = "default_max_initial", alias = "maxinitial")]
    pub max_initial: usize,
}

fn default_scale() -> String {
    "dl".to_string()
}

fn default_min_steps() -> usize {
    4
}

fn default_max_initial() -> usize {
    11
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyCfg {
    Fixed,
    Scaled(ScaledCfg),
    Pid(PidCfg),
    PseudoRkqs(RkqsCfg),
    Checkpoint(CheckpointCfg),
    Sequence(SequenceCfg),
    Parsimonious(ParsimoniousCfg),
}

impl StrategyCfg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            StrategyCfg::Fixed => "fixed",
            StrategyCfg::Scaled(_) => "scaled",
            StrategyCfg::Pid(_) => "pid",
            StrategyCfg::PseudoRkqs(_) => "pseudo_rkqs",
            StrategyCfg::Checkpoint(_) => "checkpoint",
            StrategyCfg::Sequence(_) => "sequence",
            StrategyCfg::Parsimonious(_) => "parsimonious",
        }
    }

    /// Limiting flag the strategy hard-wires, if it does not honour `range.limiting`.
    pub fn pinned_limiting(&self) -> Option<bool> {
        match self {
            StrategyCfg::Scaled(_) => Some(true),
            StrategyCfg::Pid(_) | StrategyCfg::PseudoRkqs(_) => None,
            StrategyCfg::Fixed
            | StrategyCfg::Checkpoint(_)
            | StrategyCfg::Sequence(_)
            | StrategyCfg::Parsimonious(_) => Some(false),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub range: RangeCfg,
    pub strategy: StrategyCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// One row of a sequence CSV.
///
/// Expected headers:
/// value
///
/// Example:
/// value
/// 0.001
/// 0.01
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SequenceRow {
    pub value: f64,
}

/// Load an ordered sequence of checkpoints or step sizes from CSV.
pub fn load_sequence_csv(path: &std::path::Path) -> eyre::Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open sequence CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != ["value"] {
        eyre::bail!(
            "sequence CSV must have header 'value', got: {}",
            actual.join(",")
        );
    }

    let mut out = Vec::new();
    for (idx, rec) in rdr.deserialize::<SequenceRow>().enumerate() {
        match rec {
            Ok(row) if row.value.is_finite() => out.push(row.value),
            Ok(row) => eyre::bail!("non-finite value {} in CSV row {}", row.value, idx + 2),
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        }
    }
    if out.is_empty() {
        eyre::bail!("sequence CSV {:?} has no rows", path);
    }
    Ok(out)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        let r = &self.range;

        // Range
        if !r.start.is_finite() {
            eyre::bail!("range.start must be finite");
        }
        match (r.stop, &self.strategy) {
            (None, StrategyCfg::Checkpoint(_)) => {}
            (None, _) => eyre::bail!("range.stop is required for this strategy"),
            (Some(stop), StrategyCfg::Checkpoint(_)) if stop.is_nan() => {
                eyre::bail!("range.stop must not be NaN");
            }
            (Some(stop), StrategyCfg::Checkpoint(_)) if stop == r.start => {
                eyre::bail!("range.stop must differ from range.start");
            }
            (Some(_), StrategyCfg::Checkpoint(_)) => {}
            (Some(stop), _) if !stop.is_finite() => eyre::bail!("range.stop must be finite"),
            (Some(stop), _) if stop == r.start => {
                eyre::bail!("range.stop must differ from range.start");
            }
            (Some(_), _) => {}
        }
        if r.size.is_some_and(|size| !(size.is_finite() && size != 0.0)) {
            eyre::bail!("range.size must be finite and non-zero");
        }
        if r.min_step.is_some_and(|min| !(min.is_finite() && min >= 0.0)) {
            eyre::bail!("range.min_step must be finite and >= 0");
        }

        // Strategy
        match &self.strategy {
            StrategyCfg::Fixed => {}
            StrategyCfg::Scaled(c) => {
                if !(c.grow_factor.is_finite() && c.grow_factor > 1.0) {
                    eyre::bail!("strategy.grow_factor must be > 1");
                }
                if !(c.shrink_factor > 0.0 && c.shrink_factor < 1.0) {
                    eyre::bail!("strategy.shrink_factor must be in (0, 1)");
                }
            }
            StrategyCfg::Pid(c) => {
                if !(c.proportional.is_finite() && c.integral.is_finite() && c.derivative.is_finite())
                {
                    eyre::bail!("strategy PID coefficients must be finite");
                }
            }
            StrategyCfg::PseudoRkqs(c) => {
                if !(c.safety > 0.0 && c.safety <= 1.0) {
                    eyre::bail!("strategy.safety must be in (0, 1]");
                }
                if !(c.pgrow.is_finite() && c.pgrow < 0.0) {
                    eyre::bail!("strategy.pgrow must be < 0");
                }
                if !(c.pshrink.is_finite() && c.pshrink < 0.0) {
                    eyre::bail!("strategy.pshrink must be < 0");
                }
                if !(c.maxgrow.is_finite() && c.maxgrow > 1.0) {
                    eyre::bail!("strategy.maxgrow must be > 1");
                }
                if !(c.minshrink > 0.0 && c.minshrink < 1.0) {
                    eyre::bail!("strategy.minshrink must be in (0, 1)");
                }
            }
            StrategyCfg::Checkpoint(c) => {
                if c.stops_csv.is_none() && c.stops.is_empty() {
                    eyre::bail!("strategy.stops must not be empty");
                }
                if c.stops.iter().any(|s| !s.is_finite()) {
                    eyre::bail!("strategy.stops must be finite");
                }
            }
            StrategyCfg::Sequence(c) => {
                if c.sizes_csv.is_none() && c.sizes.is_empty() {
                    eyre::bail!("strategy.sizes must not be empty");
                }
                if c.sizes.iter().any(|s| !s.is_finite()) {
                    eyre::bail!("strategy.sizes must be finite");
                }
            }
            StrategyCfg::Parsimonious(c) => {
                if c.n == 0 {
                    eyre::bail!("strategy.n must be >= 1");
                }
                if c.scale != "dl" && c.scale != "dy" {
                    eyre::bail!("strategy.scale must be \"dl\" or \"dy\", got {:?}", c.scale);
                }
                if c.min_steps < 3 {
                    eyre::bail!("strategy.min_steps must be >= 3");
                }
                if c.max_initial < c.min_steps {
                    eyre::bail!("strategy.max_initial must be >= strategy.min_steps");
                }
            }
        }

        if let (Some(asked), Some(pinned)) = (r.limiting, self.strategy.pinned_limiting())
            && asked != pinned
        {
            eyre::bail!(
                "range.limiting = {asked} is not supported by the {} strategy",
                self.strategy.kind_name()
            );
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
