#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Adaptive stepping over a one-dimensional range.
//!
//! A [`Stepper`] proposes intervals `[begin, end)` between `start` and
//! `stop`. The caller evaluates each one with its own computation and
//! reports back; the stepper advances on success, retries on failure, and
//! asks its [`Strategy`] for the next size.
//!
//! ## Architecture
//!
//! - **Protocol**: pull/report handle with compile-time alternation (`stepper` module)
//! - **History**: parallel attempt records with synthetic seeds (`history` module)
//! - **Bounds**: step floor, underflow detection, clamp to stop (`bounds` module)
//! - **Strategies**: fixed, scaled, PID, pseudo-RKQS, checkpoint, sequence, parsimonious
//! - **Registry**: runtime selection from a `stride_config::Config`
//! - **Runner**: drive loop against a `stride_traits::Solver`
//!
//! ```
//! use stride_core::{StepStatus, Stepper, strategies::Scaled};
//!
//! let mut stepper = Stepper::builder(Scaled::default())
//!     .with_range(0.0, 10.0)
//!     .with_size(1.0)
//!     .build()?;
//! while let StepStatus::Next(step) = stepper.next_step()? {
//!     let error = step.size() / 4.0;
//!     step.succeeded(None, Some(error));
//! }
//! assert_eq!(stepper.current(), 10.0);
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod bounds;
pub mod builder;
pub mod error;
pub mod history;
pub mod registry;
pub mod runner;
pub mod stepper;
pub mod strategies;
pub mod strategy;

pub use builder::StepperBuilder;
pub use error::{BuildError, Result, StepError};
pub use history::{Attempt, History};
pub use registry::{DynStepper, StrategyKind, build_stepper};
pub use runner::{RunParams, RunSummary, run};
pub use stepper::{Outcome, Step, StepStatus, Stepper};
pub use strategy::{StepContext, Strategy};
pub use stride_traits::{Evaluation, Solver};
