//! Built-in step-size strategies.

mod checkpoint;
mod fixed;
mod parsimonious;
mod pid;
mod rkqs;
mod scaled;
mod sequence;

pub use checkpoint::Checkpoints;
pub use fixed::Fixed;
pub use parsimonious::{CurvatureScale, Parsimonious};
pub use pid::Pid;
pub use rkqs::PseudoRkqs;
pub use scaled::Scaled;
pub use sequence::Sequence;

use crate::stepper::Stepper;

pub type FixedStepper = Stepper<Fixed>;
pub type ScaledStepper = Stepper<Scaled>;
pub type PidStepper = Stepper<Pid>;
pub type PseudoRkqsStepper = Stepper<PseudoRkqs>;
pub type CheckpointStepper = Stepper<Checkpoints>;
pub type SequenceStepper = Stepper<Sequence>;
pub type ParsimoniousStepper = Stepper<Parsimonious>;
