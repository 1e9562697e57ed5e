//! Step manager - declare an ordered set of steps, show one at a time, and
//! move between them linearly or in a circle.
//!
//! The core lives in [`steps`]; [`config`], [`logging`] and [`walk`] are the
//! glue used by the `stepper` binary.

pub mod config;
pub mod logging;
pub mod steps;
pub mod walk;

pub use steps::{
    Binding, Cycle, StepCell, StepError, StepId, StepKey, StepManager, StepManagerOptions,
    StepRegistry, StepView, Transition,
};
