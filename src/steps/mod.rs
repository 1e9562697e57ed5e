//! Step management: declared steps, the current step, and navigation between them

pub mod binding;
pub mod cycle;
pub mod error;
pub mod identity;
pub mod manager;
pub mod registry;
pub mod view;

pub use binding::{Binding, StepCell};
pub use cycle::Cycle;
pub use error::StepError;
pub use identity::StepId;
pub use manager::{StepManager, StepManagerOptions, Transition};
pub use registry::{StepEntry, StepKey, StepRegistry};
pub use view::StepView;
