//! Observation cycles: the host re-declares its steps, then the manager resolves once

use super::error::StepError;
use super::identity::StepId;
use super::manager::StepManager;
use super::view::StepView;

/// Declarations collected during one observation cycle.
///
/// Nothing reaches the registry until [`Cycle::finish`], so resolution never
/// sees a half-declared set of steps.
pub struct Cycle<'a> {
    manager: &'a mut StepManager,
    declared: Vec<Option<String>>,
}

impl<'a> Cycle<'a> {
    pub(crate) fn new(manager: &'a mut StepManager) -> Self {
        Self {
            manager,
            declared: Vec::new(),
        }
    }

    /// Declare a step; `None` (or a blank name) declares an anonymous step
    pub fn step(&mut self, name: Option<&str>) -> &mut Self {
        self.declared.push(name.map(str::to_string));
        self
    }

    /// Declare one named step per item, e.g. from a backing list
    pub fn steps<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.step(Some(name.as_ref()));
        }
        self
    }

    /// Identity the next declared step will get
    pub fn next_identity(&self, name: Option<&str>) -> StepId {
        StepId::from_name(name).unwrap_or(StepId::Position(self.declared.len()))
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Apply the declarations and resolve the current step
    pub fn finish(self) -> Result<StepView, StepError> {
        self.manager.reconcile(&self.declared)?;
        Ok(self.manager.view())
    }
}
