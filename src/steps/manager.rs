//! Step manager: which declared step is current, and how to move between them

use tracing::{debug, trace};

use super::binding::Binding;
use super::cycle::Cycle;
use super::error::StepError;
use super::identity::StepId;
use super::registry::{StepKey, StepRegistry};
use super::view::StepView;

/// Construction inputs for a [`StepManager`]
#[derive(Debug, Clone)]
pub struct StepManagerOptions {
    /// Optional external value for the current step
    pub current_step: Binding,
    /// One-shot seed, consulted only for the first resolution
    pub initial_step: Option<StepId>,
    /// When false, next/previous wrap around at the ends
    pub linear: bool,
}

impl Default for StepManagerOptions {
    fn default() -> Self {
        Self {
            current_step: Binding::Absent,
            initial_step: None,
            linear: true,
        }
    }
}

/// A change of current step produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<StepId>,
    pub to: StepId,
}

/// Tracks the current step of one step group.
///
/// The current step is re-resolved after every registry change and every
/// transition. When the host changes a bound [`super::StepCell`] directly it
/// calls [`StepManager::observe`] to pick up the new value.
#[derive(Debug)]
pub struct StepManager {
    registry: StepRegistry,
    binding: Binding,
    initial_step: Option<StepId>,
    initial_consumed: bool,
    linear: bool,
    /// Canonical identity of the resolved current step
    current: Option<StepId>,
    /// Registry key of the current step; positions shift, keys do not
    current_key: Option<StepKey>,
    /// Binding value seen by the previous resolution
    last_bound: Option<StepId>,
}

impl Default for StepManager {
    fn default() -> Self {
        Self::new(StepManagerOptions::default())
    }
}

impl StepManager {
    /// Create a new step manager
    pub fn new(options: StepManagerOptions) -> Self {
        Self {
            registry: StepRegistry::new(),
            binding: options.current_step,
            initial_step: options.initial_step,
            initial_consumed: false,
            linear: options.linear,
            current: None,
            current_key: None,
            last_bound: None,
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    // ─── Registry ───────────────────────────────────────────────────────────

    /// Declare a step at the end of the current order
    pub fn register(&mut self, name: Option<&str>) -> Result<StepKey, StepError> {
        let key = self.registry.register(name)?;
        self.resolve();
        Ok(key)
    }

    /// Remove a declared step; a no-op if it is already gone
    pub fn unregister(&mut self, key: StepKey) -> bool {
        let removed = self.registry.unregister(key);
        if removed {
            self.resolve();
        }
        removed
    }

    /// Replace the declared steps in one go, then resolve once
    pub fn reconcile<S: AsRef<str>>(
        &mut self,
        declared: &[Option<S>],
    ) -> Result<Vec<StepKey>, StepError> {
        let keys = self.registry.reconcile(declared)?;
        self.resolve();
        Ok(keys)
    }

    /// Start an observation cycle in which the host re-declares every step
    pub fn begin_cycle(&mut self) -> Cycle<'_> {
        Cycle::new(self)
    }

    // ─── Resolution ─────────────────────────────────────────────────────────

    /// Pick up changes the host made to a bound value
    pub fn observe(&mut self) -> Option<StepId> {
        self.resolve()
    }

    /// Resolve the current step.
    ///
    /// In order: a defined binding value naming a live step, the initial step
    /// (first resolution only), the previous current step if still live, then
    /// the first live step.
    pub fn resolve(&mut self) -> Option<StepId> {
        let bound = self.binding.value();

        // The host cleared a value it had set: drop the local step with it
        if bound.is_none() && self.last_bound.is_some() {
            debug!(previous = ?self.current, "bound step cleared");
            self.current = None;
            self.current_key = None;
        }
        if bound.is_some() {
            self.initial_consumed = true;
        }
        self.last_bound = bound.clone();

        let registry = &self.registry;
        let resolved = if registry.is_empty() {
            None
        } else {
            let from_binding = bound.as_ref().and_then(|id| registry.resolve(id));
            if from_binding.is_none() {
                if let Some(ref id) = bound {
                    debug!(step = %id, "bound step is not declared");
                }
            }

            let from_initial = if self.initial_consumed {
                None
            } else {
                self.initial_step.as_ref().and_then(|id| registry.resolve(id))
            };
            self.initial_consumed = true;

            from_binding
                .or(from_initial)
                .or_else(|| self.current_key.and_then(|key| registry.entry(key)))
                .or_else(|| registry.resolve(&StepId::Position(0)))
        };

        let (key, resolved) = match resolved {
            Some(entry) => (Some(entry.key), Some(entry.id)),
            None => (None, None),
        };
        if resolved != self.current {
            debug!(from = ?self.current, to = ?resolved, "current step resolved");
        }
        self.current = resolved;
        self.current_key = key;
        self.current.clone()
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Move to a named (or positional) step.
    ///
    /// Unknown targets are ignored. A mutable binding receives the new value;
    /// a read-only binding keeps control of the current step.
    pub fn transition_to(&mut self, target: &StepId) -> Option<Transition> {
        let from = self.resolve();
        let Some(entry) = self.registry.resolve(target) else {
            trace!(step = %target, "transition target is not declared");
            return None;
        };

        self.initial_consumed = true;
        self.current = Some(entry.id.clone());
        self.current_key = Some(entry.key);
        if self.binding.write(Some(entry.id.clone())) {
            debug!(step = %entry.id, "wrote current step to binding");
        }

        let to = self.resolve()?;
        if from.as_ref() == Some(&to) {
            trace!(step = %to, "transition left current step unchanged");
            return None;
        }
        debug!(from = ?from, to = %to, "transitioned");
        Some(Transition { from, to })
    }

    /// Move to the following step, wrapping to the first unless linear
    pub fn transition_to_next(&mut self) -> Option<Transition> {
        self.resolve();
        let index = self.current_index()?;
        let last = self.registry.last_index()?;

        let next = if index < last {
            index + 1
        } else if self.linear {
            trace!("already at the last step");
            return None;
        } else {
            0
        };

        let target = self.registry.identity_at(next)?;
        self.transition_to(&target)
    }

    /// Move to the preceding step, wrapping to the last unless linear
    pub fn transition_to_previous(&mut self) -> Option<Transition> {
        self.resolve();
        let index = self.current_index()?;
        let last = self.registry.last_index()?;

        let previous = if index > 0 {
            index - 1
        } else if self.linear {
            trace!("already at the first step");
            return None;
        } else {
            last
        };

        let target = self.registry.identity_at(previous)?;
        self.transition_to(&target)
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Identity of the current step, `None` when no steps are declared
    pub fn current_step(&self) -> Option<StepId> {
        self.current.clone()
    }

    /// Declared step identities in order
    pub fn steps(&self) -> Vec<StepId> {
        self.registry.steps()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
            .as_ref()
            .and_then(|id| self.registry.index_of(id))
    }

    pub fn has_next_step(&self) -> bool {
        match (self.current_index(), self.registry.last_index()) {
            (Some(index), Some(last)) => !self.linear || index < last,
            _ => false,
        }
    }

    pub fn has_previous_step(&self) -> bool {
        match self.current_index() {
            Some(index) => !self.linear || index > 0,
            None => false,
        }
    }

    /// Whether `id` names the current step
    pub fn is_active(&self, id: &StepId) -> bool {
        match (self.registry.resolve(id), self.current.as_ref()) {
            (Some(entry), Some(current)) => &entry.id == current,
            _ => false,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// Switch between linear and circular navigation.
    /// Only the behavior at the ends changes; the current step stays.
    pub fn set_linear(&mut self, linear: bool) {
        if self.linear != linear {
            debug!(linear, "navigation mode changed");
        }
        self.linear = linear;
    }

    /// Update the initial step. Ignored once the first resolution happened.
    pub fn set_initial_step(&mut self, initial_step: Option<StepId>) {
        if self.initial_consumed {
            trace!("initial step already consumed");
            return;
        }
        self.initial_step = initial_step;
    }

    /// Snapshot of the state handed to the rendering layer
    pub fn view(&self) -> StepView {
        StepView {
            current_step: self.current_step(),
            steps: self.steps(),
            has_next_step: self.has_next_step(),
            has_previous_step: self.has_previous_step(),
            linear: self.linear,
        }
    }

    /// Format step progress for display
    /// Returns something like: "plan > [build] > test"
    pub fn format_progress(&self) -> String {
        let current = self.current_index();
        self.steps()
            .iter()
            .enumerate()
            .map(|(i, id)| {
                if Some(i) == current {
                    format!("[{}]", id)
                } else {
                    id.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
