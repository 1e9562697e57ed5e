//! Scripted walks over a configured step group, used by the `stepper` binary

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::WizardConfig;
use crate::steps::{StepCell, StepError, StepId, StepManager, StepView};

/// One scripted host event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `next`
    Next,
    /// `prev`
    Previous,
    /// `to:<name>` or `to:#<n>`
    To(StepId),
    /// `add:<name>`: append a step to the declared list (empty name = anonymous)
    Add(String),
    /// `remove:<name>`: drop a step from the declared list
    Remove(String),
    /// `linear:<true|false>`
    Linear(bool),
    /// `set:<name>`: the host writes its bound value
    Set(StepId),
    /// `clear`: the host clears its bound value
    Clear,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match (verb, arg) {
            ("next", None) => Ok(Action::Next),
            ("prev" | "previous", None) => Ok(Action::Previous),
            ("clear", None) => Ok(Action::Clear),
            ("to", Some(target)) => Ok(Action::To(parse_id(target))),
            ("set", Some(target)) => Ok(Action::Set(parse_id(target))),
            ("add", Some(name)) => Ok(Action::Add(name.to_string())),
            ("remove", Some(name)) => Ok(Action::Remove(name.to_string())),
            ("linear", Some(flag)) => flag
                .parse()
                .map(Action::Linear)
                .map_err(|_| format!("invalid linear flag '{}'", flag)),
            _ => Err(format!("unknown action '{}'", s)),
        }
    }
}

fn parse_id(s: &str) -> StepId {
    match s.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Next => write!(f, "next"),
            Action::Previous => write!(f, "prev"),
            Action::To(id) => write!(f, "to:{}", id),
            Action::Add(name) => write!(f, "add:{}", name),
            Action::Remove(name) => write!(f, "remove:{}", name),
            Action::Linear(flag) => write!(f, "linear:{}", flag),
            Action::Set(id) => write!(f, "set:{}", id),
            Action::Clear => write!(f, "clear"),
        }
    }
}

/// A step group driven like a host would drive it: a backing list of step
/// names re-declared on every change, plus an optional bound value.
pub struct Walk {
    manager: StepManager,
    declared: Vec<String>,
    host: Option<StepCell>,
}

impl Walk {
    pub fn from_config(wizard: &WizardConfig) -> Result<Self> {
        let (manager, host) = wizard.build_manager()?;
        Ok(Self {
            manager,
            declared: wizard.steps.clone(),
            host,
        })
    }

    pub fn manager(&self) -> &StepManager {
        &self.manager
    }

    /// Current host value, if the group is bound
    pub fn host_value(&self) -> Option<StepId> {
        self.host.as_ref().and_then(StepCell::get)
    }

    pub fn view(&self) -> StepView {
        self.manager.view()
    }

    /// Apply one action and return the resulting view
    pub fn apply(&mut self, action: &Action) -> Result<StepView> {
        match action {
            Action::Next => {
                self.manager.transition_to_next();
            }
            Action::Previous => {
                self.manager.transition_to_previous();
            }
            Action::To(target) => {
                self.manager.transition_to(target);
            }
            Action::Add(name) => {
                self.declared.push(name.clone());
                if let Err(err) = self.redeclare() {
                    // Keep the backing list in step with what the registry accepted
                    self.declared.pop();
                    return Err(err).with_context(|| format!("Failed to add step '{}'", name));
                }
            }
            Action::Remove(name) => {
                if let Some(index) = self.declared.iter().position(|n| n == name) {
                    self.declared.remove(index);
                }
                self.redeclare()
                    .with_context(|| format!("Failed to remove step '{}'", name))?;
            }
            Action::Linear(flag) => self.manager.set_linear(*flag),
            Action::Set(id) => {
                if let Some(host) = &self.host {
                    host.set(id.clone());
                }
                self.manager.observe();
            }
            Action::Clear => {
                if let Some(host) = &self.host {
                    host.clear();
                }
                self.manager.observe();
            }
        }

        info!(action = %action, current = ?self.manager.current_step(), "applied action");
        Ok(self.manager.view())
    }

    fn redeclare(&mut self) -> Result<(), StepError> {
        let mut cycle = self.manager.begin_cycle();
        for name in &self.declared {
            cycle.step(Some(name.as_str()));
        }
        cycle.finish().map(|_| ())
    }
}
