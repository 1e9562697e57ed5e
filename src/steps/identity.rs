//! Step identity: a declared name, or a position for anonymous steps

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of a step
///
/// Named steps are identified by their name. Anonymous steps have no name and
/// are identified by their 0-based position in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    /// Step declared with an explicit name
    Named(String),
    /// Anonymous step, identified by declaration position
    Position(usize),
}

impl StepId {
    /// Build an identity from an optional declared name.
    /// Returns `None` for a missing or blank name (an anonymous declaration).
    pub fn from_name(name: Option<&str>) -> Option<Self> {
        name.map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| StepId::Named(n.to_string()))
    }

    /// A named id whose name is blank. It never resolves to a declared step.
    pub fn is_blank(&self) -> bool {
        matches!(self, StepId::Named(name) if name.trim().is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            StepId::Named(name) => Some(name),
            StepId::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            StepId::Named(_) => None,
            StepId::Position(index) => Some(*index),
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Named(name) => write!(f, "{}", name),
            StepId::Position(index) => write!(f, "#{}", index),
        }
    }
}

/// Parses `#<n>` as a position and anything else as a name
impl FromStr for StepId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(index) = s.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            return Ok(StepId::Position(index));
        }
        Ok(StepId::Named(s.to_string()))
    }
}

/// Builds a `Named` id as given. Declarations go through [`StepId::from_name`],
/// so a blank name built here never matches a declared step.
impl From<&str> for StepId {
    fn from(name: &str) -> Self {
        StepId::Named(name.to_string())
    }
}

impl From<String> for StepId {
    fn from(name: String) -> Self {
        StepId::Named(name)
    }
}

impl From<usize> for StepId {
    fn from(index: usize) -> Self {
        StepId::Position(index)
    }
}
