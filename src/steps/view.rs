//! Snapshot of a step group handed to the rendering layer

use serde::Serialize;

use super::identity::StepId;

/// What the rendering layer needs to paint one step group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub current_step: Option<StepId>,
    pub steps: Vec<StepId>,
    pub has_next_step: bool,
    pub has_previous_step: bool,
    pub linear: bool,
}

impl StepView {
    pub fn is_active(&self, id: &StepId) -> bool {
        self.current_step.as_ref() == Some(id)
    }

    /// One flag per declared step, in declaration order
    pub fn active_flags(&self) -> Vec<bool> {
        self.steps.iter().map(|id| self.is_active(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flags() {
        let view = StepView {
            current_step: Some(StepId::from("bar")),
            steps: vec![StepId::from("foo"), StepId::from("bar")],
            has_next_step: false,
            has_previous_step: true,
            linear: true,
        };
        assert_eq!(view.active_flags(), vec![false, true]);
    }

    #[test]
    fn test_serializes_for_display() {
        let view = StepView {
            current_step: Some(StepId::Position(0)),
            steps: vec![StepId::Position(0), StepId::from("named")],
            has_next_step: true,
            has_previous_step: false,
            linear: true,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["current_step"], 0);
        assert_eq!(json["steps"][1], "named");
        assert_eq!(json["has_next_step"], true);
    }
}
