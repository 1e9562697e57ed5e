//! External current-step bindings owned by the host

use std::cell::RefCell;
use std::rc::Rc;

use super::identity::StepId;

/// Host-owned value holding a step identity.
///
/// Clones share the same value, so the host keeps one clone and hands another
/// to the manager through a [`Binding`].
#[derive(Debug, Clone, Default)]
pub struct StepCell(Rc<RefCell<Option<StepId>>>);

impl StepCell {
    /// A blank name is stored as unset
    pub fn new(value: Option<StepId>) -> Self {
        Self(Rc::new(RefCell::new(value.filter(|id| !id.is_blank()))))
    }

    pub fn get(&self) -> Option<StepId> {
        self.0.borrow().clone()
    }

    /// Store a value; a blank name clears the cell, like an empty query param
    pub fn set(&self, value: impl Into<StepId>) {
        let value = value.into();
        *self.0.borrow_mut() = (!value.is_blank()).then_some(value);
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }

    fn replace(&self, value: Option<StepId>) {
        *self.0.borrow_mut() = value.filter(|id| !id.is_blank());
    }
}

/// How the manager's current step is tied to a host value
#[derive(Debug, Clone, Default)]
pub enum Binding {
    /// No external value; the manager owns the current step
    #[default]
    Absent,
    /// Two-way: read on every resolution, written on every transition
    Mutable(StepCell),
    /// One-way: read on every resolution, never written
    ReadOnly(StepCell),
}

impl Binding {
    pub fn mutable(cell: &StepCell) -> Self {
        Binding::Mutable(cell.clone())
    }

    pub fn read_only(cell: &StepCell) -> Self {
        Binding::ReadOnly(cell.clone())
    }

    /// Read-only binding to a constant value
    pub fn fixed(id: impl Into<StepId>) -> Self {
        Binding::ReadOnly(StepCell::new(Some(id.into())))
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Binding::Absent)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Binding::Mutable(_))
    }

    /// Current host value, `None` when absent or unset
    pub fn value(&self) -> Option<StepId> {
        match self {
            Binding::Absent => None,
            Binding::Mutable(cell) | Binding::ReadOnly(cell) => cell.get(),
        }
    }

    /// Propagate a value outward. Returns true if the host value was written.
    pub fn write(&self, value: Option<StepId>) -> bool {
        match self {
            Binding::Mutable(cell) => {
                cell.replace(value);
                true
            }
            Binding::Absent | Binding::ReadOnly(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_clones_share_value() {
        let host = StepCell::default();
        let bound = host.clone();
        bound.set("second");
        assert_eq!(host.get(), Some(StepId::from("second")));
        host.clear();
        assert_eq!(bound.get(), None);
    }

    #[test]
    fn test_blank_value_is_unset() {
        let host = StepCell::new(Some(StepId::from("first")));
        host.set("");
        assert_eq!(host.get(), None);

        assert_eq!(StepCell::new(Some(StepId::from("  "))).get(), None);
        assert_eq!(Binding::fixed("").value(), None);
    }

    #[test]
    fn test_mutable_binding_writes() {
        let host = StepCell::new(Some(StepId::from("first")));
        let binding = Binding::mutable(&host);

        assert!(binding.is_writable());
        assert!(binding.write(Some(StepId::from("second"))));
        assert_eq!(host.get(), Some(StepId::from("second")));
    }

    #[test]
    fn test_read_only_binding_does_not_write() {
        let host = StepCell::new(Some(StepId::from("first")));
        let binding = Binding::read_only(&host);

        assert!(binding.is_present());
        assert!(!binding.write(Some(StepId::from("second"))));
        assert_eq!(binding.value(), Some(StepId::from("first")));
    }

    #[test]
    fn test_absent_binding() {
        let binding = Binding::default();
        assert!(!binding.is_present());
        assert_eq!(binding.value(), None);
        assert!(!binding.write(Some(StepId::from("first"))));
    }

    #[test]
    fn test_fixed_binding() {
        let binding = Binding::fixed("second");
        assert_eq!(binding.value(), Some(StepId::from("second")));
        assert!(!binding.is_writable());
    }
}
