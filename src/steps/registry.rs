//! Ordered registry of the currently declared steps

use std::collections::HashSet;

use tracing::{debug, warn};

use super::error::StepError;
use super::identity::StepId;

/// Opaque handle to a registered step, valid until the step is unregistered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepKey(u64);

/// A live step as seen by lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    pub key: StepKey,
    /// Canonical identity: the name, or the position for anonymous steps
    pub id: StepId,
    /// Position in declaration order
    pub index: usize,
}

impl StepEntry {
    pub fn is_anonymous(&self) -> bool {
        matches!(self.id, StepId::Position(_))
    }
}

#[derive(Debug, Clone)]
struct Slot {
    key: StepKey,
    name: Option<String>,
}

/// Live steps in declaration order.
///
/// Names are unique among live steps. Positions are recomputed on every
/// membership change, so anonymous identities follow the current order.
#[derive(Debug, Default)]
pub struct StepRegistry {
    slots: Vec<Slot>,
    next_key: u64,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_key(&mut self) -> StepKey {
        let key = StepKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// Append a step at the end of declaration order
    pub fn register(&mut self, name: Option<&str>) -> Result<StepKey, StepError> {
        let id = StepId::from_name(name);
        if let Some(StepId::Named(ref name)) = id {
            if self.position_of_name(name).is_some() {
                warn!(step = %name, "duplicate step declaration");
                return Err(StepError::duplicate(name.clone()));
            }
        }

        let key = self.allocate_key();
        let name = id.and_then(|id| id.name().map(str::to_string));
        debug!(step = ?name, index = self.slots.len(), "registered step");
        self.slots.push(Slot { key, name });
        Ok(key)
    }

    /// Remove a step. Returns false if it was already gone.
    pub fn unregister(&mut self, key: StepKey) -> bool {
        match self.slots.iter().position(|s| s.key == key) {
            Some(index) => {
                let slot = self.slots.remove(index);
                debug!(step = ?slot.name, index, "unregistered step");
                true
            }
            None => false,
        }
    }

    /// Replace membership with `declared`, in that order.
    ///
    /// Surviving named steps keep their keys, anonymous steps reuse the keys of
    /// the existing anonymous steps in order. On a duplicate name nothing changes.
    pub fn reconcile<S: AsRef<str>>(
        &mut self,
        declared: &[Option<S>],
    ) -> Result<Vec<StepKey>, StepError> {
        let names: Vec<Option<String>> = declared
            .iter()
            .map(|d| StepId::from_name(d.as_ref().map(S::as_ref)))
            .map(|id| id.and_then(|id| id.name().map(str::to_string)))
            .collect();

        let mut seen = HashSet::new();
        for name in names.iter().flatten() {
            if !seen.insert(name.as_str()) {
                warn!(step = %name, "duplicate step declaration");
                return Err(StepError::duplicate(name.clone()));
            }
        }

        let mut anonymous_keys = self
            .slots
            .iter()
            .filter(|s| s.name.is_none())
            .map(|s| s.key)
            .collect::<Vec<_>>()
            .into_iter();

        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let existing = match name {
                Some(ref name) => self
                    .position_of_name(name)
                    .map(|index| self.slots[index].key),
                None => anonymous_keys.next(),
            };
            let key = match existing {
                Some(key) => key,
                None => self.allocate_key(),
            };
            slots.push(Slot { key, name });
        }

        let keys = slots.iter().map(|s| s.key).collect();
        if self.slots.len() != slots.len() {
            debug!(from = self.slots.len(), to = slots.len(), "step membership changed");
        }
        self.slots = slots;
        Ok(keys)
    }

    /// Live step identities in declaration order
    pub fn steps(&self) -> Vec<StepId> {
        (0..self.slots.len())
            .filter_map(|i| self.identity_at(i))
            .collect()
    }

    /// Canonical identity of the step at `index`
    pub fn identity_at(&self, index: usize) -> Option<StepId> {
        self.slots.get(index).map(|slot| match slot.name {
            Some(ref name) => StepId::Named(name.clone()),
            None => StepId::Position(index),
        })
    }

    /// Look up a step by name, or by position for any step
    pub fn resolve(&self, id: &StepId) -> Option<StepEntry> {
        let index = self.index_of(id)?;
        Some(StepEntry {
            key: self.slots[index].key,
            id: self.identity_at(index)?,
            index,
        })
    }

    /// Look up a step by its key
    pub fn entry(&self, key: StepKey) -> Option<StepEntry> {
        let index = self.slots.iter().position(|s| s.key == key)?;
        Some(StepEntry {
            key,
            id: self.identity_at(index)?,
            index,
        })
    }

    pub fn index_of(&self, id: &StepId) -> Option<usize> {
        match id {
            StepId::Named(name) => self.position_of_name(name),
            StepId::Position(index) => (*index < self.slots.len()).then_some(*index),
        }
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn first_identity(&self) -> Option<StepId> {
        self.identity_at(0)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.slots.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn position_of_name(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> StepId {
        StepId::from(name)
    }

    #[test]
    fn test_register_preserves_declaration_order() {
        let mut registry = StepRegistry::new();
        registry.register(Some("first")).unwrap();
        registry.register(Some("second")).unwrap();
        registry.register(None).unwrap();

        assert_eq!(
            registry.steps(),
            vec![named("first"), named("second"), StepId::Position(2)]
        );
        assert_eq!(registry.first_identity(), Some(named("first")));
        assert_eq!(registry.last_index(), Some(2));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = StepRegistry::new();
        registry.register(Some("first")).unwrap();

        let err = registry.register(Some("first")).unwrap_err();
        assert_eq!(err, StepError::duplicate("first"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_reusable_after_unregister() {
        let mut registry = StepRegistry::new();
        let key = registry.register(Some("first")).unwrap();
        assert!(registry.unregister(key));
        assert!(registry.register(Some("first")).is_ok());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = StepRegistry::new();
        let key = registry.register(Some("first")).unwrap();
        registry.register(Some("second")).unwrap();

        assert!(registry.unregister(key));
        assert!(!registry.unregister(key));
        assert_eq!(registry.steps(), vec![named("second")]);
    }

    #[test]
    fn test_anonymous_positions_follow_membership() {
        let mut registry = StepRegistry::new();
        let first = registry.register(None).unwrap();
        registry.register(None).unwrap();

        assert_eq!(registry.steps(), vec![StepId::Position(0), StepId::Position(1)]);

        registry.unregister(first);
        assert_eq!(registry.steps(), vec![StepId::Position(0)]);
    }

    #[test]
    fn test_resolve_by_name_and_position() {
        let mut registry = StepRegistry::new();
        registry.register(Some("foo")).unwrap();
        registry.register(None).unwrap();

        let foo = registry.resolve(&named("foo")).unwrap();
        assert_eq!(foo.index, 0);
        assert!(!foo.is_anonymous());

        // A position resolves to the canonical identity of whatever sits there
        let by_position = registry.resolve(&StepId::Position(0)).unwrap();
        assert_eq!(by_position.id, named("foo"));

        let anonymous = registry.resolve(&StepId::Position(1)).unwrap();
        assert!(anonymous.is_anonymous());

        assert!(registry.resolve(&named("missing")).is_none());
        assert!(registry.resolve(&StepId::Position(2)).is_none());
    }

    #[test]
    fn test_reconcile_keeps_surviving_keys() {
        let mut registry = StepRegistry::new();
        let foo = registry.register(Some("foo")).unwrap();
        let bar = registry.register(Some("bar")).unwrap();

        let keys = registry
            .reconcile(&[Some("foo"), Some("bar"), Some("baz")])
            .unwrap();
        assert_eq!(&keys[..2], &[foo, bar]);
        assert_eq!(registry.steps(), vec![named("foo"), named("bar"), named("baz")]);

        registry.reconcile(&[Some("foo")]).unwrap();
        assert_eq!(registry.steps(), vec![named("foo")]);
        assert_eq!(registry.entry(foo).map(|e| e.index), Some(0));
        assert!(registry.entry(bar).is_none());
    }

    #[test]
    fn test_reconcile_rejects_duplicates_without_changes() {
        let mut registry = StepRegistry::new();
        registry.register(Some("foo")).unwrap();

        let result = registry.reconcile(&[Some("bar"), Some("bar")]);
        assert_eq!(result, Err(StepError::duplicate("bar")));
        assert_eq!(registry.steps(), vec![named("foo")]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = StepRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.first_identity(), None);
        assert_eq!(registry.last_index(), None);
        assert!(registry.steps().is_empty());
    }
}
