//! Task-label interning for the per-day assignment matrix.
//!
//! The matrix stores `LabelId`s instead of strings so a day's worth of
//! employees x slots stays a flat vector of small integers.

use rustc_hash::FxHashMap;

/// Interned task label.
pub type LabelId = u32;

/// Maps task labels to integers and back.
#[derive(Debug, Clone, Default)]
pub struct LabelInterner {
    to_id: FxHashMap<String, LabelId>,
    labels: Vec<String>,
}

impl LabelInterner {
    /// Intern a label, returning the existing id if already seen.
    pub fn intern(&mut self, label: &str) -> LabelId {
        if let Some(&id) = self.to_id.get(label) {
            return id;
        }
        let id = self.labels.len() as LabelId;
        self.labels.push(label.to_string());
        self.to_id.insert(label.to_string(), id);
        id
    }

    #[inline]
    pub fn resolve(&self, id: LabelId) -> Option<&str> {
        self.labels.get(id as usize).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = LabelInterner::default();
        let dispatch = interner.intern("Dispatch");
        let lunch = interner.intern("Lunch");
        let again = interner.intern("Dispatch");
        let empty = interner.intern("");

        assert_eq!(dispatch, again);
        assert_ne!(dispatch, lunch);
        assert_eq!(empty, 2);
        assert_eq!(interner.resolve(lunch), Some("Lunch"));
        assert_eq!(interner.resolve(empty), Some(""));
        assert_eq!(interner.resolve(99), None);
    }
}
