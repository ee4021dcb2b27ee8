//! Cell interning.
//!
//! The [`CellRegistry`] guarantees that every `(i, j)` pair maps to exactly
//! one canonical [`Cell`] allocation for the lifetime of the registry.
//! Callers can compare canonical cells by pointer ([`Arc::ptr_eq`]) or by
//! value and always get the same answer.
//!
//! The map itself is private: the only way in is [`CellRegistry::get_or_create`].

use std::collections::HashMap;
use std::sync::Arc;

use geocoin_types::Cell;

/// A canonical, shared cell instance.
pub type CanonicalCell = Arc<Cell>;

/// Interning table from cell coordinates to their canonical instance.
#[derive(Debug, Default)]
pub struct CellRegistry {
    known: HashMap<Cell, CanonicalCell>,
}

impl CellRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical instance for `cell`, interning it on first use.
    pub fn get_or_create(&mut self, cell: Cell) -> CanonicalCell {
        Arc::clone(
            self.known
                .entry(cell)
                .or_insert_with(|| Arc::new(cell)),
        )
    }

    /// Whether `cell` has already been interned.
    pub fn contains(&self, cell: Cell) -> bool {
        self.known.contains_key(&cell)
    }

    /// Number of interned cells.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether no cell has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_coordinates_share_one_instance() {
        let mut registry = CellRegistry::new();
        let a = registry.get_or_create(Cell::new(3, 4));
        let b = registry.get_or_create(Cell::new(3, 4));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_coordinates_get_distinct_instances() {
        let mut registry = CellRegistry::new();
        let a = registry.get_or_create(Cell::new(3, 4));
        let b = registry.get_or_create(Cell::new(4, 3));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn first_instance_survives_later_lookups() {
        let mut registry = CellRegistry::new();
        let first = registry.get_or_create(Cell::new(0, 0));
        for _ in 0..10 {
            let again = registry.get_or_create(Cell::new(0, 0));
            assert!(Arc::ptr_eq(&first, &again));
        }
        assert!(registry.contains(Cell::new(0, 0)));
        assert!(!registry.contains(Cell::new(0, 1)));
    }
}
