//! Item identity and interning.
//!
//! Items are referred to by name in configuration files and by dense
//! integer id everywhere else. Ids are assigned in first-appearance
//! order across initial stocks, then process needs, then process
//! results, so that a given configuration always produces the same
//! numbering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Dense item identifier, valid as an index into per-item vectors.
pub type ItemId = usize;

/// A named quantity, as it appears in a configuration file.
///
/// Used on the name-based side of parsing only; after analysis all
/// item references are `(ItemId, i64)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Item name.
    pub name: String,
    /// Quantity needed or produced (always > 0 in a valid file).
    pub qty: i64,
}

impl RawItem {
    /// Creates a named quantity.
    pub fn new(name: impl Into<String>, qty: i64) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }
}

/// Bijection between item names and dense ids.
///
/// Lookup by name is `O(1)`; the reverse direction is a plain index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTable {
    name_to_id: HashMap<String, ItemId>,
    id_to_name: Vec<String>,
}

impl ItemTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, interning it if unseen.
    pub fn intern(&mut self, name: &str) -> ItemId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = self.id_to_name.len();
        self.id_to_name.push(name.to_string());
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Returns the id for `name`, or `None` if it was never interned.
    pub fn lookup(&self, name: &str) -> Option<ItemId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the name for `id`.
    pub fn name(&self, id: ItemId) -> &str {
        &self.id_to_name[id]
    }

    /// Number of interned items.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Whether no items have been interned.
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    /// Iterates `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &str)> {
        self.id_to_name.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_dense_ids() {
        let mut table = ItemTable::new();
        assert_eq!(table.intern("iron"), 0);
        assert_eq!(table.intern("coal"), 1);
        assert_eq!(table.intern("iron"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_and_name_roundtrip() {
        let mut table = ItemTable::new();
        let id = table.intern("plank");
        assert_eq!(table.lookup("plank"), Some(id));
        assert_eq!(table.name(id), "plank");
        assert_eq!(table.lookup("chair"), None);
    }
}
