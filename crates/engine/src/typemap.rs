//! Process-wide string ↔ id intern table (C11).
//!
//! The teacher hard-codes its small, fixed set of interned op/type constants
//! at compile time via `pod::macros::flags!`/`id!` (see `protocol::consts`,
//! now dropped — spec.md's core has no compile-time-closed type set: new
//! interfaces can be registered at runtime). This generalizes the same
//! "intern once, exchange ids" principle to a runtime table, per spec.md
//! §4.11: "Thread-safety: writes serialised; lookups concurrent."

use std::collections::HashMap;
use std::sync::RwLock;

/// A process-wide intern table mapping structured type names (for example
/// `"PipeWire:Interface:Node"`) to stable 32-bit ids.
///
/// Reads take a shared lock (concurrent with each other); only a genuine
/// miss escalates to an insert, which takes the lock exclusively. Once a
/// name has been interned its id never changes, so repeated lookups of an
/// already-known name never contend with each other beyond the shared
/// read lock.
#[derive(Debug, Default)]
pub struct TypeMap {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_name: HashMap<String, u32>,
    by_id: Vec<String>,
}

impl TypeMap {
    /// Construct an empty type map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the id for `name`, interning it if this is the first time
    /// it's been seen.
    ///
    /// # Examples
    ///
    /// ```
    /// use engine::TypeMap;
    ///
    /// let map = TypeMap::new();
    /// let a = map.intern("PipeWire:Interface:Node");
    /// let b = map.intern("PipeWire:Interface:Node");
    /// assert_eq!(a, b);
    ///
    /// let c = map.intern("PipeWire:Interface:Port");
    /// assert_ne!(a, c);
    /// assert_eq!(map.get_type(a).as_deref(), Some("PipeWire:Interface:Node"));
    /// ```
    pub fn intern(&self, name: &str) -> u32 {
        if let Some(id) = self.get_id(name) {
            return id;
        }

        let mut inner = self.inner.write().expect("type map poisoned");

        // Another writer may have raced us between the read-lock miss above
        // and taking the write lock; check again before allocating.
        if let Some(&id) = inner.by_name.get(name) {
            return id;
        }

        let id = inner.by_id.len() as u32;
        inner.by_id.push(name.to_owned());
        inner.by_name.insert(name.to_owned(), id);
        tracing::debug!(name, id, "interned type");
        id
    }

    /// Look up the id for a name that may or may not already be interned,
    /// without inserting it.
    pub fn get_id(&self, name: &str) -> Option<u32> {
        let inner = self.inner.read().expect("type map poisoned");
        inner.by_name.get(name).copied()
    }

    /// Look up the name for a previously interned id.
    pub fn get_type(&self, id: u32) -> Option<String> {
        let inner = self.inner.read().expect("type map poisoned");
        inner.by_id.get(id as usize).cloned()
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.inner.read().expect("type map poisoned").by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let map = TypeMap::new();
        let a = map.intern("PipeWire:Interface:Node");
        let b = map.intern("PipeWire:Interface:Node");
        assert_eq!(a, b);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn round_trips_both_directions() {
        let map = TypeMap::new();
        let id = map.intern("PipeWire:Interface:Core");
        assert_eq!(map.get_id("PipeWire:Interface:Core"), Some(id));
        assert_eq!(map.get_type(id).as_deref(), Some("PipeWire:Interface:Core"));
    }

    #[test]
    fn unknown_name_or_id_is_none() {
        let map = TypeMap::new();
        assert_eq!(map.get_id("nonexistent"), None);
        assert_eq!(map.get_type(42), None);
    }
}
