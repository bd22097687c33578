//! String interning for operation types.
//!
//! Converts operation type names to dense integer IDs so resource capacity
//! and latency lookups become plain vector indexing.

use rustc_hash::FxHashMap;

/// Interned operation type ID (u32 for compact storage and fast hashing).
pub type TypeId = u32;

/// Interner that maps operation type names to integers.
#[derive(Debug, Clone)]
pub struct TypeInterner {
    to_int: FxHashMap<String, TypeId>,
    from_int: Vec<String>,
}

impl TypeInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Build an interner whose IDs follow the sorted order of `names`.
    ///
    /// Duplicates are collapsed, so the same set of names always yields the
    /// same IDs regardless of input order.
    pub fn from_sorted<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sorted: Vec<&str> = names.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut interner = Self::with_capacity(sorted.len());
        for name in sorted {
            interner.intern(name);
        }
        interner
    }

    /// Intern a type name, returning its integer ID.
    /// If already interned, returns the existing ID.
    pub fn intern(&mut self, s: &str) -> TypeId {
        if let Some(&id) = self.to_int.get(s) {
            return id;
        }
        let id = self.from_int.len() as TypeId;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        id
    }

    /// Get the integer ID for a type name, if it exists.
    #[inline]
    pub fn get(&self, s: &str) -> Option<TypeId> {
        self.to_int.get(s).copied()
    }

    /// Get the type name for an integer ID.
    #[inline]
    pub fn resolve(&self, id: TypeId) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
