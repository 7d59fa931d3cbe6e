use linked_hash_map::LinkedHashMap;
use std::hash::Hash;

/// An insertion-ordered set. Inserting a value that is already present is a
/// no-op and leaves the original position untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueLinkedHashSet<T>(LinkedHashMap<T, ()>)
where
    T: Hash + Eq;

impl<T> Default for UniqueLinkedHashSet<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UniqueLinkedHashSet<T>
where
    T: Hash + Eq,
{
    pub fn new() -> Self {
        Self(LinkedHashMap::new())
    }

    /// Returns true if the value was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.0.contains_key(&value) {
            return false;
        }
        self.0.insert(value, ());
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.keys()
    }
}
