pub mod unique_linked_hash_set;
pub use unique_linked_hash_set::UniqueLinkedHashSet;
