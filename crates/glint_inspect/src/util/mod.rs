//! Hashing utilities shared by the engine's caches.

mod hash;
mod typeid_map;

pub use hash::{FixedHashState, NoOpHashState, NoOpHasher};
pub use typeid_map::TypeIdMap;

/// A [`hashbrown::HashMap`] with a fixed-seed hasher.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] with a fixed-seed hasher.
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;
