//! Deterministic fast hashing shared by the database and the handle table.

use ahash::RandomState;
use hashbrown::{HashMap, HashSet};

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;
pub type FastHashSet<T> = HashSet<T, RandomState>;

/// Fixed seeds keep iteration order reproducible between runs.
pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_set_with_capacity<T>(cap: usize) -> FastHashSet<T> {
    HashSet::with_capacity_and_hasher(cap, fast_hasher())
}
