//! Membership testing for set-style script operations.

use lx_core::{FastHashSet, fast_hasher};

use crate::entry::EntryKey;
use crate::id::HandleId;
use crate::registry::Registry;

/// Snapshot of the entry identities one handle held when the tester was
/// built. Lives independently of that handle and of the database; dropping
/// it frees only the set.
#[derive(Debug, Clone)]
pub struct UniquenessTester {
    keys: FastHashSet<EntryKey>,
    supported: bool,
}

impl UniquenessTester {
    /// Snapshot `id`. Generators, resources, jobs and absent handles give a
    /// tester that never reports a match.
    pub fn build(registry: &Registry, id: HandleId) -> Self {
        let mut keys = FastHashSet::with_hasher(fast_hasher());
        let supported = registry
            .resolve(id)
            .is_some_and(|rec| rec.payload().collect_keys(&mut keys));
        Self { keys, supported }
    }

    /// Whether the head entry of `other` is already in the snapshot.
    pub fn test(&self, registry: &Registry, other: HandleId) -> bool {
        self.supported
            && registry
                .peek(other)
                .is_some_and(|key| self.keys.contains(&key))
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
