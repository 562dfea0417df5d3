//! Mutation notifications.
//!
//! Every database method that replaces or frees an entity calls the matching
//! method here *before* the entity is freed. While the call runs, both the old
//! and (for replacements) the new entity still resolve. Anything that keeps
//! ids into the database across edits implements this trait and is passed to
//! the mutating call.

use crate::ids::{CellId, GroupId, ObjId, PropId};

pub trait DbObserver {
    /// `old` is being replaced by `new`, or deleted when `new` is `None`.
    /// Properties of `old` move to `new` on replacement.
    fn entity_replaced(&mut self, old: ObjId, new: Option<ObjId>);

    /// The property `old` on `owner` is being replaced by `new`, or removed.
    fn property_replaced(&mut self, owner: ObjId, old: PropId, new: Option<PropId>);

    /// Every object, property, instance and extraction group of `cell` is
    /// about to be freed. The cell itself survives, empty.
    fn cell_scope_cleared(&mut self, cell: CellId);

    /// Every circuit entity recorded in `group` is about to be freed. The
    /// group survives, empty.
    fn group_descriptor_cleared(&mut self, group: GroupId);

    /// The whole database is about to be emptied.
    fn global_clear(&mut self);
}

/// Observer for edits made while nothing holds ids into the database.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl DbObserver for NullObserver {
    fn entity_replaced(&mut self, _old: ObjId, _new: Option<ObjId>) {}
    fn property_replaced(&mut self, _owner: ObjId, _old: PropId, _new: Option<PropId>) {}
    fn cell_scope_cleared(&mut self, _cell: CellId) {}
    fn group_descriptor_cleared(&mut self, _group: GroupId) {}
    fn global_clear(&mut self) {}
}
