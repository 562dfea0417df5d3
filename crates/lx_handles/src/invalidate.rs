//! Invalidation protocol.
//!
//! The database calls these entry points before it frees or replaces
//! anything. Each one scans the whole table: live handle counts are small,
//! and the scan spares entities from keeping back-pointers to handles.
//! Borrowed entries are repaired in place where a replacement exists;
//! otherwise the affected handle is closed. Owned payloads (text, copied
//! shapes, resources, jobs) are never touched.

use lx_core::{CellId, DbObserver, GroupId, ObjId, PropId};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::id::HandleId;
use crate::kind::Mode;
use crate::payload::Payload;
use crate::registry::Registry;

enum Verdict {
    Keep,
    Close,
}

impl Verdict {
    /// Close a sequence that an edit just emptied.
    fn after_edit(touched: usize, now_empty: bool) -> Verdict {
        if touched > 0 && now_empty {
            Verdict::Close
        } else {
            Verdict::Keep
        }
    }
}

impl Registry {
    /// Visit every record; close those for which `visit` says so.
    fn sweep(
        &mut self,
        reason: &'static str,
        mut visit: impl FnMut(&mut Payload) -> Verdict,
    ) -> usize {
        let doomed: SmallVec<[HandleId; 8]> = self
            .records_mut()
            .filter_map(|rec| match visit(rec.payload_mut()) {
                Verdict::Close => Some(rec.id()),
                Verdict::Keep => None,
            })
            .collect();
        for id in &doomed {
            self.force_close(*id, reason);
        }
        doomed.len()
    }
}

impl DbObserver for Registry {
    fn entity_replaced(&mut self, old: ObjId, new: Option<ObjId>) {
        let closed = self.sweep("entity replaced", |payload| match payload {
            Payload::Objects(o) => {
                let touched = o.seq.replace_or_splice(old, new);
                Verdict::after_edit(touched, o.seq.is_empty())
            }
            Payload::Props(p) if p.owner == old => match new {
                Some(new) => {
                    p.owner = new;
                    Verdict::Keep
                }
                None => Verdict::Close,
            },
            _ => Verdict::Keep,
        });
        debug!(%old, new = ?new, closed, "entity replaced");
    }

    fn property_replaced(&mut self, owner: ObjId, old: PropId, new: Option<PropId>) {
        let closed = self.sweep("property replaced", |payload| match payload {
            Payload::Props(p) if p.owner == owner => {
                let touched = p.seq.replace_or_splice(old, new);
                Verdict::after_edit(touched, p.seq.is_empty())
            }
            _ => Verdict::Keep,
        });
        debug!(%owner, %old, new = ?new, closed, "property replaced");
    }

    fn cell_scope_cleared(&mut self, cell: CellId) {
        let closed = self.sweep("cell cleared", |payload| {
            if payload.mode() == Mode::Borrowed && payload.cell_anchor() == Some(cell) {
                Verdict::Close
            } else {
                Verdict::Keep
            }
        });
        debug!(%cell, closed, "cell scope cleared");
    }

    fn group_descriptor_cleared(&mut self, group: GroupId) {
        let closed = self.sweep("group cleared", |payload| {
            if payload.group_anchor() == Some(group) {
                Verdict::Close
            } else {
                Verdict::Keep
            }
        });
        debug!(%group, closed, "group descriptor cleared");
    }

    fn global_clear(&mut self) {
        let closed = self.sweep("global clear", |payload| match payload.mode() {
            Mode::Borrowed => Verdict::Close,
            Mode::Owned => Verdict::Keep,
        });
        info!(closed, survivors = self.live_count(), "global clear");
    }
}
