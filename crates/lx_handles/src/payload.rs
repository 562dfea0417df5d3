//! The closed set of payloads a handle can carry.

use lx_core::{
    CellId, ContactId, Database, DeviceId, FastHashSet, GroupId, NodeId, Shape, SubcktId, TermId,
};

use crate::entry::{Entry, EntryKey, Keyed};
use crate::errors::HandleError;
use crate::generator::Generator;
use crate::job::HostJob;
use crate::kind::{HandleKind, Mode};
use crate::resource::Resource;
use crate::seq::{CircuitSeq, ObjSeq, PropSeq, Seq};

pub enum Payload {
    /// Owned strings.
    Text(Seq<String>),
    /// Borrowed objects of one cell.
    Objects(ObjSeq),
    /// Owned, transformed duplicates of objects.
    Shapes(Seq<Shape>),
    /// Borrowed properties of one object.
    Props(PropSeq),
    Nodes(CircuitSeq<NodeId>),
    Terminals(CircuitSeq<TermId>),
    Devices(CircuitSeq<DeviceId>),
    Contacts(CircuitSeq<ContactId>),
    Subckts(CircuitSeq<SubcktId>),
    Generator(Box<Generator>),
    Resource(Resource),
    Job(Box<dyn HostJob>),
}

/// Run `$body` with `$s` bound to the sequence inside any list-shaped
/// payload, or evaluate `$other` for the rest.
macro_rules! with_seq {
    ($payload:expr, |$s:ident| $body:expr, _ => $other:expr) => {
        match $payload {
            Payload::Text($s) => $body,
            Payload::Shapes($s) => $body,
            Payload::Objects(ObjSeq { seq: $s, .. }) => $body,
            Payload::Props(PropSeq { seq: $s, .. }) => $body,
            Payload::Nodes(CircuitSeq { seq: $s, .. }) => $body,
            Payload::Terminals(CircuitSeq { seq: $s, .. }) => $body,
            Payload::Devices(CircuitSeq { seq: $s, .. }) => $body,
            Payload::Contacts(CircuitSeq { seq: $s, .. }) => $body,
            Payload::Subckts(CircuitSeq { seq: $s, .. }) => $body,
            Payload::Generator(_) | Payload::Resource(_) | Payload::Job(_) => $other,
        }
    };
}

impl Payload {
    pub fn kind(&self) -> HandleKind {
        match self {
            Payload::Text(_) => HandleKind::Text,
            Payload::Objects(_) => HandleKind::Objects,
            Payload::Shapes(_) => HandleKind::Shapes,
            Payload::Props(_) => HandleKind::Props,
            Payload::Nodes(_) => HandleKind::Nodes,
            Payload::Terminals(_) => HandleKind::Terminals,
            Payload::Devices(_) => HandleKind::Devices,
            Payload::Contacts(_) => HandleKind::Contacts,
            Payload::Subckts(_) => HandleKind::Subckts,
            Payload::Generator(_) => HandleKind::Generator,
            Payload::Resource(_) => HandleKind::Resource,
            Payload::Job(_) => HandleKind::Job,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Payload::Text(_) | Payload::Shapes(_) | Payload::Resource(_) | Payload::Job(_) => {
                Mode::Owned
            }
            _ => Mode::Borrowed,
        }
    }

    /// Entries left for list-shaped payloads.
    pub fn remaining(&self) -> Option<usize> {
        with_seq!(self, |s| Some(s.len()), _ => None)
    }

    pub fn is_drained(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Identity of the entry the next step would yield.
    pub fn head(&self) -> Option<EntryKey> {
        with_seq!(self, |s| s.peek().map(Keyed::entry_key), _ => None)
    }

    /// Add the identity of every remaining entry to `into`. Returns `false`
    /// for payloads that have no enumerable entries.
    pub fn collect_keys(&self, into: &mut FastHashSet<EntryKey>) -> bool {
        with_seq!(
            self,
            |s| {
                into.extend(s.iter().map(Keyed::entry_key));
                true
            },
            _ => false
        )
    }

    /// Take the head entry of a list-shaped payload.
    pub(crate) fn pop_entry(&mut self) -> Option<Entry> {
        with_seq!(self, |s| s.pop().map(Entry::from), _ => None)
    }

    /// Cell whose clearing must close this handle.
    pub fn cell_anchor(&self) -> Option<CellId> {
        match self {
            Payload::Objects(o) => Some(o.cell),
            Payload::Props(p) => Some(p.cell),
            Payload::Nodes(c) => Some(c.cell),
            Payload::Terminals(c) => Some(c.cell),
            Payload::Devices(c) => Some(c.cell),
            Payload::Contacts(c) => Some(c.cell),
            Payload::Subckts(c) => Some(c.cell),
            Payload::Generator(g) => Some(g.cell()),
            _ => None,
        }
    }

    /// Group descriptor whose clearing must close this handle.
    pub fn group_anchor(&self) -> Option<GroupId> {
        match self {
            Payload::Nodes(c) => Some(c.group),
            Payload::Terminals(c) => Some(c.group),
            Payload::Devices(c) => Some(c.group),
            Payload::Contacts(c) => Some(c.group),
            Payload::Subckts(c) => Some(c.group),
            _ => None,
        }
    }

    /// Whether any borrowed entry no longer resolves in `db`.
    pub fn is_dangling(&self, db: &Database) -> bool {
        match self {
            Payload::Objects(o) => o
                .seq
                .iter()
                .any(|id| db.object(*id).is_none_or(|obj| obj.cell != o.cell)),
            Payload::Props(p) => p
                .seq
                .iter()
                .any(|id| db.property(*id).is_none_or(|prop| prop.owner != p.owner)),
            Payload::Nodes(c) => c
                .seq
                .iter()
                .any(|id| db.node(*id).is_none_or(|n| n.group != c.group)),
            Payload::Terminals(c) => c
                .seq
                .iter()
                .any(|id| db.terminal(*id).is_none_or(|t| t.group != c.group)),
            Payload::Devices(c) => c
                .seq
                .iter()
                .any(|id| db.device(*id).is_none_or(|d| d.group != c.group)),
            Payload::Contacts(c) => c
                .seq
                .iter()
                .any(|id| db.contact(*id).is_none_or(|k| k.group != c.group)),
            Payload::Subckts(c) => c
                .seq
                .iter()
                .any(|id| db.subckt(*id).is_none_or(|s| s.group != c.group)),
            _ => false,
        }
    }

    /// Free whatever the payload still holds. Borrowed entries are only
    /// dropped from the list; owned ones are released with it.
    pub(crate) fn dispose(self) -> Result<(), HandleError> {
        match self {
            Payload::Resource(r) => r.dispose(),
            Payload::Job(mut job) => job.finish().map_err(HandleError::JobFinish),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("Payload");
        d.field("kind", &self.kind()).field("mode", &self.mode());
        if let Some(n) = self.remaining() {
            d.field("remaining", &n);
        }
        match self {
            Payload::Generator(g) => d.field("generator", g),
            Payload::Resource(r) => d.field("resource", &r.describe()),
            Payload::Job(j) => d.field("job", &j.kind().name()),
            _ => &mut d,
        };
        d.finish()
    }
}
