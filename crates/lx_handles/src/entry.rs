//! Values produced by stepping a handle.

use lx_core::{ContactId, DeviceId, NodeId, ObjId, PropId, Shape, SubcktId, TermId};

use crate::id::HandleId;

/// One item taken off a handle. Owned variants (`Text`, `Shape`) transfer
/// to the caller; the rest are ids into the live database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    Object(ObjId),
    Shape(Shape),
    Property(PropId),
    Node(NodeId),
    Terminal(TermId),
    Device(DeviceId),
    Contact(ContactId),
    Subckt(SubcktId),
    /// A fresh single-entry handle wrapping one search match.
    Handle(HandleId),
}

/// Hashable identity of an entry: value equality for owned text and shapes,
/// id identity for database references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    Text(String),
    Object(ObjId),
    Shape(Shape),
    Property(PropId),
    Node(NodeId),
    Terminal(TermId),
    Device(DeviceId),
    Contact(ContactId),
    Subckt(SubcktId),
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Entry::Text(s)
    }
}

impl From<ObjId> for Entry {
    fn from(id: ObjId) -> Self {
        Entry::Object(id)
    }
}

impl From<Shape> for Entry {
    fn from(s: Shape) -> Self {
        Entry::Shape(s)
    }
}

impl From<PropId> for Entry {
    fn from(id: PropId) -> Self {
        Entry::Property(id)
    }
}

impl From<NodeId> for Entry {
    fn from(id: NodeId) -> Self {
        Entry::Node(id)
    }
}

impl From<TermId> for Entry {
    fn from(id: TermId) -> Self {
        Entry::Terminal(id)
    }
}

impl From<DeviceId> for Entry {
    fn from(id: DeviceId) -> Self {
        Entry::Device(id)
    }
}

impl From<ContactId> for Entry {
    fn from(id: ContactId) -> Self {
        Entry::Contact(id)
    }
}

impl From<SubcktId> for Entry {
    fn from(id: SubcktId) -> Self {
        Entry::Subckt(id)
    }
}

/// Entry types that can report their identity without being consumed.
pub trait Keyed {
    fn entry_key(&self) -> EntryKey;
}

impl Keyed for String {
    fn entry_key(&self) -> EntryKey {
        EntryKey::Text(self.clone())
    }
}

impl Keyed for Shape {
    fn entry_key(&self) -> EntryKey {
        EntryKey::Shape(self.clone())
    }
}

macro_rules! keyed_id {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Keyed for $ty {
                #[inline]
                fn entry_key(&self) -> EntryKey {
                    EntryKey::$variant(*self)
                }
            }
        )*
    };
}

keyed_id!(
    ObjId => Object,
    PropId => Property,
    NodeId => Node,
    TermId => Terminal,
    DeviceId => Device,
    ContactId => Contact,
    SubcktId => Subckt,
);
