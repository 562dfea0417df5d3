//! Entity records stored in the database arenas.

use smallvec::SmallVec;

use crate::geom::{Rect, Transform};
use crate::ids::{CellId, ContactId, DeviceId, GroupId, NodeId, ObjId, PropId, SubcktId, TermId};

#[derive(Debug, Clone)]
pub struct Cell {
    pub name: String,
    /// Objects in insertion order; region scans resume by position in this list.
    pub objects: Vec<ObjId>,
    pub instances: Vec<Instance>,
    pub groups: Vec<GroupId>,
}

impl Cell {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            objects: Vec::new(),
            instances: Vec::new(),
            groups: Vec::new(),
        }
    }
}

/// A placement of `child` inside another cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    pub child: CellId,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub struct Object {
    pub cell: CellId,
    pub layer: String,
    pub rect: Rect,
    /// Property chain, oldest first.
    pub props: Vec<PropId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub owner: ObjId,
    pub name: String,
    pub value: String,
}

/// Extraction result of one cell: nets, devices and their connectivity.
#[derive(Debug, Clone)]
pub struct Group {
    pub cell: CellId,
    pub nodes: Vec<NodeId>,
    pub terminals: Vec<TermId>,
    pub devices: Vec<DeviceId>,
    pub contacts: Vec<ContactId>,
    pub subckts: Vec<SubcktId>,
}

impl Group {
    pub(crate) fn new(cell: CellId) -> Self {
        Self {
            cell,
            nodes: Vec::new(),
            terminals: Vec::new(),
            devices: Vec::new(),
            contacts: Vec::new(),
            subckts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.terminals.is_empty()
            && self.devices.is_empty()
            && self.contacts.is_empty()
            && self.subckts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub group: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub group: GroupId,
    pub device: DeviceId,
    pub node: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub group: GroupId,
    pub model: String,
    pub terminals: SmallVec<[TermId; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub group: GroupId,
    pub layer: String,
    pub a: NodeId,
    pub b: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subckt {
    pub group: GroupId,
    pub name: String,
    pub ports: Vec<NodeId>,
}

/// Independent duplicate of an object, already placed in the coordinates of
/// the cell it was flattened into. Holds no ids, so nothing in the database
/// can invalidate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    pub layer: String,
    pub rect: Rect,
    pub props: Vec<(String, String)>,
}
