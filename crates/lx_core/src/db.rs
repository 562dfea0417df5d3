//! The design database.
//!
//! Owns every cell, object, property and extraction result. Methods that
//! free or replace entities take the observer that must hear about it and
//! notify it before anything is released (see [`DbObserver`]).

use smallvec::SmallVec;
use thiserror::Error;

use crate::arena::Arena;
use crate::entity::{
    Cell, Contact, Device, Group, Instance, Node, Object, Property, Shape, Subckt, Terminal,
};
use crate::geom::{Rect, Transform};
use crate::hash::{FastHashMap, fast_map_new, fast_set_with_capacity};
use crate::ids::{CellId, ContactId, DeviceId, GroupId, NodeId, ObjId, PropId, SubcktId, TermId};
use crate::observer::DbObserver;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("unknown cell {0}")]
    UnknownCell(CellId),
    #[error("cell '{0}' already exists")]
    DuplicateCell(String),
    #[error("unknown object {0}")]
    UnknownObject(ObjId),
    #[error("object {obj} has no property '{name}'")]
    UnknownProperty { obj: ObjId, name: String },
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {node} does not belong to group {group}")]
    ForeignNode { node: NodeId, group: GroupId },
    #[error("placing '{child}' inside '{parent}' would create a cycle")]
    InstanceCycle { parent: String, child: String },
}

pub struct Database {
    cells: Arena<CellId, Cell>,
    cell_names: FastHashMap<String, CellId>,
    objects: Arena<ObjId, Object>,
    props: Arena<PropId, Property>,
    groups: Arena<GroupId, Group>,
    nodes: Arena<NodeId, Node>,
    terminals: Arena<TermId, Terminal>,
    devices: Arena<DeviceId, Device>,
    contacts: Arena<ContactId, Contact>,
    subckts: Arena<SubcktId, Subckt>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            cells: Arena::new(),
            cell_names: fast_map_new(),
            objects: Arena::new(),
            props: Arena::new(),
            groups: Arena::new(),
            nodes: Arena::new(),
            terminals: Arena::new(),
            devices: Arena::new(),
            contacts: Arena::new(),
            subckts: Arena::new(),
        }
    }

    // ------------------------------------------------------------------
    // Cells and hierarchy
    // ------------------------------------------------------------------

    pub fn add_cell(&mut self, name: impl Into<String>) -> Result<CellId, DbError> {
        let name = name.into();
        if self.cell_names.contains_key(&name) {
            return Err(DbError::DuplicateCell(name));
        }
        let id = self.cells.insert(Cell::new(name.clone()));
        self.cell_names.insert(name, id);
        Ok(id)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.cell_names.get(name).copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells.iter()
    }

    fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell, DbError> {
        self.cells.get_mut(id).ok_or(DbError::UnknownCell(id))
    }

    fn cell_name(&self, id: CellId) -> Result<String, DbError> {
        self.cell(id)
            .map(|c| c.name.clone())
            .ok_or(DbError::UnknownCell(id))
    }

    /// Place `child` inside `parent`. Placements that would make the
    /// hierarchy cyclic are rejected.
    pub fn add_instance(
        &mut self,
        parent: CellId,
        child: CellId,
        transform: Transform,
    ) -> Result<(), DbError> {
        let parent_name = self.cell_name(parent)?;
        let child_name = self.cell_name(child)?;
        if self.reaches(child, parent) {
            return Err(DbError::InstanceCycle {
                parent: parent_name,
                child: child_name,
            });
        }
        self.cell_mut(parent)?
            .instances
            .push(Instance { child, transform });
        Ok(())
    }

    fn reaches(&self, from: CellId, target: CellId) -> bool {
        let mut stack = vec![from];
        let mut seen = fast_set_with_capacity(8);
        while let Some(cell) = stack.pop() {
            if cell == target {
                return true;
            }
            if !seen.insert(cell) {
                continue;
            }
            if let Some(c) = self.cell(cell) {
                stack.extend(c.instances.iter().map(|i| i.child));
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    pub fn add_object(
        &mut self,
        cell: CellId,
        layer: impl Into<String>,
        rect: Rect,
    ) -> Result<ObjId, DbError> {
        if !self.cells.contains(cell) {
            return Err(DbError::UnknownCell(cell));
        }
        let id = self.objects.insert(Object {
            cell,
            layer: layer.into(),
            rect,
            props: Vec::new(),
        });
        self.cell_mut(cell)?.objects.push(id);
        Ok(id)
    }

    pub fn object(&self, id: ObjId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn objects_of(&self, cell: CellId) -> &[ObjId] {
        self.cell(cell).map(|c| c.objects.as_slice()).unwrap_or(&[])
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Replace `old` with a new object at the same position in its cell.
    /// The property chain moves to the replacement.
    pub fn replace_object(
        &mut self,
        old: ObjId,
        layer: impl Into<String>,
        rect: Rect,
        observer: &mut dyn DbObserver,
    ) -> Result<ObjId, DbError> {
        let cell = self.objects.get(old).ok_or(DbError::UnknownObject(old))?.cell;
        let new = self.objects.insert(Object {
            cell,
            layer: layer.into(),
            rect,
            props: Vec::new(),
        });

        observer.entity_replaced(old, Some(new));

        let props = self
            .objects
            .get_mut(old)
            .map(|o| std::mem::take(&mut o.props))
            .unwrap_or_default();
        for prop in &props {
            if let Some(p) = self.props.get_mut(*prop) {
                p.owner = new;
            }
        }
        if let Some(o) = self.objects.get_mut(new) {
            o.props = props;
        }
        if let Some(c) = self.cells.get_mut(cell) {
            if let Some(slot) = c.objects.iter_mut().find(|o| **o == old) {
                *slot = new;
            }
        }
        self.objects.remove(old);
        Ok(new)
    }

    /// Delete `obj` together with its property chain.
    pub fn delete_object(
        &mut self,
        obj: ObjId,
        observer: &mut dyn DbObserver,
    ) -> Result<(), DbError> {
        let cell = self.objects.get(obj).ok_or(DbError::UnknownObject(obj))?.cell;

        observer.entity_replaced(obj, None);

        if let Some(c) = self.cells.get_mut(cell) {
            c.objects.retain(|o| *o != obj);
        }
        self.free_object(obj);
        Ok(())
    }

    fn free_object(&mut self, obj: ObjId) {
        if let Some(o) = self.objects.remove(obj) {
            for prop in o.props {
                self.props.remove(prop);
            }
        }
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Set `name` on `obj`. An existing property of that name is replaced by
    /// a freshly minted one in the same chain position.
    pub fn set_property(
        &mut self,
        obj: ObjId,
        name: impl Into<String>,
        value: impl Into<String>,
        observer: &mut dyn DbObserver,
    ) -> Result<PropId, DbError> {
        if !self.objects.contains(obj) {
            return Err(DbError::UnknownObject(obj));
        }
        let name = name.into();
        let existing = self.property_named(obj, &name);
        let new = self.props.insert(Property {
            owner: obj,
            name,
            value: value.into(),
        });

        match existing {
            Some(old) => {
                observer.property_replaced(obj, old, Some(new));
                if let Some(o) = self.objects.get_mut(obj) {
                    if let Some(slot) = o.props.iter_mut().find(|p| **p == old) {
                        *slot = new;
                    }
                }
                self.props.remove(old);
            }
            None => {
                if let Some(o) = self.objects.get_mut(obj) {
                    o.props.push(new);
                }
            }
        }
        Ok(new)
    }

    pub fn remove_property(
        &mut self,
        obj: ObjId,
        name: &str,
        observer: &mut dyn DbObserver,
    ) -> Result<(), DbError> {
        if !self.objects.contains(obj) {
            return Err(DbError::UnknownObject(obj));
        }
        let old = self
            .property_named(obj, name)
            .ok_or_else(|| DbError::UnknownProperty {
                obj,
                name: name.to_string(),
            })?;

        observer.property_replaced(obj, old, None);

        if let Some(o) = self.objects.get_mut(obj) {
            o.props.retain(|p| *p != old);
        }
        self.props.remove(old);
        Ok(())
    }

    pub fn property(&self, id: PropId) -> Option<&Property> {
        self.props.get(id)
    }

    pub fn props_of(&self, obj: ObjId) -> &[PropId] {
        self.object(obj).map(|o| o.props.as_slice()).unwrap_or(&[])
    }

    pub fn property_named(&self, obj: ObjId, name: &str) -> Option<PropId> {
        self.props_of(obj)
            .iter()
            .copied()
            .find(|p| self.props.get(*p).is_some_and(|prop| prop.name == name))
    }

    // ------------------------------------------------------------------
    // Extraction results
    // ------------------------------------------------------------------

    pub fn add_group(&mut self, cell: CellId) -> Result<GroupId, DbError> {
        if !self.cells.contains(cell) {
            return Err(DbError::UnknownCell(cell));
        }
        let id = self.groups.insert(Group::new(cell));
        self.cell_mut(cell)?.groups.push(id);
        Ok(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn groups_of(&self, cell: CellId) -> &[GroupId] {
        self.cell(cell).map(|c| c.groups.as_slice()).unwrap_or(&[])
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut Group, DbError> {
        self.groups.get_mut(id).ok_or(DbError::UnknownGroup(id))
    }

    fn check_node(&self, group: GroupId, node: NodeId) -> Result<(), DbError> {
        let n = self.nodes.get(node).ok_or(DbError::UnknownNode(node))?;
        if n.group != group {
            return Err(DbError::ForeignNode { node, group });
        }
        Ok(())
    }

    pub fn add_node(&mut self, group: GroupId, name: impl Into<String>) -> Result<NodeId, DbError> {
        self.group_mut(group)?;
        let id = self.nodes.insert(Node {
            group,
            name: name.into(),
        });
        self.group_mut(group)?.nodes.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Add a device whose terminals connect to the given nodes of `group`.
    pub fn add_device(
        &mut self,
        group: GroupId,
        model: impl Into<String>,
        terminals: &[(&str, NodeId)],
    ) -> Result<DeviceId, DbError> {
        self.group_mut(group)?;
        for (_, node) in terminals {
            self.check_node(group, *node)?;
        }
        let device = self.devices.insert(Device {
            group,
            model: model.into(),
            terminals: SmallVec::new(),
        });
        let terms: SmallVec<[TermId; 4]> = terminals
            .iter()
            .map(|(name, node)| {
                self.terminals.insert(Terminal {
                    group,
                    device,
                    node: *node,
                    name: (*name).to_string(),
                })
            })
            .collect();
        if let Some(d) = self.devices.get_mut(device) {
            d.terminals = terms.clone();
        }
        let g = self.group_mut(group)?;
        g.devices.push(device);
        g.terminals.extend(terms);
        Ok(device)
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn terminal(&self, id: TermId) -> Option<&Terminal> {
        self.terminals.get(id)
    }

    pub fn terminals_of(&self, device: DeviceId) -> &[TermId] {
        self.device(device)
            .map(|d| d.terminals.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_contact(
        &mut self,
        group: GroupId,
        layer: impl Into<String>,
        a: NodeId,
        b: NodeId,
    ) -> Result<ContactId, DbError> {
        self.group_mut(group)?;
        self.check_node(group, a)?;
        self.check_node(group, b)?;
        let id = self.contacts.insert(Contact {
            group,
            layer: layer.into(),
            a,
            b,
        });
        self.group_mut(group)?.contacts.push(id);
        Ok(id)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(id)
    }

    pub fn add_subckt(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
        ports: &[NodeId],
    ) -> Result<SubcktId, DbError> {
        self.group_mut(group)?;
        for node in ports {
            self.check_node(group, *node)?;
        }
        let id = self.subckts.insert(Subckt {
            group,
            name: name.into(),
            ports: ports.to_vec(),
        });
        self.group_mut(group)?.subckts.push(id);
        Ok(id)
    }

    pub fn subckt(&self, id: SubcktId) -> Option<&Subckt> {
        self.subckts.get(id)
    }

    /// Free every circuit entity recorded in `group`; the group stays, empty.
    pub fn clear_group(
        &mut self,
        group: GroupId,
        observer: &mut dyn DbObserver,
    ) -> Result<(), DbError> {
        if !self.groups.contains(group) {
            return Err(DbError::UnknownGroup(group));
        }

        observer.group_descriptor_cleared(group);

        self.free_group_contents(group);
        Ok(())
    }

    fn free_group_contents(&mut self, group: GroupId) {
        let Some(g) = self.groups.get_mut(group) else {
            return;
        };
        let nodes = std::mem::take(&mut g.nodes);
        let terminals = std::mem::take(&mut g.terminals);
        let devices = std::mem::take(&mut g.devices);
        let contacts = std::mem::take(&mut g.contacts);
        let subckts = std::mem::take(&mut g.subckts);
        for id in terminals {
            self.terminals.remove(id);
        }
        for id in devices {
            self.devices.remove(id);
        }
        for id in contacts {
            self.contacts.remove(id);
        }
        for id in subckts {
            self.subckts.remove(id);
        }
        for id in nodes {
            self.nodes.remove(id);
        }
    }

    // ------------------------------------------------------------------
    // Bulk clears
    // ------------------------------------------------------------------

    /// Free the contents of `cell`: objects, properties, instances and
    /// extraction groups. The cell itself and placements of it survive.
    pub fn clear_cell(
        &mut self,
        cell: CellId,
        observer: &mut dyn DbObserver,
    ) -> Result<(), DbError> {
        if !self.cells.contains(cell) {
            return Err(DbError::UnknownCell(cell));
        }

        observer.cell_scope_cleared(cell);

        let c = self.cell_mut(cell)?;
        c.instances.clear();
        let objects = std::mem::take(&mut c.objects);
        let groups = std::mem::take(&mut c.groups);
        for obj in objects {
            self.free_object(obj);
        }
        for group in groups {
            self.free_group_contents(group);
            self.groups.remove(group);
        }
        Ok(())
    }

    /// Empty the database. Every id handed out so far goes stale.
    pub fn reset(&mut self, observer: &mut dyn DbObserver) {
        observer.global_clear();

        self.cells.clear();
        self.cell_names.clear();
        self.objects.clear();
        self.props.clear();
        self.groups.clear();
        self.nodes.clear();
        self.terminals.clear();
        self.devices.clear();
        self.contacts.clear();
        self.subckts.clear();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Find the first object of `cell` at list position `from` or later that
    /// lies on `layer` and overlaps `region`. Returns the position to resume
    /// from together with the match.
    pub fn scan_region(
        &self,
        cell: CellId,
        region: &Rect,
        layer: &str,
        from: usize,
    ) -> Option<(usize, ObjId)> {
        self.objects_of(cell)
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(pos, id)| {
                let o = self.objects.get(*id)?;
                (o.layer == layer && o.rect.overlaps(region)).then_some((pos + 1, *id))
            })
    }

    /// Duplicate every object reachable from `cell`, placed by `transform`
    /// composed with each instance transform on the way down.
    pub fn flatten(&self, cell: CellId, transform: &Transform) -> Result<Vec<Shape>, DbError> {
        if !self.cells.contains(cell) {
            return Err(DbError::UnknownCell(cell));
        }
        let mut out = Vec::new();
        self.flatten_into(cell, transform, &mut out);
        Ok(out)
    }

    fn flatten_into(&self, cell: CellId, transform: &Transform, out: &mut Vec<Shape>) {
        let Some(c) = self.cell(cell) else {
            return;
        };
        for id in &c.objects {
            let Some(o) = self.objects.get(*id) else {
                continue;
            };
            let props = o
                .props
                .iter()
                .filter_map(|p| self.props.get(*p))
                .map(|p| (p.name.clone(), p.value.clone()))
                .collect();
            out.push(Shape {
                layer: o.layer.clone(),
                rect: transform.apply_rect(&o.rect),
                props,
            });
        }
        for inst in &c.instances {
            self.flatten_into(inst.child, &transform.compose(&inst.transform), out);
        }
    }
}
