use lx_core::{
    CellId, Database, DbError, DbObserver, GroupId, NullObserver, ObjId, Orient, Point, PropId,
    Rect, Transform,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Replaced(ObjId, Option<ObjId>),
    Prop(ObjId, PropId, Option<PropId>),
    Cell(CellId),
    Group(GroupId),
    Global,
}

#[derive(Default)]
struct Recorder(Vec<Event>);

impl DbObserver for Recorder {
    fn entity_replaced(&mut self, old: ObjId, new: Option<ObjId>) {
        self.0.push(Event::Replaced(old, new));
    }
    fn property_replaced(&mut self, owner: ObjId, old: PropId, new: Option<PropId>) {
        self.0.push(Event::Prop(owner, old, new));
    }
    fn cell_scope_cleared(&mut self, cell: CellId) {
        self.0.push(Event::Cell(cell));
    }
    fn group_descriptor_cleared(&mut self, group: GroupId) {
        self.0.push(Event::Group(group));
    }
    fn global_clear(&mut self) {
        self.0.push(Event::Global);
    }
}

fn square(x: i64, y: i64) -> Rect {
    Rect::new(x, y, x + 10, y + 10)
}

#[test]
fn replace_object_keeps_position_and_moves_properties() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let a = db.add_object(cell, "metal1", square(0, 0)).unwrap();
    let b = db.add_object(cell, "metal1", square(20, 0)).unwrap();
    let c = db.add_object(cell, "metal1", square(40, 0)).unwrap();
    let p = db.set_property(b, "net", "vdd", &mut NullObserver).unwrap();

    let mut rec = Recorder::default();
    let d = db.replace_object(b, "metal2", square(20, 0), &mut rec).unwrap();

    assert_eq!(rec.0, vec![Event::Replaced(b, Some(d))]);
    assert_eq!(db.objects_of(cell), &[a, d, c]);
    assert!(db.object(b).is_none());
    assert_eq!(db.props_of(d), &[p]);
    assert_eq!(db.property(p).unwrap().owner, d);
}

#[test]
fn delete_object_frees_property_chain() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let a = db.add_object(cell, "poly", square(0, 0)).unwrap();
    let p = db.set_property(a, "w", "2", &mut NullObserver).unwrap();

    let mut rec = Recorder::default();
    db.delete_object(a, &mut rec).unwrap();

    assert_eq!(rec.0, vec![Event::Replaced(a, None)]);
    assert!(db.object(a).is_none());
    assert!(db.property(p).is_none());
    assert!(db.objects_of(cell).is_empty());
    assert_eq!(
        db.delete_object(a, &mut rec),
        Err(DbError::UnknownObject(a))
    );
}

#[test]
fn set_property_twice_replaces_in_place() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let a = db.add_object(cell, "poly", square(0, 0)).unwrap();
    let first = db.set_property(a, "w", "2", &mut NullObserver).unwrap();
    let other = db.set_property(a, "l", "1", &mut NullObserver).unwrap();

    let mut rec = Recorder::default();
    let second = db.set_property(a, "w", "3", &mut rec).unwrap();

    assert_eq!(rec.0, vec![Event::Prop(a, first, Some(second))]);
    assert_eq!(db.props_of(a), &[second, other]);
    assert_eq!(db.property(second).unwrap().value, "3");
    assert!(db.property(first).is_none());

    db.remove_property(a, "l", &mut rec).unwrap();
    assert_eq!(rec.0.last(), Some(&Event::Prop(a, other, None)));
    assert_eq!(db.props_of(a), &[second]);
    assert!(matches!(
        db.remove_property(a, "l", &mut rec),
        Err(DbError::UnknownProperty { .. })
    ));
}

#[test]
fn clear_cell_frees_contents_but_keeps_cell() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let other = db.add_cell("other").unwrap();
    let a = db.add_object(cell, "poly", square(0, 0)).unwrap();
    let keep = db.add_object(other, "poly", square(0, 0)).unwrap();
    let group = db.add_group(cell).unwrap();
    let n = db.add_node(group, "out").unwrap();
    let dev = db.add_device(group, "nmos", &[("d", n), ("s", n)]).unwrap();

    let mut rec = Recorder::default();
    db.clear_cell(cell, &mut rec).unwrap();

    assert_eq!(rec.0, vec![Event::Cell(cell)]);
    assert!(db.cell(cell).is_some());
    assert!(db.object(a).is_none());
    assert!(db.object(keep).is_some());
    assert!(db.group(group).is_none());
    assert!(db.node(n).is_none());
    assert!(db.device(dev).is_none());
}

#[test]
fn clear_group_empties_descriptor() {
    let mut db = Database::new();
    let cell = db.add_cell("inv").unwrap();
    let group = db.add_group(cell).unwrap();
    let a = db.add_node(group, "a").unwrap();
    let y = db.add_node(group, "y").unwrap();
    let dev = db.add_device(group, "pmos", &[("g", a), ("d", y)]).unwrap();
    let terms = db.terminals_of(dev).to_vec();
    let contact = db.add_contact(group, "via1", a, y).unwrap();
    let sub = db.add_subckt(group, "inv", &[a, y]).unwrap();

    let mut rec = Recorder::default();
    db.clear_group(group, &mut rec).unwrap();

    assert_eq!(rec.0, vec![Event::Group(group)]);
    assert!(db.group(group).unwrap().is_empty());
    assert!(db.device(dev).is_none());
    assert!(terms.iter().all(|t| db.terminal(*t).is_none()));
    assert!(db.contact(contact).is_none());
    assert!(db.subckt(sub).is_none());
}

#[test]
fn nodes_from_other_groups_are_rejected() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let g1 = db.add_group(cell).unwrap();
    let g2 = db.add_group(cell).unwrap();
    let foreign = db.add_node(g2, "x").unwrap();
    assert_eq!(
        db.add_device(g1, "res", &[("a", foreign)]),
        Err(DbError::ForeignNode {
            node: foreign,
            group: g1
        })
    );
}

#[test]
fn reset_invalidates_every_id() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let a = db.add_object(cell, "poly", square(0, 0)).unwrap();
    let mut rec = Recorder::default();
    db.reset(&mut rec);
    assert_eq!(rec.0, vec![Event::Global]);
    assert!(db.cell(cell).is_none());
    assert!(db.object(a).is_none());
    assert_eq!(db.cell_by_name("top"), None);
    let again = db.add_cell("top").unwrap();
    assert_ne!(again, cell);
}

#[test]
fn instance_cycles_are_rejected() {
    let mut db = Database::new();
    let top = db.add_cell("top").unwrap();
    let mid = db.add_cell("mid").unwrap();
    db.add_instance(top, mid, Transform::IDENTITY).unwrap();
    assert!(matches!(
        db.add_instance(mid, top, Transform::IDENTITY),
        Err(DbError::InstanceCycle { .. })
    ));
    assert!(matches!(
        db.add_instance(mid, mid, Transform::IDENTITY),
        Err(DbError::InstanceCycle { .. })
    ));
}

#[test]
fn flatten_places_child_geometry() {
    let mut db = Database::new();
    let top = db.add_cell("top").unwrap();
    let leaf = db.add_cell("leaf").unwrap();
    db.add_object(top, "m1", Rect::new(0, 0, 1, 1)).unwrap();
    let o = db.add_object(leaf, "m2", Rect::new(0, 0, 2, 1)).unwrap();
    db.set_property(o, "tag", "x", &mut NullObserver).unwrap();
    db.add_instance(top, leaf, Transform::new(Orient::R90, Point::new(100, 0)))
        .unwrap();

    let shapes = db.flatten(top, &Transform::IDENTITY).unwrap();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].rect, Rect::new(0, 0, 1, 1));
    assert_eq!(shapes[1].layer, "m2");
    assert_eq!(shapes[1].rect, Rect::new(99, 0, 100, 2));
    assert_eq!(shapes[1].props, vec![("tag".to_string(), "x".to_string())]);
}

#[test]
fn scan_region_resumes_by_position() {
    let mut db = Database::new();
    let cell = db.add_cell("top").unwrap();
    let a = db.add_object(cell, "m1", square(0, 0)).unwrap();
    db.add_object(cell, "m2", square(0, 0)).unwrap();
    db.add_object(cell, "m1", square(500, 500)).unwrap();
    let d = db.add_object(cell, "m1", square(5, 5)).unwrap();

    let region = Rect::new(0, 0, 50, 50);
    let (next, first) = db.scan_region(cell, &region, "m1", 0).unwrap();
    assert_eq!(first, a);
    let (next, second) = db.scan_region(cell, &region, "m1", next).unwrap();
    assert_eq!(second, d);
    assert_eq!(db.scan_region(cell, &region, "m1", next), None);
}
