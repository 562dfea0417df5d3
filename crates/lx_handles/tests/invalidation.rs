mod common;

use common::{circuit, drain, init_tracing, layout, square};
use lx_core::Rect;
use lx_handles::{Entry, HandleKind, HandleState, Session};

#[test]
fn deleting_an_object_splices_it_out_of_live_handles() {
    init_tracing();
    let mut s = Session::new();
    let l = layout(&mut s);
    let h = s.select_objects("top", None).unwrap();
    assert_eq!(s.next(h).unwrap(), Some(Entry::Object(l.objs[0])));

    s.edit(|db, obs| db.delete_object(l.objs[2], obs)).unwrap();

    assert_eq!(s.handles().remaining(h), Some(2));
    assert_eq!(
        drain(&mut s, h),
        vec![Entry::Object(l.objs[1]), Entry::Object(l.objs[3])]
    );
}

#[test]
fn replacing_an_object_swaps_it_in_place() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let h = s.select_objects("top", None).unwrap();

    let d = s
        .edit(|db, obs| db.replace_object(l.objs[1], "metal3", square(5, 5), obs))
        .unwrap();

    assert_eq!(
        drain(&mut s, h),
        vec![
            Entry::Object(l.objs[0]),
            Entry::Object(d),
            Entry::Object(l.objs[2]),
            Entry::Object(l.objs[3]),
        ]
    );
}

#[test]
fn handle_emptied_by_an_edit_is_closed() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let h = s.select_objects("side", None).unwrap();

    s.edit(|db, obs| db.delete_object(l.side_obj, obs)).unwrap();

    assert!(s.handles().resolve(h).is_none());
    assert_eq!(s.handles().state(h), HandleState::Closed);
    assert_eq!(s.next(h).unwrap(), None);
}

#[test]
fn property_replacement_keeps_the_handle_position() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let obj = l.objs[0];
    let (w, net) = s.edit(|db, obs| {
        let w = db.set_property(obj, "width", "1", obs).unwrap();
        let net = db.set_property(obj, "net", "a", obs).unwrap();
        (w, net)
    });
    let h = s.list_properties(obj).unwrap();

    let w2 = s
        .edit(|db, obs| db.set_property(obj, "width", "2", obs))
        .unwrap();
    assert_ne!(w, w2);
    assert_eq!(
        drain(&mut s, h),
        vec![Entry::Property(w2), Entry::Property(net)]
    );

    let h = s.list_properties(obj).unwrap();
    s.edit(|db, obs| db.remove_property(obj, "net", obs)).unwrap();
    assert_eq!(drain(&mut s, h), vec![Entry::Property(w2)]);
}

#[test]
fn property_handles_follow_a_replaced_owner() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let obj = l.objs[3];
    let p = s
        .edit(|db, obs| db.set_property(obj, "net", "vss", obs))
        .unwrap();
    let h = s.list_properties(obj).unwrap();

    let d = s
        .edit(|db, obs| db.replace_object(obj, "poly", square(100, 100), obs))
        .unwrap();
    assert!(s.handles().audit(s.db()).is_empty());
    assert_eq!(s.next(h).unwrap(), Some(Entry::Property(p)));
    assert_eq!(s.db().property(p).unwrap().owner, d);

    let h = s.list_properties(d).unwrap();
    s.edit(|db, obs| db.delete_object(d, obs)).unwrap();
    assert!(s.handles().resolve(h).is_none());
}

#[test]
fn clearing_a_cell_closes_every_borrowed_handle_anchored_there() {
    init_tracing();
    let mut s = Session::new();
    let l = layout(&mut s);
    let c = circuit(&mut s, l.top);
    s.edit(|db, obs| db.set_property(l.objs[0], "net", "a", obs))
        .unwrap();

    let objects = s.select_objects("top", None).unwrap();
    let props = s.list_properties(l.objs[0]).unwrap();
    let search = s
        .search_layers("top", Rect::new(0, 0, 50, 50), &["metal1"], None)
        .unwrap();
    let nodes = s.list_nodes(c.group).unwrap();
    let terms = s.list_terminals(c.device).unwrap();
    let text = s.list_text(["keep"]);
    let shapes = s.flatten_cell("top").unwrap();
    let other = s.select_objects("side", None).unwrap();

    s.edit(|db, obs| db.clear_cell(l.top, obs)).unwrap();

    for gone in [objects, props, search, nodes, terms] {
        assert!(s.handles().resolve(gone).is_none(), "{gone} survived");
    }
    for kept in [text, shapes, other] {
        assert!(s.handles().resolve(kept).is_some(), "{kept} was closed");
    }
    assert_eq!(drain(&mut s, other), vec![Entry::Object(l.side_obj)]);
    assert_eq!(s.handles().remaining(shapes), Some(4));
}

#[test]
fn clearing_a_group_closes_only_its_circuit_handles() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let c1 = circuit(&mut s, l.top);
    let c2 = circuit(&mut s, l.top);

    let nodes1 = s.list_nodes(c1.group).unwrap();
    let devices1 = s.list_devices(c1.group).unwrap();
    let contacts1 = s.list_contacts(c1.group).unwrap();
    let subckts1 = s.list_subckts(c1.group).unwrap();
    let terms1 = s.list_terminals(c1.device).unwrap();
    let nodes2 = s.list_nodes(c2.group).unwrap();
    let objects = s.select_objects("top", None).unwrap();

    s.edit(|db, obs| db.clear_group(c1.group, obs)).unwrap();

    for gone in [nodes1, devices1, contacts1, subckts1, terms1] {
        assert!(s.handles().resolve(gone).is_none(), "{gone} survived");
    }
    assert_eq!(
        drain(&mut s, nodes2),
        c2.nodes.iter().map(|n| Entry::Node(*n)).collect::<Vec<_>>()
    );
    assert_eq!(s.handles().remaining(objects), Some(4));
}

#[test]
fn circuit_listings_cover_every_extraction_kind() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let c = circuit(&mut s, l.top);

    let nodes = s.list_nodes(c.group).unwrap();
    let terms = s.list_terminals(c.device).unwrap();
    let devices = s.list_devices(c.group).unwrap();
    let contacts = s.list_contacts(c.group).unwrap();
    let subckts = s.list_subckts(c.group).unwrap();

    assert_eq!(s.handles().remaining(nodes), Some(3));
    assert_eq!(s.handles().remaining(terms), Some(3));
    assert_eq!(drain(&mut s, devices), vec![Entry::Device(c.device)]);
    assert_eq!(drain(&mut s, contacts).len(), 1);
    assert_eq!(drain(&mut s, subckts).len(), 1);

    let terminal = match s.next(terms).unwrap() {
        Some(Entry::Terminal(t)) => t,
        other => panic!("expected a terminal, got {other:?}"),
    };
    assert_eq!(s.db().terminal(terminal).unwrap().node, c.nodes[0]);
    assert!(s.handles().resolve(terms).unwrap().kind().is_circuit());
}

#[test]
fn global_clear_keeps_only_owned_payloads() {
    init_tracing();
    let mut s = Session::new();
    let l = layout(&mut s);
    let c = circuit(&mut s, l.top);

    let borrowed = [
        s.select_objects("top", None).unwrap(),
        s.select_objects("side", None).unwrap(),
        s.list_nodes(c.group).unwrap(),
        s.search_layers("side", square(0, 0), &["metal1"], None)
            .unwrap(),
    ];
    let text = s.list_text(["x", "y"]);
    let shapes = s.flatten_cell("top").unwrap();

    s.edit(|db, obs| db.reset(obs));

    for id in borrowed {
        assert!(s.handles().resolve(id).is_none(), "{id} survived");
    }
    assert_eq!(s.handles().live_count(), 2);
    assert_eq!(s.handles().stats().count(HandleKind::Shapes), 1);
    assert_eq!(
        drain(&mut s, text),
        vec![Entry::Text("x".into()), Entry::Text("y".into())]
    );
    assert_eq!(drain(&mut s, shapes).len(), 4);
}
