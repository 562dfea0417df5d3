#![allow(dead_code)]

use lx_core::{CellId, DeviceId, GroupId, NodeId, ObjId, Rect};
use lx_handles::{Entry, HandleId, Session};

/// Route `tracing` output through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn square(x: i64, y: i64) -> Rect {
    Rect::new(x, y, x + 10, y + 10)
}

/// Layout fixture: cell `top` holds four objects, cell `side` holds one.
pub struct Layout {
    pub top: CellId,
    pub side: CellId,
    pub objs: Vec<ObjId>,
    pub side_obj: ObjId,
}

pub fn layout(s: &mut Session) -> Layout {
    s.edit(|db, _| {
        let top = db.add_cell("top").unwrap();
        let side = db.add_cell("side").unwrap();
        let objs = vec![
            db.add_object(top, "metal1", square(0, 0)).unwrap(),
            db.add_object(top, "metal2", square(5, 5)).unwrap(),
            db.add_object(top, "metal1", square(20, 0)).unwrap(),
            db.add_object(top, "poly", square(100, 100)).unwrap(),
        ];
        let side_obj = db.add_object(side, "metal1", square(0, 0)).unwrap();
        Layout {
            top,
            side,
            objs,
            side_obj,
        }
    })
}

/// Extraction fixture: one group in `top` with three nodes, a device, a
/// contact and a subcircuit.
pub struct Circuit {
    pub group: GroupId,
    pub nodes: Vec<NodeId>,
    pub device: DeviceId,
}

pub fn circuit(s: &mut Session, cell: CellId) -> Circuit {
    s.edit(|db, _| {
        let group = db.add_group(cell).unwrap();
        let nodes = vec![
            db.add_node(group, "a").unwrap(),
            db.add_node(group, "b").unwrap(),
            db.add_node(group, "vdd").unwrap(),
        ];
        let device = db
            .add_device(group, "nmos", &[("d", nodes[0]), ("g", nodes[1]), ("s", nodes[2])])
            .unwrap();
        db.add_contact(group, "via1", nodes[0], nodes[1]).unwrap();
        db.add_subckt(group, "inv", &[nodes[0], nodes[2]]).unwrap();
        Circuit {
            group,
            nodes,
            device,
        }
    })
}

/// Step `id` until it is exhausted.
pub fn drain(s: &mut Session, id: HandleId) -> Vec<Entry> {
    let mut out = Vec::new();
    while let Some(e) = s.next(id).unwrap() {
        out.push(e);
    }
    out
}
