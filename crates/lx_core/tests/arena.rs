use lx_core::{Arena, ObjId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u32),
    Remove(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Insert),
        3 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn freed_ids_never_resolve_again(ops in proptest::collection::vec(op(), 0..64)) {
        let mut arena: Arena<ObjId, u32> = Arena::new();
        let mut live: Vec<(ObjId, u32)> = Vec::new();
        let mut dead: Vec<ObjId> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => live.push((arena.insert(v), v)),
                Op::Remove(i) if !live.is_empty() => {
                    let (id, v) = live.swap_remove(i % live.len());
                    prop_assert_eq!(arena.remove(id), Some(v));
                    dead.push(id);
                }
                Op::Remove(_) => {}
                Op::Clear => {
                    arena.clear();
                    dead.extend(live.drain(..).map(|(id, _)| id));
                }
            }
            prop_assert_eq!(arena.len(), live.len());
            for (id, v) in &live {
                prop_assert_eq!(arena.get(*id), Some(v));
            }
            for id in &dead {
                prop_assert!(!arena.contains(*id));
            }
        }
    }
}
