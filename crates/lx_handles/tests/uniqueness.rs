mod common;

use common::{layout, square};
use lx_handles::{EntryKey, Session};

#[test]
fn membership_checks_the_head_of_another_handle() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let metal1 = s.select_objects("top", Some("metal1")).unwrap();
    let all = s.select_objects("top", None).unwrap();

    let tester = s.unique_set(metal1);
    assert!(tester.is_supported());
    assert_eq!(tester.len(), 2);
    assert!(tester.contains(&EntryKey::Object(l.objs[2])));

    // Head of `all` is objs[0], which is on metal1.
    assert!(s.is_member(&tester, all));
    s.next(all).unwrap();
    // objs[1] is on metal2.
    assert!(!s.is_member(&tester, all));
}

#[test]
fn tester_outlives_its_source_handle() {
    let mut s = Session::new();
    layout(&mut s);
    let src = s.select_objects("top", None).unwrap();
    let tester = s.unique_set(src);
    s.close(src).unwrap();

    let probe = s.select_objects("top", None).unwrap();
    assert!(s.is_member(&tester, probe));
    assert_eq!(tester.len(), 4);
}

#[test]
fn copied_shapes_compare_by_value() {
    let mut s = Session::new();
    layout(&mut s);
    let a = s.flatten_cell("top").unwrap();
    let b = s.flatten_cell("top").unwrap();

    let tester = s.unique_set(a);
    assert!(s.is_member(&tester, b));
}

#[test]
fn text_membership_and_unsupported_sources() {
    let mut s = Session::new();
    let words = s.list_text(["alpha", "beta"]);
    let probe = s.list_text(["beta"]);
    let miss = s.list_text(["gamma"]);

    let tester = s.unique_set(words);
    assert!(s.is_member(&tester, probe));
    assert!(!s.is_member(&tester, miss));

    let closed = s.unique_set(lx_handles::HandleId(9999));
    assert!(!closed.is_supported());
    assert!(closed.is_empty());
    assert!(!s.is_member(&closed, probe));
}

#[test]
fn later_edits_do_not_change_a_snapshot() {
    let mut s = Session::new();
    let l = layout(&mut s);
    let src = s.select_objects("top", None).unwrap();
    let tester = s.unique_set(src);

    let d = s
        .edit(|db, obs| db.replace_object(l.objs[0], "metal1", square(0, 0), obs))
        .unwrap();
    assert!(tester.contains(&EntryKey::Object(l.objs[0])));
    assert!(!tester.contains(&EntryKey::Object(d)));
}
