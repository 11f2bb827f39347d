//! Selection tracker: toggles and group-level select-all semantics

use roledeck::*;

#[test]
fn test_toggle_flips() {
    let mut s = Selection::new();
    assert!(s.toggle("a"));
    assert!(s.is_selected("a"));
    assert!(!s.toggle("a"));
    assert!(!s.is_selected("a"));
    assert!(s.is_empty());
}

#[test]
fn test_toggle_group_fill_then_clear() {
    let mut s = Selection::new();
    s.toggle("a");
    // partially selected -> fill
    assert!(s.toggle_group(["a", "b", "c"]));
    assert_eq!(s.len(), 3);
    assert!(s.is_group_selected(["a", "b", "c"]));
    // fully selected -> clear
    assert!(!s.toggle_group(["a", "b", "c"]));
    assert!(s.is_empty());
}

#[test]
fn test_toggle_group_leaves_other_ids() {
    let mut s = Selection::new();
    s.toggle("x");
    s.toggle_group(["a", "b"]);
    s.toggle_group(["a", "b"]);
    assert!(s.is_selected("x"));
    assert_eq!(s.len(), 1);
}

#[test]
fn test_toggle_group_twice_is_involution() {
    let starts: Vec<Vec<&str>> = vec![vec![], vec!["a"], vec!["a", "b"], vec!["z"], vec!["a", "b", "c", "z"]];
    for start in starts {
        for group in [vec!["a"], vec!["a", "b"], vec!["a", "b", "c"]] {
            let mut s = Selection::new();
            for id in &start {
                s.toggle(id);
            }
            let before = s.clone();
            let first = s.toggle_group(&group);
            s.toggle_group(&group);
            // only involutive when the first call fills or the group was fully selected
            let fully = group.iter().all(|id| before.is_selected(id));
            let untouched = group.iter().all(|id| !before.is_selected(id));
            if fully || untouched {
                assert_eq!(s, before, "start {:?} group {:?}", start, group);
            }
            assert_eq!(first, !fully);
        }
    }
}

#[test]
fn test_single_member_group() {
    let mut s = Selection::new();
    assert!(s.toggle_group(["only"]));
    assert!(s.is_group_selected(["only"]));
    assert!(!s.is_group_partially_selected(["only"]));
    assert!(!s.toggle_group(["only"]));
    assert!(s.is_empty());
}

#[test]
fn test_empty_group_is_noop() {
    let mut s = Selection::new();
    s.toggle("a");
    let none: [&str; 0] = [];
    assert!(!s.toggle_group(none));
    assert!(!s.is_group_selected(none));
    assert!(!s.is_group_partially_selected(none));
    assert_eq!(s.len(), 1);
}

#[test]
fn test_partial_selection() {
    let mut s = Selection::new();
    s.toggle("b");
    assert!(s.is_group_partially_selected(["a", "b"]));
    assert!(!s.is_group_selected(["a", "b"]));
    s.toggle("a");
    assert!(!s.is_group_partially_selected(["a", "b"]));
    assert!(s.is_group_selected(["a", "b"]));
}

#[test]
fn test_toggle_group_of_derived_group() {
    let ps = vec![
        Permission::with_id("1", "users.edit", "", Some("Users")),
        Permission::with_id("2", "users.view", "", Some("Users")),
        Permission::with_id("3", "billing.view", "", None),
    ];
    let groups = group_by_category(&ps);
    let users = groups.get("Users").unwrap();
    let mut s = Selection::new();
    assert!(s.toggle_group_of(users));
    assert!(s.is_group_selected(users.ids()));
    assert!(!s.is_selected("3"));
    assert_eq!(s.selected_in(&ps).iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);
    s.clear();
    assert!(s.is_empty());
}
