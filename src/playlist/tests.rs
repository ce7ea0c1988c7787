use super::*;
use crate::library::Track;
use proptest::prelude::*;

fn t(name: &str) -> Track {
    Track::from_path(format!("/music/{name}"))
}

fn filled(names: &[&str]) -> (Playlist, Vec<TrackId>) {
    let mut p = Playlist::new();
    let ids = names.iter().map(|n| p.add(t(n))).collect();
    (p, ids)
}

fn names(p: &Playlist) -> Vec<String> {
    p.iter().map(|(_, t)| t.name.clone()).collect()
}

#[test]
fn first_add_becomes_head_tail_and_cursor() {
    let mut p = Playlist::new();
    assert_eq!(p.current(), None);

    let a = p.add(t("a.mp3"));
    assert_eq!(p.head(), Some(a));
    assert_eq!(p.tail(), Some(a));
    assert_eq!(p.current(), Some(a));

    let b = p.add(t("b.mp3"));
    assert_eq!(p.tail(), Some(b));
    assert_eq!(p.current(), Some(a), "later adds do not move the cursor");
}

#[test]
fn duplicate_paths_get_distinct_ids() {
    let (mut p, ids) = filled(&["a.mp3", "a.mp3"]);
    assert_ne!(ids[0], ids[1]);

    // Removing the second copy leaves the first one in place.
    p.delete(ids[1]).unwrap();
    assert_eq!(p.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![ids[0]]);
}

#[test]
fn deleting_cursor_moves_to_successor() {
    let (mut p, ids) = filled(&["a", "b", "c"]);
    p.select(ids[1]);
    p.delete(ids[1]).unwrap();
    assert_eq!(p.current(), Some(ids[2]));
    assert_eq!(names(&p), vec!["a", "c"]);
}

#[test]
fn deleting_cursor_at_tail_moves_to_predecessor() {
    let (mut p, ids) = filled(&["a", "b", "c"]);
    p.select(ids[2]);
    p.delete(ids[2]).unwrap();
    assert_eq!(p.current(), Some(ids[1]));
    assert_eq!(p.tail(), Some(ids[1]));
}

#[test]
fn deleting_last_entry_empties_cursor() {
    let (mut p, ids) = filled(&["a"]);
    let removed = p.delete(ids[0]).unwrap();
    assert_eq!(removed.name, "a");
    assert!(p.is_empty());
    assert_eq!(p.current(), None);
    assert_eq!(p.head(), None);
    assert_eq!(p.tail(), None);
}

#[test]
fn deleting_head_updates_head() {
    let (mut p, ids) = filled(&["a", "b", "c"]);
    p.select(ids[2]);
    p.delete(ids[0]).unwrap();
    assert_eq!(p.head(), Some(ids[1]));
    assert_eq!(p.current(), Some(ids[2]));
}

#[test]
fn deleting_absent_id_is_a_noop() {
    let (mut p, ids) = filled(&["a", "b"]);
    p.delete(ids[0]).unwrap();
    assert!(p.delete(ids[0]).is_none());
    assert_eq!(names(&p), vec!["b"]);
}

#[test]
fn advance_and_retreat_stop_at_the_ends() {
    let (mut p, ids) = filled(&["a", "b"]);
    assert_eq!(p.retreat(), None);
    assert_eq!(p.current(), Some(ids[0]));

    assert_eq!(p.advance(), Some(ids[1]));
    assert_eq!(p.advance(), None);
    assert_eq!(p.current(), Some(ids[1]));
}

#[test]
fn advance_and_retreat_on_empty_are_unavailable() {
    let mut p = Playlist::new();
    assert_eq!(p.advance(), None);
    assert_eq!(p.retreat(), None);
}

#[test]
fn select_unknown_id_keeps_cursor() {
    let (mut p, ids) = filled(&["a", "b"]);
    p.delete(ids[1]).unwrap();
    assert!(!p.select(ids[1]));
    assert_eq!(p.current(), Some(ids[0]));
}

#[test]
fn find_by_name_returns_first_match_from_head() {
    let mut p = Playlist::new();
    let first = p.add(Track::from_path("/x/song.mp3"));
    let _second = p.add(Track::from_path("/y/song.mp3"));
    assert_eq!(p.find_by_name("song.mp3"), Some(first));
    assert_eq!(p.find_by_name("other.mp3"), None);
}

#[test]
fn iter_is_restartable_and_leaves_cursor() {
    let (mut p, ids) = filled(&["a", "b", "c"]);
    p.select(ids[1]);
    assert_eq!(names(&p), vec!["a", "b", "c"]);
    assert_eq!(names(&p), vec!["a", "b", "c"]);
    assert_eq!(p.current(), Some(ids[1]));
}

#[test]
fn track_id_parses_from_display_form() {
    let (p, ids) = filled(&["a"]);
    let shown = ids[0].to_string();
    assert!(shown.starts_with('#'));
    assert_eq!(shown.parse::<TrackId>().unwrap(), ids[0]);
    assert!(p.contains(ids[0]));
    assert!("7".parse::<TrackId>().is_err());
    assert!("#x".parse::<TrackId>().is_err());
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
    Advance,
    Retreat,
    Select(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        2 => (0usize..16).prop_map(Op::Delete),
        1 => Just(Op::Advance),
        1 => Just(Op::Retreat),
        1 => (0usize..16).prop_map(Op::Select),
    ]
}

proptest! {
    /// Property: length equals the number of adds and iteration is insertion order.
    #[test]
    fn adds_preserve_count_and_order(n in 0usize..40) {
        let mut p = Playlist::new();
        let ids: Vec<TrackId> = (0..n).map(|i| p.add(t(&format!("{i}.mp3")))).collect();

        prop_assert_eq!(p.len(), n);
        let seen: Vec<TrackId> = p.iter().map(|(id, _)| id).collect();
        prop_assert_eq!(seen, ids);
    }

    /// Property: links stay consistent and the cursor follows the deletion policy
    /// under any mix of operations.
    #[test]
    fn random_operations_keep_links_and_cursor_consistent(ops in prop::collection::vec(op(), 1..60)) {
        let mut p = Playlist::new();
        let mut model: Vec<TrackId> = Vec::new();
        let mut added = 0usize;

        for op in ops {
            match op {
                Op::Add => {
                    model.push(p.add(t(&format!("{added}.mp3"))));
                    added += 1;
                }
                Op::Delete(i) if !model.is_empty() => {
                    let idx = i % model.len();
                    let id = model[idx];
                    let before = p.current();
                    prop_assert!(p.delete(id).is_some());
                    model.remove(idx);

                    if before == Some(id) {
                        let expected = model.get(idx).or_else(|| idx.checked_sub(1).and_then(|j| model.get(j))).copied();
                        prop_assert_eq!(p.current(), expected);
                    } else {
                        prop_assert_eq!(p.current(), before);
                    }
                }
                Op::Delete(_) => {}
                Op::Advance => {
                    let before = p.current();
                    if let Some(moved) = p.advance() {
                        prop_assert_eq!(p.retreat(), before);
                        prop_assert_eq!(p.advance(), Some(moved));
                    } else {
                        prop_assert_eq!(p.current(), before);
                    }
                }
                Op::Retreat => {
                    let before = p.current();
                    if p.retreat().is_none() {
                        prop_assert_eq!(p.current(), before);
                    }
                }
                Op::Select(i) if !model.is_empty() => {
                    let id = model[i % model.len()];
                    prop_assert!(p.select(id));
                    prop_assert_eq!(p.current(), Some(id));
                }
                Op::Select(_) => {}
            }

            p.check_links();
            let seen: Vec<TrackId> = p.iter().map(|(id, _)| id).collect();
            prop_assert_eq!(&seen, &model);
            prop_assert_eq!(p.current().is_none(), model.is_empty());
        }
    }
}
