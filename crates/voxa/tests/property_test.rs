//! Property-based tests for containers and the utterance graph.
//!
//! Run with: `cargo test --test property_test`

mod common;

use common::{checked_utterance, insert_at, int_list, ints};
use proptest::prelude::*;
use voxa::container::{List, ListKind};
use voxa::hrg::ItemId;
use voxa::Object;

#[derive(Debug, Clone)]
enum ListOp {
    Append(i32),
    Prepend(i32),
    InsertBefore(usize, i32),
    Reverse,
    Nth(usize),
    Pop,
    PopFront,
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        any::<i32>().prop_map(ListOp::Append),
        any::<i32>().prop_map(ListOp::Prepend),
        (0..12usize, any::<i32>()).prop_map(|(n, v)| ListOp::InsertBefore(n, v)),
        Just(ListOp::Reverse),
        (0..12usize).prop_map(ListOp::Nth),
        Just(ListOp::Pop),
        Just(ListOp::PopFront),
    ]
}

/// Applies `op` and returns whatever it observed, for comparison.
fn apply(list: &mut List, op: &ListOp) -> Option<i32> {
    match *op {
        ListOp::Append(v) => list.append(Object::int(v)),
        ListOp::Prepend(v) => list.prepend(Object::int(v)),
        ListOp::InsertBefore(n, v) => insert_at(list, n, Object::int(v)),
        ListOp::Reverse => list.reverse(),
        ListOp::Nth(n) => return list.nth(n).map(|obj| obj.as_int().unwrap()),
        ListOp::Pop => return list.pop().map(|obj| obj.as_int().unwrap()),
        ListOp::PopFront => return list.pop_front().map(|obj| obj.as_int().unwrap()),
    }
    None
}

#[derive(Debug, Clone)]
enum GraphOp {
    Append,
    Prepend,
    AppendAfter(usize),
    PrependBefore(usize),
    AddDaughter(usize),
    Unlink(usize),
}

fn graph_op() -> impl Strategy<Value = GraphOp> {
    prop_oneof![
        Just(GraphOp::Append),
        Just(GraphOp::Prepend),
        (0..16usize).prop_map(GraphOp::AppendAfter),
        (0..16usize).prop_map(GraphOp::PrependBefore),
        (0..16usize).prop_map(GraphOp::AddDaughter),
        (0..16usize).prop_map(GraphOp::Unlink),
    ]
}

proptest! {
    /// Every element a list holds accounts for exactly one reference.
    #[test]
    fn prop_list_refcount(ops in prop::collection::vec(list_op(), 0..64)) {
        for kind in [ListKind::Linked, ListKind::Array] {
            let shared = Object::string("shared");
            let mut list = List::new(kind);
            for op in &ops {
                match op {
                    ListOp::Append(_) => list.append(shared.clone()),
                    ListOp::Prepend(_) => list.prepend(shared.clone()),
                    ListOp::InsertBefore(n, _) => insert_at(&mut list, *n, shared.clone()),
                    ListOp::Reverse => list.reverse(),
                    ListOp::Nth(n) => {
                        let _ = list.nth(*n);
                    }
                    ListOp::Pop => {
                        list.pop();
                    }
                    ListOp::PopFront => {
                        list.pop_front();
                    }
                }
                prop_assert_eq!(shared.refcount(), 1 + list.len());
            }
            drop(list);
            prop_assert_eq!(shared.refcount(), 1);
        }
    }

    /// Both list backings are observably identical under the same calls.
    #[test]
    fn prop_list_backings_agree(ops in prop::collection::vec(list_op(), 0..64)) {
        let mut linked = List::new(ListKind::Linked);
        let mut array = List::new(ListKind::Array);
        for op in &ops {
            prop_assert_eq!(apply(&mut linked, op), apply(&mut array, op), "{:?}", op);
            prop_assert_eq!(linked.len(), array.len());
        }
        prop_assert_eq!(ints(&linked), ints(&array));
    }

    /// Unlinking through a cursor visits every original element once, in
    /// order, whichever elements are removed.
    #[test]
    fn prop_cursor_unlink_visits_each_once(pattern in prop::collection::vec(any::<bool>(), 0..48)) {
        for kind in [ListKind::Linked, ListKind::Array] {
            let n = pattern.len() as i32;
            let mut list = int_list(kind, 0..n);
            let mut visited = Vec::new();

            let mut cursor = list.iterator();
            while let Some(mut c) = cursor {
                let value = c.current().unwrap().as_int().unwrap();
                visited.push(value);
                if pattern[value as usize] {
                    prop_assert_eq!(c.unlink().unwrap().as_int().unwrap(), value);
                    prop_assert!(c.current().is_none());
                }
                cursor = c.advance();
            }

            prop_assert_eq!(visited, (0..n).collect::<Vec<_>>());
            let kept: Vec<i32> = (0..n).filter(|v| !pattern[*v as usize]).collect();
            prop_assert_eq!(ints(&list), kept);
        }
    }

    /// A relation stays well formed under any mix of insertions and unlinks.
    #[test]
    fn prop_relation_integrity(ops in prop::collection::vec(graph_op(), 0..48)) {
        let mut utt = checked_utterance();
        let rel = utt.new_relation("Word").unwrap().id();
        // Top-level items in order.
        let mut model: Vec<ItemId> = Vec::new();

        for op in &ops {
            let pick = |i: usize| (!model.is_empty()).then(|| model[i % model.len()]);
            match *op {
                GraphOp::Append => {
                    let id = utt.relation_mut_by_id(rel).unwrap().append(None).unwrap().id();
                    model.push(id);
                }
                GraphOp::Prepend => {
                    let id = utt.relation_mut_by_id(rel).unwrap().prepend(None).unwrap().id();
                    model.insert(0, id);
                }
                GraphOp::AppendAfter(i) => {
                    if let Some(anchor) = pick(i) {
                        let at = model.iter().position(|id| *id == anchor).unwrap();
                        let id = utt.item_mut(anchor).unwrap().append(None).unwrap().id();
                        model.insert(at + 1, id);
                    }
                }
                GraphOp::PrependBefore(i) => {
                    if let Some(anchor) = pick(i) {
                        let at = model.iter().position(|id| *id == anchor).unwrap();
                        let id = utt.item_mut(anchor).unwrap().prepend(None).unwrap().id();
                        model.insert(at, id);
                    }
                }
                GraphOp::AddDaughter(i) => {
                    if let Some(parent) = pick(i) {
                        utt.item_mut(parent).unwrap().add_daughter(None).unwrap();
                    }
                }
                GraphOp::Unlink(i) => {
                    if let Some(victim) = pick(i) {
                        utt.item_mut(victim).unwrap().unlink().unwrap();
                        model.retain(|id| *id != victim);
                    }
                }
            }

            let relation = utt.relation_by_id(rel).unwrap();
            prop_assert_eq!(relation.len(), model.len());
            prop_assert!(relation.head().is_none_or(|head| head.prev().is_none()));
            prop_assert!(relation.tail().is_none_or(|tail| tail.next().is_none()));
            let forward: Vec<ItemId> = relation.items().map(|item| item.id()).collect();
            prop_assert_eq!(&forward, &model);
            prop_assert!(utt.check_consistency().is_ok());
            // Each item owns exactly one fresh content.
            prop_assert_eq!(utt.content_count(), utt.item_count());
        }
    }
}
