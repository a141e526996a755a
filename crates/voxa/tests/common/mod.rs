// Shared helpers for the voxa integration tests.

#![allow(dead_code)]

use voxa::container::{List, ListKind};
use voxa::hrg::{ItemId, Utterance};
use voxa::{Config, Object};

/// An utterance that verifies graph consistency after every mutation.
pub fn checked_utterance() -> Utterance {
    Utterance::with_config(Config::default().with_invariant_checks(true))
}

/// Builds a list of ints on the given backing.
pub fn int_list(kind: ListKind, values: impl IntoIterator<Item = i32>) -> List {
    let mut list = List::new(kind);
    for value in values {
        list.append(Object::int(value));
    }
    list
}

/// The list's elements as ints.
pub fn ints(list: &List) -> Vec<i32> {
    list.iter().map(|obj| obj.as_int().unwrap()).collect()
}

/// Inserts `obj` before element `n` using a cursor, appending when `n` is
/// past the end.
pub fn insert_at(list: &mut List, n: usize, obj: Object) {
    if n >= list.len() {
        list.append(obj);
        return;
    }
    let mut cursor = list.iterator().unwrap();
    for _ in 0..n {
        cursor = cursor.advance().unwrap();
    }
    cursor.insert_before(obj).unwrap();
}

/// Appends one named item per word to a new relation and returns their ids.
pub fn named_relation(utt: &mut Utterance, relation: &str, words: &[&str]) -> Vec<ItemId> {
    let mut rel = utt.new_relation(relation).unwrap();
    words
        .iter()
        .map(|word| {
            let mut item = rel.append(None).unwrap();
            item.set_name(*word).unwrap();
            item.id()
        })
        .collect()
}

/// Adds a relation whose items share the contents of `items`, in order.
pub fn shared_relation(utt: &mut Utterance, relation: &str, items: &[ItemId]) -> Vec<ItemId> {
    let contents: Vec<_> = items
        .iter()
        .map(|id| utt.item(*id).unwrap().content())
        .collect();
    let mut rel = utt.new_relation(relation).unwrap();
    contents
        .into_iter()
        .map(|content| rel.append(Some(content)).unwrap().id())
        .collect()
}

/// Names of the top-level items of `relation`, head to tail.
pub fn names(utt: &Utterance, relation: &str) -> Vec<String> {
    utt.relation(relation)
        .unwrap()
        .items()
        .map(|item| item.name().unwrap_or("?").to_string())
        .collect()
}
