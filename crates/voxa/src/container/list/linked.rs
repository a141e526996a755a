//! Doubly linked list over a generational arena.

use voxa_mem::Arena;

use super::ListBackend;
use crate::container::Position;
use crate::object::{Class, Object, builtin};

struct Node {
    obj: Object,
    prev: Option<Position>,
    next: Option<Position>,
}

/// The `Object:Container:List:LinkedList` backing.
///
/// Nodes live in an [`Arena`]; a position is the node's generational index,
/// so it stays valid across every mutation except removal of that node, and
/// a removed node's position never resolves again.
#[derive(Default)]
pub struct LinkedList {
    nodes: Arena<Node>,
    head: Option<Position>,
    tail: Option<Position>,
}

impl LinkedList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        LinkedList {
            nodes: Arena::new(),
            head: None,
            tail: None,
        }
    }

    fn set_next(&mut self, pos: Option<Position>, next: Option<Position>) {
        match pos {
            Some(pos) => {
                if let Some(node) = self.nodes.get_mut(pos) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
    }

    fn set_prev(&mut self, pos: Option<Position>, prev: Option<Position>) {
        match pos {
            Some(pos) => {
                if let Some(node) = self.nodes.get_mut(pos) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Links a new node between `prev` and `next`, which must be adjacent.
    fn link(&mut self, prev: Option<Position>, next: Option<Position>, obj: Object) -> Position {
        let pos = self.nodes.insert(Node { obj, prev, next });
        self.set_next(prev, Some(pos));
        self.set_prev(next, Some(pos));
        pos
    }
}

impl ListBackend for LinkedList {
    fn class(&self) -> &'static Class {
        builtin().linked_list
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn first(&self) -> Option<Position> {
        self.head
    }

    fn last(&self) -> Option<Position> {
        self.tail
    }

    fn next(&self, pos: Position) -> Option<Position> {
        self.nodes.get(pos)?.next
    }

    fn prev(&self, pos: Position) -> Option<Position> {
        self.nodes.get(pos)?.prev
    }

    fn get(&self, pos: Position) -> Option<&Object> {
        self.nodes.get(pos).map(|node| &node.obj)
    }

    fn push_back(&mut self, obj: Object) -> Position {
        self.link(self.tail, None, obj)
    }

    fn push_front(&mut self, obj: Object) -> Position {
        self.link(None, self.head, obj)
    }

    fn insert_before(&mut self, pos: Position, obj: Object) -> Position {
        match self.nodes.get(pos) {
            Some(node) => self.link(node.prev, Some(pos), obj),
            None => self.push_back(obj),
        }
    }

    fn insert_after(&mut self, pos: Position, obj: Object) -> Position {
        match self.nodes.get(pos) {
            Some(node) => self.link(Some(pos), node.next, obj),
            None => self.push_back(obj),
        }
    }

    fn remove(&mut self, pos: Position) -> Option<Object> {
        let node = self.nodes.remove(pos)?;
        self.set_next(node.prev, node.next);
        self.set_prev(node.next, node.prev);
        Some(node.obj)
    }

    fn reverse(&mut self) {
        let mut cursor = self.head;
        while let Some(pos) = cursor {
            let Some(node) = self.nodes.get_mut(pos) else {
                break;
            };
            std::mem::swap(&mut node.prev, &mut node.next);
            cursor = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    fn empty(&self) -> Box<dyn ListBackend> {
        Box::new(LinkedList::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &LinkedList) -> Vec<i32> {
        let mut out = Vec::new();
        let mut pos = list.first();
        while let Some(p) = pos {
            out.push(list.get(p).unwrap().as_int().unwrap());
            pos = list.next(p);
        }
        out
    }

    #[test]
    fn test_links_are_symmetric() {
        let mut list = LinkedList::new();
        let a = list.push_back(Object::int(1));
        let b = list.push_back(Object::int(2));
        let c = list.push_back(Object::int(3));

        assert_eq!(list.next(a), Some(b));
        assert_eq!(list.prev(c), Some(b));
        assert_eq!(list.prev(a), None);
        assert_eq!(list.next(c), None);
    }

    #[test]
    fn test_positions_survive_other_removals() {
        let mut list = LinkedList::new();
        let a = list.push_back(Object::int(1));
        let b = list.push_back(Object::int(2));
        let c = list.push_back(Object::int(3));

        assert_eq!(list.remove(b).unwrap().as_int().unwrap(), 2);
        assert_eq!(list.next(a), Some(c));
        assert_eq!(list.get(c).unwrap().as_int().unwrap(), 3);
        assert!(list.get(b).is_none());
        assert!(list.remove(b).is_none());
    }

    #[test]
    fn test_stale_position_does_not_alias_reused_slot() {
        let mut list = LinkedList::new();
        let a = list.push_back(Object::int(1));
        list.remove(a);
        let b = list.push_back(Object::int(2));

        assert_eq!(a.slot(), b.slot());
        assert!(list.get(a).is_none());
        assert_eq!(list.get(b).unwrap().as_int().unwrap(), 2);
    }

    #[test]
    fn test_insert_around() {
        let mut list = LinkedList::new();
        let mid = list.push_back(Object::int(2));
        list.insert_before(mid, Object::int(1));
        list.insert_after(mid, Object::int(3));
        assert_eq!(values(&list), vec![1, 2, 3]);

        let gone = list.push_back(Object::int(9));
        list.remove(gone);
        list.insert_after(gone, Object::int(4));
        assert_eq!(values(&list), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reverse_single_and_empty() {
        let mut list = LinkedList::new();
        list.reverse();
        assert!(list.first().is_none());

        list.push_back(Object::int(1));
        list.reverse();
        assert_eq!(values(&list), vec![1]);
        assert_eq!(list.first(), list.last());
    }
}
