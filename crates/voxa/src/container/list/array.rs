//! Contiguous list backing.

use super::ListBackend;
use crate::container::Position;
use crate::object::{Class, Object, builtin};

/// The `Object:Container:List:ArrayList` backing.
///
/// A position is the element index. Insertions and removals move the
/// elements behind them, which [`ListBackend::shift_removed`] and
/// [`ListBackend::shift_inserted`] report to cursors.
#[derive(Default)]
pub struct ArrayList {
    items: Vec<Object>,
}

fn position(index: usize) -> Position {
    Position::from_raw_parts(index as u32, 0)
}

impl ArrayList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        ArrayList { items: Vec::new() }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let index = pos.as_usize();
        (pos.generation() == 0 && index < self.items.len()).then_some(index)
    }
}

impl ListBackend for ArrayList {
    fn class(&self) -> &'static Class {
        builtin().array_list
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn first(&self) -> Option<Position> {
        (!self.items.is_empty()).then(|| position(0))
    }

    fn last(&self) -> Option<Position> {
        self.items.len().checked_sub(1).map(position)
    }

    fn next(&self, pos: Position) -> Option<Position> {
        let index = self.index(pos)? + 1;
        (index < self.items.len()).then(|| position(index))
    }

    fn prev(&self, pos: Position) -> Option<Position> {
        let index = self.index(pos)?;
        index.checked_sub(1).map(position)
    }

    fn get(&self, pos: Position) -> Option<&Object> {
        self.items.get(self.index(pos)?)
    }

    fn push_back(&mut self, obj: Object) -> Position {
        self.items.push(obj);
        position(self.items.len() - 1)
    }

    fn push_front(&mut self, obj: Object) -> Position {
        self.items.insert(0, obj);
        position(0)
    }

    fn insert_before(&mut self, pos: Position, obj: Object) -> Position {
        match self.index(pos) {
            Some(index) => {
                self.items.insert(index, obj);
                position(index)
            }
            None => self.push_back(obj),
        }
    }

    fn insert_after(&mut self, pos: Position, obj: Object) -> Position {
        match self.index(pos) {
            Some(index) => {
                self.items.insert(index + 1, obj);
                position(index + 1)
            }
            None => self.push_back(obj),
        }
    }

    fn remove(&mut self, pos: Position) -> Option<Object> {
        let index = self.index(pos)?;
        Some(self.items.remove(index))
    }

    fn reverse(&mut self) {
        self.items.reverse();
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn shift_removed(&self, removed: Position, pos: Position) -> Position {
        if pos.slot() > removed.slot() {
            position(pos.as_usize() - 1)
        } else {
            pos
        }
    }

    fn shift_inserted(&self, inserted: Position, pos: Position) -> Position {
        if pos.slot() >= inserted.slot() {
            position(pos.as_usize() + 1)
        } else {
            pos
        }
    }

    fn as_slice(&self) -> Option<&[Object]> {
        Some(&self.items)
    }

    fn empty(&self) -> Box<dyn ListBackend> {
        Box::new(ArrayList::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_indices() {
        let mut list = ArrayList::new();
        let a = list.push_back(Object::int(1));
        let b = list.push_back(Object::int(2));
        assert_eq!(a.slot(), 0);
        assert_eq!(b.slot(), 1);
        assert_eq!(list.next(a), Some(b));
        assert_eq!(list.next(b), None);
        assert_eq!(list.prev(a), None);
    }

    #[test]
    fn test_shifts() {
        let list = ArrayList::new();
        let p = |i| position(i);

        assert_eq!(list.shift_removed(p(1), p(3)), p(2));
        assert_eq!(list.shift_removed(p(3), p(1)), p(1));
        assert_eq!(list.shift_inserted(p(1), p(1)), p(2));
        assert_eq!(list.shift_inserted(p(2), p(1)), p(1));
    }

    #[test]
    fn test_out_of_range_positions() {
        let mut list = ArrayList::new();
        list.push_back(Object::int(1));
        assert!(list.get(position(4)).is_none());
        assert!(list.get(Position::from_raw_parts(0, 1)).is_none());
        assert!(list.remove(position(4)).is_none());

        let pos = list.insert_after(position(9), Object::int(2));
        assert_eq!(pos, position(1));
    }
}
