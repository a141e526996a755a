//! Insertion-ordered map with linear lookup.

use super::MapBackend;
use crate::container::Position;
use crate::object::{Class, Object, builtin};

/// The `Object:Container:Map:ListMap` backing.
#[derive(Default)]
pub struct ListMap {
    entries: Vec<(String, Object)>,
}

fn position(index: usize) -> Position {
    Position::from_raw_parts(index as u32, 0)
}

impl ListMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        ListMap {
            entries: Vec::new(),
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let index = pos.as_usize();
        (pos.generation() == 0 && index < self.entries.len()).then_some(index)
    }
}

impl MapBackend for ListMap {
    fn class(&self) -> &'static Class {
        builtin().list_map
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn find(&self, key: &str) -> Option<Position> {
        self.entries
            .iter()
            .position(|(k, _)| k == key)
            .map(position)
    }

    fn first(&self) -> Option<Position> {
        (!self.entries.is_empty()).then(|| position(0))
    }

    fn next(&self, pos: Position) -> Option<Position> {
        let index = self.index(pos)? + 1;
        (index < self.entries.len()).then(|| position(index))
    }

    fn entry(&self, pos: Position) -> Option<(&str, &Object)> {
        let (key, obj) = self.entries.get(self.index(pos)?)?;
        Some((key.as_str(), obj))
    }

    fn replace(&mut self, pos: Position, obj: Object) -> Option<Object> {
        let index = self.index(pos)?;
        Some(std::mem::replace(&mut self.entries[index].1, obj))
    }

    fn insert(&mut self, key: String, obj: Object) -> Position {
        self.entries.push((key, obj));
        position(self.entries.len() - 1)
    }

    fn remove(&mut self, pos: Position) -> Option<(String, Object)> {
        let index = self.index(pos)?;
        Some(self.entries.remove(index))
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn shift_removed(&self, removed: Position, pos: Position) -> Position {
        if pos.slot() > removed.slot() {
            position(pos.as_usize() - 1)
        } else {
            pos
        }
    }

    fn empty(&self) -> Box<dyn MapBackend> {
        Box::new(ListMap::new())
    }
}
