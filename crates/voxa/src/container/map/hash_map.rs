//! Hashed map backing.

use fxhash::FxBuildHasher;
use voxa_mem::Arena;

use super::MapBackend;
use crate::container::Position;
use crate::object::{Class, Object, builtin};

/// The `Object:Container:Map:HashMap` backing.
///
/// Entries live in an [`Arena`] so that positions stay stable while other
/// entries are removed; a `hashbrown` table maps keys to arena indices.
/// Iteration follows arena slot order.
#[derive(Default)]
pub struct HashMap {
    entries: Arena<(String, Object)>,
    index: hashbrown::HashMap<String, Position, FxBuildHasher>,
}

impl HashMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        HashMap {
            entries: Arena::new(),
            index: hashbrown::HashMap::with_hasher(FxBuildHasher::default()),
        }
    }
}

impl MapBackend for HashMap {
    fn class(&self) -> &'static Class {
        builtin().hash_map
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn find(&self, key: &str) -> Option<Position> {
        self.index.get(key).copied()
    }

    fn first(&self) -> Option<Position> {
        self.entries.next_index(None)
    }

    fn next(&self, pos: Position) -> Option<Position> {
        self.entries.next_index(Some(pos))
    }

    fn entry(&self, pos: Position) -> Option<(&str, &Object)> {
        let (key, obj) = self.entries.get(pos)?;
        Some((key.as_str(), obj))
    }

    fn replace(&mut self, pos: Position, obj: Object) -> Option<Object> {
        let (_, slot) = self.entries.get_mut(pos)?;
        Some(std::mem::replace(slot, obj))
    }

    fn insert(&mut self, key: String, obj: Object) -> Position {
        let pos = self.entries.insert((key.clone(), obj));
        self.index.insert(key, pos);
        pos
    }

    fn remove(&mut self, pos: Position) -> Option<(String, Object)> {
        let (key, obj) = self.entries.remove(pos)?;
        self.index.remove(&key);
        Some((key, obj))
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn empty(&self) -> Box<dyn MapBackend> {
        Box::new(HashMap::new())
    }
}
