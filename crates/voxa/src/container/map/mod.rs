//! The `Map` contract and its builtin backings.

mod cursor;
mod hash_map;
mod list_map;

pub use cursor::MapCursor;
pub use hash_map::HashMap;
pub use list_map::ListMap;

use std::fmt;

use super::{List, ListKind, Position};
use crate::error::{Error, Result};
use crate::object::{Class, Object, builtin};

/// Storage behind a [`Map`].
///
/// Keys are unique. [`Map`] checks presence with [`MapBackend::find`]
/// before calling [`MapBackend::insert`].
pub trait MapBackend: Send + Sync {
    /// The concrete map class this backing implements.
    fn class(&self) -> &'static Class;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Position of the entry for `key`.
    fn find(&self, key: &str) -> Option<Position>;

    /// Position of the first entry in iteration order.
    fn first(&self) -> Option<Position>;

    /// Position after `pos` in iteration order.
    fn next(&self, pos: Position) -> Option<Position>;

    /// Entry at `pos`.
    fn entry(&self, pos: Position) -> Option<(&str, &Object)>;

    /// Stores `obj` at `pos`, returning the previous value.
    fn replace(&mut self, pos: Position, obj: Object) -> Option<Object>;

    /// Inserts an entry for a key that is not present.
    fn insert(&mut self, key: String, obj: Object) -> Position;

    /// Removes the entry at `pos`.
    fn remove(&mut self, pos: Position) -> Option<(String, Object)>;

    /// Drops every entry.
    fn clear(&mut self);

    /// Where `pos` ends up after the entry at `removed` was taken out.
    fn shift_removed(&self, _removed: Position, pos: Position) -> Position {
        pos
    }

    /// An empty backing of the same kind.
    fn empty(&self) -> Box<dyn MapBackend>;
}

/// The builtin map backings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapKind {
    /// Entries in insertion order with linear lookup. Feature maps are small
    /// and keep their order this way.
    #[default]
    List,
    /// Hashed lookup. Iteration order is unspecified.
    Hash,
}

impl MapKind {
    /// Resolves a map class name (`ListMap`, `Object:Container:Map:HashMap`,
    /// ...) to its builtin backing.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownClass`] if nothing is registered under `name`.
    /// - [`Error::InvalidArgument`] if the class is not a builtin map.
    pub fn from_class_name(name: &str) -> Result<MapKind> {
        let class = Class::find(name)?;
        let builtins = builtin();
        if class == builtins.list_map {
            Ok(MapKind::List)
        } else if class == builtins.hash_map {
            Ok(MapKind::Hash)
        } else {
            Err(Error::invalid_argument(format!(
                "'{}' is not a builtin map class",
                class.ancestry()
            )))
        }
    }
}

/// A string-keyed map of objects.
///
/// # Example
///
/// ```
/// use voxa::container::{Map, MapKind};
/// use voxa::object::Object;
///
/// let mut features = Map::new(MapKind::List);
/// features.set("name", Object::string("born"));
/// features.set_int("stress", 1);
///
/// assert_eq!(features.get_str("name").unwrap(), "born");
/// assert_eq!(features.get_int_or("tone", 0).unwrap(), 0);
/// assert!(features.delete("stress"));
/// assert_eq!(features.len(), 1);
/// ```
pub struct Map {
    backend: Box<dyn MapBackend>,
}

impl Map {
    /// Creates an empty map with a builtin backing.
    #[must_use]
    pub fn new(kind: MapKind) -> Map {
        match kind {
            MapKind::List => Map::with_backend(Box::new(ListMap::new())),
            MapKind::Hash => Map::with_backend(Box::new(HashMap::new())),
        }
    }

    /// Creates an empty map over a caller-supplied backing.
    #[must_use]
    pub fn with_backend(backend: Box<dyn MapBackend>) -> Map {
        Map { backend }
    }

    /// The concrete map class of the backing.
    #[must_use]
    pub fn class(&self) -> &'static Class {
        self.backend.class()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.len() == 0
    }

    /// The value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Object> {
        let pos = self.backend.find(key)?;
        self.backend.entry(pos).map(|(_, obj)| obj)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.backend.find(key).is_some()
    }

    /// Stores `obj` under `key` and returns the value it replaced.
    ///
    /// Replacing keeps the entry's position in iteration order.
    pub fn set(&mut self, key: impl Into<String>, obj: Object) -> Option<Object> {
        let key = key.into();
        match self.backend.find(&key) {
            Some(pos) => self.backend.replace(pos, obj),
            None => {
                self.backend.insert(key, obj);
                None
            }
        }
    }

    /// Removes `key` and drops its value. Returns `false` if absent.
    pub fn delete(&mut self, key: &str) -> bool {
        self.unlink(key).is_some()
    }

    /// Removes `key` and hands its value to the caller.
    pub fn unlink(&mut self, key: &str) -> Option<Object> {
        let pos = self.backend.find(key)?;
        self.backend.remove(pos).map(|(_, obj)| obj)
    }

    /// The keys as a list of `Object:String`, in iteration order.
    #[must_use]
    pub fn keys(&self) -> List {
        let mut keys = List::new(ListKind::Array);
        keys.extend(self.key_iter().map(Object::string));
        keys
    }

    /// The keys, in iteration order.
    pub fn key_iter(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// A borrowing iterator over the entries.
    #[must_use]
    pub fn iter(&self) -> MapIter<'_> {
        MapIter {
            backend: self.backend.as_ref(),
            pos: self.backend.first(),
        }
    }

    /// A look-ahead cursor on the first entry, `None` for an empty map.
    pub fn iterator(&mut self) -> Option<MapCursor<'_>> {
        MapCursor::new(self)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.backend.clear();
    }

    /// Copies the entries into `dst`, or into a new map with this map's
    /// backing when `dst` is `None`. Values are shared.
    #[must_use]
    pub fn copy(&self, dst: Option<Map>) -> Map {
        let mut dst = dst.unwrap_or_else(|| Map::with_backend(self.backend.empty()));
        for (key, obj) in self.iter() {
            dst.set(key, obj.clone());
        }
        dst
    }

    fn require(&self, key: &str) -> Result<&Object> {
        self.get(key).ok_or_else(|| Error::FeatureNotFound {
            key: key.to_string(),
        })
    }

    /// Reads an int value.
    ///
    /// # Errors
    ///
    /// - [`Error::FeatureNotFound`] if `key` is absent.
    /// - [`Error::InvalidCast`] if the value is not an int.
    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.require(key)?.as_int()
    }

    /// Reads a float value.
    ///
    /// # Errors
    ///
    /// See [`Map::get_int`].
    pub fn get_float(&self, key: &str) -> Result<f32> {
        self.require(key)?.as_float()
    }

    /// Reads a string value.
    ///
    /// # Errors
    ///
    /// See [`Map::get_int`].
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.require(key)?.as_str()
    }

    /// Reads a bool value.
    ///
    /// # Errors
    ///
    /// See [`Map::get_int`].
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.require(key)?.as_bool()
    }

    /// Reads an int value, falling back to `default` when `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if the value is present but not an int.
    pub fn get_int_or(&self, key: &str, default: i32) -> Result<i32> {
        self.get(key).map_or(Ok(default), Object::as_int)
    }

    /// Reads a float value, falling back to `default` when `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if the value is present but not a
    /// float.
    pub fn get_float_or(&self, key: &str, default: f32) -> Result<f32> {
        self.get(key).map_or(Ok(default), Object::as_float)
    }

    /// Reads a string value, falling back to `default` when `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCast`] if the value is present but not a
    /// string.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        self.get(key).map_or(Ok(default), Object::as_str)
    }

    /// Stores an int.
    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, Object::int(value));
    }

    /// Stores a float.
    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.set(key, Object::float(value));
    }

    /// Stores a string.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Object::string(value));
    }

    /// Stores a bool.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, Object::bool(value));
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new(MapKind::default())
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a str, &'a Object);
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator returned by [`Map::iter`].
pub struct MapIter<'a> {
    backend: &'a dyn MapBackend,
    pos: Option<Position>,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = (&'a str, &'a Object);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        self.pos = self.backend.next(pos);
        self.backend.entry(pos)
    }
}
