//! Look-ahead cursor over a [`Map`].

use super::Map;
use crate::container::Position;
use crate::object::Object;

/// A map cursor with the same look-ahead discipline as
/// [`Cursor`](crate::container::Cursor): the next entry is resolved before
/// the current one can be unlinked.
///
/// ```
/// use voxa::container::{Map, MapKind};
///
/// let mut map = Map::new(MapKind::Hash);
/// map.set_int("keep", 1);
/// map.set_int("drop", 2);
///
/// let mut cursor = map.iterator();
/// while let Some(mut c) = cursor {
///     if c.key() == Some("drop") {
///         c.unlink();
///     }
///     cursor = c.advance();
/// }
///
/// assert_eq!(map.len(), 1);
/// ```
pub struct MapCursor<'a> {
    map: &'a mut Map,
    current: Option<Position>,
    lookahead: Option<Position>,
}

impl<'a> MapCursor<'a> {
    pub(super) fn new(map: &'a mut Map) -> Option<Self> {
        let first = map.backend.first()?;
        let lookahead = map.backend.next(first);
        Some(MapCursor {
            map,
            current: Some(first),
            lookahead,
        })
    }

    /// The current key, `None` once the entry has been unlinked.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.map.backend.entry(self.current?).map(|(key, _)| key)
    }

    /// The current value, `None` once the entry has been unlinked.
    #[must_use]
    pub fn value(&self) -> Option<&Object> {
        self.map.backend.entry(self.current?).map(|(_, obj)| obj)
    }

    /// Moves to the entry resolved as the look-ahead.
    #[must_use]
    pub fn advance(self) -> Option<Self> {
        let next = self.lookahead?;
        let lookahead = self.map.backend.next(next);
        Some(MapCursor {
            map: self.map,
            current: Some(next),
            lookahead,
        })
    }

    /// Removes the current entry and hands it to the caller.
    pub fn unlink(&mut self) -> Option<(String, Object)> {
        let pos = self.current.take()?;
        let entry = self.map.backend.remove(pos)?;
        self.lookahead = self
            .lookahead
            .map(|next| self.map.backend.shift_removed(pos, next));
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::super::MapKind;
    use super::*;

    #[test]
    fn test_unlink_every_entry() {
        for kind in [MapKind::List, MapKind::Hash] {
            let mut map = Map::new(kind);
            for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
                map.set_int(key, i as i32);
            }

            let mut removed = Vec::new();
            let mut cursor = map.iterator();
            while let Some(mut c) = cursor {
                let (key, _) = c.unlink().unwrap();
                assert!(c.key().is_none());
                assert!(c.value().is_none());
                removed.push(key);
                cursor = c.advance();
            }

            removed.sort_unstable();
            assert_eq!(removed, vec!["a", "b", "c", "d"]);
            assert!(map.is_empty());
        }
    }

    #[test]
    fn test_visit_values() {
        for kind in [MapKind::List, MapKind::Hash] {
            let mut map = Map::new(kind);
            map.set_int("x", 1);
            map.set_int("y", 2);

            let mut total = 0;
            let mut cursor = map.iterator();
            while let Some(c) = cursor {
                total += c.value().unwrap().as_int().unwrap();
                cursor = c.advance();
            }
            assert_eq!(total, 3);
        }
    }

    #[test]
    fn test_empty_map_has_no_cursor() {
        assert!(Map::new(MapKind::List).iterator().is_none());
    }
}
