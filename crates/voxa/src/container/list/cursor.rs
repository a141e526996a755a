//! Look-ahead cursor over a [`List`].

use super::List;
use crate::container::Position;
use crate::error::{Error, Result};
use crate::object::Object;

/// A cursor that resolves the next element before the current one can be
/// unlinked.
///
/// The cursor holds the list's unique borrow, so the list can only change
/// through the cursor while it exists. [`Cursor::advance`] consumes the
/// cursor and returns `None` at the end of the list.
///
/// ```
/// use voxa::container::{List, ListKind};
/// use voxa::object::Object;
///
/// let mut list = List::new(ListKind::Linked);
/// list.extend([1, 2, 3].map(Object::int));
///
/// let mut cursor = list.iterator();
/// while let Some(mut c) = cursor {
///     if c.current().unwrap().as_int().unwrap() == 2 {
///         c.unlink();
///     }
///     cursor = c.advance();
/// }
///
/// assert_eq!(list.len(), 2);
/// ```
pub struct Cursor<'a> {
    list: &'a mut List,
    current: Option<Position>,
    lookahead: Option<Position>,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(list: &'a mut List) -> Option<Self> {
        let first = list.backend.first()?;
        let lookahead = list.backend.next(first);
        Some(Cursor {
            list,
            current: Some(first),
            lookahead,
        })
    }

    /// The current element, `None` once it has been unlinked.
    #[must_use]
    pub fn current(&self) -> Option<&Object> {
        self.list.backend.get(self.current?)
    }

    /// Moves to the element resolved as the look-ahead.
    #[must_use]
    pub fn advance(self) -> Option<Self> {
        let next = self.lookahead?;
        let lookahead = self.list.backend.next(next);
        Some(Cursor {
            list: self.list,
            current: Some(next),
            lookahead,
        })
    }

    /// Removes the current element and hands it to the caller.
    ///
    /// The look-ahead is unaffected, so the following [`Cursor::advance`]
    /// continues with the element that came after the removed one.
    pub fn unlink(&mut self) -> Option<Object> {
        let pos = self.current.take()?;
        let obj = self.list.backend.remove(pos)?;
        self.lookahead = self
            .lookahead
            .map(|next| self.list.backend.shift_removed(pos, next));
        Some(obj)
    }

    /// Inserts `obj` before the current element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the current element has been
    /// unlinked.
    pub fn insert_before(&mut self, obj: Object) -> Result<()> {
        let pos = self.current.ok_or_else(no_current)?;
        let backend = &mut self.list.backend;
        let inserted = backend.insert_before(pos, obj);
        self.current = Some(backend.shift_inserted(inserted, pos));
        self.lookahead = self
            .lookahead
            .map(|next| backend.shift_inserted(inserted, next));
        Ok(())
    }

    /// Inserts `obj` after the current element. The next
    /// [`Cursor::advance`] visits it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the current element has been
    /// unlinked.
    pub fn insert_after(&mut self, obj: Object) -> Result<()> {
        let pos = self.current.ok_or_else(no_current)?;
        let backend = &mut self.list.backend;
        let inserted = backend.insert_after(pos, obj);
        self.current = Some(backend.shift_inserted(inserted, pos));
        self.lookahead = Some(inserted);
        Ok(())
    }
}

fn no_current() -> Error {
    Error::invalid_argument("cursor has no current element")
}

#[cfg(test)]
mod tests {
    use super::super::ListKind;
    use super::*;

    fn ints(list: &List) -> Vec<i32> {
        list.iter().map(|o| o.as_int().unwrap()).collect()
    }

    fn filled(kind: ListKind, n: i32) -> List {
        let mut list = List::new(kind);
        list.extend((1..=n).map(Object::int));
        list
    }

    const KINDS: [ListKind; 2] = [ListKind::Linked, ListKind::Array];

    #[test]
    fn test_visit_all() {
        for kind in KINDS {
            let mut list = filled(kind, 4);
            let mut seen = Vec::new();
            let mut cursor = list.iterator();
            while let Some(c) = cursor {
                seen.push(c.current().unwrap().as_int().unwrap());
                cursor = c.advance();
            }
            assert_eq!(seen, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_unlink_every_element() {
        for kind in KINDS {
            let mut list = filled(kind, 5);
            let mut removed = Vec::new();
            let mut cursor = list.iterator();
            while let Some(mut c) = cursor {
                removed.push(c.unlink().unwrap().as_int().unwrap());
                assert!(c.current().is_none());
                assert!(c.unlink().is_none());
                cursor = c.advance();
            }
            assert!(list.is_empty());
            assert_eq!(removed, vec![1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_unlink_transfers_ownership() {
        for kind in KINDS {
            let obj = Object::int(1);
            let mut list = List::new(kind);
            list.append(obj.clone());

            let mut cursor = list.iterator().unwrap();
            let taken = cursor.unlink().unwrap();
            assert_eq!(obj.refcount(), 2);
            drop(taken);
            assert_eq!(obj.refcount(), 1);
        }
    }

    #[test]
    fn test_insert_after_is_visited() {
        for kind in KINDS {
            let mut list = filled(kind, 3);
            let mut seen = Vec::new();
            let mut cursor = list.iterator();
            while let Some(mut c) = cursor {
                let value = c.current().unwrap().as_int().unwrap();
                seen.push(value);
                if value == 1 {
                    c.insert_after(Object::int(10)).unwrap();
                }
                cursor = c.advance();
            }
            assert_eq!(seen, vec![1, 10, 2, 3]);
            assert_eq!(ints(&list), vec![1, 10, 2, 3]);
        }
    }

    #[test]
    fn test_insert_before_is_not_visited() {
        for kind in KINDS {
            let mut list = filled(kind, 3);
            let mut seen = Vec::new();
            let mut cursor = list.iterator();
            while let Some(mut c) = cursor {
                let value = c.current().unwrap().as_int().unwrap();
                seen.push(value);
                if value == 2 {
                    c.insert_before(Object::int(20)).unwrap();
                    assert_eq!(c.current().unwrap().as_int().unwrap(), 2);
                }
                cursor = c.advance();
            }
            assert_eq!(seen, vec![1, 2, 3]);
            assert_eq!(ints(&list), vec![1, 20, 2, 3]);
        }
    }

    #[test]
    fn test_insert_after_unlink_fails() {
        for kind in KINDS {
            let mut list = filled(kind, 2);
            let mut cursor = list.iterator().unwrap();
            cursor.unlink();
            assert!(matches!(
                cursor.insert_after(Object::int(0)).unwrap_err(),
                Error::InvalidArgument { .. }
            ));
            assert!(cursor.insert_before(Object::int(0)).is_err());
        }
    }

    #[test]
    fn test_unlink_alternate() {
        for kind in KINDS {
            let mut list = filled(kind, 6);
            let mut cursor = list.iterator();
            let mut step = 0;
            while let Some(mut c) = cursor {
                if step % 2 == 1 {
                    c.unlink();
                }
                step += 1;
                cursor = c.advance();
            }
            assert_eq!(step, 6);
            assert_eq!(ints(&list), vec![1, 3, 5]);
        }
    }
}
