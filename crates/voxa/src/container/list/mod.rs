//! The `List` contract and its builtin backings.

mod array;
mod cursor;
mod linked;

pub use array::ArrayList;
pub use cursor::Cursor;
pub use linked::LinkedList;

use std::fmt;

use super::Position;
use crate::error::{Error, Result};
use crate::object::{Class, Object};

/// Storage behind a [`List`].
///
/// Positions handed out by a backing stay valid until the element at that
/// position is removed, except where [`ListBackend::shift_removed`] and
/// [`ListBackend::shift_inserted`] say otherwise. Index-based backings use
/// those two hooks to tell cursors how positions move.
pub trait ListBackend: Send + Sync {
    /// The concrete list class this backing implements.
    fn class(&self) -> &'static Class;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Position of the first element.
    fn first(&self) -> Option<Position>;

    /// Position of the last element.
    fn last(&self) -> Option<Position>;

    /// Position after `pos`.
    fn next(&self, pos: Position) -> Option<Position>;

    /// Position before `pos`.
    fn prev(&self, pos: Position) -> Option<Position>;

    /// Element at `pos`.
    fn get(&self, pos: Position) -> Option<&Object>;

    /// Appends `obj`.
    fn push_back(&mut self, obj: Object) -> Position;

    /// Prepends `obj`.
    fn push_front(&mut self, obj: Object) -> Position;

    /// Inserts `obj` before `pos`. A dead `pos` appends.
    fn insert_before(&mut self, pos: Position, obj: Object) -> Position;

    /// Inserts `obj` after `pos`. A dead `pos` appends.
    fn insert_after(&mut self, pos: Position, obj: Object) -> Position;

    /// Removes the element at `pos`.
    fn remove(&mut self, pos: Position) -> Option<Object>;

    /// Reverses the element order in place.
    fn reverse(&mut self);

    /// Drops every element.
    fn clear(&mut self);

    /// Where `pos` ends up after the element at `removed` was taken out.
    fn shift_removed(&self, _removed: Position, pos: Position) -> Position {
        pos
    }

    /// Where `pos` ends up after an element was inserted at `inserted`.
    fn shift_inserted(&self, _inserted: Position, pos: Position) -> Position {
        pos
    }

    /// The elements as a contiguous slice, for backings that store them
    /// that way.
    fn as_slice(&self) -> Option<&[Object]> {
        None
    }

    /// An empty backing of the same kind.
    fn empty(&self) -> Box<dyn ListBackend>;
}

/// The builtin list backings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListKind {
    /// Doubly linked nodes in a generational arena. Positions survive any
    /// insertion or removal elsewhere in the list.
    #[default]
    Linked,
    /// A contiguous vector. Cheap random access and a slice view for
    /// bindings.
    Array,
}

/// An ordered, mutable sequence of objects.
///
/// # Example
///
/// ```
/// use voxa::container::{List, ListKind};
/// use voxa::object::Object;
///
/// let mut list = List::new(ListKind::Array);
/// list.append(Object::int(2));
/// list.prepend(Object::int(1));
/// list.push(Object::int(3));
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.nth(1).unwrap().as_int().unwrap(), 2);
/// assert_eq!(list.pop().unwrap().as_int().unwrap(), 3);
/// assert!(list.nth(5).is_none());
/// ```
pub struct List {
    backend: Box<dyn ListBackend>,
}

impl List {
    /// Creates an empty list with a builtin backing.
    #[must_use]
    pub fn new(kind: ListKind) -> List {
        match kind {
            ListKind::Linked => List::with_backend(Box::new(LinkedList::new())),
            ListKind::Array => List::with_backend(Box::new(ArrayList::new())),
        }
    }

    /// Creates an empty list over a caller-supplied backing.
    #[must_use]
    pub fn with_backend(backend: Box<dyn ListBackend>) -> List {
        List { backend }
    }

    /// The concrete list class of the backing.
    #[must_use]
    pub fn class(&self) -> &'static Class {
        self.backend.class()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.len() == 0
    }

    /// Appends `obj`, taking over the handle.
    pub fn append(&mut self, obj: Object) {
        self.backend.push_back(obj);
    }

    /// Prepends `obj`, taking over the handle.
    pub fn prepend(&mut self, obj: Object) {
        self.backend.push_front(obj);
    }

    /// Pushes onto the tail.
    pub fn push(&mut self, obj: Object) {
        self.backend.push_back(obj);
    }

    /// Removes the tail element and hands it to the caller.
    pub fn pop(&mut self) -> Option<Object> {
        let last = self.backend.last()?;
        self.backend.remove(last)
    }

    /// Removes the head element and hands it to the caller.
    pub fn pop_front(&mut self) -> Option<Object> {
        let first = self.backend.first()?;
        self.backend.remove(first)
    }

    /// Reverses the list in place.
    pub fn reverse(&mut self) {
        self.backend.reverse();
    }

    /// The element at index `n`, `None` past the end.
    #[must_use]
    pub fn nth(&self, n: usize) -> Option<&Object> {
        if let Some(slice) = self.backend.as_slice() {
            return slice.get(n);
        }
        let mut pos = self.backend.first()?;
        for _ in 0..n {
            pos = self.backend.next(pos)?;
        }
        self.backend.get(pos)
    }

    /// The head element.
    #[must_use]
    pub fn first(&self) -> Option<&Object> {
        self.backend.first().and_then(|pos| self.backend.get(pos))
    }

    /// The tail element.
    #[must_use]
    pub fn last(&self) -> Option<&Object> {
        self.backend.last().and_then(|pos| self.backend.get(pos))
    }

    /// Returns `true` if some element compares equal to `probe`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotComparable`] if the class of `probe` has no
    /// compare operation.
    pub fn val_present(&self, probe: &Object) -> Result<bool> {
        if probe.class().ops().compare.is_none() {
            return Err(Error::NotComparable {
                class: probe.class().ancestry().to_string(),
            });
        }
        for element in self.iter() {
            if probe.compare(element)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Appends every element of `other`, sharing them.
    ///
    /// `other` is only borrowed, so a list cannot be merged into itself
    /// here; see [`merge_lists`](crate::object::merge_lists) for that case.
    pub fn merge(&mut self, other: &List) {
        for obj in other.iter() {
            self.backend.push_back(obj.clone());
        }
    }

    /// Copies the elements into `dst`, or into a new list with this list's
    /// backing when `dst` is `None`.
    ///
    /// Elements are shared, not copied. `dst` may use any backing.
    #[must_use]
    pub fn copy(&self, dst: Option<List>) -> List {
        let mut dst = dst.unwrap_or_else(|| List::with_backend(self.backend.empty()));
        dst.merge(self);
        dst
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.backend.clear();
    }

    /// A look-ahead cursor on the head element, `None` for an empty list.
    pub fn iterator(&mut self) -> Option<Cursor<'_>> {
        Cursor::new(self)
    }

    /// A borrowing iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            backend: self.backend.as_ref(),
            pos: self.backend.first(),
            remaining: self.backend.len(),
        }
    }

    /// The elements as a slice when the backing is contiguous.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Object]> {
        self.backend.as_slice()
    }
}

impl Default for List {
    fn default() -> Self {
        List::new(ListKind::default())
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("class", &self.class().name())
            .field("len", &self.len())
            .finish()
    }
}

impl FromIterator<Object> for List {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut list = List::default();
        list.extend(iter);
        list
    }
}

impl Extend<Object> for List {
    fn extend<I: IntoIterator<Item = Object>>(&mut self, iter: I) {
        for obj in iter {
            self.backend.push_back(obj);
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Object;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator returned by [`List::iter`].
pub struct Iter<'a> {
    backend: &'a dyn ListBackend,
    pos: Option<Position>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Object;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        self.pos = self.backend.next(pos);
        self.remaining = self.remaining.saturating_sub(1);
        self.backend.get(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(list: &List) -> Vec<i32> {
        list.iter().map(|o| o.as_int().unwrap()).collect()
    }

    fn both() -> [List; 2] {
        [List::new(ListKind::Linked), List::new(ListKind::Array)]
    }

    #[test]
    fn test_append_prepend() {
        for mut list in both() {
            list.append(Object::int(2));
            list.prepend(Object::int(1));
            list.append(Object::int(3));
            assert_eq!(ints(&list), vec![1, 2, 3]);
            assert_eq!(list.len(), 3);
            assert_eq!(list.first().unwrap().as_int().unwrap(), 1);
            assert_eq!(list.last().unwrap().as_int().unwrap(), 3);
        }
    }

    #[test]
    fn test_append_takes_a_reference() {
        for mut list in both() {
            let obj = Object::int(1);
            list.append(obj.clone());
            assert_eq!(obj.refcount(), 2);

            let popped = list.pop().unwrap();
            assert_eq!(obj.refcount(), 2);
            drop(popped);
            assert_eq!(obj.refcount(), 1);

            list.append(obj.clone());
            drop(list);
            assert_eq!(obj.refcount(), 1);
        }
    }

    #[test]
    fn test_push_pop() {
        for mut list in both() {
            list.push(Object::int(1));
            list.push(Object::int(2));
            assert_eq!(list.pop().unwrap().as_int().unwrap(), 2);
            assert_eq!(list.pop_front().unwrap().as_int().unwrap(), 1);
            assert!(list.pop().is_none());
            assert!(list.pop_front().is_none());
            assert!(list.is_empty());
        }
    }

    #[test]
    fn test_reverse() {
        for mut list in both() {
            list.extend((1..=4).map(Object::int));
            list.reverse();
            assert_eq!(ints(&list), vec![4, 3, 2, 1]);
            list.append(Object::int(0));
            assert_eq!(ints(&list), vec![4, 3, 2, 1, 0]);
        }
    }

    #[test]
    fn test_nth() {
        for mut list in both() {
            list.extend((10..13).map(Object::int));
            assert_eq!(list.nth(0).unwrap().as_int().unwrap(), 10);
            assert_eq!(list.nth(2).unwrap().as_int().unwrap(), 12);
            assert!(list.nth(3).is_none());
        }
    }

    #[test]
    fn test_val_present() {
        for mut list in both() {
            list.append(Object::string("a"));
            list.append(Object::int(1));
            assert!(list.val_present(&Object::int(1)).unwrap());
            assert!(list.val_present(&Object::string("a")).unwrap());
            assert!(!list.val_present(&Object::string("b")).unwrap());

            let nested = Object::new("LinkedList").unwrap();
            assert!(matches!(
                list.val_present(&nested).unwrap_err(),
                Error::NotComparable { .. }
            ));
        }
    }

    #[test]
    fn test_merge() {
        for mut list in both() {
            let shared = Object::int(2);
            let mut other = List::new(ListKind::Array);
            other.append(shared.clone());

            list.append(Object::int(1));
            list.merge(&other);

            assert_eq!(ints(&list), vec![1, 2]);
            assert_eq!(other.len(), 1);
            assert_eq!(shared.refcount(), 3);
        }
    }

    #[test]
    fn test_copy_same_and_cross_backing() {
        let mut linked = List::new(ListKind::Linked);
        linked.extend((1..=3).map(Object::int));

        let same = linked.copy(None);
        assert_eq!(same.class(), linked.class());
        assert_eq!(ints(&same), vec![1, 2, 3]);

        let mut dst = List::new(ListKind::Array);
        dst.append(Object::int(0));
        let cross = linked.copy(Some(dst));
        assert_eq!(cross.class().name(), "ArrayList");
        assert_eq!(ints(&cross), vec![0, 1, 2, 3]);
        assert!(cross.nth(1).unwrap().ptr_eq(linked.nth(0).unwrap()));
    }

    #[test]
    fn test_iter_exact_size() {
        for mut list in both() {
            list.extend((0..5).map(Object::int));
            let mut iter = list.iter();
            assert_eq!(iter.len(), 5);
            iter.next();
            assert_eq!(iter.len(), 4);
        }
    }

    #[test]
    fn test_as_slice() {
        let mut array = List::new(ListKind::Array);
        array.append(Object::int(1));
        assert_eq!(array.as_slice().unwrap().len(), 1);
        assert!(List::new(ListKind::Linked).as_slice().is_none());
    }

    #[test]
    fn test_clear() {
        for mut list in both() {
            let obj = Object::int(1);
            list.append(obj.clone());
            list.clear();
            assert!(list.is_empty());
            assert_eq!(obj.refcount(), 1);
            assert!(list.iterator().is_none());
        }
    }
}
