//! Ordered sequences and key/value maps with interchangeable backings.
//!
//! [`List`] and [`Map`] are front-ends over a boxed backing chosen at
//! construction time ([`ListKind`], [`MapKind`], or a plug-in supplied
//! [`ListBackend`]/[`MapBackend`]). Callers never switch on the backing; all
//! of them satisfy the same contract and are observably equivalent.
//!
//! A container owns one reference to each element it holds. Inserting moves
//! an [`Object`](crate::object::Object) handle in, removing moves it back out
//! to the caller.
//!
//! # Cursors
//!
//! [`Cursor`] and [`MapCursor`] resolve the element after the current one
//! before the current one can be unlinked, so unlinking while iterating
//! never strands the traversal. A cursor holds the container's unique
//! borrow: no other handle can change the container while it is alive.
//!
//! ```
//! use voxa::container::{List, ListKind};
//! use voxa::object::Object;
//!
//! let mut list: List = (1..=5).map(Object::int).collect();
//! let mut removed = Vec::new();
//!
//! let mut cursor = list.iterator();
//! while let Some(mut c) = cursor {
//!     removed.push(c.unlink().unwrap().as_int().unwrap());
//!     cursor = c.advance();
//! }
//!
//! assert!(list.is_empty());
//! assert_eq!(removed, [1, 2, 3, 4, 5]);
//! ```

pub mod list;
pub mod map;

pub use list::{ArrayList, Cursor, Iter, LinkedList, List, ListBackend, ListKind};
pub use map::{HashMap, ListMap, Map, MapBackend, MapCursor, MapIter, MapKind};

/// A position inside a container backing.
///
/// Positions are only meaningful to the backing that produced them.
pub type Position = voxa_mem::Index;
