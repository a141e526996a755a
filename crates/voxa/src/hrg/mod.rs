//! The utterance graph.
//!
//! An [`Utterance`] owns named relations. A relation is a chain of items,
//! and any item can carry a chain of daughters, so each relation is a forest
//! ordered by sibling links. Every item refers to a content record holding
//! the item's features. Items in *different* relations may share one
//! content: that is how the word "born" is one unit seen from both the
//! `Token` and the `Word` relation. A content is referenced at most once
//! per relation and is deleted together with its last item.
//!
//! Relations, items and contents live in generational arenas inside the
//! utterance. [`ItemId`], [`RelationId`] and [`ContentId`] are plain copyable
//! handles; a handle to something that has been deleted never resolves
//! again, and operations given one fail with
//! [`Error::StaleItem`](crate::Error::StaleItem).
//!
//! Reading goes through the borrowed views [`Item`] and [`Relation`],
//! writing through [`ItemMut`] and [`RelationMut`], which hold the
//! utterance's unique borrow. The utterance is owned by one processing
//! stage at a time and moves between stages; there is no internal locking.
//!
//! # Example
//!
//! ```
//! use voxa::hrg::Utterance;
//!
//! let mut utt = Utterance::new();
//!
//! let mut tokens = utt.new_relation("Token").unwrap();
//! let mut token = tokens.append(None).unwrap();
//! token.set_string("name", "born").unwrap();
//! let content = token.content();
//!
//! let mut words = utt.new_relation("Word").unwrap();
//! let word = words.append(Some(content)).unwrap().id();
//!
//! let word = utt.item(word).unwrap();
//! assert_eq!(word.name(), Some("born"));
//! assert_eq!(word.content_refcount(), 2);
//! assert_eq!(word.as_relation("Token").unwrap().name(), Some("born"));
//! ```

mod consistency;
mod item;
mod path;
mod relation;
mod utterance;

pub use item::{Item, ItemMut, Siblings};
pub use relation::{Relation, RelationMut, Walk};
pub use utterance::{ID_FEATURE, Utterance};

use std::fmt;

use voxa_mem::Index;

/// Handle to an item of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Index);

/// Handle to a relation of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationId(Index);

/// Handle to a content record of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(Index);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relation#{}", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content#{}", self.0)
    }
}
