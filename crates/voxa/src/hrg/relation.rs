//! Relation views.

use std::fmt;

use super::item::{Item, ItemMut, Siblings};
use super::utterance::{RelationData, Utterance};
use super::{ContentId, RelationId};
use crate::error::Result;

/// A read view of a relation.
#[derive(Clone, Copy)]
pub struct Relation<'u> {
    utt: &'u Utterance,
    id: RelationId,
    data: &'u RelationData,
}

impl<'u> Relation<'u> {
    pub(super) fn new(utt: &'u Utterance, id: RelationId) -> Option<Self> {
        let data = utt.relations.get(id.0)?;
        Some(Relation { utt, id, data })
    }

    pub(super) fn from_parts(utt: &'u Utterance, id: RelationId, data: &'u RelationData) -> Self {
        Relation { utt, id, data }
    }

    /// The relation's handle.
    #[must_use]
    pub fn id(&self) -> RelationId {
        self.id
    }

    /// The relation's name.
    #[must_use]
    pub fn name(&self) -> &'u str {
        &self.data.name
    }

    /// The owning utterance.
    #[must_use]
    pub fn utterance(&self) -> &'u Utterance {
        self.utt
    }

    /// Number of items in the top-level chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len
    }

    /// Returns `true` if the relation has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.head.is_none()
    }

    /// The first top-level item.
    #[must_use]
    pub fn head(&self) -> Option<Item<'u>> {
        self.utt.item(self.data.head?)
    }

    /// The last top-level item.
    #[must_use]
    pub fn tail(&self) -> Option<Item<'u>> {
        self.utt.item(self.data.tail?)
    }

    /// The top-level items, head to tail.
    #[must_use]
    pub fn items(&self) -> Siblings<'u> {
        Siblings::new(self.utt, self.data.head)
    }

    /// Every item of the relation, parents before their daughters.
    #[must_use]
    pub fn walk(&self) -> Walk<'u> {
        Walk {
            next: self.head(),
        }
    }
}

impl PartialEq for Relation<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.utt, other.utt) && self.id == other.id
    }
}

impl fmt::Debug for Relation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("id", &self.id)
            .field("name", &self.data.name)
            .field("len", &self.data.len)
            .finish()
    }
}

/// Pre-order traversal returned by [`Relation::walk`].
pub struct Walk<'u> {
    next: Option<Item<'u>>,
}

impl<'u> Iterator for Walk<'u> {
    type Item = Item<'u>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next.take()?;
        self.next = item.daughter().or_else(|| {
            let mut up = Some(item);
            while let Some(node) = up {
                if let Some(next) = node.next() {
                    return Some(next);
                }
                up = node.parent();
            }
            None
        });
        Some(item)
    }
}

/// A mutable view of a relation.
#[derive(Debug)]
pub struct RelationMut<'u> {
    utt: &'u mut Utterance,
    id: RelationId,
}

impl<'u> RelationMut<'u> {
    pub(super) fn new(utt: &'u mut Utterance, id: RelationId) -> Self {
        RelationMut { utt, id }
    }

    /// The relation's handle.
    #[must_use]
    pub fn id(&self) -> RelationId {
        self.id
    }

    /// Reborrows as a read view.
    #[must_use]
    pub fn as_relation(&self) -> Option<Relation<'_>> {
        Relation::new(&*self.utt, self.id)
    }

    /// Appends a top-level item. With `share`, the item refers to that
    /// content; otherwise a fresh content is created.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleItem`](crate::Error::StaleItem) if the relation or
    ///   `share` no longer exists.
    /// - [`Error::ContentAlreadyInRelation`](crate::Error::ContentAlreadyInRelation)
    ///   if `share` already has an item in this relation.
    /// - [`Error::AllocationFailure`](crate::Error::AllocationFailure) if no
    ///   slot is left.
    pub fn append(&mut self, share: Option<ContentId>) -> Result<ItemMut<'_>> {
        let id = self.utt.append_top(self.id, share)?;
        ItemMut::resolve(self.utt, id)
    }

    /// Prepends a top-level item. See [`RelationMut::append`].
    ///
    /// # Errors
    ///
    /// See [`RelationMut::append`].
    pub fn prepend(&mut self, share: Option<ContentId>) -> Result<ItemMut<'_>> {
        let id = self.utt.prepend_top(self.id, share)?;
        ItemMut::resolve(self.utt, id)
    }
}
