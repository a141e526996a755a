//! Item views.

use std::fmt;

use super::relation::Relation;
use super::utterance::{ContentData, ItemData, RelationData, Utterance};
use super::{ContentId, ItemId};
use crate::container::Map;
use crate::error::{Error, Result};
use crate::object::Object;

/// A read view of an item.
///
/// Navigation stays inside the item's relation, except for
/// [`Item::as_relation`], which jumps to the item sharing this item's
/// content in another relation. Features live in the shared content, so
/// they read the same through every item of that content.
#[derive(Clone, Copy)]
pub struct Item<'u> {
    utt: &'u Utterance,
    id: ItemId,
    data: &'u ItemData,
    relation: &'u RelationData,
    content: &'u ContentData,
}

impl<'u> Item<'u> {
    pub(super) fn new(utt: &'u Utterance, id: ItemId) -> Option<Self> {
        let data = utt.items.get(id.0)?;
        let relation = utt.relations.get(data.relation.0)?;
        let content = utt.contents.get(data.content.0)?;
        Some(Item {
            utt,
            id,
            data,
            relation,
            content,
        })
    }

    /// The item's handle.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The owning utterance.
    #[must_use]
    pub fn utterance(&self) -> &'u Utterance {
        self.utt
    }

    /// The relation the item belongs to.
    #[must_use]
    pub fn relation(&self) -> Relation<'u> {
        Relation::from_parts(self.utt, self.data.relation, self.relation)
    }

    /// Name of the relation the item belongs to.
    #[must_use]
    pub fn relation_name(&self) -> &'u str {
        &self.relation.name
    }

    fn step(&self, to: Option<ItemId>) -> Option<Item<'u>> {
        self.utt.item(to?)
    }

    /// The next sibling.
    #[must_use]
    pub fn next(&self) -> Option<Item<'u>> {
        self.step(self.data.next)
    }

    /// The previous sibling.
    #[must_use]
    pub fn prev(&self) -> Option<Item<'u>> {
        self.step(self.data.prev)
    }

    /// The parent, `None` for a top-level item.
    #[must_use]
    pub fn parent(&self) -> Option<Item<'u>> {
        self.step(self.data.parent)
    }

    /// The first daughter.
    #[must_use]
    pub fn daughter(&self) -> Option<Item<'u>> {
        self.step(self.data.daughter)
    }

    /// The last daughter.
    #[must_use]
    pub fn last_daughter(&self) -> Option<Item<'u>> {
        self.step(self.data.last_daughter)
    }

    /// The daughter at index `n`.
    #[must_use]
    pub fn nth_daughter(&self, n: usize) -> Option<Item<'u>> {
        self.daughters().nth(n)
    }

    /// The daughters, first to last.
    #[must_use]
    pub fn daughters(&self) -> Siblings<'u> {
        Siblings::new(self.utt, self.data.daughter)
    }

    /// The item sharing this item's content in the relation `name`.
    ///
    /// Looks through the content's own item list, so the cost depends on
    /// how many relations share the content, not on the size of `name`.
    #[must_use]
    pub fn as_relation(&self, name: &str) -> Option<Item<'u>> {
        let relation = self.utt.relation_id(name)?;
        let (_, item) = self
            .content
            .items
            .iter()
            .find(|(other, _)| *other == relation)?;
        self.utt.item(*item)
    }

    /// Returns `true` if this item's content has an item in `name`.
    #[must_use]
    pub fn in_relation(&self, name: &str) -> bool {
        self.as_relation(name).is_some()
    }

    /// The shared content's handle.
    #[must_use]
    pub fn content(&self) -> ContentId {
        self.data.content
    }

    /// Number of items referencing this item's content.
    #[must_use]
    pub fn content_refcount(&self) -> usize {
        self.content.items.len()
    }

    /// The content's features.
    #[must_use]
    pub fn features(&self) -> &'u Map {
        &self.content.features
    }

    /// The feature stored under `key`.
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<&'u Object> {
        self.content.features.get(key)
    }

    /// Returns `true` if the feature `key` is set.
    #[must_use]
    pub fn feature_present(&self, key: &str) -> bool {
        self.content.features.contains(key)
    }

    /// Feature names, in the map's iteration order.
    pub fn feature_keys(&self) -> impl Iterator<Item = &'u str> + use<'u> {
        self.content.features.key_iter()
    }

    /// The `name` feature, if it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&'u str> {
        self.feature("name").and_then(|obj| obj.as_str().ok())
    }

    /// Reads an int feature.
    ///
    /// # Errors
    ///
    /// [`Error::FeatureNotFound`] or [`Error::InvalidCast`].
    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.content.features.get_int(key)
    }

    /// Reads a float feature.
    ///
    /// # Errors
    ///
    /// [`Error::FeatureNotFound`] or [`Error::InvalidCast`].
    pub fn get_float(&self, key: &str) -> Result<f32> {
        self.content.features.get_float(key)
    }

    /// Reads a string feature.
    ///
    /// # Errors
    ///
    /// [`Error::FeatureNotFound`] or [`Error::InvalidCast`].
    pub fn get_str(&self, key: &str) -> Result<&'u str> {
        self.content.features.get_str(key)
    }

    /// Reads a bool feature.
    ///
    /// # Errors
    ///
    /// [`Error::FeatureNotFound`] or [`Error::InvalidCast`].
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.content.features.get_bool(key)
    }
}

impl PartialEq for Item<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.utt, other.utt) && self.id == other.id
    }
}

impl fmt::Debug for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("relation", &self.relation.name)
            .field("features", &self.content.features)
            .finish()
    }
}

/// Iterator over a chain of siblings.
pub struct Siblings<'u> {
    utt: &'u Utterance,
    next: Option<ItemId>,
}

impl<'u> Siblings<'u> {
    pub(super) fn new(utt: &'u Utterance, first: Option<ItemId>) -> Self {
        Siblings { utt, next: first }
    }
}

impl<'u> Iterator for Siblings<'u> {
    type Item = Item<'u>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.utt.item(self.next?)?;
        self.next = item.data.next;
        Some(item)
    }
}

/// A mutable view of an item.
pub struct ItemMut<'u> {
    utt: &'u mut Utterance,
    id: ItemId,
    content: ContentId,
}

impl<'u> ItemMut<'u> {
    pub(super) fn new(utt: &'u mut Utterance, id: ItemId, content: ContentId) -> Self {
        ItemMut { utt, id, content }
    }

    pub(super) fn resolve(utt: &'u mut Utterance, id: ItemId) -> Result<Self> {
        let content = utt.item_data(id)?.content;
        Ok(ItemMut::new(utt, id, content))
    }

    /// The item's handle.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The shared content's handle.
    #[must_use]
    pub fn content(&self) -> ContentId {
        self.content
    }

    /// Reborrows as a read view.
    #[must_use]
    pub fn as_item(&self) -> Option<Item<'_>> {
        Item::new(&*self.utt, self.id)
    }

    /// The feature stored under `key`.
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<&Object> {
        self.utt.contents.get(self.content.0)?.features.get(key)
    }

    fn features_mut(&mut self) -> Result<&mut Map> {
        self.utt
            .contents
            .get_mut(self.content.0)
            .map(|content| &mut content.features)
            .ok_or(Error::StaleItem)
    }

    /// Stores a feature on the shared content, returning the value it
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleItem`] if the content is gone.
    pub fn set_feature(&mut self, key: impl Into<String>, value: Object) -> Result<Option<Object>> {
        Ok(self.features_mut()?.set(key, value))
    }

    /// Stores an int feature.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn set_int(&mut self, key: impl Into<String>, value: i32) -> Result<()> {
        self.features_mut()?.set_int(key, value);
        Ok(())
    }

    /// Stores a float feature.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn set_float(&mut self, key: impl Into<String>, value: f32) -> Result<()> {
        self.features_mut()?.set_float(key, value);
        Ok(())
    }

    /// Stores a string feature.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.features_mut()?.set_string(key, value);
        Ok(())
    }

    /// Stores a bool feature.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> Result<()> {
        self.features_mut()?.set_bool(key, value);
        Ok(())
    }

    /// Sets the `name` feature.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.set_string("name", name)
    }

    /// Deletes a feature. Returns `false` if it was absent.
    ///
    /// # Errors
    ///
    /// See [`ItemMut::set_feature`].
    pub fn del_feature(&mut self, key: &str) -> Result<bool> {
        Ok(self.features_mut()?.delete(key))
    }

    /// Inserts a new sibling after this item.
    ///
    /// # Errors
    ///
    /// Same as [`RelationMut::append`](super::RelationMut::append).
    pub fn append(&mut self, share: Option<ContentId>) -> Result<ItemMut<'_>> {
        let id = self.utt.append_sibling(self.id, share)?;
        ItemMut::resolve(self.utt, id)
    }

    /// Inserts a new sibling before this item.
    ///
    /// # Errors
    ///
    /// Same as [`RelationMut::append`](super::RelationMut::append).
    pub fn prepend(&mut self, share: Option<ContentId>) -> Result<ItemMut<'_>> {
        let id = self.utt.prepend_sibling(self.id, share)?;
        ItemMut::resolve(self.utt, id)
    }

    /// Adds a new last daughter in the same relation.
    ///
    /// # Errors
    ///
    /// Same as [`RelationMut::append`](super::RelationMut::append).
    pub fn add_daughter(&mut self, share: Option<ContentId>) -> Result<ItemMut<'_>> {
        let id = self.utt.add_daughter(self.id, share)?;
        ItemMut::resolve(self.utt, id)
    }

    /// Removes the item and its descendants from the relation. Each removed
    /// item releases its content; contents left without items are deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleItem`] if the item is already gone.
    pub fn unlink(self) -> Result<()> {
        self.utt.unlink_item(self.id)
    }
}

impl fmt::Debug for ItemMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemMut")
            .field("id", &self.id)
            .field("content", &self.content)
            .finish()
    }
}
