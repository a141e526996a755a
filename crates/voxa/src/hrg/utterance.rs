//! Utterance storage and the structural mutations every view goes through.

use std::fmt;
use std::sync::{Arc, Weak};

use fxhash::FxHashMap;
use voxa_mem::Arena;

use super::item::{Item, ItemMut};
use super::relation::{Relation, RelationMut};
use super::{ContentId, ItemId, RelationId};
use crate::config::Config;
use crate::container::Map;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::voice::Voice;

/// Feature key holding the utterance-unique id of a content.
pub const ID_FEATURE: &str = "_id";

pub(super) struct RelationData {
    pub(super) name: String,
    pub(super) head: Option<ItemId>,
    pub(super) tail: Option<ItemId>,
    /// Number of items in the top-level chain.
    pub(super) len: usize,
}

#[derive(Clone, Copy)]
pub(super) struct ItemData {
    pub(super) relation: RelationId,
    pub(super) content: ContentId,
    pub(super) parent: Option<ItemId>,
    pub(super) next: Option<ItemId>,
    pub(super) prev: Option<ItemId>,
    pub(super) daughter: Option<ItemId>,
    pub(super) last_daughter: Option<ItemId>,
}

impl ItemData {
    fn new(relation: RelationId, content: ContentId) -> Self {
        ItemData {
            relation,
            content,
            parent: None,
            next: None,
            prev: None,
            daughter: None,
            last_daughter: None,
        }
    }
}

pub(super) struct ContentData {
    pub(super) features: Map,
    /// The items referencing this content, at most one per relation.
    pub(super) items: Vec<(RelationId, ItemId)>,
}

/// One unit of synthesis: named relations over shared contents, plus
/// utterance-level features.
///
/// Dropping an utterance drops every relation, item and content it owns,
/// releasing the feature values they hold.
pub struct Utterance {
    pub(super) config: Config,
    voice: Option<Weak<Voice>>,
    features: Map,
    pub(super) relations: Arena<RelationData>,
    relation_names: FxHashMap<String, RelationId>,
    relation_order: Vec<RelationId>,
    pub(super) items: Arena<ItemData>,
    pub(super) contents: Arena<ContentData>,
    next_id: i32,
}

impl Utterance {
    /// Creates an empty utterance with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Utterance::with_config(Config::default())
    }

    /// Creates an empty utterance.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Utterance {
            features: Map::new(config.feature_map),
            config,
            voice: None,
            relations: Arena::new(),
            relation_names: FxHashMap::default(),
            relation_order: Vec::new(),
            items: Arena::new(),
            contents: Arena::new(),
            next_id: 0,
        }
    }

    /// The configuration this utterance was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Binds the utterance to the voice that synthesizes it. The utterance
    /// does not keep the voice alive.
    pub fn set_voice(&mut self, voice: &Arc<Voice>) {
        self.voice = Some(Arc::downgrade(voice));
    }

    /// The voice this utterance is bound to, if it is still alive.
    #[must_use]
    pub fn voice(&self) -> Option<Arc<Voice>> {
        self.voice.as_ref().and_then(Weak::upgrade)
    }

    /// Draws the next value of the utterance's id counter.
    pub fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    // ========================================================================
    // Features
    // ========================================================================

    /// Utterance-level features.
    #[must_use]
    pub fn features(&self) -> &Map {
        &self.features
    }

    /// Utterance-level features, mutably.
    pub fn features_mut(&mut self) -> &mut Map {
        &mut self.features
    }

    /// The utterance feature stored under `key`.
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<&Object> {
        self.features.get(key)
    }

    /// Stores an utterance feature, returning the value it replaced.
    pub fn set_feature(&mut self, key: impl Into<String>, value: Object) -> Option<Object> {
        self.features.set(key, value)
    }

    /// Deletes an utterance feature. Returns `false` if it was absent.
    pub fn del_feature(&mut self, key: &str) -> bool {
        self.features.delete(key)
    }

    /// Returns `true` if the utterance feature `key` is set.
    #[must_use]
    pub fn feature_present(&self, key: &str) -> bool {
        self.features.contains(key)
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// Creates an empty relation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `name` is empty.
    /// - [`Error::DuplicateRelation`] if the name is taken.
    /// - [`Error::AllocationFailure`] if no slot is left.
    pub fn new_relation(&mut self, name: &str) -> Result<RelationMut<'_>> {
        if name.is_empty() {
            return Err(Error::invalid_argument("relation name is empty"));
        }
        if self.relation_names.contains_key(name) {
            return Err(Error::DuplicateRelation {
                name: name.to_string(),
            });
        }
        let id = RelationId(self.relations.try_insert(RelationData {
            name: name.to_string(),
            head: None,
            tail: None,
            len: 0,
        })?);
        self.relation_names.insert(name.to_string(), id);
        self.relation_order.push(id);
        voxa_log::debug!("created relation {} ({})", name, id);
        Ok(RelationMut::new(self, id))
    }

    /// The relation called `name`.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<Relation<'_>> {
        self.relation_by_id(self.relation_id(name)?)
    }

    /// The relation called `name`, for mutation.
    pub fn relation_mut(&mut self, name: &str) -> Option<RelationMut<'_>> {
        let id = self.relation_id(name)?;
        self.relation_mut_by_id(id)
    }

    /// The relation behind `id`.
    #[must_use]
    pub fn relation_by_id(&self, id: RelationId) -> Option<Relation<'_>> {
        Relation::new(self, id)
    }

    /// The relation behind `id`, for mutation.
    pub fn relation_mut_by_id(&mut self, id: RelationId) -> Option<RelationMut<'_>> {
        if self.relations.contains(id.0) {
            Some(RelationMut::new(self, id))
        } else {
            None
        }
    }

    pub(super) fn relation_id(&self, name: &str) -> Option<RelationId> {
        self.relation_names.get(name).copied()
    }

    /// Returns `true` if a relation called `name` exists.
    #[must_use]
    pub fn relation_present(&self, name: &str) -> bool {
        self.relation_names.contains_key(name)
    }

    /// Relation names in creation order.
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relation_order
            .iter()
            .filter_map(|id| self.relations.get(id.0))
            .map(|relation| relation.name.as_str())
    }

    /// Number of relations.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relation_order.len()
    }

    /// Deletes a relation with all of its items. Contents left without items
    /// are deleted with them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelationNotFound`] if there is no such relation.
    pub fn del_relation(&mut self, name: &str) -> Result<()> {
        let id = self
            .relation_names
            .remove(name)
            .ok_or_else(|| Error::RelationNotFound {
                name: name.to_string(),
            })?;
        self.relation_order.retain(|other| *other != id);

        if let Some(relation) = self.relations.remove(id.0) {
            let mut cursor = relation.head;
            while let Some(item) = cursor {
                cursor = self.items.get(item.0).and_then(|data| data.next);
                self.destroy_tree(item);
            }
        }
        voxa_log::debug!("deleted relation {} ({})", name, id);
        self.verify();
        Ok(())
    }

    /// Creates the relation `name` and fills it with `build`. If `build`
    /// fails, the relation is deleted again and the error returned, leaving
    /// the utterance as it was apart from consumed ids.
    ///
    /// # Errors
    ///
    /// Whatever [`Utterance::new_relation`] or `build` reports.
    ///
    /// # Example
    ///
    /// ```
    /// use voxa::hrg::Utterance;
    /// use voxa::Error;
    ///
    /// let mut utt = Utterance::new();
    /// let result = utt.build_relation("Phrase", |utt, phrase| {
    ///     utt.relation_mut_by_id(phrase).unwrap().append(None)?;
    ///     Err(Error::Processor {
    ///         name: "phrasifier".into(),
    ///         message: "no break model".into(),
    ///     })
    /// });
    ///
    /// assert!(result.is_err());
    /// assert!(!utt.relation_present("Phrase"));
    /// assert_eq!(utt.item_count(), 0);
    /// ```
    pub fn build_relation<F>(&mut self, name: &str, build: F) -> Result<RelationId>
    where
        F: FnOnce(&mut Utterance, RelationId) -> Result<()>,
    {
        let id = self.new_relation(name)?.id();
        match build(self, id) {
            Ok(()) => Ok(id),
            Err(err) => {
                voxa_log::warn!("rolling back relation {}: {}", name, err);
                // The closure may already have deleted it.
                if self.relation_id(name) == Some(id) {
                    self.del_relation(name)?;
                }
                Err(err)
            }
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// The item behind `id`.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<Item<'_>> {
        Item::new(self, id)
    }

    /// The item behind `id`, for mutation.
    pub fn item_mut(&mut self, id: ItemId) -> Option<ItemMut<'_>> {
        let content = self.items.get(id.0)?.content;
        Some(ItemMut::new(self, id, content))
    }

    /// Number of live items across all relations.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of live contents.
    #[must_use]
    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    // ========================================================================
    // Structural primitives
    // ========================================================================

    pub(super) fn item_data(&self, id: ItemId) -> Result<&ItemData> {
        self.items.get(id.0).ok_or(Error::StaleItem)
    }

    fn item_data_mut(&mut self, id: ItemId) -> Result<&mut ItemData> {
        self.items.get_mut(id.0).ok_or(Error::StaleItem)
    }

    fn relation_data_mut(&mut self, id: RelationId) -> Result<&mut RelationData> {
        self.relations.get_mut(id.0).ok_or(Error::StaleItem)
    }

    fn relation_name(&self, id: RelationId) -> String {
        self.relations
            .get(id.0)
            .map_or_else(|| id.to_string(), |relation| relation.name.clone())
    }

    /// Allocates an unlinked item in `relation`, sharing `share` or creating
    /// a fresh content. Nothing is modified when this fails.
    fn create_item(&mut self, relation: RelationId, share: Option<ContentId>) -> Result<ItemId> {
        if !self.relations.contains(relation.0) {
            return Err(Error::StaleItem);
        }

        let content = match share {
            Some(content) => {
                let data = self.contents.get(content.0).ok_or(Error::StaleItem)?;
                if data.items.iter().any(|(r, _)| *r == relation) {
                    return Err(Error::ContentAlreadyInRelation {
                        relation: self.relation_name(relation),
                    });
                }
                content
            }
            None => {
                let mut features = Map::new(self.config.feature_map);
                if self.config.assign_item_ids {
                    let id = self.next_id();
                    features.set_int(ID_FEATURE, id);
                }
                ContentId(self.contents.try_insert(ContentData {
                    features,
                    items: Vec::new(),
                })?)
            }
        };

        let id = match self.items.try_insert(ItemData::new(relation, content)) {
            Ok(index) => ItemId(index),
            Err(full) => {
                if share.is_none() {
                    self.contents.remove(content.0);
                }
                return Err(full.into());
            }
        };
        if let Some(data) = self.contents.get_mut(content.0) {
            data.items.push((relation, id));
        }
        Ok(id)
    }

    pub(super) fn append_top(
        &mut self,
        relation: RelationId,
        share: Option<ContentId>,
    ) -> Result<ItemId> {
        let id = self.create_item(relation, share)?;
        let rel = self.relation_data_mut(relation)?;
        let tail = rel.tail.replace(id);
        if tail.is_none() {
            rel.head = Some(id);
        }
        rel.len += 1;

        self.item_data_mut(id)?.prev = tail;
        if let Some(tail) = tail {
            self.item_data_mut(tail)?.next = Some(id);
        }
        self.verify();
        Ok(id)
    }

    pub(super) fn prepend_top(
        &mut self,
        relation: RelationId,
        share: Option<ContentId>,
    ) -> Result<ItemId> {
        let id = self.create_item(relation, share)?;
        let rel = self.relation_data_mut(relation)?;
        let head = rel.head.replace(id);
        if head.is_none() {
            rel.tail = Some(id);
        }
        rel.len += 1;

        self.item_data_mut(id)?.next = head;
        if let Some(head) = head {
            self.item_data_mut(head)?.prev = Some(id);
        }
        self.verify();
        Ok(id)
    }

    /// Inserts a new sibling right after `anchor`.
    pub(super) fn append_sibling(
        &mut self,
        anchor: ItemId,
        share: Option<ContentId>,
    ) -> Result<ItemId> {
        let data = *self.item_data(anchor)?;
        let id = self.create_item(data.relation, share)?;
        {
            let new = self.item_data_mut(id)?;
            new.parent = data.parent;
            new.prev = Some(anchor);
            new.next = data.next;
        }
        self.item_data_mut(anchor)?.next = Some(id);

        match (data.next, data.parent) {
            (Some(next), _) => self.item_data_mut(next)?.prev = Some(id),
            (None, Some(parent)) => self.item_data_mut(parent)?.last_daughter = Some(id),
            (None, None) => self.relation_data_mut(data.relation)?.tail = Some(id),
        }
        if data.parent.is_none() {
            self.relation_data_mut(data.relation)?.len += 1;
        }
        self.verify();
        Ok(id)
    }

    /// Inserts a new sibling right before `anchor`.
    pub(super) fn prepend_sibling(
        &mut self,
        anchor: ItemId,
        share: Option<ContentId>,
    ) -> Result<ItemId> {
        let data = *self.item_data(anchor)?;
        let id = self.create_item(data.relation, share)?;
        {
            let new = self.item_data_mut(id)?;
            new.parent = data.parent;
            new.prev = data.prev;
            new.next = Some(anchor);
        }
        self.item_data_mut(anchor)?.prev = Some(id);

        match (data.prev, data.parent) {
            (Some(prev), _) => self.item_data_mut(prev)?.next = Some(id),
            (None, Some(parent)) => self.item_data_mut(parent)?.daughter = Some(id),
            (None, None) => self.relation_data_mut(data.relation)?.head = Some(id),
        }
        if data.parent.is_none() {
            self.relation_data_mut(data.relation)?.len += 1;
        }
        self.verify();
        Ok(id)
    }

    /// Appends a new last daughter to `parent`.
    pub(super) fn add_daughter(
        &mut self,
        parent: ItemId,
        share: Option<ContentId>,
    ) -> Result<ItemId> {
        let data = *self.item_data(parent)?;
        let id = self.create_item(data.relation, share)?;
        {
            let new = self.item_data_mut(id)?;
            new.parent = Some(parent);
            new.prev = data.last_daughter;
        }
        match data.last_daughter {
            Some(last) => self.item_data_mut(last)?.next = Some(id),
            None => self.item_data_mut(parent)?.daughter = Some(id),
        }
        self.item_data_mut(parent)?.last_daughter = Some(id);
        self.verify();
        Ok(id)
    }

    /// Detaches `id` from its chain and deletes it with all of its
    /// descendants.
    pub(super) fn unlink_item(&mut self, id: ItemId) -> Result<()> {
        let data = *self.item_data(id)?;

        match (data.prev, data.parent) {
            (Some(prev), _) => self.item_data_mut(prev)?.next = data.next,
            (None, Some(parent)) => self.item_data_mut(parent)?.daughter = data.next,
            (None, None) => self.relation_data_mut(data.relation)?.head = data.next,
        }
        match (data.next, data.parent) {
            (Some(next), _) => self.item_data_mut(next)?.prev = data.prev,
            (None, Some(parent)) => self.item_data_mut(parent)?.last_daughter = data.prev,
            (None, None) => self.relation_data_mut(data.relation)?.tail = data.prev,
        }
        if data.parent.is_none() {
            let rel = self.relation_data_mut(data.relation)?;
            rel.len = rel.len.saturating_sub(1);
        }

        self.destroy_tree(id);
        self.verify();
        Ok(())
    }

    /// Frees `root` and its descendants, releasing their contents. Sibling
    /// links pointing at `root` are left to the caller.
    fn destroy_tree(&mut self, root: ItemId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let Some(data) = self.items.remove(id.0) else {
                continue;
            };
            let mut daughter = data.daughter;
            while let Some(d) = daughter {
                pending.push(d);
                daughter = self.items.get(d.0).and_then(|item| item.next);
            }
            self.release_content(data.content, id);
        }
    }

    fn release_content(&mut self, content: ContentId, item: ItemId) {
        let Some(data) = self.contents.get_mut(content.0) else {
            return;
        };
        data.items.retain(|(_, other)| *other != item);
        if data.items.is_empty() {
            self.contents.remove(content.0);
        }
    }

    /// Runs the consistency check after a mutation when configured to.
    fn verify(&self) {
        if cfg!(debug_assertions) && self.config.check_invariants {
            let result = self.check_consistency();
            debug_assert!(result.is_ok(), "{result:?}");
        }
    }
}

impl Default for Utterance {
    fn default() -> Self {
        Utterance::new()
    }
}

impl fmt::Debug for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utterance")
            .field("relations", &self.relation_names().collect::<Vec<_>>())
            .field("items", &self.items.len())
            .field("contents", &self.contents.len())
            .field("features", &self.features)
            .finish()
    }
}
