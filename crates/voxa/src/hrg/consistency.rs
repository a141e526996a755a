//! Whole-graph consistency check.

use super::utterance::Utterance;
use super::{ItemId, RelationId};
use crate::error::{Error, Result};

impl Utterance {
    /// Verifies the structural invariants of the graph:
    ///
    /// - each relation's head has no predecessor, its top-level chain ends
    ///   at its tail and holds exactly `len` items;
    /// - sibling links are symmetric and siblings share their parent;
    /// - a parent's first and last daughter match its daughter chain;
    /// - every item's content lists the item, and every content lists only
    ///   live items, at most one per relation;
    /// - every item is reachable from its relation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsistencyViolation`] describing the first broken
    /// invariant found.
    pub fn check_consistency(&self) -> Result<()> {
        let result = self.check_all();
        if let Err(err) = &result {
            voxa_log::error!("{}", err);
            #[cfg(feature = "invariant-backtrace")]
            voxa_log::error!("{:?}", backtrace::Backtrace::new());
        }
        result
    }

    fn check_all(&self) -> Result<()> {
        let mut reached = 0;
        for (index, relation) in self.relations.iter() {
            let id = RelationId(index);
            let top = self.check_chain(id, None, relation.head, relation.tail, &mut reached)?;
            if top != relation.len {
                return Err(Error::consistency(format!(
                    "relation '{}' holds {top} top-level items but records {}",
                    relation.name, relation.len
                )));
            }
        }
        if reached != self.items.len() {
            return Err(Error::consistency(format!(
                "{} items are not reachable from any relation",
                self.items.len() - reached.min(self.items.len())
            )));
        }
        self.check_contents()
    }

    /// Walks one sibling chain and, depth first, every daughter chain below
    /// it. Returns the length of the chain itself.
    fn check_chain(
        &self,
        relation: RelationId,
        parent: Option<ItemId>,
        first: Option<ItemId>,
        last: Option<ItemId>,
        reached: &mut usize,
    ) -> Result<usize> {
        let mut pending = vec![(parent, first, last)];
        let mut top = 0;

        while let Some((parent, first, last)) = pending.pop() {
            let mut prev = None;
            let mut cursor = first;
            let mut len = 0;
            while let Some(id) = cursor {
                let data = self.item_data(id).map_err(|_| {
                    Error::consistency(format!("{relation} links to dead {id}"))
                })?;
                if data.relation != relation {
                    return Err(Error::consistency(format!(
                        "{id} is chained in {relation} but belongs to {}",
                        data.relation
                    )));
                }
                if data.parent != parent {
                    return Err(Error::consistency(format!("{id} has the wrong parent")));
                }
                if data.prev != prev {
                    return Err(Error::consistency(format!(
                        "{id}.prev does not point back at its predecessor"
                    )));
                }
                let content = self.contents.get(data.content.0).ok_or_else(|| {
                    Error::consistency(format!("{id} refers to dead {}", data.content))
                })?;
                if !content.items.contains(&(relation, id)) {
                    return Err(Error::consistency(format!(
                        "{} does not list {id}",
                        data.content
                    )));
                }

                len += 1;
                *reached += 1;
                if *reached > self.items.len() {
                    return Err(Error::consistency(format!("cycle through {id}")));
                }
                if data.daughter.is_some() || data.last_daughter.is_some() {
                    pending.push((Some(id), data.daughter, data.last_daughter));
                }
                prev = Some(id);
                cursor = data.next;
            }
            if prev != last {
                return Err(Error::consistency(format!(
                    "chain under {parent:?} in {relation} does not end at its recorded tail"
                )));
            }
            if parent.is_none() {
                top = len;
            }
        }
        Ok(top)
    }

    fn check_contents(&self) -> Result<()> {
        for (index, content) in self.contents.iter() {
            if content.items.is_empty() {
                return Err(Error::consistency(format!(
                    "content#{index} outlived its last item"
                )));
            }
            for (n, (relation, item)) in content.items.iter().enumerate() {
                let data = self.item_data(*item).map_err(|_| {
                    Error::consistency(format!("content#{index} lists dead {item}"))
                })?;
                if data.relation != *relation || data.content.0 != index {
                    return Err(Error::consistency(format!(
                        "content#{index} lists {item} under the wrong relation or content"
                    )));
                }
                if content.items[..n].iter().any(|(other, _)| other == relation) {
                    return Err(Error::consistency(format!(
                        "content#{index} appears twice in {relation}"
                    )));
                }
            }
        }
        Ok(())
    }
}
