//! Generational slot arena for graph nodes.
//!
//! This module provides the storage used by the utterance graph and the
//! native linked list. Values are stored in slots addressed by an [`Index`]
//! that carries the slot number and the slot's generation at insertion time:
//!
//! - **Stable handles**: an index stays valid until its value is removed,
//!   regardless of other insertions or removals
//! - **Stale detection**: removing a value bumps the slot generation, so
//!   every index handed out earlier resolves to `None` afterwards
//! - **Slot reuse**: vacated slots are threaded onto a free list and reused
//!   by later insertions (with the new generation)
//!
//! # Examples
//!
//! ```
//! use voxa_mem::arena::Arena;
//!
//! let mut arena = Arena::new();
//!
//! let a = arena.insert("a");
//! let b = arena.insert("b");
//! assert_eq!(arena.get(a), Some(&"a"));
//!
//! // Removing invalidates the handle
//! assert_eq!(arena.remove(a), Some("a"));
//! assert_eq!(arena.get(a), None);
//!
//! // The slot is reused, but the old handle stays dead
//! let c = arena.insert("c");
//! assert_eq!(c.slot(), a.slot());
//! assert_ne!(c, a);
//! assert_eq!(arena.get(b), Some(&"b"));
//! ```

use std::fmt;

/// Error returned when the arena cannot hand out another slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaFull {
    /// Number of slots in use when the insert failed.
    pub capacity: usize,
}

impl fmt::Display for ArenaFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arena full: {} slots in use", self.capacity)
    }
}

impl std::error::Error for ArenaFull {}

/// Largest slot number an arena will hand out.
///
/// `u32::MAX` is kept free so it never appears in a live index.
const MAX_SLOTS: u32 = u32::MAX - 1;

/// A generational handle into an [`Arena`].
///
/// Indices are `Copy` and cheap to compare. An index only resolves while the
/// value it was created for is still in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index {
    slot: u32,
    generation: u32,
}

impl Index {
    /// Creates an index from raw parts.
    ///
    /// Mostly useful for containers that use the slot number as a plain
    /// position and keep the generation at zero.
    #[must_use]
    pub const fn from_raw_parts(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the slot number.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the slot number as `usize`.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.slot as usize
    }

    /// Returns the generation this index was issued with.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

/// Arena allocation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    /// Number of live values.
    pub live: usize,
    /// Number of slots ever created (live + vacant).
    pub slots: usize,
    /// Number of vacant slots waiting on the free list.
    pub vacant: usize,
    /// Total number of successful inserts.
    #[cfg(feature = "stats")]
    pub inserted: u64,
    /// Total number of successful removals.
    #[cfg(feature = "stats")]
    pub removed: u64,
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// A generational arena.
///
/// `Arena` is a plain owned collection: it is `Send`/`Sync` when `T` is, and
/// every mutation goes through `&mut self`, so a handle can never observe a
/// value while it is being replaced.
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    len: usize,
    #[cfg(feature = "stats")]
    inserted: u64,
    #[cfg(feature = "stats")]
    removed: u64,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
            #[cfg(feature = "stats")]
            inserted: 0,
            #[cfg(feature = "stats")]
            removed: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Self::new();
        arena.entries.reserve(capacity);
        arena
    }

    /// Inserts a value, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaFull`] once every addressable slot is live.
    pub fn try_insert(&mut self, value: T) -> Result<Index, ArenaFull> {
        let index = match self.free_head {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                let Entry::Vacant { generation, next_free } = *entry else {
                    unreachable!("free list points at an occupied slot");
                };
                self.free_head = next_free;
                *entry = Entry::Occupied { generation, value };
                Index { slot, generation }
            }
            None => {
                let slot = u32::try_from(self.entries.len())
                    .ok()
                    .filter(|slot| *slot <= MAX_SLOTS)
                    .ok_or(ArenaFull { capacity: self.len })?;
                self.entries.push(Entry::Occupied { generation: 0, value });
                Index { slot, generation: 0 }
            }
        };

        self.len += 1;
        #[cfg(feature = "stats")]
        {
            self.inserted += 1;
        }

        Ok(index)
    }

    /// Inserts a value, returning its index.
    ///
    /// # Panics
    ///
    /// Panics if the arena is full. Use [`Arena::try_insert`] to handle
    /// exhaustion.
    pub fn insert(&mut self, value: T) -> Index {
        match self.try_insert(value) {
            Ok(index) => index,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes the value at `index`, returning it.
    ///
    /// Returns `None` if the index is stale or out of bounds. The slot's
    /// generation is bumped so the index never resolves again.
    pub fn remove(&mut self, index: Index) -> Option<T> {
        let entry = self.entries.get_mut(index.as_usize())?;
        match entry {
            Entry::Occupied { generation, .. } if *generation == index.generation => {}
            _ => return None,
        }

        let next_generation = index.generation.wrapping_add(1);
        let old = std::mem::replace(
            entry,
            Entry::Vacant {
                generation: next_generation,
                next_free: self.free_head,
            },
        );
        self.free_head = Some(index.slot);
        self.len -= 1;
        #[cfg(feature = "stats")]
        {
            self.removed += 1;
        }

        match old {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    /// Returns `true` if `index` refers to a live value.
    #[must_use]
    pub fn contains(&self, index: Index) -> bool {
        self.get(index).is_some()
    }

    /// Returns a reference to the value at `index`.
    #[must_use]
    pub fn get(&self, index: Index) -> Option<&T> {
        match self.entries.get(index.as_usize())? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at `index`.
    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        match self.entries.get_mut(index.as_usize())? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Returns the live generation of `slot`, if the slot holds a value.
    #[must_use]
    pub fn index_at(&self, slot: u32) -> Option<Index> {
        match self.entries.get(slot as usize)? {
            Entry::Occupied { generation, .. } => Some(Index {
                slot,
                generation: *generation,
            }),
            Entry::Vacant { .. } => None,
        }
    }

    /// Returns the first live index in a slot after `after`.
    ///
    /// With `None`, scanning starts at slot 0. This walks values in slot
    /// order and is what position-based containers use to step forward.
    #[must_use]
    pub fn next_index(&self, after: Option<Index>) -> Option<Index> {
        let start = after.map_or(0, |index| index.as_usize() + 1);
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(slot, entry)| match entry {
                Entry::Occupied { generation, .. } => Some(Index {
                    slot: slot as u32,
                    generation: *generation,
                }),
                Entry::Vacant { .. } => None,
            })
    }

    /// Returns the number of live values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value.
    ///
    /// Slots are kept and their generations bumped, so all previously issued
    /// indices become stale.
    pub fn clear(&mut self) {
        let mut free_head = None;
        for (slot, entry) in self.entries.iter_mut().enumerate().rev() {
            let generation = match entry {
                Entry::Occupied { generation, .. } => generation.wrapping_add(1),
                Entry::Vacant { generation, .. } => *generation,
            };
            *entry = Entry::Vacant {
                generation,
                next_free: free_head,
            };
            // slot < entries.len() <= MAX_SLOTS + 1
            free_head = Some(slot as u32);
        }
        self.free_head = free_head;
        #[cfg(feature = "stats")]
        {
            self.removed += self.len as u64;
        }
        self.len = 0;
    }

    /// Iterates over live values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter().enumerate(),
            remaining: self.len,
        }
    }

    /// Returns allocation statistics.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            live: self.len,
            slots: self.entries.len(),
            vacant: self.entries.len() - self.len,
            #[cfg(feature = "stats")]
            inserted: self.inserted,
            #[cfg(feature = "stats")]
            removed: self.removed,
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(Index, &T)` pairs of an [`Arena`].
pub struct Iter<'a, T> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Entry<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Index, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (slot, entry) in self.inner.by_ref() {
            if let Entry::Occupied { generation, value } = entry {
                self.remaining -= 1;
                let index = Index {
                    slot: slot as u32,
                    generation: *generation,
                };
                return Some((index, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
