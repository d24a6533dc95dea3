//! Stable-index arena backing the membership and revocation lists.
//!
//! Entries are looked up by the index returned at insertion time, so removal
//! must never shift survivors. A removed entry leaves a vacancy that later
//! insertions fill through a free-list; storage therefore stays bounded by
//! the peak live count instead of growing with every remove/insert cycle.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// Index at or beyond the storage length.
    InvalidIndex { index: usize, len: usize },
    /// The slot at this index holds no entry.
    VacantSlot(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Default for Ledger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ledger<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, vacant ones included. Indices range over this.
    pub fn storage_len(&self) -> usize {
        self.slots.len()
    }

    /// The index the next insertion will occupy.
    pub fn vacant_index(&self) -> usize {
        self.free.last().copied().unwrap_or(self.slots.len())
    }

    /// Stores `entry` in the lowest reusable vacancy, or appends.
    pub fn insert(&mut self, entry: T) -> usize {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                index
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    /// `Ok(None)` over a vacancy; callers must check before use.
    pub fn get(&self, index: usize) -> Result<Option<&T>, LedgerError> {
        match self.slots.get(index) {
            Some(slot) => Ok(slot.as_ref()),
            None => Err(LedgerError::InvalidIndex {
                index,
                len: self.slots.len(),
            }),
        }
    }

    /// Vacates the slot, keeping every other index stable.
    pub fn remove(&mut self, index: usize) -> Result<T, LedgerError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(LedgerError::InvalidIndex {
                index,
                len: self.slots.len(),
            })?;
        match slot.take() {
            Some(entry) => {
                self.live -= 1;
                self.free.push(index);
                Ok(entry)
            }
            None => Err(LedgerError::VacantSlot(index)),
        }
    }

    /// Live entries with their indices, in index order.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|entry| (i, entry)))
    }

    /// All slots in index order, vacancies included. Used by exporters.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Appends a slot verbatim, rebuilding free-list and live count. Used by
    /// importers.
    pub fn push_slot(&mut self, slot: Option<T>) {
        match slot {
            Some(entry) => {
                self.live += 1;
                self.slots.push(Some(entry));
            }
            None => {
                self.free.push(self.slots.len());
                self.slots.push(None);
            }
        }
    }
}
