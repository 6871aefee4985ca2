//! Active-item tracker: at most one highlighted slot across both collections.

use super::item::SlotRef;

/// Outcome of an `activate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The slot was already active; nothing happened.
    Unchanged,
    /// The slot became active. `replaced` is the slot that was deactivated first.
    Changed { replaced: Option<SlotRef> },
}

/// Holds the single active slot, if any.
#[derive(Debug, Default, Clone)]
pub struct ActiveTracker {
    current: Option<SlotRef>,
}

impl ActiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `slot` the active slot, deactivating any other one first.
    pub fn activate(&mut self, slot: SlotRef) -> Activation {
        if self.current == Some(slot) {
            return Activation::Unchanged;
        }
        let replaced = self.current.take();
        self.current = Some(slot);
        Activation::Changed { replaced }
    }

    /// Clear the active slot, but only if it is `slot`.
    ///
    /// Returns false for late or stale signals about another slot.
    pub fn deactivate(&mut self, slot: SlotRef) -> bool {
        if self.current == Some(slot) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Clear whatever is active.
    pub fn clear(&mut self) -> Option<SlotRef> {
        self.current.take()
    }

    pub fn current(&self) -> Option<SlotRef> {
        self.current
    }

    pub fn is_active(&self, slot: SlotRef) -> bool {
        self.current == Some(slot)
    }
}
