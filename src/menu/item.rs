//! Item model: suggestion values and the two slot arenas that hold them.
//!
//! A collection is an arena of fixed slots indexed by position. Refreshing
//! a collection overwrites slots in place and hides the leftovers instead
//! of removing them, so a `SlotRef` taken before a refresh still names the
//! same slot afterwards.

use serde::{Deserialize, Serialize};

/// One suggestion as produced by a suggestion source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Text shown in the menu and written into the search field on commit.
    pub completion: String,
    /// Icon URI or path.
    #[serde(default)]
    pub icon: String,
    /// Locator the preview loads for this suggestion.
    pub target: String,
}

impl Item {
    pub fn new(
        completion: impl Into<String>,
        icon: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            completion: completion.into(),
            icon: icon.into(),
            target: target.into(),
        }
    }
}

/// Item data handed to consumers of the menu.
///
/// All fields are `None` when nothing is selected; that record is the
/// "no selection" answer, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub url: Option<String>,
    pub completion: Option<String>,
    pub icon: Option<String>,
}

impl ItemData {
    /// The empty record returned when no slot is active.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.completion.is_none() && self.icon.is_none()
    }
}

impl From<&Item> for ItemData {
    fn from(item: &Item) -> Self {
        Self {
            url: Some(item.target.clone()),
            completion: Some(item.completion.clone()),
            icon: Some(item.icon.clone()),
        }
    }
}

/// Which of the two collections a slot belongs to.
///
/// Declaration order is document order: General precedes Context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    General,
    Context,
}

/// Positional reference to one slot.
///
/// Ordering follows document order (collection first, then index), which
/// is what navigation compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotRef {
    pub kind: CollectionKind,
    pub index: usize,
}

impl SlotRef {
    pub fn general(index: usize) -> Self {
        Self {
            kind: CollectionKind::General,
            index,
        }
    }

    pub fn context(index: usize) -> Self {
        Self {
            kind: CollectionKind::Context,
            index,
        }
    }
}

/// A fixed position in a collection.
#[derive(Debug, Clone)]
pub struct Slot {
    pub item: Item,
    pub visible: bool,
}

/// Ordered arena of slots plus the trailing separator.
#[derive(Debug, Clone)]
pub struct Collection {
    kind: CollectionKind,
    slots: Vec<Slot>,
    separator_visible: bool,
}

impl Collection {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            separator_visible: false,
        }
    }

    /// Overwrite the first `results.len()` slots and hide the rest.
    ///
    /// The arena only grows: slots past the new result count stay allocated.
    pub fn set(&mut self, results: Vec<Item>) {
        let count = results.len();
        self.separator_visible = count > 0;

        for (index, item) in results.into_iter().enumerate() {
            match self.slots.get_mut(index) {
                Some(slot) => {
                    slot.item = item;
                    slot.visible = true;
                }
                None => self.slots.push(Slot {
                    item,
                    visible: true,
                }),
            }
        }

        for slot in self.slots.iter_mut().skip(count) {
            slot.visible = false;
        }
    }

    /// Hide every slot and the separator, keeping their content.
    pub fn hide_all(&mut self) {
        for slot in &mut self.slots {
            slot.visible = false;
        }
        self.separator_visible = false;
    }

    /// Drop every slot. Only used on teardown.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.separator_visible = false;
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.visible)
    }

    /// Total allocated slots, hidden ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn separator_visible(&self) -> bool {
        self.separator_visible
    }

    /// Visible slots in index order.
    pub fn visible(&self) -> impl Iterator<Item = (SlotRef, &Item)> + '_ {
        let kind = self.kind;
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.visible)
            .map(move |(index, slot)| (SlotRef { kind, index }, &slot.item))
    }

    pub fn first_visible(&self) -> Option<SlotRef> {
        self.visible().next().map(|(slot, _)| slot)
    }

    #[cfg(test)]
    pub(crate) fn hide_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.visible = false;
        }
    }
}
