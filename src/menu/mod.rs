//! Suggestion menu controller.
//!
//! Owns the two slot collections (general and context), the single active
//! slot, the open/closed lifecycle, the two user toggles, and the debounced
//! activation check. Everything runs on one event loop: callers mutate the
//! menu through the public operations below and feed expired activation
//! tickets back in through [`MenuController::fire_activation`].
//!
//! Outward effects go through [`MenuHooks`]. Hooks are called synchronously
//! from inside the operation that caused them, so they must not call back
//! into the controller; hosts typically forward them onto a channel.

pub mod item;
pub mod navigation;
pub mod scheduler;
pub mod tracker;

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

pub use item::{CollectionKind, Item, ItemData, SlotRef};
pub use scheduler::{ActivationTicket, DEFAULT_ACTIVATION_DELAY};

use item::Collection;
use navigation::Step;
use scheduler::ActivationScheduler;
use tracker::{Activation, ActiveTracker};

/// Callback receiving the data of an activated or clicked item.
pub type ItemHook = Box<dyn FnMut(ItemData) + Send>;
/// Lifecycle callback.
pub type MenuHook = Box<dyn FnMut() + Send>;

/// Outward callbacks registered at construction.
#[derive(Default)]
pub struct MenuHooks {
    on_item_activation: Option<ItemHook>,
    on_item_click: Option<ItemHook>,
    on_menu_show: Option<MenuHook>,
    on_menu_hide: Option<MenuHook>,
}

impl MenuHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once a highlight has been stable for the activation delay.
    pub fn on_item_activation(mut self, f: impl FnMut(ItemData) + Send + 'static) -> Self {
        self.on_item_activation = Some(Box::new(f));
        self
    }

    /// Called immediately on an explicit click or Enter.
    pub fn on_item_click(mut self, f: impl FnMut(ItemData) + Send + 'static) -> Self {
        self.on_item_click = Some(Box::new(f));
        self
    }

    pub fn on_menu_show(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_menu_show = Some(Box::new(f));
        self
    }

    pub fn on_menu_hide(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_menu_hide = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for MenuHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuHooks")
            .field("on_item_activation", &self.on_item_activation.is_some())
            .field("on_item_click", &self.on_item_click.is_some())
            .field("on_menu_show", &self.on_menu_show.is_some())
            .field("on_menu_hide", &self.on_menu_hide.is_some())
            .finish()
    }
}

/// Tunables for a menu instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSettings {
    pub activation_delay: Duration,
    pub context_enabled: bool,
    pub preview_enabled: bool,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            activation_delay: DEFAULT_ACTIVATION_DELAY,
            context_enabled: true,
            preview_enabled: true,
        }
    }
}

/// Popup lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

/// Where the popup hangs relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Below the anchor, left edges aligned.
    #[default]
    AfterStart,
    /// Above the anchor, left edges aligned.
    BeforeStart,
}

/// Screen rectangle the popup is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// The suggestion popup.
#[derive(Debug)]
pub struct MenuController {
    general: Collection,
    context: Collection,
    tracker: ActiveTracker,
    scheduler: ActivationScheduler,
    hooks: MenuHooks,
    state: MenuState,
    position: Option<(Anchor, Placement)>,
    context_enabled: bool,
    preview_enabled: bool,
    torn_down: bool,
}

impl MenuController {
    pub fn new(settings: MenuSettings, hooks: MenuHooks) -> Self {
        debug!(
            delay_ms = settings.activation_delay.as_millis() as u64,
            "initializing menu"
        );
        Self {
            general: Collection::new(CollectionKind::General),
            context: Collection::new(CollectionKind::Context),
            tracker: ActiveTracker::new(),
            scheduler: ActivationScheduler::new(settings.activation_delay),
            hooks,
            state: MenuState::Closed,
            position: None,
            context_enabled: settings.context_enabled,
            preview_enabled: settings.preview_enabled,
            torn_down: false,
        }
    }

    // ── Population ──

    pub fn add_general_items(&mut self, results: Vec<Item>) {
        self.set_collection(CollectionKind::General, results);
    }

    pub fn add_context_items(&mut self, results: Vec<Item>) {
        self.set_collection(CollectionKind::Context, results);
    }

    /// Replace a collection's visible content in place.
    ///
    /// A pending activation check survives the refresh unless the active
    /// slot itself ends up hidden.
    pub fn set_collection(&mut self, kind: CollectionKind, results: Vec<Item>) {
        if self.torn_down {
            return;
        }
        trace!(?kind, count = results.len(), "populating collection");
        self.collection_mut(kind).set(results);
        self.drop_hidden_active();
    }

    /// Force every context slot and its separator hidden.
    pub fn hide_context_completions(&mut self) {
        self.context.hide_all();
        self.drop_hidden_active();
    }

    /// Visible items of one collection, in index order.
    ///
    /// The context collection reports nothing while context completions
    /// are switched off, even if it holds populated slots.
    pub fn visible_items(&self, kind: CollectionKind) -> Vec<(SlotRef, &Item)> {
        if kind == CollectionKind::Context && !self.context_enabled {
            return Vec::new();
        }
        self.collection(kind).visible().collect()
    }

    pub fn separator_visible(&self, kind: CollectionKind) -> bool {
        match kind {
            CollectionKind::General => self.general.separator_visible(),
            CollectionKind::Context => self.context_enabled && self.context.separator_visible(),
        }
    }

    pub fn is_visible(&self, slot: SlotRef) -> bool {
        match slot.kind {
            CollectionKind::General => self.general.is_visible(slot.index),
            CollectionKind::Context => {
                self.context_enabled && self.context.is_visible(slot.index)
            }
        }
    }

    pub fn item(&self, slot: SlotRef) -> Option<&Item> {
        self.collection(slot.kind).get(slot.index).map(|s| &s.item)
    }

    // ── Active slot ──

    /// Highlight `slot` and re-arm the activation check for it.
    ///
    /// Hidden or unknown slots are ignored.
    pub fn activate(&mut self, slot: SlotRef) {
        if !self.is_visible(slot) {
            trace!(?slot, "ignoring activation of hidden slot");
            return;
        }
        if let Activation::Changed { replaced } = self.tracker.activate(slot) {
            if let Some(prev) = replaced {
                trace!(?prev, "deactivated");
            }
            self.scheduler.arm(slot);
        }
    }

    /// Clear the highlight if `slot` holds it. Stale signals are no-ops.
    pub fn deactivate(&mut self, slot: SlotRef) {
        if self.tracker.deactivate(slot) {
            self.scheduler.cancel();
        }
    }

    pub fn active_slot(&self) -> Option<SlotRef> {
        self.tracker.current()
    }

    pub fn is_active(&self, slot: SlotRef) -> bool {
        self.tracker.is_active(slot)
    }

    /// Data of the active item, or the empty record when nothing is active.
    pub fn active_item_data(&self) -> ItemData {
        self.tracker
            .current()
            .and_then(|slot| self.item(slot))
            .map(ItemData::from)
            .unwrap_or_default()
    }

    pub fn active_item_url(&self) -> Option<&str> {
        self.tracker
            .current()
            .and_then(|slot| self.item(slot))
            .map(|item| item.target.as_str())
    }

    // ── Navigation ──

    /// Highlight the first general item, else the first context item.
    pub fn select_first(&mut self) {
        let head = navigation::first_selection(
            self.head(CollectionKind::General),
            self.head(CollectionKind::Context),
        );
        if let Some(slot) = head {
            self.activate(slot);
        }
    }

    pub fn move_down(&mut self) {
        let step = navigation::step_down(&self.visible_order(), self.tracker.current());
        self.apply_step(step);
    }

    pub fn move_up(&mut self) {
        let step = navigation::step_up(&self.visible_order(), self.tracker.current());
        self.apply_step(step);
    }

    /// Cycle the highlight between the general and context groups.
    pub fn tab_through(&mut self) {
        let step = navigation::tab_jump(
            &self.visible_order(),
            self.head(CollectionKind::General),
            self.head(CollectionKind::Context),
            self.tracker.current(),
        );
        self.apply_step(step);
    }

    // ── Activation ──

    /// Resolves when the pending activation check is due.
    pub async fn activation_due(&self) -> ActivationTicket {
        self.scheduler.expired().await
    }

    /// Deadline of the pending activation check, if one is armed.
    pub fn activation_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Run an expired activation check.
    ///
    /// Calls `on_item_activation` only if the ticket is current and its slot
    /// is still the visible active slot. Returns whether the hook ran.
    pub fn fire_activation(&mut self, ticket: ActivationTicket) -> bool {
        if !self.scheduler.settle(ticket) {
            trace!(slot = ?ticket.slot, "superseded activation check");
            return false;
        }
        self.run_activation(ticket.slot)
    }

    /// Fire the pending check if it is due at `now`. For frame-driven hosts.
    pub fn poll_activation(&mut self, now: Instant) -> bool {
        match self.scheduler.take_expired(now) {
            Some(ticket) => self.run_activation(ticket.slot),
            None => false,
        }
    }

    fn run_activation(&mut self, slot: SlotRef) -> bool {
        if !self.tracker.is_active(slot) || !self.is_visible(slot) {
            trace!(?slot, "activation target no longer active");
            return false;
        }
        let data = self.active_item_data();
        debug!(completion = ?data.completion, "activating");
        if let Some(hook) = self.hooks.on_item_activation.as_mut() {
            hook(data);
        }
        true
    }

    // ── Commit path ──

    /// Commit the active item, bypassing the activation delay.
    pub fn item_clicked(&mut self) {
        if self.tracker.current().is_none() {
            return;
        }
        let data = self.active_item_data();
        if let Some(hook) = self.hooks.on_item_click.as_mut() {
            hook(data);
        }
    }

    /// Explicit click on a slot: highlight it and commit it at once.
    pub fn click(&mut self, slot: SlotRef) {
        if !self.is_visible(slot) {
            return;
        }
        self.activate(slot);
        self.item_clicked();
    }

    // ── Lifecycle ──

    pub fn show(&mut self, anchor: Anchor, placement: Placement) {
        if self.torn_down {
            return;
        }
        self.position = Some((anchor, placement));
        if self.state == MenuState::Open {
            return;
        }
        self.state = MenuState::Open;
        debug!("menu shown");
        if let Some(hook) = self.hooks.on_menu_show.as_mut() {
            hook();
        }
    }

    /// Close the popup. Closing drops the highlight and its pending check.
    pub fn hide(&mut self) {
        if self.state == MenuState::Closed {
            return;
        }
        self.state = MenuState::Closed;
        if let Some(slot) = self.tracker.clear() {
            trace!(?slot, "deactivated on hide");
        }
        self.scheduler.cancel();
        debug!("menu hidden");
        if let Some(hook) = self.hooks.on_menu_hide.as_mut() {
            hook();
        }
    }

    pub fn is_open(&self) -> bool {
        self.state != MenuState::Closed
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn position(&self) -> Option<(Anchor, Placement)> {
        self.position
    }

    /// Detach every slot and cancel any pending check. No hooks run after this.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel();
        self.tracker.clear();
        self.general.clear();
        self.context.clear();
        self.state = MenuState::Closed;
        self.position = None;
        self.hooks = MenuHooks::default();
        self.torn_down = true;
        debug!("menu torn down");
    }

    // ── Toggles ──

    pub fn do_context_completions(&self) -> bool {
        self.context_enabled
    }

    pub fn do_preview(&self) -> bool {
        self.preview_enabled
    }

    pub fn set_context_enabled(&mut self, enabled: bool) {
        self.context_enabled = enabled;
        self.drop_hidden_active();
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) {
        self.preview_enabled = enabled;
    }

    pub fn toggle_context(&mut self) -> bool {
        self.set_context_enabled(!self.context_enabled);
        self.context_enabled
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview_enabled = !self.preview_enabled;
        self.preview_enabled
    }

    // ── Internals ──

    fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::General => &self.general,
            CollectionKind::Context => &self.context,
        }
    }

    fn collection_mut(&mut self, kind: CollectionKind) -> &mut Collection {
        match kind {
            CollectionKind::General => &mut self.general,
            CollectionKind::Context => &mut self.context,
        }
    }

    fn head(&self, kind: CollectionKind) -> Option<SlotRef> {
        if kind == CollectionKind::Context && !self.context_enabled {
            return None;
        }
        self.collection(kind).first_visible()
    }

    /// All visible slots in document order.
    fn visible_order(&self) -> Vec<SlotRef> {
        self.visible_items(CollectionKind::General)
            .into_iter()
            .chain(self.visible_items(CollectionKind::Context))
            .map(|(slot, _)| slot)
            .collect()
    }

    fn apply_step(&mut self, step: Step) {
        match step {
            Step::Activate(slot) => self.activate(slot),
            Step::Deactivate => {
                if let Some(slot) = self.tracker.current() {
                    self.deactivate(slot);
                }
            }
            Step::Stay => {}
        }
    }

    /// Clear the highlight when its slot stopped being visible.
    fn drop_hidden_active(&mut self) {
        if let Some(slot) = self.tracker.current() {
            if !self.is_visible(slot) {
                self.deactivate(slot);
            }
        }
    }
}
