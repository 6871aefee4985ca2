//! Search session: wires the search field, the suggestion source, the
//! menu and the preview together.
//!
//! Input text triggers a suggestion request; responses arrive on a channel
//! and populate the menu. Menu hooks are forwarded onto a second channel
//! and handled right after the operation that raised them, so the preview
//! reacts within the same call without the hooks touching the menu.
//!
//! ```text
//!   input ──► source (spawned) ──► responses ──► menu.add_*_items
//!   keys  ──► menu.move_* ──► scheduler ──► Activated ──► preview.show
//!   Enter ──► menu.item_clicked ──► Clicked ──► slide in + hide
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::menu::{
    ActivationTicket, Anchor, ItemData, MenuController, MenuHooks, MenuSettings, Placement,
};
use crate::preview::PreviewSurface;
use crate::source::{context_token, SourceResult, SuggestionSource, Suggestions};

/// Navigation keys the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Tab,
    Enter,
    Escape,
}

/// What a key press ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// Escape with the menu closed: menu and preview dismissed.
    CleanedUp,
    /// Escape with text in the field: field cleared.
    Cleared,
    /// Escape on an empty field: focus left the search field.
    Blurred,
}

/// Menu hook calls, forwarded out of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSignal {
    Activated(ItemData),
    Clicked(ItemData),
    Shown,
    Hidden,
}

/// Answer to one suggestion request.
#[derive(Debug)]
pub struct SuggestionResponse {
    pub request: u64,
    pub result: SourceResult<Suggestions>,
}

/// Something the session is waiting on became ready.
#[derive(Debug)]
pub enum Wake {
    Suggestions(SuggestionResponse),
    Activation(ActivationTicket),
}

pub struct SearchSession<P: PreviewSurface> {
    menu: MenuController,
    preview: P,
    source: Arc<dyn SuggestionSource>,
    signals: mpsc::UnboundedReceiver<MenuSignal>,
    responses_tx: mpsc::UnboundedSender<SuggestionResponse>,
    responses_rx: mpsc::UnboundedReceiver<SuggestionResponse>,
    search_text: String,
    page_url: Option<String>,
    anchor: Anchor,
    latest_request: u64,
    focused: bool,
}

impl<P: PreviewSurface> SearchSession<P> {
    pub fn new(settings: MenuSettings, source: Arc<dyn SuggestionSource>, preview: P) -> Self {
        let (signal_tx, signals) = mpsc::unbounded_channel();
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();

        let activated = signal_tx.clone();
        let clicked = signal_tx.clone();
        let shown = signal_tx.clone();
        let hidden = signal_tx;
        let hooks = MenuHooks::new()
            .on_item_activation(move |data| {
                let _ = activated.send(MenuSignal::Activated(data));
            })
            .on_item_click(move |data| {
                let _ = clicked.send(MenuSignal::Clicked(data));
            })
            .on_menu_show(move || {
                let _ = shown.send(MenuSignal::Shown);
            })
            .on_menu_hide(move || {
                let _ = hidden.send(MenuSignal::Hidden);
            });

        Self {
            menu: MenuController::new(settings, hooks),
            preview,
            source,
            signals,
            responses_tx,
            responses_rx,
            search_text: String::new(),
            page_url: None,
            anchor: Anchor::default(),
            latest_request: 0,
            focused: true,
        }
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    /// Context token for the current page, honoring the context toggle.
    pub fn query_context(&self) -> String {
        if !self.menu.do_context_completions() {
            return String::new();
        }
        self.page_url
            .as_deref()
            .map(context_token)
            .unwrap_or_default()
    }

    /// Where the popup should hang; the renderer keeps this current.
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    /// The page changed (tab switch): dismiss everything and adopt the new page.
    pub fn set_page(&mut self, url: Option<&str>) {
        self.clean_up();
        self.page_url = url.map(str::to_string);
    }

    /// The search field's text changed.
    pub fn on_input(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.focused = true;
        self.menu.show(self.anchor, Placement::AfterStart);
        self.build_list();
        self.drain_signals();
    }

    /// Dispatch a navigation key.
    pub fn on_key(&mut self, key: NavKey) -> KeyOutcome {
        let outcome = match key {
            NavKey::Down => {
                self.menu.move_down();
                KeyOutcome::Handled
            }
            NavKey::Up => {
                self.menu.move_up();
                KeyOutcome::Handled
            }
            NavKey::Tab => {
                self.menu.tab_through();
                KeyOutcome::Handled
            }
            NavKey::Enter => {
                self.menu.item_clicked();
                KeyOutcome::Handled
            }
            NavKey::Escape => self.escape(),
        };
        self.drain_signals();
        outcome
    }

    /// Hide the menu and drop the preview.
    pub fn clean_up(&mut self) {
        self.menu.hide();
        self.preview.clean_up();
        self.drain_signals();
    }

    pub fn toggle_context(&mut self) -> bool {
        let enabled = self.menu.toggle_context();
        info!(enabled, "context completions toggled");
        if !enabled {
            self.menu.hide_context_completions();
        }
        self.drain_signals();
        enabled
    }

    pub fn toggle_preview(&mut self) -> bool {
        let enabled = self.menu.toggle_preview();
        info!(enabled, "preview toggled");
        if !enabled {
            self.preview.clean_up();
        }
        enabled
    }

    /// Wait for the next suggestion response or activation deadline.
    ///
    /// Cancel-safe; meant to sit in the host's `select!` loop.
    pub async fn wait(&mut self) -> Wake {
        tokio::select! {
            Some(response) = self.responses_rx.recv() => Wake::Suggestions(response),
            ticket = self.menu.activation_due() => Wake::Activation(ticket),
        }
    }

    pub fn handle(&mut self, wake: Wake) {
        match wake {
            Wake::Suggestions(response) => self.apply_response(response),
            Wake::Activation(ticket) => {
                self.menu.fire_activation(ticket);
            }
        }
        self.drain_signals();
    }

    /// Tear the session down; nothing fires afterwards.
    pub fn close(&mut self) {
        self.menu.teardown();
        self.preview.clean_up();
        while self.signals.try_recv().is_ok() {}
    }

    fn escape(&mut self) -> KeyOutcome {
        if !self.menu.is_open() {
            self.clean_up();
            KeyOutcome::CleanedUp
        } else if !self.search_text.is_empty() {
            self.search_text.clear();
            KeyOutcome::Cleared
        } else {
            self.focused = false;
            KeyOutcome::Blurred
        }
    }

    fn build_list(&mut self) {
        let query = self.search_text.trim_start().to_string();
        let context = self.query_context();

        // Context items will not be used for this query
        if context.is_empty() {
            self.menu.hide_context_completions();
        }

        self.latest_request += 1;
        let request = self.latest_request;
        let source = Arc::clone(&self.source);
        let tx = self.responses_tx.clone();
        debug!(request, %query, %context, "requesting suggestions");
        tokio::spawn(async move {
            let result = source.suggest(&query, &context).await;
            let _ = tx.send(SuggestionResponse { request, result });
        });
    }

    fn apply_response(&mut self, response: SuggestionResponse) {
        if response.request != self.latest_request {
            debug!(
                request = response.request,
                latest = self.latest_request,
                "dropping superseded suggestions"
            );
            return;
        }
        match response.result {
            Ok(suggestions) => self.apply_suggestions(suggestions),
            Err(e) => warn!("suggestion source failed, keeping previous results: {e}"),
        }
    }

    fn apply_suggestions(&mut self, suggestions: Suggestions) {
        self.menu.add_general_items(suggestions.general);
        self.menu.add_context_items(suggestions.context);

        if !self.menu.is_open() {
            return;
        }

        // Auto-select the first result and preview it right away
        self.menu.select_first();
        if self.menu.do_preview() {
            if let Some(url) = self.menu.active_item_url().map(str::to_string) {
                self.preview.show(&url);
            }
        }
    }

    fn drain_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                MenuSignal::Activated(data) => {
                    if !self.menu.do_preview() {
                        continue;
                    }
                    if let Some(url) = data.url {
                        self.preview.show(&url);
                    }
                }
                MenuSignal::Clicked(data) => self.commit(data),
                MenuSignal::Hidden => self.preview.clean_up(),
                MenuSignal::Shown => {}
            }
        }
    }

    /// Write the completion into the field and make its target the page.
    fn commit(&mut self, data: ItemData) {
        let Some(completion) = data.completion else {
            return;
        };
        info!(%completion, "committing suggestion");
        self.search_text = completion;
        if let Some(url) = data.url {
            self.preview.slide_in(&url);
        }
        self.menu.hide();
    }
}

impl<P: PreviewSurface> Drop for SearchSession<P> {
    fn drop(&mut self) {
        self.menu.teardown();
    }
}
