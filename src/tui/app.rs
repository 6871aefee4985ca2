//! SearchApp: the TEA model.
//!
//! All state lives here. Update receives TuiMessages, mutates state.
//! View reads state to produce ratatui widgets. No side effects in view.

use ratatui::layout::Rect;

use crate::menu::Anchor;
use crate::preview::PreviewPane;
use crate::session::SearchSession;

use super::event::TuiMessage;
use super::input;

/// The main TUI application state (TEA model).
pub struct SearchApp {
    /// Search field, menu and preview.
    pub session: SearchSession<PreviewPane>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Cached search field area from last render (popup anchor).
    pub search_area: Rect,
}

impl SearchApp {
    pub fn new(session: SearchSession<PreviewPane>) -> Self {
        Self {
            session,
            should_quit: false,
            search_area: Rect::default(),
        }
    }

    /// Apply one message.
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => input::handle_key(self, key),
            TuiMessage::Session(wake) => self.session.handle(wake),
            TuiMessage::Render => {}
            TuiMessage::Quit => self.should_quit = true,
        }
    }

    /// Record where the search field was drawn so the popup can hang off it.
    pub fn set_search_area(&mut self, area: Rect) {
        if self.search_area == area {
            return;
        }
        self.search_area = area;
        self.session.set_anchor(Anchor {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height,
        });
    }
}
