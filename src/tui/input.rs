//! Key binding dispatch for the TUI.
//!
//! Navigation keys go to the session; printable keys edit the search text
//! and re-run the query, like typing into a browser search field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::SearchApp;
use crate::session::NavKey;

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut SearchApp, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('g') if ctrl => {
            app.session.toggle_context();
            return;
        }
        KeyCode::Char('p') if ctrl => {
            app.session.toggle_preview();
            return;
        }
        KeyCode::Char('w') if ctrl => {
            // Same as closing the tab the menu belongs to
            app.session.clean_up();
            return;
        }
        _ => {}
    }

    let nav = match key.code {
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Tab => Some(NavKey::Tab),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Esc => Some(NavKey::Escape),
        _ => None,
    };
    if let Some(nav) = nav {
        // Escape outside the search field leaves the app
        if nav == NavKey::Escape && !app.session.is_focused() {
            app.should_quit = true;
            return;
        }
        app.session.on_key(nav);
        return;
    }

    match key.code {
        KeyCode::Char(c) if !ctrl => {
            let mut text = app.session.search_text().to_string();
            text.push(c);
            app.session.on_input(&text);
        }
        KeyCode::Backspace => {
            let mut text = app.session.search_text().to_string();
            if text.pop().is_some() {
                app.session.on_input(&text);
            }
        }
        _ => {}
    }
}
