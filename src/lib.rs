//! quicksuggest: a search-suggestion popup for a browser-style search field.
//!
//! The menu keeps two collections of suggestion slots (general and
//! page-context), tracks one highlighted slot, and reports a highlight to
//! its host only after it has stayed put for a short delay. A session
//! wires the menu to a suggestion source and a preview pane; the TUI is
//! one host for it.

pub mod config;
pub mod menu;
pub mod preview;
pub mod session;
pub mod source;
pub mod tui;
