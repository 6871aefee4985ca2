//! Terminal front end: ratatui rendering of a search field with its
//! suggestion popup and a preview pane.
//!
//! ## Architecture (TEA)
//!
//! Model (`SearchApp`) + Update (message handler) + View (layout).
//! Immediate mode, no retained widget state. The view reads the menu
//! through the session; it never mutates menu state except to record
//! where the search field was drawn.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
