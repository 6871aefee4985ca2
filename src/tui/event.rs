//! TUI event plumbing: everything that drives an update flows through one
//! channel as a [`TuiMessage`].
//!
//! Keyboard input is read on a blocking thread and forwarded here; session
//! wakes (suggestion responses, activation deadlines) and the render tick
//! are merged in by the runner's `select!` loop.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::warn;

use crate::session::Wake;

/// Messages that drive the TUI update loop.
#[derive(Debug)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// The search session has something ready.
    Session(Wake),
    /// Render: draw a frame.
    Render,
    /// Quit the TUI.
    Quit,
}

/// Forward key presses to `tx` until the receiver goes away.
pub fn spawn_input_reader(tx: mpsc::UnboundedSender<TuiMessage>) {
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(TuiMessage::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("terminal read failed: {e}");
                    let _ = tx.send(TuiMessage::Quit);
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!("terminal poll failed: {e}");
                let _ = tx.send(TuiMessage::Quit);
                break;
            }
        }
    });
}
