//! TUI runner: main loop that wires everything together.
//!
//! Creates terminal, spawns the input reader, runs main TEA loop.

use std::io;
use std::time::Duration;

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::info;

use super::app::SearchApp;
use super::event::{spawn_input_reader, TuiMessage};
use super::layout;

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(mut app: SearchApp) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input_reader(tx);

    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps
    info!("tui started");

    let result = loop {
        let msg = tokio::select! {
            _ = render_interval.tick() => TuiMessage::Render,
            wake = app.session.wait() => TuiMessage::Session(wake),
            msg = rx.recv() => msg.unwrap_or(TuiMessage::Quit),
        };

        let render = matches!(msg, TuiMessage::Render);
        app.update(msg);
        if app.should_quit {
            break Ok(());
        }
        if render {
            if let Err(e) = terminal.draw(|f| layout::draw(f, &mut app)) {
                break Err(e.into());
            }
        }
    };

    app.session.close();
    drop(rx);

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    info!("tui stopped");
    result
}
