//! Preview surface: shows the target of the highlighted suggestion.
//!
//! The menu never talks to a preview directly; the session forwards
//! activations and commits to whatever implements [`PreviewSurface`].

use tracing::debug;

pub trait PreviewSurface {
    /// Load `url` as a tentative preview.
    fn show(&mut self, url: &str);

    /// Commit `url`: the preview becomes the page.
    fn slide_in(&mut self, url: &str);

    /// Drop any preview.
    fn clean_up(&mut self);
}

/// What the preview pane currently displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Hidden,
    Previewing(String),
    Committed(String),
}

/// In-process preview state rendered by the TUI.
#[derive(Debug, Default)]
pub struct PreviewPane {
    state: PreviewState,
    /// Number of preview loads requested so far.
    loads: usize,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn loads(&self) -> usize {
        self.loads
    }

    /// URL being shown, previewed or committed.
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            PreviewState::Hidden => None,
            PreviewState::Previewing(u) | PreviewState::Committed(u) => Some(u),
        }
    }
}

impl PreviewSurface for PreviewPane {
    fn show(&mut self, url: &str) {
        // Reloading the same preview is wasted work
        if self.state == PreviewState::Previewing(url.to_string()) {
            return;
        }
        debug!(url, "preview");
        self.loads += 1;
        self.state = PreviewState::Previewing(url.to_string());
    }

    fn slide_in(&mut self, url: &str) {
        debug!(url, "slide in");
        self.state = PreviewState::Committed(url.to_string());
    }

    fn clean_up(&mut self) {
        // A committed page stays; only tentative previews are dropped.
        if matches!(self.state, PreviewState::Previewing(_)) {
            debug!("hiding preview");
            self.state = PreviewState::Hidden;
        }
    }
}
