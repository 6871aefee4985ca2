//! End-to-end session tests: corpus source → menu → preview.
//!
//! Time is paused, so activation delays elapse only when the runtime is
//! otherwise idle (or when a test advances the clock).

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::Instant;

use quicksuggest::config::SuggestConfig;
use quicksuggest::menu::{CollectionKind, MenuSettings, SlotRef};
use quicksuggest::preview::PreviewSurface;
use quicksuggest::session::{NavKey, SearchSession};
use quicksuggest::source::{Corpus, CorpusSource, SuggestionSource};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shown {
    Preview(String),
    SlideIn(String),
    CleanUp,
}

/// Preview surface that records every call.
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Shown>,
}

impl Recorder {
    fn previews(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Shown::Preview(u) => Some(u.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PreviewSurface for Recorder {
    fn show(&mut self, url: &str) {
        self.calls.push(Shown::Preview(url.to_string()));
    }

    fn slide_in(&mut self, url: &str) {
        self.calls.push(Shown::SlideIn(url.to_string()));
    }

    fn clean_up(&mut self) {
        self.calls.push(Shown::CleanUp);
    }
}

fn builtin_session(settings: MenuSettings) -> SearchSession<Recorder> {
    let source: Arc<dyn SuggestionSource> = Arc::new(CorpusSource::new(Corpus::builtin(), 8));
    SearchSession::new(settings, source, Recorder::default())
}

async fn pump(s: &mut SearchSession<Recorder>) {
    let wake = s.wait().await;
    s.handle(wake);
}

fn search(term: &str) -> String {
    format!("https://blekko.com/ws/?q={term}")
}

#[tokio::test(start_paused = true)]
async fn only_the_settled_highlight_is_previewed() {
    let mut s = builtin_session(MenuSettings::default());
    s.on_input("ru");
    pump(&mut s).await;
    assert_eq!(s.preview().previews(), vec![search("rust").as_str()]);

    let start = Instant::now();
    s.on_key(NavKey::Down);
    s.on_key(NavKey::Down);
    pump(&mut s).await;

    assert!(start.elapsed() >= Duration::from_millis(150));
    assert_eq!(s.menu().active_slot(), Some(SlotRef::general(2)));
    assert_eq!(
        s.preview().previews(),
        vec![search("rust").as_str(), search("rust+by+example").as_str()]
    );
}

#[tokio::test(start_paused = true)]
async fn tab_reaches_page_suggestions_and_enter_commits() {
    let mut s = builtin_session(MenuSettings::default());
    s.set_page(Some("https://en.wikipedia.org/wiki/Main_Page"));
    s.on_input("ru");
    pump(&mut s).await;

    let context = s.menu().visible_items(CollectionKind::Context);
    assert_eq!(context.len(), 2);

    s.on_key(NavKey::Tab);
    assert_eq!(s.menu().active_slot(), Some(SlotRef::context(0)));
    s.on_key(NavKey::Enter);

    assert_eq!(s.search_text(), "rust (programming language)");
    assert!(!s.menu().is_open());
    let url = search("rust+%28programming+language%29");
    let calls = &s.preview().calls;
    assert!(calls.contains(&Shown::SlideIn(url)));
    assert_eq!(calls.last(), Some(&Shown::CleanUp));

    // Tab again goes back to the general block once the menu is reopened
    s.on_input("ru");
    pump(&mut s).await;
    s.on_key(NavKey::Tab);
    s.on_key(NavKey::Tab);
    assert_eq!(s.menu().active_slot(), Some(SlotRef::general(0)));
}

#[tokio::test(start_paused = true)]
async fn turning_context_off_hides_page_suggestions() {
    let mut s = builtin_session(MenuSettings::default());
    s.set_page(Some("https://github.com/tokio-rs/tokio"));
    s.on_input("tok");
    pump(&mut s).await;
    assert_eq!(s.menu().visible_items(CollectionKind::Context).len(), 1);

    assert!(!s.toggle_context());
    assert!(s.menu().visible_items(CollectionKind::Context).is_empty());

    // No context block to jump to
    s.on_key(NavKey::Tab);
    assert_eq!(s.menu().active_slot(), Some(SlotRef::general(0)));
}

#[tokio::test(start_paused = true)]
async fn close_cancels_pending_preview() {
    let mut s = builtin_session(MenuSettings::default());
    s.on_input("py");
    pump(&mut s).await;
    s.on_key(NavKey::Down);
    assert!(s.menu().activation_deadline().is_some());

    s.close();
    assert!(s.menu().activation_deadline().is_none());
    assert!(tokio::time::timeout(Duration::from_secs(1), s.wait())
        .await
        .is_err());
    assert_eq!(s.preview().previews(), vec![search("python").as_str()]);
}

#[tokio::test(start_paused = true)]
async fn settings_from_config_files_drive_the_session() {
    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("corpus.yaml");
    std::fs::write(
        &corpus_path,
        "search_url: \"https://find.test/?q={query}\"\ngeneral: [alpha, alpine, beta]\n",
    )
    .unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "activation_delay_ms: 400\ncorpus: {}\n",
            corpus_path.display()
        ),
    )
    .unwrap();

    let config = SuggestConfig::load_from(Some(&config_path), None);
    let corpus = Corpus::load(config.corpus.as_deref().unwrap()).unwrap();
    let source: Arc<dyn SuggestionSource> =
        Arc::new(CorpusSource::new(corpus, config.max_results));
    let mut s = SearchSession::new(config.menu_settings(), source, Recorder::default());

    s.on_input("al");
    pump(&mut s).await;
    assert_eq!(s.menu().visible_items(CollectionKind::General).len(), 2);

    let start = Instant::now();
    s.on_key(NavKey::Down);
    pump(&mut s).await;
    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(
        s.preview().previews().last().copied(),
        Some("https://find.test/?q=alpine")
    );
}

#[tokio::test(start_paused = true)]
async fn preview_off_still_commits() {
    let settings = MenuSettings {
        preview_enabled: false,
        ..MenuSettings::default()
    };
    let mut s = builtin_session(settings);
    s.on_input("wea");
    pump(&mut s).await;
    s.on_key(NavKey::Enter);

    assert_eq!(s.search_text(), "weather");
    assert!(s.preview().previews().is_empty());
    assert!(s
        .preview()
        .calls
        .contains(&Shown::SlideIn(search("weather"))));
}
