use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quicksuggest::config::{dirs_path, SuggestConfig};
use quicksuggest::preview::PreviewPane;
use quicksuggest::session::SearchSession;
use quicksuggest::source::{context_token, Corpus, CorpusSource, SuggestionSource};
use quicksuggest::tui::{app::SearchApp, runner::run_tui};

#[derive(Parser)]
#[command(name = "quicksuggest", about = "Search suggestions with a live preview.")]
struct Cli {
    /// Suggestion corpus (YAML). Defaults to the built-in corpus.
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Current page URL; its site drives context suggestions.
    #[arg(long)]
    page: Option<String>,

    /// Milliseconds a highlight must settle before it is previewed.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Turn off "Use current page for suggestions".
    #[arg(long)]
    no_context: bool,

    /// Turn off "Preview highlighted terms".
    #[arg(long)]
    no_preview: bool,

    /// Log file for the TUI (default ~/.quicksuggest/quicksuggest.log).
    #[arg(long)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print suggestions for one query as JSON.
    Suggest { query: String },
    /// Write the resolved settings to ~/.quicksuggest/config.yaml.
    SaveConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = SuggestConfig::load();
    if let Some(corpus) = &cli.corpus {
        config.corpus = Some(corpus.clone());
    }
    if let Some(ms) = cli.delay_ms {
        config.activation_delay_ms = ms;
    }
    if cli.no_context {
        config.context_enabled = false;
    }
    if cli.no_preview {
        config.preview_enabled = false;
    }

    match &cli.command {
        Some(Command::Suggest { query }) => {
            let source = build_source(&config)?;
            let context = match (&cli.page, config.context_enabled) {
                (Some(page), true) => context_token(page),
                _ => String::new(),
            };
            let suggestions = source.suggest(query.trim_start(), &context).await?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Some(Command::SaveConfig) => {
            config.save()?;
            info!("settings saved");
        }
        None => {
            let source: Arc<dyn SuggestionSource> = Arc::new(build_source(&config)?);
            let mut session =
                SearchSession::new(config.menu_settings(), source, PreviewPane::new());
            session.set_page(cli.page.as_deref());
            info!(page = ?cli.page, "quicksuggest starting");
            run_tui(SearchApp::new(session)).await?;
        }
    }

    Ok(())
}

fn build_source(config: &SuggestConfig) -> Result<CorpusSource> {
    let corpus = match &config.corpus {
        Some(path) => Corpus::load(path)
            .with_context(|| format!("loading corpus {}", path.display()))?,
        None => Corpus::builtin(),
    };
    Ok(CorpusSource::new(corpus, config.max_results))
}

/// The TUI owns the terminal, so it logs to a file; everything else logs
/// to stderr.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("quicksuggest=info".parse()?);

    if cli.command.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = match &cli.log {
        Some(p) => p.clone(),
        None => dirs_path()
            .context("cannot determine home directory for the log file")?
            .join("quicksuggest.log"),
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
