//! YAML-backed suggestion corpus.
//!
//! ```yaml
//! search_url: "https://blekko.com/ws/?q={query}"
//! icon: "search.png"
//! general:
//!   - rust
//!   - rust book
//! contexts:
//!   wikipedia:
//!     - rust (programming language)
//! ```
//!
//! A term matches when it starts with the query, compared case-insensitively.
//! Corpus order is kept; there is no ranking.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::form_urlencoded;

use super::{SourceResult, SuggestionSource, Suggestions};
use crate::menu::Item;

/// Placeholder in `search_url` replaced by the escaped term.
const QUERY_PLACEHOLDER: &str = "{query}";

const BUILTIN_CORPUS: &str = r#"
search_url: "https://blekko.com/ws/?q={query}"
icon: "search"
general:
  - rust
  - rust book
  - rust by example
  - rustup
  - rust analyzer
  - ruby
  - ruby on rails
  - python
  - python tutorial
  - tokio
  - tokio tutorial
  - serde
  - weather
  - wikipedia
contexts:
  wikipedia:
    - rust (programming language)
    - ruby (programming language)
    - python (programming language)
    - weather forecasting
  github:
    - rust-lang/rust
    - tokio-rs/tokio
    - serde-rs/serde
  docs:
    - tokio::time
    - tokio::sync
    - serde_json
"#;

/// On-disk corpus format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub general: Vec<String>,
    /// Context token → terms.
    #[serde(default)]
    pub contexts: HashMap<String, Vec<String>>,
}

fn default_search_url() -> String {
    "https://blekko.com/ws/?q={query}".into()
}

impl Default for Corpus {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            icon: String::new(),
            general: Vec::new(),
            contexts: HashMap::new(),
        }
    }
}

impl Corpus {
    pub fn from_yaml(yaml: &str) -> SourceResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn builtin() -> Self {
        match Self::from_yaml(BUILTIN_CORPUS) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("built-in corpus unreadable, starting empty: {e}");
                Self::default()
            }
        }
    }

    fn item(&self, term: &str) -> Item {
        let target = self
            .search_url
            .replace(QUERY_PLACEHOLDER, &escape_query(term));
        Item::new(term, self.icon.clone(), target)
    }
}

/// Corpus-backed source with a per-list result cap.
#[derive(Debug, Clone)]
pub struct CorpusSource {
    corpus: Corpus,
    max_results: usize,
}

impl CorpusSource {
    pub fn new(corpus: Corpus, max_results: usize) -> Self {
        Self {
            corpus,
            max_results,
        }
    }

    fn matching(&self, terms: &[String], query: &str) -> Vec<Item> {
        let needle = query.to_lowercase();
        terms
            .iter()
            .filter(|t| t.to_lowercase().starts_with(&needle))
            .take(self.max_results)
            .map(|t| self.corpus.item(t))
            .collect()
    }
}

#[async_trait]
impl SuggestionSource for CorpusSource {
    async fn suggest(&self, query: &str, context: &str) -> SourceResult<Suggestions> {
        if query.is_empty() {
            return Ok(Suggestions::default());
        }
        let general = self.matching(&self.corpus.general, query);
        let context = if context.is_empty() {
            Vec::new()
        } else {
            self.corpus
                .contexts
                .get(context)
                .map(|terms| self.matching(terms, query))
                .unwrap_or_default()
        };
        debug!(
            query,
            general = general.len(),
            context = context.len(),
            "corpus lookup"
        );
        Ok(Suggestions { general, context })
    }
}

/// Form-encode a term for use inside a query string (space becomes `+`).
pub fn escape_query(term: &str) -> String {
    form_urlencoded::byte_serialize(term.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source() -> CorpusSource {
        CorpusSource::new(Corpus::builtin(), 8)
    }

    #[test]
    fn builtin_corpus_parses() {
        let corpus = Corpus::builtin();
        assert!(!corpus.general.is_empty());
        assert!(corpus.contexts.contains_key("wikipedia"));
    }

    #[tokio::test]
    async fn prefix_match_is_case_insensitive() {
        let s = source().suggest("RUS", "").await.unwrap();
        let names: Vec<_> = s.general.iter().map(|i| i.completion.as_str()).collect();
        assert_eq!(
            names,
            vec!["rust", "rust book", "rust by example", "rustup", "rust analyzer"]
        );
        assert!(s.context.is_empty());
    }

    #[tokio::test]
    async fn context_list_uses_token() {
        let s = source().suggest("ru", "wikipedia").await.unwrap();
        let names: Vec<_> = s.context.iter().map(|i| i.completion.as_str()).collect();
        assert_eq!(
            names,
            vec!["rust (programming language)", "ruby (programming language)"]
        );
    }

    #[tokio::test]
    async fn unknown_context_gives_empty_context_list() {
        let s = source().suggest("ru", "nosuchsite").await.unwrap();
        assert!(s.context.is_empty());
        assert!(!s.general.is_empty());
    }

    #[tokio::test]
    async fn empty_query_gives_nothing() {
        let s = source().suggest("", "wikipedia").await.unwrap();
        assert_eq!(s, Suggestions::default());
    }

    #[tokio::test]
    async fn results_are_capped() {
        let s = CorpusSource::new(Corpus::builtin(), 2)
            .suggest("r", "")
            .await
            .unwrap();
        assert_eq!(s.general.len(), 2);
    }

    #[test]
    fn target_uses_escaped_template() {
        let corpus = Corpus::builtin();
        let item = corpus.item("rust book");
        assert_eq!(item.target, "https://blekko.com/ws/?q=rust+book");
        assert_eq!(item.icon, "search");
    }

    #[test]
    fn escape_query_encodes_reserved() {
        assert_eq!(escape_query("a&b=c"), "a%26b%3Dc");
        assert_eq!(escape_query("tokio::time"), "tokio%3A%3Atime");
        assert_eq!(escape_query("é"), "%C3%A9");
        assert_eq!(escape_query("rust (lang)"), "rust+%28lang%29");
    }

    #[test]
    fn default_corpus_keeps_search_template() {
        let corpus = Corpus::default();
        assert!(corpus.general.is_empty());
        assert_eq!(corpus.item("a b").target, "https://blekko.com/ws/?q=a+b");

        let sparse = Corpus::from_yaml("general: [x]\n").unwrap();
        assert_eq!(sparse.search_url, Corpus::default().search_url);
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.yaml");
        std::fs::write(
            &path,
            "search_url: \"https://s.test/{query}\"\ngeneral: [alpha, beta]\n",
        )
        .unwrap();
        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.general, vec!["alpha", "beta"]);
        assert_eq!(corpus.item("alpha").target, "https://s.test/alpha");
        assert!(corpus.contexts.is_empty());
    }

    #[test]
    fn bad_yaml_is_parse_error() {
        let err = Corpus::from_yaml("general: {not: [a list").unwrap_err();
        assert!(matches!(err, crate::source::SourceError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Corpus::load(Path::new("/nonexistent/corpus.yaml")).unwrap_err();
        assert!(matches!(err, crate::source::SourceError::Io(_)));
    }
}
