//! Suggestion sources: given a query and a context token, produce the
//! general and context-specific suggestion lists.
//!
//! Sources are asynchronous and may fail. Callers treat a failure as "no
//! new results" and keep whatever the menu already shows.

pub mod context;
pub mod corpus;

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::menu::Item;

pub use context::context_token;
pub use corpus::{Corpus, CorpusSource};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// The two ordered result lists for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub general: Vec<Item>,
    pub context: Vec<Item>,
}

/// Anything that can answer a suggestion query.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `query`. `context` is empty when the page gives none.
    async fn suggest(&self, query: &str, context: &str) -> SourceResult<Suggestions>;
}

/// Source that replays queued answers, for tests and demos.
///
/// Each call pops the next queued answer; once the queue is empty every
/// call returns the fallback (empty suggestions unless set).
#[derive(Debug, Default)]
pub struct FixedSource {
    queue: Mutex<Vec<Result<Suggestions, String>>>,
    fallback: Suggestions,
    calls: Mutex<Vec<(String, String)>>,
}

impl FixedSource {
    pub fn new(fallback: Suggestions) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Queue a successful answer.
    pub fn push(&self, suggestions: Suggestions) {
        self.lock_queue().insert(0, Ok(suggestions));
    }

    /// Queue a failure.
    pub fn push_failure(&self, reason: &str) {
        self.lock_queue().insert(0, Err(reason.to_string()));
    }

    /// Every `(query, context)` pair seen so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, Vec<Result<Suggestions, String>>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SuggestionSource for FixedSource {
    async fn suggest(&self, query: &str, context: &str) -> SourceResult<Suggestions> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((query.to_string(), context.to_string()));
        }
        match self.lock_queue().pop() {
            Some(Ok(s)) => Ok(s),
            Some(Err(reason)) => Err(SourceError::Unavailable(reason)),
            None => Ok(self.fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_source_replays_in_order() {
        let src = FixedSource::default();
        src.push(Suggestions {
            general: vec![Item::new("a", "", "u:a")],
            context: Vec::new(),
        });
        src.push_failure("offline");

        let first = src.suggest("a", "").await.unwrap();
        assert_eq!(first.general.len(), 1);

        let second = src.suggest("ab", "ctx").await;
        assert!(matches!(second, Err(SourceError::Unavailable(ref r)) if r == "offline"));

        let third = src.suggest("abc", "").await.unwrap();
        assert_eq!(third, Suggestions::default());

        assert_eq!(
            src.calls(),
            vec![
                ("a".to_string(), String::new()),
                ("ab".to_string(), "ctx".to_string()),
                ("abc".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn source_error_display() {
        let err = SourceError::Unavailable("timeout".into());
        assert_eq!(err.to_string(), "source unavailable: timeout");
    }
}
