//! Agent configuration.
//!
//! [`AgentConfig`] is the `[agent]` table of `config/default.toml`.  Every
//! field has a default, so a partial table (or none at all) is valid.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{AgentError, Result};

/// Default cap on `conversation_history` entries kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Tunables for the [`Orchestrator`](crate::Orchestrator).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of messages kept in a session's history.  Older
    /// messages are dropped after every turn.
    pub history_limit: usize,

    /// Words that end an interactive chat.  The channel checks these; the
    /// orchestrator never sees them.
    pub exit_words: Vec<String>,

    /// Extra classifier patterns keyed by journey label, appended to the
    /// built-in tables.
    pub intent_patterns: BTreeMap<String, Vec<String>>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            exit_words: vec!["exit".into(), "quit".into(), "bye".into()],
            intent_patterns: BTreeMap::new(),
        }
    }
}

impl AgentConfig {
    /// Parse a standalone `[agent]` table body.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| AgentError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the orchestrator cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(AgentError::Config {
                reason: "history_limit must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_exit_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exit_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Add one extra classifier pattern for the journey labelled `label`.
    pub fn with_intent_pattern(mut self, label: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.intent_patterns
            .entry(label.into())
            .or_default()
            .push(pattern.into());
        self
    }

    /// Whether `input` is one of the exit words (case-insensitive).
    pub fn is_exit_word(&self, input: &str) -> bool {
        let input = input.trim();
        self.exit_words.iter().any(|w| w.eq_ignore_ascii_case(input))
    }
}
