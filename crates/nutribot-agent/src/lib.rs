//! Conversation runtime for NutriBot.
//!
//! This crate ties the workspace together: it owns the [`Orchestrator`]
//! that turns one raw utterance into one reply, routing it either to the
//! session's active journey or, when none is active, through the intent
//! classifier to a fresh one.
//!
//! ## Architecture
//!
//! ```text
//!   raw text
//!      │
//! ┌────┴─────────┐  active journey?  ┌──────────────┐
//! │ Orchestrator │──────── yes ─────>│  JourneySet  │──> reply
//! └────┬─────────┘                   └──────┬───────┘
//!      │ no / declined                      │ TurnContext
//! ┌────┴─────────────┐              ┌───────┴───────┐
//! │ IntentClassifier │              │ Session +     │
//! │ (kernel)         │              │ Catalog       │
//! └──────────────────┘              └───────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`orchestrator`] -- Per-turn routing, recovery, and history capping.
//! - [`config`] -- [`AgentConfig`], deserializable from the `[agent]` table.
//! - [`error`] -- Agent error types.

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use orchestrator::{GOODBYE, Orchestrator, greeting};
