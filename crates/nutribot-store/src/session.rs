//! Conversation sessions.
//!
//! One [`Session`] per conversation.  It records which journey is active and
//! at which step, the journey's [`JourneyState`], context shared between
//! journeys, the user's preferences, and the message log.
//!
//! Every mutation goes through a method here so the journey invariants hold:
//! at most one journey is active, starting a journey always installs a fresh
//! state at step 1, and clearing a journey drops its state entirely.

use chrono::{DateTime, Utc};
use nutribot_kernel::JourneyKind;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::memory::ContextMemory;
use crate::state::JourneyState;

// ═══════════════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════════════

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Standing preferences that personalize every journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub dietary_restrictions: Vec<String>,
    pub allergies: Vec<String>,
    pub cuisine_preferences: Vec<String>,
    pub skill_level: String,
    pub cooking_time_preference: String,
    pub serving_size: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dietary_restrictions: Vec::new(),
            allergies: Vec::new(),
            cuisine_preferences: Vec::new(),
            skill_level: "beginner".to_string(),
            cooking_time_preference: "medium".to_string(),
            serving_size: 4,
        }
    }
}

/// Compact, loggable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub current_journey: Option<JourneyKind>,
    pub current_step: Option<u32>,
    pub total_messages: usize,
    pub created_at: DateTime<Utc>,
}

/// A conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, stable for the conversation's lifetime.
    pub session_id: String,
    /// The active journey, if any.
    pub current_journey: Option<JourneyKind>,
    /// Step within the active journey.  `None` with a journey set means the
    /// journey must be restarted on the next turn.
    pub current_step: Option<u32>,
    /// Artifacts shared between journeys.
    pub user_context: ContextMemory,
    /// Ordered message log.
    pub conversation_history: Vec<Message>,
    /// State of the active journey run.
    pub journey_state: Option<JourneyState>,
    pub user_preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Session
// ═══════════════════════════════════════════════════════════════════════

impl Session {
    /// Create a session with a fresh UUID v7 identifier.
    pub fn new() -> Self {
        Self::with_id(Uuid::now_v7().to_string())
    }

    /// Create a session under a caller-supplied identifier.
    pub fn with_id(session_id: impl Into<String>) -> Self {
        let session = Self {
            session_id: session_id.into(),
            current_journey: None,
            current_step: None,
            user_context: ContextMemory::new(),
            conversation_history: Vec::new(),
            journey_state: None,
            user_preferences: UserPreferences::default(),
            created_at: Utc::now(),
        };
        debug!(session_id = %session.session_id, "session created");
        session
    }

    // ── journey lifecycle ────────────────────────────────────────────

    /// Activate `journey` at step 1 with a fresh [`JourneyState`].
    ///
    /// Any previous journey and its state are discarded.
    pub fn start_journey(&mut self, journey: JourneyKind) {
        debug!(session_id = %self.session_id, journey = %journey, "session.start_journey");
        self.current_journey = Some(journey);
        self.current_step = Some(1);
        self.journey_state = Some(JourneyState::new(journey));
    }

    /// Move to step `n`, storing `payload` under `step_data[n]` when given.
    pub fn update_step(&mut self, n: u32, payload: Option<serde_json::Value>) {
        debug!(session_id = %self.session_id, step = n, "session.update_step");
        self.current_step = Some(n);
        if let (Some(payload), Some(state)) = (payload, self.journey_state.as_mut()) {
            state.step_data.insert(n, payload);
        }
    }

    /// Record a timestamped decision in the active journey's state.
    pub fn record_decision<T: Serialize>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        debug!(session_id = %self.session_id, key = %key, "session.record_decision");
        self.state_mut()?.record(key, value)
    }

    /// Deactivate the current journey and drop its state.
    pub fn clear_journey(&mut self) {
        debug!(
            session_id = %self.session_id,
            journey = ?self.current_journey,
            "session.clear_journey"
        );
        self.current_journey = None;
        self.current_step = None;
        self.journey_state = None;
    }

    /// Keep the journey but forget its step, so the next turn restarts it.
    pub fn mark_for_restart(&mut self) {
        debug!(session_id = %self.session_id, "session.mark_for_restart");
        self.current_step = None;
    }

    /// The active journey's state.
    pub fn state(&self) -> StoreResult<&JourneyState> {
        self.journey_state
            .as_ref()
            .ok_or_else(|| StoreError::NoActiveJourney {
                session_id: self.session_id.clone(),
            })
    }

    /// The active journey's state, mutably.
    pub fn state_mut(&mut self) -> StoreResult<&mut JourneyState> {
        match self.journey_state.as_mut() {
            Some(state) => Ok(state),
            None => Err(StoreError::NoActiveJourney {
                session_id: self.session_id.clone(),
            }),
        }
    }

    // ── messages ─────────────────────────────────────────────────────

    /// Append a message to the log.  User messages are also recorded in the
    /// active journey's input log.
    pub fn add_message(&mut self, sender: Sender, text: impl Into<String>) {
        let message = text.into();
        if sender == Sender::User {
            if let Some(state) = self.journey_state.as_mut() {
                state.user_inputs.push(message.clone());
            }
        }
        self.conversation_history.push(Message {
            sender,
            message,
            timestamp: Utc::now(),
        });
    }

    /// Drop the oldest messages so at most `limit` remain.
    pub fn trim_history(&mut self, limit: usize) {
        let len = self.conversation_history.len();
        if len > limit {
            self.conversation_history.drain(..len - limit);
        }
    }

    // ── context ──────────────────────────────────────────────────────

    /// Store a cross-journey value.
    pub fn update_context(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.user_context.set(key, value);
    }

    /// Read a cross-journey value.
    pub fn get_context(&self, key: &str) -> Option<&serde_json::Value> {
        self.user_context.get(key)
    }

    /// Compact view for logging and status output.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            current_journey: self.current_journey,
            current_step: self.current_step,
            total_messages: self.conversation_history.len(),
            created_at: self.created_at,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
