//! Per-turn conversation orchestrator.
//!
//! One call to [`Orchestrator::handle`] is one turn: the utterance goes to
//! the session's active journey when there is one, otherwise the intent
//! classifier picks a journey to start.  A journey that declines the
//! utterance is dropped and the same text is classified afresh, so
//! "cancel" followed by a new request works in a single turn.
//!
//! Turns are transactional.  The orchestrator works on a checked-out copy of
//! the session and commits it only when the turn produced a reply; a journey
//! error leaves the stored session exactly as it was before the turn.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nutribot_catalog::Catalog;
use nutribot_journeys::{Journey, JourneyError, JourneySet, TurnContext};
use nutribot_kernel::{IntentClassifier, JourneyKind};
use nutribot_store::{Sender, Session, SessionStore, SessionSummary};
use tracing::{debug, info, instrument, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};

// ---------------------------------------------------------------------------
// Canned replies
// ---------------------------------------------------------------------------

const EMPTY_INPUT_REPLY: &str =
    "I didn't catch that. Please tell me what you'd like to help with!";

const FAILURE_REPLY: &str = "I'm sorry, something went wrong. Let's try again!";

/// Printed by chat channels when the user leaves.
pub const GOODBYE: &str = "Thanks for using the nutrition assistant! Stay healthy! 👋";

const HELP_EXAMPLES: [&str; 13] = [
    "Find me a recipe",
    "Help me plan meals",
    "Create a meal plan",
    "Plan my meals for the week",
    "I need cooking help",
    "Log my food' or 'Track calories",
    "Show my food diary",
    "Add food to my log",
    "Create a grocery list",
    "Guide me through cooking",
    "Help me cook this recipe",
    "Find meals with 400 calories",
    "I need low calorie meals",
];

/// Opening message for a new chat.
pub fn greeting() -> String {
    [
        "Hello! I'm your nutrition assistant! I can help you with:",
        "  🔍 Finding recipes",
        "  📋 Planning meals",
        "  👩‍🍳 Cooking guidance",
        "  📊 Food calorie tracking",
        "  🛒 Grocery assistance",
        "  🥗 Healthy meal recommendations",
        "",
        "What would you like to do today?",
    ]
    .join("\n")
}

fn help_text() -> String {
    let mut text = "I'm not sure what you'd like to do. Try saying things like:".to_string();
    for example in HELP_EXAMPLES {
        text.push_str(&format!("\n• '{example}'"));
    }
    text
}

fn restart_notice(kind: JourneyKind) -> String {
    format!("I'm not sure what step we're on. Let's start over with {}.", kind.title())
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Routes utterances to journeys and keeps sessions consistent.
///
/// Cheap to clone; clones share the session store and catalog.
#[derive(Clone)]
pub struct Orchestrator {
    classifier: IntentClassifier,
    journeys: JourneySet,
    catalog: Arc<Catalog>,
    store: SessionStore,
    config: AgentConfig,
}

impl Orchestrator {
    /// Build an orchestrator with the default classifier, extended by the
    /// patterns in `config`, and the six standard journeys.
    pub fn new(catalog: Arc<Catalog>, config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let mut classifier = IntentClassifier::with_defaults();
        for (label, patterns) in &config.intent_patterns {
            let kind: JourneyKind = label.parse()?;
            for pattern in patterns {
                classifier.add_pattern(kind, pattern)?;
            }
        }
        info!(
            patterns = classifier.pattern_count(),
            history_limit = config.history_limit,
            "orchestrator ready"
        );
        Ok(Self::with_parts(
            classifier,
            JourneySet::standard(),
            catalog,
            SessionStore::new(),
            config,
        ))
    }

    /// Assemble an orchestrator from explicit parts.
    pub fn with_parts(
        classifier: IntentClassifier,
        journeys: JourneySet,
        catalog: Arc<Catalog>,
        store: SessionStore,
        config: AgentConfig,
    ) -> Self {
        Self {
            classifier,
            journeys,
            catalog,
            store,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a session with a generated id.
    pub fn create_session(&self) -> String {
        self.store.create()
    }

    /// Snapshot of a session.
    pub fn session(&self, session_id: &str) -> Result<Session> {
        self.store.get(session_id).map_err(|_| AgentError::UnknownSession {
            session_id: session_id.to_string(),
        })
    }

    /// Compact view of a session for status output.
    pub fn session_summary(&self, session_id: &str) -> Result<SessionSummary> {
        self.store.summary(session_id).map_err(|_| AgentError::UnknownSession {
            session_id: session_id.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Turn handling
    // -----------------------------------------------------------------------

    /// Handle one utterance and return the reply.  Unknown session ids
    /// start a new session.
    pub fn handle(&self, session_id: &str, text: &str) -> String {
        self.handle_at(session_id, text, Utc::now())
    }

    /// [`handle`](Self::handle) with an explicit turn time.
    #[instrument(skip(self, text, now))]
    pub fn handle_at(&self, session_id: &str, text: &str, now: DateTime<Utc>) -> String {
        let text = text.trim();
        if text.is_empty() {
            debug!("empty input");
            return EMPTY_INPUT_REPLY.to_string();
        }

        let mut session = self.store.checkout(session_id);
        match self.turn(&mut session, text, now) {
            Ok(reply) => {
                session.add_message(Sender::Bot, reply.as_str());
                session.trim_history(self.config.history_limit);
                self.store.commit(session);
                reply
            }
            Err(err) => {
                warn!(error = %err, "turn failed, session restored");
                FAILURE_REPLY.to_string()
            }
        }
    }

    fn turn(&self, session: &mut Session, text: &str, now: DateTime<Utc>) -> Result<String> {
        session.add_message(Sender::User, text);

        if let Some(kind) = session.current_journey {
            match self.continue_journey(session, kind, text, now)? {
                Some(reply) => return Ok(reply),
                None => {
                    info!(journey = %kind, "journey declined input, reclassifying");
                    session.clear_journey();
                }
            }
        }

        self.route(session, text, now)
    }

    /// Give `text` to the active journey.  `Ok(None)` means it declined.
    fn continue_journey(
        &self,
        session: &mut Session,
        kind: JourneyKind,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let journey = self.journey(kind)?;
        let mut ctx = TurnContext::new(session, &self.catalog, now);

        if ctx.session.current_step.is_none() {
            info!(journey = %kind, "restarting journey");
            ctx.restart(kind);
            return Ok(Some(journey.start(&mut ctx)?));
        }

        match journey.process_input(&mut ctx, text) {
            Ok(reply) => {
                if reply.is_some() && ctx.session.current_journey.is_none() {
                    info!(journey = %kind, "journey completed");
                }
                Ok(reply)
            }
            Err(JourneyError::StepOutOfRange { step, .. }) => {
                warn!(journey = %kind, step, "step out of range, journey marked for restart");
                ctx.session.mark_for_restart();
                Ok(Some(restart_notice(kind)))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Classify `text` and start the matching journey, or explain what the
    /// bot can do.
    fn route(&self, session: &mut Session, text: &str, now: DateTime<Utc>) -> Result<String> {
        let Some(kind) = self.classifier.classify(text) else {
            debug!("no intent matched");
            return Ok(help_text());
        };

        let journey = self.journey(kind)?;
        info!(journey = %kind, "journey started");
        session.start_journey(kind);
        let mut ctx = TurnContext::new(session, &self.catalog, now);
        Ok(journey.start(&mut ctx)?)
    }

    fn journey(&self, kind: JourneyKind) -> Result<Arc<dyn Journey>> {
        self.journeys
            .get(kind)
            .ok_or(AgentError::JourneyNotRegistered { kind })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator() -> Orchestrator {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        Orchestrator::new(catalog, AgentConfig::default()).unwrap()
    }

    #[test]
    fn empty_input_is_not_recorded() {
        let bot = orchestrator();
        let id = bot.create_session();
        assert_eq!(bot.handle(&id, "   "), EMPTY_INPUT_REPLY);
        assert_eq!(bot.session_summary(&id).unwrap().total_messages, 0);
    }

    #[test]
    fn unmatched_text_gets_help() {
        let bot = orchestrator();
        let reply = bot.handle("s", "what's the weather like");
        assert!(reply.starts_with("I'm not sure what you'd like to do."));
        assert!(reply.contains("• 'Find meals with 400 calories'"));
        assert_eq!(bot.session("s").unwrap().current_journey, None);
    }

    #[test]
    fn classified_text_starts_a_journey() {
        let bot = orchestrator();
        let reply = bot.handle("s", "find me a recipe");
        assert!(reply.starts_with("I'd love to help you find the perfect recipe!"));

        let summary = bot.session_summary("s").unwrap();
        assert_eq!(summary.current_journey, Some(JourneyKind::RecipeDiscovery));
        assert_eq!(summary.total_messages, 2);
    }

    #[test]
    fn leave_request_clears_and_reclassifies() {
        let bot = orchestrator();
        bot.handle("s", "find me a recipe");
        let reply = bot.handle("s", "main menu");
        assert!(reply.starts_with("I'm not sure what you'd like to do."));
        assert_eq!(bot.session("s").unwrap().current_journey, None);
    }

    #[test]
    fn out_of_range_step_restarts_on_next_turn() {
        let bot = orchestrator();
        let mut session = bot.store().checkout("s");
        session.start_journey(JourneyKind::MealPlanning);
        session.update_step(42, None);
        bot.store().commit(session);

        let reply = bot.handle("s", "hello");
        assert_eq!(reply, "I'm not sure what step we're on. Let's start over with Meal Planning.");
        let session = bot.session("s").unwrap();
        assert_eq!(session.current_journey, Some(JourneyKind::MealPlanning));
        assert_eq!(session.current_step, None);

        bot.handle("s", "ok");
        let session = bot.session("s").unwrap();
        assert_eq!(session.current_journey, Some(JourneyKind::MealPlanning));
        assert!(session.current_step.is_some());
    }

    #[test]
    fn journey_error_restores_the_session() {
        let bot = orchestrator();
        let mut session = bot.store().checkout("s");
        session.start_journey(JourneyKind::FoodCalorieTracking);
        session.update_step(4, None);
        bot.store().commit(session);
        let before = bot.session("s").unwrap();

        assert_eq!(bot.handle("s", "2"), FAILURE_REPLY);
        assert_eq!(bot.session("s").unwrap(), before);
    }

    #[test]
    fn unregistered_journey_is_a_failed_turn() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let bot = Orchestrator::with_parts(
            IntentClassifier::with_defaults(),
            JourneySet::new(),
            catalog,
            SessionStore::new(),
            AgentConfig::default(),
        );
        assert_eq!(bot.handle("s", "find me a recipe"), FAILURE_REPLY);
        assert_eq!(bot.session_summary("s").unwrap().total_messages, 0);
    }

    #[test]
    fn history_is_capped() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let bot = Orchestrator::new(catalog, AgentConfig::default().with_history_limit(3)).unwrap();
        for _ in 0..3 {
            bot.handle("s", "hello there");
        }
        let session = bot.session("s").unwrap();
        assert_eq!(session.conversation_history.len(), 3);
        assert_eq!(session.conversation_history[2].sender, Sender::Bot);
    }

    #[test]
    fn configured_patterns_extend_the_classifier() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let config = AgentConfig::default().with_intent_pattern("recipe_discovery", r"i'm.*hungry");
        let bot = Orchestrator::new(catalog, config).unwrap();
        assert_eq!(
            bot.classifier().classify("I'm so hungry"),
            Some(JourneyKind::RecipeDiscovery)
        );
    }

    #[test]
    fn unknown_pattern_label_is_a_kernel_error() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let config = AgentConfig::default().with_intent_pattern("snack_attack", "chips");
        let err = Orchestrator::new(catalog, config).err().unwrap();
        assert!(matches!(err, AgentError::Kernel(_)));
    }

    #[test]
    fn unknown_session_summary_is_an_error() {
        let bot = orchestrator();
        assert!(matches!(
            bot.session_summary("nope"),
            Err(AgentError::UnknownSession { .. })
        ));
    }

    #[test]
    fn greeting_lists_every_capability() {
        let text = greeting();
        assert_eq!(text.lines().filter(|l| l.starts_with("  ")).count(), 6);
        assert!(text.ends_with("What would you like to do today?"));
    }
}
