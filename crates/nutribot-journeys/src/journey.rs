//! The journey contract.
//!
//! A journey is a stateless value: everything it learns during a run lives
//! in the session's [`JourneyState`](nutribot_store::JourneyState) or, for
//! artifacts that outlive the run, in the session's context memory.  One
//! instance of each journey therefore serves every session in the process.
//!
//! The orchestrator drives a journey through exactly two calls:
//!
//! - [`Journey::start`] right after `Session::start_journey`, and
//! - [`Journey::process_input`] for every later utterance, dispatched on
//!   the session's current step.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nutribot_catalog::Catalog;
use nutribot_kernel::JourneyKind;
use nutribot_store::Session;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{JourneyError, Result};

// ═══════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════

/// A structured multi-turn conversation toward one goal.
pub trait Journey: Send + Sync {
    /// The label this journey is registered under.
    fn kind(&self) -> JourneyKind;

    /// Open the journey and return its first prompt.  The session has just
    /// been put on step 1 with a fresh state.
    fn start(&self, ctx: &mut TurnContext<'_>) -> Result<String>;

    /// Handle one utterance at the session's current step.
    ///
    /// `Ok(None)` declines the utterance: the user asked to leave, and the
    /// orchestrator clears the journey and classifies the same text afresh.
    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════
//  Turn context
// ═══════════════════════════════════════════════════════════════════════

/// What a step handler may touch during one turn.
pub struct TurnContext<'a> {
    pub session: &'a mut Session,
    pub catalog: &'a Catalog,
    /// Wall-clock time of the turn, used to stamp diary entries.
    pub now: DateTime<Utc>,
}

impl<'a> TurnContext<'a> {
    pub fn new(session: &'a mut Session, catalog: &'a Catalog, now: DateTime<Utc>) -> Self {
        Self {
            session,
            catalog,
            now,
        }
    }

    /// Current step, treating a missing step as step 1.
    pub fn step(&self) -> u32 {
        self.session.current_step.unwrap_or(1)
    }

    /// Logical turn counter for the active run: the number of user inputs
    /// it has received.
    pub fn turn(&self) -> u64 {
        self.session
            .journey_state
            .as_ref()
            .map(|s| s.user_inputs.len() as u64)
            .unwrap_or(0)
    }

    /// Move to step `n` without storing anything.
    pub fn advance(&mut self, n: u32) {
        debug!(step = n, "step advanced");
        self.session.update_step(n, None);
    }

    /// Move to step `n` and store `payload` as that step's artifact.
    pub fn advance_with<T: Serialize>(&mut self, n: u32, payload: &T) -> Result<()> {
        debug!(step = n, "step advanced");
        self.session.update_step(n, Some(serde_json::to_value(payload)?));
        Ok(())
    }

    /// Store an artifact under `step` without moving.
    pub fn put<T: Serialize>(&mut self, step: u32, payload: &T) -> Result<()> {
        Ok(self.session.state_mut()?.put_step(step, payload)?)
    }

    /// The artifact stored under `step`, if any.
    pub fn get<T: DeserializeOwned>(&self, step: u32) -> Result<Option<T>> {
        Ok(self.session.state()?.step(step)?)
    }

    /// The artifact stored under `step`, or [`JourneyError::MissingState`].
    pub fn require<T: DeserializeOwned>(&self, step: u32, what: &str) -> Result<T> {
        self.get(step)?.ok_or_else(|| JourneyError::missing(what))
    }

    pub fn record<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        Ok(self.session.record_decision(key, value)?)
    }

    pub fn decision<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.session.state()?.decision(key)?)
    }

    /// A recorded decision, or [`JourneyError::MissingState`].
    pub fn require_decision<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.decision(key)?
            .ok_or_else(|| JourneyError::missing(format!("decision `{key}`")))
    }

    pub fn forget(&mut self, key: &str) -> Result<()> {
        self.session.state_mut()?.forget(key);
        Ok(())
    }

    /// Read a cross-journey artifact.
    pub fn context<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.session.user_context.get_typed(key)?)
    }

    /// Write a cross-journey artifact.
    pub fn set_context<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        Ok(self.session.user_context.set_typed(key, value)?)
    }

    /// Append to a cross-journey list.
    pub fn push_context<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.session.user_context.push(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Drop the run's state and begin it again at step 1.
    pub fn restart(&mut self, kind: JourneyKind) {
        self.session.start_journey(kind);
    }

    /// Finish the journey.  Context memory is kept.
    pub fn complete(&mut self) {
        self.session.clear_journey();
    }
}

/// Error for a step number a journey's step table does not cover.
pub(crate) fn out_of_range(journey: JourneyKind, step: u32) -> JourneyError {
    JourneyError::StepOutOfRange { journey, step }
}

// ═══════════════════════════════════════════════════════════════════════
//  Registry
// ═══════════════════════════════════════════════════════════════════════

/// One shared instance of every journey, looked up by label.
#[derive(Clone)]
pub struct JourneySet {
    journeys: HashMap<JourneyKind, Arc<dyn Journey>>,
}

impl JourneySet {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            journeys: HashMap::new(),
        }
    }

    /// All six standard journeys.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.register(Arc::new(crate::cooking::CookingGuidance));
        set.register(Arc::new(crate::meal_planning::MealPlanning));
        set.register(Arc::new(crate::recipe_discovery::RecipeDiscovery));
        set.register(Arc::new(crate::food_tracking::FoodTracking));
        set.register(Arc::new(crate::grocery::GroceryAssistance));
        set.register(Arc::new(crate::calorie_meals::CalorieMealRecommendation));
        set
    }

    /// Add or replace the journey registered under `journey.kind()`.
    pub fn register(&mut self, journey: Arc<dyn Journey>) {
        self.journeys.insert(journey.kind(), journey);
    }

    pub fn get(&self, kind: JourneyKind) -> Option<Arc<dyn Journey>> {
        self.journeys.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }
}

impl Default for JourneySet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutribot_store::memory::keys;

    #[test]
    fn standard_set_covers_every_kind() {
        let set = JourneySet::standard();
        assert_eq!(set.len(), JourneyKind::ALL.len());
        for kind in JourneyKind::ALL {
            assert_eq!(set.get(kind).map(|j| j.kind()), Some(kind));
        }
    }

    #[test]
    fn context_helpers_round_trip_state() {
        let catalog = Catalog::default();
        let mut session = Session::with_id("t");
        session.start_journey(JourneyKind::MealPlanning);
        let mut ctx = TurnContext::new(&mut session, &catalog, Utc::now());

        ctx.advance_with(3, &vec!["a".to_string()]).unwrap();
        assert_eq!(ctx.step(), 3);
        assert_eq!(ctx.get::<Vec<String>>(3).unwrap(), Some(vec!["a".to_string()]));

        ctx.record("days", &7u32).unwrap();
        assert_eq!(ctx.require_decision::<u32>("days").unwrap(), 7);
        assert!(matches!(
            ctx.require_decision::<u32>("meals"),
            Err(JourneyError::MissingState { .. })
        ));

        ctx.push_context(keys::SAVED_RECIPES, &"lasagna").unwrap();
        ctx.push_context(keys::SAVED_RECIPES, &"tacos").unwrap();
        let saved: Vec<String> = ctx.context(keys::SAVED_RECIPES).unwrap().unwrap();
        assert_eq!(saved, vec!["lasagna", "tacos"]);

        ctx.complete();
        assert!(session.current_journey.is_none());
        assert!(session.get_context(keys::SAVED_RECIPES).is_some());
    }

    #[test]
    fn turn_counts_user_inputs() {
        let catalog = Catalog::default();
        let mut session = Session::with_id("t");
        session.start_journey(JourneyKind::CookingGuidance);
        session.add_message(nutribot_store::Sender::User, "next");
        session.add_message(nutribot_store::Sender::User, "next");
        let ctx = TurnContext::new(&mut session, &catalog, Utc::now());
        assert_eq!(ctx.turn(), 2);
    }
}
