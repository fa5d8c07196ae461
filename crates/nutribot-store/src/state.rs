//! Per-run journey state.
//!
//! A [`JourneyState`] is created fresh every time a journey starts and is
//! dropped when the journey completes or resets.  Journeys keep everything
//! they learn here, never in their own fields, so one journey value can
//! serve any number of sessions.
//!
//! - `step_data` holds the artifact a step produced, keyed by step number
//!   (search results, a generated plan, a consolidated list).
//! - `decision_points` holds named, timestamped user choices that later
//!   steps branch on.
//! - `user_inputs` is the raw input log for the run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use nutribot_kernel::JourneyKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A named choice made by the user during a journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub choice: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// State for one run of one journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyState {
    pub journey_name: JourneyKind,
    pub step_data: BTreeMap<u32, serde_json::Value>,
    pub decision_points: BTreeMap<String, Decision>,
    pub user_inputs: Vec<String>,
}

impl JourneyState {
    /// Create an empty state for `journey`.
    pub fn new(journey: JourneyKind) -> Self {
        Self {
            journey_name: journey,
            step_data: BTreeMap::new(),
            decision_points: BTreeMap::new(),
            user_inputs: Vec::new(),
        }
    }

    // ── step data ────────────────────────────────────────────────────

    /// Store a serializable payload under `step`.
    pub fn put_step<T: Serialize>(&mut self, step: u32, value: &T) -> StoreResult<()> {
        self.step_data.insert(step, serde_json::to_value(value)?);
        Ok(())
    }

    /// Read and deserialize the payload stored under `step`.
    pub fn step<T: DeserializeOwned>(&self, step: u32) -> StoreResult<Option<T>> {
        self.step_data
            .get(&step)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Drop the payload stored under `step`.
    pub fn clear_step(&mut self, step: u32) {
        self.step_data.remove(&step);
    }

    // ── decisions ────────────────────────────────────────────────────

    /// Record a timestamped decision, replacing any earlier one of the same
    /// name.
    pub fn record<T: Serialize>(&mut self, name: impl Into<String>, choice: &T) -> StoreResult<()> {
        let decision = Decision {
            choice: serde_json::to_value(choice)?,
            timestamp: Utc::now(),
        };
        self.decision_points.insert(name.into(), decision);
        Ok(())
    }

    /// Read and deserialize a recorded decision.
    pub fn decision<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        self.decision_points
            .get(name)
            .map(|d| serde_json::from_value(d.choice.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Whether a decision of this name has been recorded.
    pub fn has_decision(&self, name: &str) -> bool {
        self.decision_points.contains_key(name)
    }

    /// Forget a recorded decision.
    pub fn forget(&mut self, name: &str) {
        self.decision_points.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = JourneyState::new(JourneyKind::GroceryAssistance);
        assert_eq!(state.journey_name, JourneyKind::GroceryAssistance);
        assert!(state.step_data.is_empty());
        assert!(state.decision_points.is_empty());
        assert!(state.user_inputs.is_empty());
    }

    #[test]
    fn step_payloads_are_typed() {
        let mut state = JourneyState::new(JourneyKind::MealPlanning);
        state.put_step(3, &vec![1u32, 2, 3]).unwrap();

        let back: Option<Vec<u32>> = state.step(3).unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
        assert_eq!(state.step::<Vec<u32>>(4).unwrap(), None);

        state.clear_step(3);
        assert!(state.step_data.is_empty());
    }

    #[test]
    fn decisions_replace_earlier_choices() {
        let mut state = JourneyState::new(JourneyKind::MealPlanning);
        state.record("days", &1u32).unwrap();
        state.record("days", &7u32).unwrap();

        assert_eq!(state.decision::<u32>("days").unwrap(), Some(7));
        assert_eq!(state.decision_points.len(), 1);
        assert!(state.has_decision("days"));

        state.forget("days");
        assert!(!state.has_decision("days"));
    }
}
