//! Cross-journey context memory.
//!
//! Journeys come and go; a few artifacts must outlive them.  A completed meal
//! plan is picked up by the grocery journey, a recipe chosen during discovery
//! is handed to cooking guidance, the food diary accumulates across tracking
//! runs.  Those artifacts live in [`ContextMemory`], a per-session key/value
//! map of JSON values that is never cleared by `clear_journey`.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreResult;

// ═══════════════════════════════════════════════════════════════════════
//  Well-known keys
// ═══════════════════════════════════════════════════════════════════════

/// Keys shared between journeys.  Kept in one place so producers and
/// consumers cannot drift apart.
pub mod keys {
    /// Meal plan saved by the planning journey.
    pub const COMPLETED_MEAL_PLAN: &str = "completed_meal_plan";
    /// Recipe id handed to cooking guidance.
    pub const SELECTED_RECIPE: &str = "selected_recipe";
    /// Recipe id handed to the grocery journey.
    pub const GROCERY_RECIPE: &str = "grocery_recipe";
    /// Recipe ids bookmarked during discovery.
    pub const SAVED_RECIPES: &str = "saved_recipes";
    /// Meal ids favorited during calorie recommendations.
    pub const FAVORITE_MEALS: &str = "favorite_meals";
    /// Grocery list stored as a reusable template.
    pub const SAVED_GROCERY_TEMPLATE: &str = "saved_grocery_template";
    /// Food diary entries logged by the tracking journey.
    pub const FOOD_DIARY: &str = "food_diary";
    /// Ratings and notes left after a cooking session.
    pub const COOKING_LOG: &str = "cooking_log";
}

// ═══════════════════════════════════════════════════════════════════════
//  ContextMemory
// ═══════════════════════════════════════════════════════════════════════

/// Session-scoped key/value store of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMemory {
    store: HashMap<String, serde_json::Value>,
}

impl ContextMemory {
    /// Create an empty context memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        debug!(key = %key, "context.set");
        self.store.insert(key, value);
    }

    /// Serialize `value` and store it under `key`.
    pub fn set_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value);
        Ok(())
    }

    /// Retrieve a value by key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.store.get(key)
    }

    /// Retrieve and deserialize a value.  A missing key is `Ok(None)`; a
    /// present value of the wrong shape is an error.
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        self.store
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Append `value` to the JSON array stored under `key`, creating the
    /// array if needed.  A non-array value under `key` is replaced.
    pub fn push(&mut self, key: &str, value: serde_json::Value) {
        debug!(key = %key, "context.push");
        match self.store.get_mut(key) {
            Some(serde_json::Value::Array(items)) => items.push(value),
            _ => {
                self.store
                    .insert(key.to_string(), serde_json::Value::Array(vec![value]));
            }
        }
    }

    /// Remove a key and return its former value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        debug!(key = %key, "context.remove");
        self.store.remove(key)
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.store.iter()
    }
}
