//! Artifacts journeys hand to each other through context memory.
//!
//! The keys live in [`nutribot_store::memory::keys`]; the shapes live here
//! so producer and consumer deserialize the same type.

use chrono::{DateTime, Utc};
use nutribot_planner::grocery::ConsolidatedIngredient;
use nutribot_planner::{MealPlan, Organization};
use serde::{Deserialize, Serialize};

/// A meal plan the user approved and saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMealPlan {
    pub plan: MealPlan,
    pub household_size: u32,
    pub skill_level: String,
    pub saved_at: DateTime<Utc>,
}

/// A grocery list kept for reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryTemplate {
    pub items: Vec<ConsolidatedIngredient>,
    pub organization: Organization,
    pub saved_at: DateTime<Utc>,
}

/// What the user said about a finished cooking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingLogEntry {
    pub recipe_id: String,
    pub recipe_name: String,
    pub servings: u32,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    pub finished_at: DateTime<Utc>,
}
