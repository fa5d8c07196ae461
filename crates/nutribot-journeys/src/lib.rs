//! # nutribot-journeys
//!
//! The six guided conversations NutriBot can hold, each a step machine
//! over a [`Session`](nutribot_store::Session):
//!
//! | Journey | Steps | Hands off through context memory |
//! |---|---|---|
//! | [`RecipeDiscovery`] | 5 | `selected_recipe`, `saved_recipes`, `grocery_recipe` |
//! | [`MealPlanning`] | 8 | `completed_meal_plan` |
//! | [`GroceryAssistance`] | 6 | `saved_grocery_template` |
//! | [`CookingGuidance`] | 6 | `cooking_log` |
//! | [`FoodTracking`] | 10 | `food_diary` |
//! | [`CalorieMealRecommendation`] | 7 | `favorite_meals` |
//!
//! Journeys are stateless unit structs registered once in a
//! [`JourneySet`]; every turn gets a [`TurnContext`] borrowing the session
//! and the shared catalog.

pub mod artifacts;
pub mod calorie_meals;
pub mod cooking;
pub mod error;
pub mod food_tracking;
pub mod grocery;
pub mod journey;
pub mod meal_planning;
pub mod prompt;
pub mod recipe_discovery;

// ── re-exports ───────────────────────────────────────────────────────

pub use artifacts::{CookingLogEntry, GroceryTemplate, SavedMealPlan};
pub use calorie_meals::CalorieMealRecommendation;
pub use cooking::CookingGuidance;
pub use error::{JourneyError, Result};
pub use food_tracking::FoodTracking;
pub use grocery::GroceryAssistance;
pub use journey::{Journey, JourneySet, TurnContext};
pub use meal_planning::MealPlanning;
pub use recipe_discovery::RecipeDiscovery;
