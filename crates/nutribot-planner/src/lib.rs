//! # nutribot-planner
//!
//! The planning algorithms behind NutriBot's journeys.  Everything here is
//! synchronous and pure apart from reading the shared [`Catalog`]
//! (`nutribot_catalog::Catalog`).
//!
//! - **[`meal_plan`]** -- Constrained multi-day meal-plan generation with an
//!   ordered relaxation pipeline and proximity/variety scoring.
//! - **[`grocery`]** -- Ingredient extraction, duplicate consolidation with
//!   unit reconciliation, and store-aisle organization.
//! - **[`nutrition`]** -- Food diary totals, balance analysis and goal
//!   progress.
//! - **[`calorie`]** -- Calorie-goal parsing and single-meal analysis.
//! - **[`cooking`]** -- Step navigation, serving scaling, logical timers.
//! - **[`error`]** -- Planner errors.
//!
//! [`Catalog`]: nutribot_catalog::Catalog

pub mod calorie;
pub mod cooking;
pub mod error;
pub mod grocery;
pub mod meal_plan;
pub mod nutrition;
pub mod text;

pub use calorie::{CalorieGoal, CalorieRange, MacroPercentages, MealAnalysis, RangeKind};
pub use cooking::{CookingTimer, ServingScaler, StepNavigator, TimeScaling};
pub use error::{PlannerError, Result};
pub use grocery::{
    ConsolidatedIngredient, GroceryIngredient, IngredientExtractor, ListConsolidator, ListGroup,
    Organization, StoreOrganizer,
};
pub use meal_plan::{
    MealPlan, MealPlanDay, MealPlanGenerator, MealPlanRequest, NutritionSummary, PlannedMeal,
    Relaxation,
};
pub use nutrition::{
    BalanceAnalysis, DailyTotals, FoodDiary, FoodEntry, GoalProgress, NutritionGoals,
};
