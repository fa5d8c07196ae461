//! # nutribot-catalog
//!
//! Read-only catalog for NutriBot: recipes, meal suggestions, foods with
//! nutrition data, guided cooking instructions, and the grocery-support
//! tables (aliases, unit conversions, store sections, substitutions).
//!
//! - **[`catalog`]** -- [`Catalog`] loading and the query surface.
//! - **[`model`]** -- Typed records mirroring the JSON data files.
//! - **[`meal_type`]** -- Canonical [`MealType`] tokens, normalized on load.
//! - **[`grocery`]** -- Alias, conversion, section and substitution lookups.
//! - **[`error`]** -- Load-time errors.
//!
//! A sample catalog is compiled in (see [`Catalog::embedded`]); a directory
//! with the same five files can be loaded instead via
//! [`Catalog::load_dir`].

pub mod catalog;
pub mod error;
pub mod grocery;
pub mod meal_type;
pub mod model;

pub use catalog::{Catalog, MealFilter, RecipeFilter};
pub use error::{CatalogError, CatalogResult};
pub use grocery::{GrocerySupport, StoreSection, Substitution, UnitConversions};
pub use meal_type::MealType;
pub use model::{
    CookingInstructions, CookingStep, Food, Macros, Meal, MealComponent, NutrientProfile, Recipe,
    RecipeIngredient, RecipeNutrition, ServingOption,
};
