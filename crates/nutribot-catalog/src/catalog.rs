//! The read-only catalog and its query surface.
//!
//! A [`Catalog`] is loaded once at startup (from the embedded sample data or
//! a directory of JSON files) and then only queried.  It is `Send + Sync`
//! and is shared between sessions behind an `Arc`.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::grocery::{GrocerySupport, StoreSection, Substitution};
use crate::meal_type::MealType;
use crate::model::{CookingInstructions, Food, Meal, Recipe};

// ═══════════════════════════════════════════════════════════════════════
//  Data files
// ═══════════════════════════════════════════════════════════════════════

pub const RECIPES_FILE: &str = "recipes.json";
pub const MEALS_FILE: &str = "meals.json";
pub const FOODS_FILE: &str = "foods.json";
pub const COOKING_FILE: &str = "cooking_instructions.json";
pub const GROCERY_FILE: &str = "grocery_support.json";

const EMBEDDED_RECIPES: &str = include_str!("../data/recipes.json");
const EMBEDDED_MEALS: &str = include_str!("../data/meals.json");
const EMBEDDED_FOODS: &str = include_str!("../data/foods.json");
const EMBEDDED_COOKING: &str = include_str!("../data/cooking_instructions.json");
const EMBEDDED_GROCERY: &str = include_str!("../data/grocery_support.json");

#[derive(Deserialize)]
struct RecipesFile {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Deserialize)]
struct MealsFile {
    #[serde(default)]
    meal_suggestions: Vec<Meal>,
}

#[derive(Deserialize)]
struct FoodsFile {
    #[serde(default)]
    foods: Vec<Food>,
}

#[derive(Deserialize)]
struct CookingFile {
    #[serde(default)]
    cooking_instructions: Vec<CookingInstructions>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Filters
// ═══════════════════════════════════════════════════════════════════════

/// Multi-criteria meal query.  Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealFilter {
    pub min_calories: Option<u32>,
    pub max_calories: Option<u32>,
    /// The meal must serve at least one of these slots.
    pub meal_types: Vec<MealType>,
    /// The meal must carry every one of these tags.
    pub dietary_tags: Vec<String>,
    pub max_prep_time: Option<u32>,
}

impl MealFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calories(mut self, min: u32, max: u32) -> Self {
        self.min_calories = Some(min);
        self.max_calories = Some(max);
        self
    }

    pub fn with_meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_types.push(meal_type);
        self
    }

    pub fn with_dietary_tags(mut self, tags: &[String]) -> Self {
        self.dietary_tags.extend(tags.iter().cloned());
        self
    }

    pub fn with_max_prep_time(mut self, minutes: u32) -> Self {
        self.max_prep_time = Some(minutes);
        self
    }

    /// Whether `meal` satisfies every set criterion.
    pub fn matches(&self, meal: &Meal) -> bool {
        self.min_calories.is_none_or(|min| meal.calories >= min)
            && self.max_calories.is_none_or(|max| meal.calories <= max)
            && (self.meal_types.is_empty() || self.meal_types.iter().any(|t| meal.serves(t)))
            && meal.has_all_tags(&self.dietary_tags)
            && self.max_prep_time.is_none_or(|max| meal.prep_time <= max)
    }
}

/// Multi-criteria recipe query.  Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub cuisine: Option<String>,
    pub dietary_tags: Vec<String>,
    pub max_prep_time: Option<u32>,
    /// When non-empty, at least 70% of the recipe's ingredients must match
    /// one of these (substring match).
    pub available_ingredients: Vec<String>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_dietary_tag(mut self, tag: impl Into<String>) -> Self {
        self.dietary_tags.push(tag.into());
        self
    }

    pub fn with_max_prep_time(mut self, minutes: u32) -> Self {
        self.max_prep_time = Some(minutes);
        self
    }

    pub fn with_ingredients(mut self, ingredients: &[String]) -> Self {
        self.available_ingredients.extend(ingredients.iter().cloned());
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.cuisine
            .as_ref()
            .is_none_or(|c| recipe.cuisine.eq_ignore_ascii_case(c))
            && self.dietary_tags.iter().all(|t| recipe.has_tag(t))
            && self.max_prep_time.is_none_or(|max| recipe.prep_time <= max)
            && (self.available_ingredients.is_empty()
                || ingredient_overlap(recipe, &self.available_ingredients) >= 0.7)
    }
}

/// Share of a recipe's ingredients covered by `available` (substring match).
fn ingredient_overlap(recipe: &Recipe, available: &[String]) -> f64 {
    if recipe.ingredients.is_empty() {
        return 0.0;
    }
    let available: Vec<String> = available.iter().map(|a| a.trim().to_lowercase()).collect();
    let matched = recipe
        .ingredients
        .iter()
        .filter(|ing| {
            let name = ing.name.to_lowercase();
            available.iter().any(|a| !a.is_empty() && name.contains(a.as_str()))
        })
        .count();
    matched as f64 / recipe.ingredients.len() as f64
}

// ═══════════════════════════════════════════════════════════════════════
//  Catalog
// ═══════════════════════════════════════════════════════════════════════

/// In-memory catalog of recipes, meals, foods, cooking instructions and
/// grocery-support tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    meals: Vec<Meal>,
    foods: Vec<Food>,
    cooking: Vec<CookingInstructions>,
    grocery: GrocerySupport,
}

impl Catalog {
    /// Build a catalog from already-parsed parts.
    pub fn from_parts(
        recipes: Vec<Recipe>,
        meals: Vec<Meal>,
        foods: Vec<Food>,
        cooking: Vec<CookingInstructions>,
        grocery: GrocerySupport,
    ) -> Self {
        Self {
            recipes,
            meals,
            foods,
            cooking,
            grocery,
        }
    }

    /// The sample catalog compiled into the binary.
    #[instrument]
    pub fn embedded() -> CatalogResult<Self> {
        let catalog = Self::from_json(
            EMBEDDED_RECIPES,
            EMBEDDED_MEALS,
            EMBEDDED_FOODS,
            EMBEDDED_COOKING,
            EMBEDDED_GROCERY,
        )?;
        catalog.log_loaded("embedded");
        Ok(catalog)
    }

    /// Load the five data files from `dir`.
    ///
    /// A missing file loads as empty with a warning; a file that exists but
    /// does not parse is an error.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(dir: impl AsRef<Path>) -> CatalogResult<Self> {
        let dir = dir.as_ref();
        let read = |file: &str| -> CatalogResult<Option<String>> {
            let path = dir.join(file);
            if !path.exists() {
                warn!(path = %path.display(), "catalog file not found, using empty data");
                return Ok(None);
            }
            std::fs::read_to_string(&path)
                .map(Some)
                .map_err(|source| CatalogError::Io { path, source })
        };

        let recipes: RecipesFile = parse_or_default(RECIPES_FILE, read(RECIPES_FILE)?)?;
        let meals: MealsFile = parse_or_default(MEALS_FILE, read(MEALS_FILE)?)?;
        let foods: FoodsFile = parse_or_default(FOODS_FILE, read(FOODS_FILE)?)?;
        let cooking: CookingFile = parse_or_default(COOKING_FILE, read(COOKING_FILE)?)?;
        let grocery: GrocerySupport = match read(GROCERY_FILE)? {
            Some(text) => parse(GROCERY_FILE, &text)?,
            None => GrocerySupport::default(),
        };

        let catalog = Self::from_parts(
            recipes.recipes,
            meals.meal_suggestions,
            foods.foods,
            cooking.cooking_instructions,
            grocery,
        );
        catalog.validate()?;
        catalog.log_loaded("directory");
        Ok(catalog)
    }

    /// Parse the five documents from strings.
    pub fn from_json(
        recipes: &str,
        meals: &str,
        foods: &str,
        cooking: &str,
        grocery: &str,
    ) -> CatalogResult<Self> {
        let recipes: RecipesFile = parse(RECIPES_FILE, recipes)?;
        let meals: MealsFile = parse(MEALS_FILE, meals)?;
        let foods: FoodsFile = parse(FOODS_FILE, foods)?;
        let cooking: CookingFile = parse(COOKING_FILE, cooking)?;
        let grocery: GrocerySupport = parse(GROCERY_FILE, grocery)?;

        let catalog = Self::from_parts(
            recipes.recipes,
            meals.meal_suggestions,
            foods.foods,
            cooking.cooking_instructions,
            grocery,
        );
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject duplicate ids, which would make id lookups ambiguous.
    fn validate(&self) -> CatalogResult<()> {
        check_unique("recipe", self.recipes.iter().map(|r| r.id.as_str()))?;
        check_unique("meal", self.meals.iter().map(|m| m.id.as_str()))?;
        check_unique("food", self.foods.iter().map(|f| f.id.as_str()))?;
        Ok(())
    }

    fn log_loaded(&self, source: &str) {
        info!(
            source,
            recipes = self.recipes.len(),
            meals = self.meals.len(),
            foods = self.foods.len(),
            cooking = self.cooking.len(),
            "catalog loaded"
        );
    }

    // ── recipes ──────────────────────────────────────────────────────

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes whose name contains `term`, case-insensitively.
    pub fn search_recipes_by_name(&self, term: &str) -> Vec<&Recipe> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.recipes
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term))
            .collect()
    }

    pub fn filter_recipes(&self, filter: &RecipeFilter) -> Vec<&Recipe> {
        let hits: Vec<&Recipe> = self.recipes.iter().filter(|r| filter.matches(r)).collect();
        debug!(?filter, hits = hits.len(), "filter_recipes");
        hits
    }

    /// Distinct cuisines, sorted.
    pub fn cuisine_types(&self) -> Vec<String> {
        sorted_distinct(self.recipes.iter().map(|r| r.cuisine.clone()))
    }

    /// Distinct recipe dietary tags, sorted.
    pub fn recipe_dietary_tags(&self) -> Vec<String> {
        sorted_distinct(self.recipes.iter().flat_map(|r| r.dietary_tags.iter().cloned()))
    }

    // ── meals ────────────────────────────────────────────────────────

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn meal(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    /// Meals satisfying every criterion of `filter`, in catalog order.
    pub fn filter_meals(&self, filter: &MealFilter) -> Vec<&Meal> {
        let hits: Vec<&Meal> = self.meals.iter().filter(|m| filter.matches(m)).collect();
        debug!(?filter, hits = hits.len(), "filter_meals");
        hits
    }

    /// Distinct meal dietary tags, sorted.
    pub fn meal_dietary_tags(&self) -> Vec<String> {
        sorted_distinct(self.meals.iter().flat_map(|m| m.dietary_tags.iter().cloned()))
    }

    /// Lowest and highest meal calories, if there are any meals.
    pub fn meal_calorie_range(&self) -> Option<(u32, u32)> {
        let min = self.meals.iter().map(|m| m.calories).min()?;
        let max = self.meals.iter().map(|m| m.calories).max()?;
        Some((min, max))
    }

    /// Meals most similar to `reference`, best first.
    ///
    /// Calorie distance (≤50: 3, ≤100: 2, ≤150: 1), one point per shared
    /// dietary tag, two per shared meal type.  Zero-score meals and the
    /// reference itself are excluded.
    pub fn find_similar_meals(&self, reference: &Meal, limit: usize) -> Vec<&Meal> {
        let mut scored: Vec<(&Meal, u32)> = self
            .meals
            .iter()
            .filter(|m| m.id != reference.id)
            .map(|m| {
                let diff = m.calories.abs_diff(reference.calories);
                let mut score = match diff {
                    0..=50 => 3,
                    51..=100 => 2,
                    101..=150 => 1,
                    _ => 0,
                };
                score += m
                    .dietary_tags
                    .iter()
                    .filter(|t| reference.dietary_tags.contains(t))
                    .count() as u32;
                score += 2 * m
                    .meal_type
                    .iter()
                    .filter(|t| reference.meal_type.contains(t))
                    .count() as u32;
                (m, score)
            })
            .filter(|(_, score)| *score > 0)
            .collect();

        // Stable sort keeps catalog order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().take(limit).map(|(m, _)| m).collect()
    }

    // ── foods ────────────────────────────────────────────────────────

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn food(&self, id: &str) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Foods whose name or a common name contains `term`.
    pub fn search_foods_by_name(&self, term: &str) -> Vec<&Food> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.foods
            .iter()
            .filter(|f| f.search_names().any(|n| n.contains(&term)))
            .collect()
    }

    /// Relevance-ranked food search used for diary logging.
    ///
    /// Name and common-name hits score exact (+10), prefix (+5) and
    /// per-word prefix (+3) bonuses, plus popularity (+0.5 per serving
    /// option) and a protein/dairy nudge (+1).  Category hits score half.
    /// Each food appears once, at its first-found score.
    pub fn search_foods_ranked(&self, query: &str, limit: usize) -> Vec<&Food> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(&Food, f64)> = Vec::new();
        for food in &self.foods {
            let name = food.name.to_lowercase();
            if name.contains(&query) {
                hits.push((food, match_score(&query, &name, food)));
            }
        }
        for food in &self.foods {
            for common in &food.common_names {
                let common = common.to_lowercase();
                if common.contains(&query) {
                    hits.push((food, match_score(&query, &common, food)));
                }
            }
        }
        for food in &self.foods {
            let category = food.category.to_lowercase();
            if category.contains(&query) {
                hits.push((food, match_score(&query, &category, food) * 0.5));
            }
        }

        let mut seen = BTreeSet::new();
        hits.retain(|(food, _)| seen.insert(food.id.clone()));
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.into_iter().take(limit).map(|(f, _)| f).collect()
    }

    pub fn foods_by_category(&self, category: &str) -> Vec<&Food> {
        self.foods
            .iter()
            .filter(|f| f.category.eq_ignore_ascii_case(category.trim()))
            .collect()
    }

    /// Foods carrying any of `tags`.  No tags means all foods.
    pub fn foods_by_dietary_tags(&self, tags: &[String]) -> Vec<&Food> {
        if tags.is_empty() {
            return self.foods.iter().collect();
        }
        self.foods
            .iter()
            .filter(|f| {
                tags.iter()
                    .any(|t| f.dietary_tags.iter().any(|ft| ft.eq_ignore_ascii_case(t)))
            })
            .collect()
    }

    /// Foods with at least `min_protein` grams of protein per 100 g.
    pub fn high_protein_foods(&self, min_protein: f64) -> Vec<&Food> {
        self.foods
            .iter()
            .filter(|f| f.per_100g.protein >= min_protein)
            .collect()
    }

    /// Foods with at most `max_calories` per 100 g.
    pub fn low_calorie_foods(&self, max_calories: f64) -> Vec<&Food> {
        self.foods
            .iter()
            .filter(|f| f.per_100g.calories <= max_calories)
            .collect()
    }

    /// Distinct food categories, sorted.
    pub fn food_categories(&self) -> Vec<String> {
        sorted_distinct(self.foods.iter().map(|f| f.category.clone()))
    }

    // ── cooking instructions ─────────────────────────────────────────

    pub fn cooking_instructions(&self, recipe_id: &str) -> Option<&CookingInstructions> {
        self.cooking.iter().find(|c| c.recipe_id == recipe_id)
    }

    /// Equipment for a recipe, empty when unknown.
    pub fn recipe_equipment(&self, recipe_id: &str) -> Vec<String> {
        self.cooking_instructions(recipe_id)
            .map(|c| c.equipment_needed.clone())
            .unwrap_or_default()
    }

    /// Estimated active minutes for a recipe, zero when unknown.
    pub fn recipe_active_time(&self, recipe_id: &str) -> u32 {
        self.cooking_instructions(recipe_id)
            .map(|c| c.estimated_active_time)
            .unwrap_or(0)
    }

    /// Recipes matching `term` that have guided instructions.
    pub fn search_recipes_for_cooking(&self, term: &str) -> Vec<&Recipe> {
        self.search_recipes_by_name(term)
            .into_iter()
            .filter(|r| self.cooking_instructions(&r.id).is_some())
            .collect()
    }

    /// All recipes that have guided instructions.
    pub fn cookable_recipes(&self) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| self.cooking_instructions(&r.id).is_some())
            .collect()
    }

    // ── grocery support ──────────────────────────────────────────────

    pub fn grocery(&self) -> &GrocerySupport {
        &self.grocery
    }

    pub fn find_ingredient_by_alias(&self, name: &str) -> Option<String> {
        self.grocery.find_ingredient_by_alias(name)
    }

    pub fn convert_unit(&self, ingredient: &str, amount: f64, from: &str, to: &str) -> f64 {
        self.grocery.convert_unit(ingredient, amount, from, to)
    }

    pub fn food_category(&self, food_id: &str) -> Option<&str> {
        self.food(food_id).map(|f| f.category.as_str())
    }

    pub fn map_category_to_store_section(&self, category: &str) -> StoreSection {
        self.grocery.map_category_to_store_section(category)
    }

    pub fn substitutions_for(&self, ingredient: &str, restrictions: &[String]) -> Vec<Substitution> {
        self.grocery.substitutions_for(ingredient, restrictions)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Helpers
// ═══════════════════════════════════════════════════════════════════════

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> CatalogResult<T> {
    serde_json::from_str(text).map_err(|source| CatalogError::Json {
        file: file.to_string(),
        source,
    })
}

fn parse_or_default<T: DeserializeOwned>(file: &str, text: Option<String>) -> CatalogResult<T> {
    parse(file, text.as_deref().unwrap_or("{}"))
}

fn check_unique<'a>(entity: &str, ids: impl Iterator<Item = &'a str>) -> CatalogResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::InvalidData(format!("duplicate {entity} id: {id}")));
        }
    }
    Ok(())
}

fn sorted_distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn match_score(query: &str, text: &str, food: &Food) -> f64 {
    let mut score = 0.0;
    if query == text {
        score += 10.0;
    }
    if text.starts_with(query) {
        score += 5.0;
    }
    score += 3.0 * text.split_whitespace().filter(|w| w.starts_with(query)).count() as f64;
    score += 0.5 * food.serving_options.len() as f64;
    if matches!(food.category.to_lowercase().as_str(), "protein" | "dairy") {
        score += 1.0;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::embedded().expect("embedded catalog parses")
    }

    #[test]
    fn embedded_catalog_loads() {
        let c = catalog();
        assert!(!c.recipes().is_empty());
        assert!(!c.meals().is_empty());
        assert!(!c.foods().is_empty());
        assert!(c.recipe("classic_lasagna").is_some());
    }

    #[test]
    fn meal_types_are_normalized_on_load() {
        let c = catalog();
        assert!(c.meals().iter().all(|m| !m.meal_type.is_empty()));
        assert!(
            c.meals()
                .iter()
                .all(|m| m.meal_type.iter().all(|t| !matches!(t, MealType::Other(_))))
        );
        let snacks = c.filter_meals(&MealFilter::new().with_meal_type(MealType::Snack));
        assert!(!snacks.is_empty());
    }

    #[test]
    fn meal_filter_combines_criteria() {
        let c = catalog();
        let filter = MealFilter::new()
            .with_calories(200, 450)
            .with_meal_type(MealType::Breakfast)
            .with_dietary_tags(&["vegetarian".to_string()])
            .with_max_prep_time(20);
        let hits = c.filter_meals(&filter);
        assert!(!hits.is_empty());
        for meal in hits {
            assert!((200..=450).contains(&meal.calories));
            assert!(meal.serves(&MealType::Breakfast));
            assert!(meal.has_tag("vegetarian"));
            assert!(meal.prep_time <= 20);
        }
    }

    #[test]
    fn recipe_filters() {
        let c = catalog();
        let italian = c.filter_recipes(&RecipeFilter::new().with_cuisine("ITALIAN"));
        assert!(italian.iter().all(|r| r.cuisine.eq_ignore_ascii_case("italian")));
        assert!(!italian.is_empty());

        let quick = c.filter_recipes(&RecipeFilter::new().with_max_prep_time(15));
        assert!(quick.iter().all(|r| r.prep_time <= 15));

        let names = c.search_recipes_by_name("lasagna");
        assert_eq!(names.len(), 1);
        assert!(c.search_recipes_by_name("  ").is_empty());
    }

    #[test]
    fn ingredient_overlap_needs_seventy_percent() {
        let c = catalog();
        let recipe = c.recipe("classic_lasagna").unwrap().clone();
        let all: Vec<String> = recipe.ingredients.iter().map(|i| i.name.clone()).collect();
        let hits = c.filter_recipes(&RecipeFilter::new().with_ingredients(&all));
        assert!(hits.iter().any(|r| r.id == recipe.id));

        let one = vec![all[0].clone()];
        let hits = c.filter_recipes(&RecipeFilter::new().with_ingredients(&one));
        assert!(!hits.iter().any(|r| r.id == recipe.id));
    }

    #[test]
    fn similar_meals_exclude_reference() {
        let c = catalog();
        let reference = c.meals()[0].clone();
        let similar = c.find_similar_meals(&reference, 5);
        assert!(similar.len() <= 5);
        assert!(similar.iter().all(|m| m.id != reference.id));
    }

    #[test]
    fn ranked_food_search_prefers_exact_names() {
        let c = catalog();
        let hits = c.search_foods_ranked("banana", 8);
        assert_eq!(hits.first().map(|f| f.id.as_str()), Some("banana"));
        assert!(c.search_foods_ranked("", 8).is_empty());
    }

    #[test]
    fn food_threshold_queries() {
        let c = catalog();
        assert!(c.high_protein_foods(15.0).iter().all(|f| f.per_100g.protein >= 15.0));
        assert!(c.low_calorie_foods(100.0).iter().all(|f| f.per_100g.calories <= 100.0));
        assert!(!c.high_protein_foods(15.0).is_empty());
        assert!(!c.low_calorie_foods(100.0).is_empty());
    }

    #[test]
    fn cooking_lookups() {
        let c = catalog();
        assert!(c.cooking_instructions("classic_lasagna").is_some());
        assert!(!c.recipe_equipment("classic_lasagna").is_empty());
        assert!(c.recipe_active_time("classic_lasagna") > 0);
        assert_eq!(c.recipe_active_time("unknown"), 0);
        assert_eq!(c.search_recipes_for_cooking("lasagna").len(), 1);
    }

    #[test]
    fn milk_cup_converts_to_240_ml() {
        let c = catalog();
        assert_eq!(c.convert_unit("milk", 1.0, "cup", "ml"), 240.0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let meals = r#"{"meal_suggestions": [
            {"id": "m1", "name": "A", "calories": 100},
            {"id": "m1", "name": "B", "calories": 200}
        ]}"#;
        let err = Catalog::from_json("{}", meals, "{}", "{}", "{}").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidData(_)));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let err = Catalog::from_json("{", "{}", "{}", "{}", "{}").unwrap_err();
        match err {
            CatalogError::Json { file, .. } => assert_eq!(file, RECIPES_FILE),
            other => panic!("expected Json error, got {other:?}"),
        }
    }
}
