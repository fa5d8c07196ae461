//! Raw ingredient extraction from recipes, meal plans and free text.

use nutribot_catalog::{Catalog, Recipe};
use tracing::debug;

use super::{GroceryIngredient, MANUAL_SOURCE};
use crate::meal_plan::MealPlanDay;

/// Pulls raw grocery lines out of catalog data.
pub struct IngredientExtractor<'a> {
    catalog: &'a Catalog,
}

impl<'a> IngredientExtractor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Every ingredient of every known recipe, amounts multiplied by
    /// `multiplier`.  Unknown ids are skipped.
    pub fn from_recipes(&self, recipe_ids: &[String], multiplier: f64) -> Vec<GroceryIngredient> {
        recipe_ids
            .iter()
            .filter_map(|id| {
                let recipe = self.catalog.recipe(id);
                if recipe.is_none() {
                    debug!(recipe_id = %id, "skipping unknown recipe");
                }
                recipe
            })
            .flat_map(|recipe| from_recipe(recipe, multiplier))
            .collect()
    }

    /// Components of every meal on the given plan days.
    pub fn from_meal_plan(&self, days: &[MealPlanDay], multiplier: f64) -> Vec<GroceryIngredient> {
        days.iter()
            .flat_map(|day| {
                day.meals.iter().flat_map(move |planned| {
                    planned.meal.components.iter().map(move |c| GroceryIngredient {
                        name: c.name.clone(),
                        amount: c.amount * multiplier,
                        unit: c.unit.clone(),
                        source: format!("meal_plan:{}:{}", day.label, planned.meal_type),
                        food_id: c.food_id.clone(),
                        canonical_name: None,
                    })
                })
            })
            .collect()
    }

    /// Parse a comma, semicolon or newline separated list typed by the
    /// user.  Names the catalog recognizes are canonicalized immediately.
    pub fn from_manual(&self, text: &str) -> Vec<GroceryIngredient> {
        text.split([',', ';', '\n'])
            .filter_map(parse_ingredient_text)
            .map(|mut item| {
                item.canonical_name = self.catalog.find_ingredient_by_alias(&item.name);
                item
            })
            .collect()
    }
}

/// Lines for one recipe, tagged `recipe:{name}`.
pub fn from_recipe(recipe: &Recipe, multiplier: f64) -> Vec<GroceryIngredient> {
    recipe
        .ingredients
        .iter()
        .map(|i| GroceryIngredient {
            name: i.name.clone(),
            amount: i.amount * multiplier,
            unit: i.unit.clone(),
            source: format!("recipe:{}", recipe.name),
            food_id: i.food_id.clone(),
            canonical_name: None,
        })
        .collect()
}

/// Parse one free-text line.
///
/// - `"2 lbs chicken breast"` -- amount, known unit, name;
/// - `"3 onions"` -- amount and name, unit `piece`;
/// - `"salt"` -- amount 1, unit `item`.
///
/// A unit is only recognized from a fixed vocabulary, so `"2 red onions"`
/// keeps "red" in the name.
pub fn parse_ingredient_text(text: &str) -> Option<GroceryIngredient> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let digits = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let amount = text[..digits].parse::<f64>().ok().filter(|_| digits > 0);

    let (name, amount, unit) = match amount {
        None => (text.to_string(), 1.0, "item"),
        Some(amount) => {
            let rest = text[digits..].trim_start();
            if rest.is_empty() {
                return None;
            }
            let (first, remainder) = rest
                .split_once(char::is_whitespace)
                .map(|(f, r)| (f, r.trim()))
                .unwrap_or((rest, ""));
            match normalize_unit(first) {
                Some(unit) if !remainder.is_empty() => (remainder.to_string(), amount, unit),
                _ => (rest.to_string(), amount, "piece"),
            }
        }
    };

    Some(GroceryIngredient {
        name,
        amount,
        unit: unit.to_string(),
        source: MANUAL_SOURCE.to_string(),
        food_id: None,
        canonical_name: None,
    })
}

/// Canonical spelling of a unit token, if it is one.
pub fn normalize_unit(token: &str) -> Option<&'static str> {
    let unit = match token.trim().trim_end_matches('.').to_lowercase().as_str() {
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "oz" | "ounce" | "ounces" => "oz",
        "g" | "gram" | "grams" => "g",
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => "kg",
        "cup" | "cups" => "cup",
        "tbsp" | "tbs" | "tablespoon" | "tablespoons" => "tbsp",
        "tsp" | "teaspoon" | "teaspoons" => "tsp",
        "ml" | "milliliter" | "milliliters" => "ml",
        "l" | "liter" | "liters" | "litre" | "litres" => "l",
        "gallon" | "gallons" => "gallon",
        "quart" | "quarts" => "quart",
        "piece" | "pieces" | "pcs" => "piece",
        "item" | "items" => "item",
        "clove" | "cloves" => "clove",
        "can" | "cans" => "can",
        "bunch" | "bunches" => "bunch",
        "dozen" => "dozen",
        _ => return None,
    };
    Some(unit)
}

#[cfg(test)]
mod tests {
    use nutribot_catalog::{Macros, Meal, MealComponent, MealType};

    use super::*;
    use crate::meal_plan::PlannedMeal;

    #[test]
    fn parse_amount_unit_name() {
        let item = parse_ingredient_text("2 lbs chicken breast").unwrap();
        assert_eq!((item.name.as_str(), item.amount, item.unit.as_str()), ("chicken breast", 2.0, "lb"));
        assert_eq!(item.source, MANUAL_SOURCE);

        let item = parse_ingredient_text("1.5kg potatoes").unwrap();
        assert_eq!((item.amount, item.unit.as_str()), (1.5, "kg"));
    }

    #[test]
    fn parse_amount_without_unit() {
        let item = parse_ingredient_text("2 red onions").unwrap();
        assert_eq!((item.name.as_str(), item.amount, item.unit.as_str()), ("red onions", 2.0, "piece"));
        // A unit word with nothing after it is the name.
        let item = parse_ingredient_text("3 cans").unwrap();
        assert_eq!((item.name.as_str(), item.unit.as_str()), ("cans", "piece"));
    }

    #[test]
    fn parse_bare_name() {
        let item = parse_ingredient_text("  sea salt ").unwrap();
        assert_eq!((item.name.as_str(), item.amount, item.unit.as_str()), ("sea salt", 1.0, "item"));
        assert!(parse_ingredient_text("   ").is_none());
        assert!(parse_ingredient_text("4").is_none());
    }

    #[test]
    fn manual_list_splits_and_canonicalizes() {
        let catalog = Catalog::embedded().unwrap();
        let extractor = IngredientExtractor::new(&catalog);
        let items = extractor.from_manual("1 lb chicken breast; milk\n\n2 cups rice, ");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].canonical_name.as_deref(), Some("chicken_breast"));
        assert_eq!(items[1].canonical_name.as_deref(), Some("milk"));
        assert_eq!(items[2].unit, "cup");
    }

    #[test]
    fn recipe_lines_are_scaled_and_tagged() {
        let catalog = Catalog::embedded().unwrap();
        let extractor = IngredientExtractor::new(&catalog);
        let recipe = &catalog.recipes()[0];
        let lines = extractor.from_recipes(&[recipe.id.clone(), "nope".into()], 2.0);
        assert_eq!(lines.len(), recipe.ingredients.len());
        assert_eq!(lines[0].amount, recipe.ingredients[0].amount * 2.0);
        assert_eq!(lines[0].source, format!("recipe:{}", recipe.name));
    }

    #[test]
    fn meal_plan_lines_carry_day_and_slot() {
        let catalog = Catalog::embedded().unwrap();
        let meal = Meal {
            id: "bowl".into(),
            name: "Bowl".into(),
            description: String::new(),
            meal_type: vec![MealType::Lunch],
            calories: 500,
            prep_time: 10,
            dietary_tags: Vec::new(),
            nutrition: Macros::default(),
            components: vec![MealComponent {
                name: "quinoa".into(),
                amount: 1.0,
                unit: "cup".into(),
                food_id: Some("quinoa".into()),
            }],
            is_placeholder: false,
        };
        let days = vec![MealPlanDay {
            label: "Day 2".into(),
            meals: vec![PlannedMeal {
                meal_type: MealType::Lunch,
                meal,
            }],
        }];
        let lines = IngredientExtractor::new(&catalog).from_meal_plan(&days, 1.5);
        assert_eq!(lines[0].source, "meal_plan:Day 2:lunch");
        assert_eq!(lines[0].amount, 1.5);
    }
}
