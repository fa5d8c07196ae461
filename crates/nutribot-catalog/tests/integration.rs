//! Integration tests for the nutribot-catalog crate.
//!
//! These tests load the catalog the two ways the agent does (embedded and
//! from a data directory) and query it the way the journeys do.

use nutribot_catalog::{Catalog, CatalogError, MealFilter, MealType, RecipeFilter};

fn write(dir: &std::path::Path, file: &str, body: &str) {
    std::fs::write(dir.join(file), body).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════
//  Loading
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn load_dir_reads_all_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "recipes.json",
        r#"{"recipes": [{"id": "r1", "name": "Tomato Soup", "cuisine": "American",
            "ingredients": [{"name": "tomatoes", "amount": 4, "unit": "piece"}]}]}"#,
    );
    write(
        dir.path(),
        "meals.json",
        r#"{"meal_suggestions": [{"id": "m1", "name": "Soup Bowl", "meal_type": ["Snacks"], "calories": 150}]}"#,
    );
    write(
        dir.path(),
        "foods.json",
        r#"{"foods": [{"id": "tomato", "name": "Tomato", "category": "vegetable",
            "per_100g": {"calories": 18, "protein": 0.9, "carbs": 3.9, "fat": 0.2}}]}"#,
    );
    write(
        dir.path(),
        "cooking_instructions.json",
        r#"{"cooking_instructions": [{"recipe_id": "r1", "estimated_active_time": 20,
            "steps": [{"step_number": 1, "phase": "cooking", "instruction": "Simmer."}]}]}"#,
    );
    write(
        dir.path(),
        "grocery_support.json",
        r#"{"ingredient_aliases": {"tomato": ["tomatoes"]}}"#,
    );

    let catalog = Catalog::load_dir(dir.path()).unwrap();
    assert_eq!(catalog.recipes().len(), 1);
    assert_eq!(catalog.meals()[0].meal_type, vec![MealType::Snack]);
    assert_eq!(catalog.food("tomato").unwrap().servings().len(), 2);
    assert_eq!(catalog.recipe_active_time("r1"), 20);
    assert_eq!(catalog.find_ingredient_by_alias("Tomatoes").as_deref(), Some("tomato"));
}

#[test]
fn load_dir_tolerates_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "meals.json",
        r#"{"meal_suggestions": [{"id": "m1", "name": "Toast", "meal_type": ["Breakfast"], "calories": 200}]}"#,
    );

    let catalog = Catalog::load_dir(dir.path()).unwrap();
    assert!(catalog.recipes().is_empty());
    assert!(catalog.foods().is_empty());
    assert_eq!(catalog.meals().len(), 1);
    assert!(catalog.cooking_instructions("anything").is_none());
}

#[test]
fn load_dir_reports_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "foods.json", r#"{"foods": [{"id": 7}]}"#);

    match Catalog::load_dir(dir.path()) {
        Err(CatalogError::Json { file, .. }) => assert_eq!(file, "foods.json"),
        other => panic!("expected a Json error, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Embedded sample data
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn embedded_data_supports_a_vegetarian_day() {
    let catalog = Catalog::embedded().unwrap();
    let vegetarian = vec!["vegetarian".to_string()];

    for meal_type in MealType::STANDARD {
        let filter = MealFilter::new()
            .with_meal_type(meal_type.clone())
            .with_dietary_tags(&vegetarian);
        assert!(
            !catalog.filter_meals(&filter).is_empty(),
            "no vegetarian {meal_type} in the sample data"
        );
    }
}

#[test]
fn every_food_id_referenced_by_meals_exists() {
    let catalog = Catalog::embedded().unwrap();
    for meal in catalog.meals() {
        for component in &meal.components {
            if let Some(food_id) = &component.food_id {
                assert!(
                    catalog.food(food_id).is_some(),
                    "{} references unknown food {food_id}",
                    meal.id
                );
            }
        }
    }
}

#[test]
fn cookable_recipes_have_numbered_steps() {
    let catalog = Catalog::embedded().unwrap();
    let cookable = catalog.cookable_recipes();
    assert!(!cookable.is_empty());

    for recipe in cookable {
        let instructions = catalog.cooking_instructions(&recipe.id).unwrap();
        let numbers: Vec<u32> = instructions.steps.iter().map(|s| s.step_number).collect();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected, "{} steps are not 1..n", recipe.id);
    }
}

#[test]
fn grocery_sections_cover_food_categories() {
    let catalog = Catalog::embedded().unwrap();
    let produce = catalog.map_category_to_store_section("vegetable");
    assert_eq!(produce.section_id, "produce");
    assert_eq!(produce.order, 1);

    let protein = catalog.map_category_to_store_section(
        catalog.food_category("chicken_breast").unwrap(),
    );
    assert_eq!(protein.section_id, "meat_seafood");
}

#[test]
fn vegan_butter_substitutes_are_filtered() {
    let catalog = Catalog::embedded().unwrap();
    let subs = catalog.substitutions_for("butter", &["vegan".to_string()]);
    assert!(!subs.is_empty());
    assert!(subs.iter().all(|s| s.dietary_tags.iter().any(|t| t == "vegan")));
}

#[test]
fn quick_vegetarian_recipes() {
    let catalog = Catalog::embedded().unwrap();
    let filter = RecipeFilter::new()
        .with_dietary_tag("vegetarian")
        .with_max_prep_time(15);
    let hits = catalog.filter_recipes(&filter);
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|r| r.has_tag("vegetarian") && r.prep_time <= 15));
}
