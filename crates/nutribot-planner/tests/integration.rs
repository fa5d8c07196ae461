//! Integration tests for the nutribot-planner crate.
//!
//! These tests run the planning algorithms against the embedded sample
//! catalog, end to end: plan generation, then a grocery list built from the
//! plan, then store organization.

use std::collections::HashSet;

use nutribot_catalog::{Catalog, MealType};
use nutribot_planner::grocery::{GroceryIngredient, MANUAL_SOURCE};
use nutribot_planner::{
    IngredientExtractor, ListConsolidator, MealPlanGenerator, MealPlanRequest, Organization,
    StoreOrganizer,
};

fn catalog() -> Catalog {
    Catalog::embedded().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
//  Meal plans
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn two_day_vegetarian_plan_fills_every_slot() {
    let catalog = catalog();
    let request = MealPlanRequest::new(2, vec![MealType::Breakfast, MealType::Lunch], 1500)
        .with_dietary_restrictions(vec!["vegetarian".into()]);

    let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();

    assert_eq!(plan.days.len(), 2);
    assert_eq!(plan.slot_count(), 4);
    assert_eq!(plan.days[0].label, "Day 1");
    for day in &plan.days {
        let types: Vec<&MealType> = day.meals.iter().map(|m| &m.meal_type).collect();
        assert_eq!(types, vec![&MealType::Breakfast, &MealType::Lunch]);
        for planned in &day.meals {
            assert!(
                planned.meal.is_placeholder || planned.meal.has_tag("vegetarian"),
                "{} is not vegetarian",
                planned.meal.id
            );
        }
    }
}

#[test]
fn slot_count_is_days_times_meal_types() {
    let catalog = catalog();
    let generator = MealPlanGenerator::new(&catalog);
    for days in [1, 3, 7] {
        let request = MealPlanRequest::new(days, MealType::STANDARD.to_vec(), 2000);
        let plan = generator.generate(&request).unwrap();
        assert_eq!(plan.slot_count(), days as usize * 4);
    }
}

#[test]
fn placeholders_only_when_nothing_qualifies() {
    let catalog = catalog();
    let generator = MealPlanGenerator::new(&catalog);

    let feasible = MealPlanRequest::new(3, MealType::STANDARD.to_vec(), 1800);
    assert_eq!(generator.generate(&feasible).unwrap().placeholder_count(), 0);

    let impossible = MealPlanRequest::new(1, vec![MealType::Dinner], 1800)
        .with_dietary_restrictions(vec!["vegan".into(), "keto_friendly".into(), "nut_free_moon_rock".into()]);
    let plan = generator.generate(&impossible).unwrap();
    assert_eq!(plan.placeholder_count(), 1);
    assert_eq!(plan.days[0].meals[0].meal.id, "placeholder_dinner_1");
}

#[test]
fn no_duplicate_within_a_day_when_alternatives_exist() {
    let catalog = catalog();
    let request = MealPlanRequest::new(5, vec![MealType::Lunch, MealType::Dinner], 2000);
    let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
    for day in &plan.days {
        let ids: HashSet<&str> = day.meals.iter().map(|m| m.meal.id.as_str()).collect();
        assert_eq!(ids.len(), day.meals.len(), "{} repeats a meal", day.label);
    }
}

#[test]
fn regenerate_prefers_different_meals() {
    let catalog = catalog();
    let generator = MealPlanGenerator::new(&catalog);
    let request = MealPlanRequest::new(1, vec![MealType::Breakfast], 2000);
    let first = generator.generate(&request).unwrap();
    let second = generator.regenerate(&request, &first).unwrap();
    assert_ne!(first.days[0].meals[0].meal.id, second.days[0].meals[0].meal.id);
}

#[test]
fn generation_is_deterministic() {
    let catalog = catalog();
    let generator = MealPlanGenerator::new(&catalog);
    let request = MealPlanRequest::new(4, MealType::STANDARD.to_vec(), 2200).with_max_prep_time(30);
    assert_eq!(generator.generate(&request).unwrap(), generator.generate(&request).unwrap());
}

// ═══════════════════════════════════════════════════════════════════════
//  Grocery lists
// ═══════════════════════════════════════════════════════════════════════

fn manual(name: &str, amount: f64, unit: &str) -> GroceryIngredient {
    GroceryIngredient {
        name: name.into(),
        amount,
        unit: unit.into(),
        source: MANUAL_SOURCE.into(),
        food_id: None,
        canonical_name: None,
    }
}

#[test]
fn chicken_aliases_merge_into_one_line() {
    let catalog = catalog();
    let merged = ListConsolidator::new(&catalog).consolidate(&[
        manual("chicken breast", 1.0, "lb"),
        manual("grilled chicken breast", 0.5, "lb"),
    ]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].canonical_name, "chicken_breast");
    assert_eq!(merged[0].amount, 1.5);
    assert_eq!(merged[0].unit, "lb");
    assert_eq!(merged[0].display_name, "grilled chicken breast");
}

#[test]
fn canonicalization_is_pure() {
    let catalog = catalog();
    let consolidator = ListConsolidator::new(&catalog);
    let item = manual("Roma Tomatoes", 2.0, "piece");
    assert_eq!(consolidator.canonical_name(&item), consolidator.canonical_name(&item));
    assert_eq!(consolidator.canonical_name(&item), "tomato");
}

#[test]
fn plan_to_organized_list() {
    let catalog = catalog();
    let request = MealPlanRequest::new(3, MealType::STANDARD.to_vec(), 2000);
    let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();

    let raw = IngredientExtractor::new(&catalog).from_meal_plan(&plan.days, 1.0);
    assert!(!raw.is_empty());

    let consolidator = ListConsolidator::new(&catalog);
    let merged = consolidator.consolidate(&raw);
    assert!(merged.len() <= raw.len());
    assert_eq!(merged.iter().map(|i| i.original_count).sum::<usize>(), raw.len());
    assert_eq!(consolidator.consolidate(&merged), merged);

    let groups = StoreOrganizer::new(&catalog).organize(&merged, Organization::StoreSections);
    assert_eq!(groups.iter().map(|g| g.items.len()).sum::<usize>(), merged.len());

    // The catch-all aisle may sort last, so only real aisles are checked.
    let orders: Vec<u32> = groups
        .iter()
        .filter(|g| g.title != "Pantry & Grains")
        .map(|g| {
            catalog
                .grocery()
                .store_sections
                .values()
                .find(|s| s.display_name == g.title)
                .map(|s| s.order)
                .unwrap_or(u32::MAX)
        })
        .collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[test]
fn recipes_and_manual_items_share_lines() {
    let catalog = catalog();
    let extractor = IngredientExtractor::new(&catalog);
    let mut raw = extractor.from_recipes(&["chicken_tacos".to_string()], 1.0);
    raw.extend(extractor.from_manual("8 oz chicken, 2 avocados"));

    let merged = ListConsolidator::new(&catalog).consolidate(&raw);
    let chicken = merged.iter().find(|i| i.canonical_name == "chicken_breast").unwrap();
    assert_eq!(chicken.unit, "lb");
    assert!((chicken.amount - 2.0).abs() < 1e-9);
    assert_eq!(chicken.sources.len(), 2);
}
