//! Integration tests for the nutribot-agent crate.
//!
//! Whole conversations driven through [`Orchestrator::handle`], the way a
//! chat channel drives them: classification, journey runs, hand-offs
//! between journeys through context memory, and session isolation.

use std::sync::Arc;

use nutribot_agent::{AgentConfig, Orchestrator};
use nutribot_catalog::Catalog;
use nutribot_kernel::JourneyKind;
use nutribot_planner::nutrition::FoodDiary;
use nutribot_store::memory::keys;

fn orchestrator() -> Orchestrator {
    let catalog = Arc::new(Catalog::embedded().unwrap());
    Orchestrator::new(catalog, AgentConfig::default()).unwrap()
}

/// Send each line in turn and return the replies.
fn chat(bot: &Orchestrator, session_id: &str, lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| bot.handle(session_id, line)).collect()
}

// ═══════════════════════════════════════════════════════════════════════
//  Routing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn each_example_phrase_reaches_its_journey() {
    let cases = [
        ("guide me through cooking lasagna", JourneyKind::CookingGuidance),
        ("plan my meals for the week", JourneyKind::MealPlanning),
        ("find me a recipe", JourneyKind::RecipeDiscovery),
        ("log my food", JourneyKind::FoodCalorieTracking),
        ("create a grocery list", JourneyKind::GroceryAssistance),
        ("I need low calorie meals", JourneyKind::CalorieMealRecommendation),
    ];
    let bot = orchestrator();
    for (text, kind) in cases {
        let id = bot.create_session();
        bot.handle(&id, text);
        assert_eq!(bot.session_summary(&id).unwrap().current_journey, Some(kind), "{text}");
    }
}

#[test]
fn active_journey_owns_the_input() {
    let bot = orchestrator();
    bot.handle("s", "find me a recipe");
    // Looks like a grocery request, but the recipe journey is waiting for a
    // discovery method.
    bot.handle("s", "create a grocery list");
    assert_eq!(
        bot.session_summary("s").unwrap().current_journey,
        Some(JourneyKind::RecipeDiscovery)
    );
}

#[test]
fn cancel_then_new_request() {
    let bot = orchestrator();
    let replies = chat(&bot, "s", &["find me a recipe", "cancel", "create a grocery list"]);
    assert!(replies[1].starts_with("I'm not sure what you'd like to do."));
    assert_eq!(
        bot.session_summary("s").unwrap().current_journey,
        Some(JourneyKind::GroceryAssistance)
    );
}

#[test]
fn sessions_are_isolated() {
    let bot = orchestrator();
    let a = bot.create_session();
    let b = bot.create_session();
    bot.handle(&a, "find me a recipe");
    bot.handle(&b, "log my food");

    assert_eq!(bot.store().count(), 2);
    assert_eq!(bot.session_summary(&a).unwrap().current_journey, Some(JourneyKind::RecipeDiscovery));
    assert_eq!(bot.session_summary(&b).unwrap().current_journey, Some(JourneyKind::FoodCalorieTracking));
}

// ═══════════════════════════════════════════════════════════════════════
//  Conversations
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn recipe_found_then_cooked() {
    let bot = orchestrator();
    let replies = chat(&bot, "s", &["find me a recipe", "1", "italian", "1", "1"]);
    assert!(replies[4].contains("start cooking"));

    let session = bot.session("s").unwrap();
    assert_eq!(session.current_journey, None);
    let picked: String = session.user_context.get_typed(keys::SELECTED_RECIPE).unwrap().unwrap();
    let name = bot.catalog().recipe(&picked).unwrap().name.clone();

    let reply = bot.handle("s", "help me cook this");
    assert!(reply.contains(&format!("SERVING SIZE SETUP - {name}")));
}

#[test]
fn logged_food_shows_up_in_the_diary() {
    let bot = orchestrator();
    let replies = chat(&bot, "s", &["log my food", "1", "banana", "1", "1", "snack"]);
    assert!(replies[5].contains("✅ **Food Logged Successfully!**"));
    assert_eq!(bot.session_summary("s").unwrap().current_journey, None);

    let diary: FoodDiary = bot
        .session("s")
        .unwrap()
        .user_context
        .get_typed(keys::FOOD_DIARY)
        .unwrap()
        .unwrap();
    assert_eq!(diary.entries.len(), 1);

    let replies = chat(&bot, "s", &["show my food diary", "2"]);
    assert!(replies[1].contains("• Calories: 105 / 2000"));
}

#[test]
fn saved_meal_plan_feeds_the_shopping_list() {
    let bot = orchestrator();
    let plan_inputs = [
        "create a meal plan",
        "1",
        "2",
        "1800",
        "vegetarian",
        "beginner, quick meals, 4 people",
        "yes",
        "approve",
        "5",
    ];
    let replies = chat(&bot, "s", &plan_inputs);
    assert!(replies[8].starts_with("✅ **MEAL PLAN SAVED SUCCESSFULLY!**"));

    let replies = chat(&bot, "s", &["make a grocery list", "2", "1"]);
    assert!(replies[2].starts_with("📅 Using 1 day(s) of your meal plan, scaled for 4 people."));
}

#[test]
fn conversation_history_records_both_sides() {
    let bot = orchestrator();
    chat(&bot, "s", &["hello", "find me a recipe"]);
    let session = bot.session("s").unwrap();
    let senders: Vec<_> = session
        .conversation_history
        .iter()
        .map(|m| serde_json::to_value(m.sender).unwrap())
        .collect();
    assert_eq!(senders, ["user", "bot", "user", "bot"]);
}
