//! Food diary logging.
//!
//! Steps 1-5 gather one entry (what, how much, which meal).  Logging it
//! runs steps 6-10 in a single reply: the entry's breakdown, the day's
//! progress, insights, goal status and pointers to other journeys.  The
//! journey completes after that reply.
//!
//! The diary itself lives in context memory under `food_diary` so later
//! runs (and other journeys) see every entry.

use nutribot_catalog::{Food, MealType, ServingOption};
use nutribot_kernel::JourneyKind;
use nutribot_planner::calorie::MacroPercentages;
use nutribot_planner::nutrition::{
    DailyTotals, FoodDiary, FoodEntry, GoalProgress, NutritionGoals, Progress, analyze_balance,
    parse_manual_entry, parse_portion, scale_serving, suggest_meal_type_now,
};
use nutribot_planner::text::integers;
use nutribot_store::memory::keys;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{is_leave_request, is_yes, mentions, normalized};

const SEARCH_LIMIT: usize = 8;
const RECENT_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    TrackingMode,
    EntryMethod,
    FoodIdentification,
    PortionSize,
    MealClassification,
    NutritionalAnalysis,
    DailyProgress,
    Insights,
    GoalAchievement,
    NextSteps,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::TrackingMode),
            2 => Some(Self::EntryMethod),
            3 => Some(Self::FoodIdentification),
            4 => Some(Self::PortionSize),
            5 => Some(Self::MealClassification),
            6 => Some(Self::NutritionalAnalysis),
            7 => Some(Self::DailyProgress),
            8 => Some(Self::Insights),
            9 => Some(Self::GoalAchievement),
            10 => Some(Self::NextSteps),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::TrackingMode => "Tracking Mode",
            Self::EntryMethod => "Entry Method",
            Self::FoodIdentification => "Food Identification",
            Self::PortionSize => "Portion Size",
            Self::MealClassification => "Meal Classification",
            Self::NutritionalAnalysis => "Nutritional Analysis",
            Self::DailyProgress => "Daily Progress",
            Self::Insights => "Insights",
            Self::GoalAchievement => "Goal Achievement",
            Self::NextSteps => "Next Steps",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Self::TrackingMode => {
                "Choose 1 to log a new food, 2 to see today's diary, or 3 to edit today's entries. While managing, type 'delete 2' to remove the second entry."
            }
            Self::EntryMethod => {
                "Choose 1 to search the food database, 2 to type the nutrition yourself, or 3 to pick from foods you logged before. You can also just type a food name."
            }
            Self::FoodIdentification => {
                "Type a food name to search (e.g., 'banana', 'greek yogurt'), a result number to pick it, or 'manual' to enter it yourself as 'Food name, calories, protein, carbs, fat'."
            }
            Self::PortionSize => {
                "Type the number of a serving option ('2'), or a quantity times an option ('1.5 x 3' means one and a half of option 3)."
            }
            Self::MealClassification => {
                "Type 1-4 or the meal name (breakfast, lunch, dinner, snack). Reply 'ok' to accept the suggestion."
            }
            _ => "Your food has been logged. Say 'restart' to log another one.",
        }
    }
}

/// How the food at step 3 is being identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EntryMode {
    Search,
    Manual,
    Recent,
}

/// The serving picked at step 4, already multiplied by its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Portion {
    serving: ServingOption,
    quantity: f64,
}

/// Calorie and macro tracking against daily goals.
pub struct FoodTracking;

impl Journey for FoodTracking {
    fn kind(&self) -> JourneyKind {
        JourneyKind::FoodCalorieTracking
    }

    fn start(&self, _ctx: &mut TurnContext<'_>) -> Result<String> {
        Ok(mode_prompt())
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let current = Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))?;

        match normalized(input).as_str() {
            "help" | "?" => {
                return Ok(Some(format!(
                    "🆘 **Help - {}**\n\n{}\n\nCommands: 'restart' starts over, 'quit' finishes tracking, 'cancel' leaves this journey.",
                    current.name(),
                    current.help()
                )));
            }
            "restart" | "start over" => {
                ctx.restart(self.kind());
                return Ok(Some(format!("🔄 Starting over.\n\n{}", mode_prompt())));
            }
            "quit" | "finish" | "done" => return Ok(Some(quit(ctx)?)),
            _ => {}
        }

        let reply = match current {
            Step::TrackingMode => tracking_mode(ctx, input)?,
            Step::EntryMethod => entry_method(ctx, input)?,
            Step::FoodIdentification => food_identification(ctx, input)?,
            Step::PortionSize => portion_size(ctx, input)?,
            Step::MealClassification => meal_classification(ctx, input)?,
            Step::NutritionalAnalysis
            | Step::DailyProgress
            | Step::Insights
            | Step::GoalAchievement
            | Step::NextSteps => quit(ctx)?,
        };
        Ok(Some(reply))
    }
}

fn diary(ctx: &TurnContext<'_>) -> Result<FoodDiary> {
    Ok(ctx.context(keys::FOOD_DIARY)?.unwrap_or_default())
}

fn goals() -> NutritionGoals {
    NutritionGoals::default()
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage / 10.0).round() as usize).min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn quit(ctx: &mut TurnContext<'_>) -> Result<String> {
    let totals = diary(ctx)?.totals_on(ctx.now.date_naive());
    let progress = goals().progress(&totals);
    ctx.complete();
    Ok(format!(
        "👋 **Food Tracking Complete!**\n\nToday so far: {} entries, {} calories ({:.0}% of your {:.0} calorie goal).\n\nCome back any time to log more food!",
        totals.entry_count, totals.calories, progress.calories.percentage, progress.calories.goal
    ))
}

// ═══════════════════════════════════════════════════════════════════════
//  Step 1: mode (log / view / manage)
// ═══════════════════════════════════════════════════════════════════════

fn mode_prompt() -> String {
    "🍎 **Food Calorie Tracking**\n\nWhat would you like to do?\n\n1. **Log New Food** - Add something you ate\n2. **View Food Diary** - See today's totals and progress\n3. **Manage Previous Logs** - Review or delete today's entries\n\nType a number, or 'help' at any time.".to_string()
}

fn tracking_mode(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);

    if let Some(rest) = text.strip_prefix("delete").or_else(|| text.strip_prefix("remove")) {
        return delete_entry(ctx, rest);
    }

    if text == "1" || mentions(&text, &["log", "add", "new"]) {
        ctx.advance(2);
        return Ok(entry_method_prompt());
    }
    if text == "2" || mentions(&text, &["view", "diary", "today", "progress", "summary"]) {
        return view_diary(ctx);
    }
    if text == "3" || mentions(&text, &["manage", "edit", "previous"]) {
        return manage_entries(ctx);
    }
    Ok(format!("Please choose 1, 2 or 3.\n\n{}", mode_prompt()))
}

fn view_diary(ctx: &TurnContext<'_>) -> Result<String> {
    let diary = diary(ctx)?;
    let today = ctx.now.date_naive();
    let entries = diary.entries_on(today);
    let footer = "\n\nReply '1' to log food, '3' to manage entries, or 'quit' to finish.";

    if entries.is_empty() {
        return Ok(format!(
            "📊 **Today's Food Diary**\n\nNo foods logged today yet.{footer}"
        ));
    }

    let totals = DailyTotals::from_entries(entries.iter().copied());
    let progress = goals().progress(&totals);
    let mut text = String::from("📊 **Today's Food Diary**\n\n**Daily Totals:**\n");
    text.push_str(&format!(
        "• Calories: {} / {:.0}\n• Protein: {:.1}g\n• Carbs: {:.1}g\n• Fat: {:.1}g\n",
        totals.calories, progress.calories.goal, totals.macros.protein, totals.macros.carbs, totals.macros.fat
    ));

    text.push_str("\n**Meals:**\n");
    for (meal_type, slot) in &totals.meal_breakdown {
        if slot.count > 0 {
            text.push_str(&format!(
                "• {}: {} item{}, {} cal\n",
                meal_type.label(),
                slot.count,
                if slot.count == 1 { "" } else { "s" },
                slot.calories
            ));
        }
    }

    text.push_str("\n**Recent Entries:**\n");
    for entry in entries.iter().rev().take(5) {
        text.push_str(&format!(
            "• {} {} ({}) - {} cal\n",
            entry.timestamp.format("%H:%M"),
            entry.food_name,
            entry.serving_description,
            entry.calories
        ));
    }

    text.push_str(&format!(
        "\n**Goal Progress:** {:.0}% - {}{footer}",
        progress.overall, progress.status
    ));
    Ok(text)
}

fn manage_entries(ctx: &TurnContext<'_>) -> Result<String> {
    let diary = diary(ctx)?;
    let entries = diary.entries_on(ctx.now.date_naive());
    if entries.is_empty() {
        return Ok("✏️ **Manage Food Entries**\n\nNo entries to manage today. Reply '1' to log new food.".to_string());
    }
    let mut text = String::from("✏️ **Manage Food Entries**\n\n");
    for (i, entry) in entries.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {} ({} cal, {})\n",
            i + 1,
            entry.food_name,
            entry.serving_description,
            entry.calories,
            entry.meal_type
        ));
    }
    text.push_str("\nType 'delete [number]' to remove an entry, or '1' to log new food.");
    Ok(text)
}

fn delete_entry(ctx: &mut TurnContext<'_>, rest: &str) -> Result<String> {
    let mut diary = diary(ctx)?;
    let today = ctx.now.date_naive();
    let count = diary.entries_on(today).len();
    let Some(&n) = integers(rest).first() else {
        return Ok("Type 'delete' followed by the entry number, e.g., 'delete 2'.".to_string());
    };

    let removed = (n as usize)
        .checked_sub(1)
        .and_then(|index| diary.remove_on(today, index));
    let Some(removed) = removed else {
        return Ok(if count == 0 {
            "There are no entries to delete today.".to_string()
        } else {
            format!("Please choose an entry between 1 and {count}.")
        });
    };

    info!(food = %removed.food_name, calories = removed.calories, "diary entry removed");
    ctx.set_context(keys::FOOD_DIARY, &diary)?;
    let totals = diary.totals_on(today);
    Ok(format!(
        "🗑️ Removed **{}** ({} cal).\n\nToday's total is now {} calories across {} entries.",
        removed.food_name, removed.calories, totals.calories, totals.entry_count
    ))
}

// ═══════════════════════════════════════════════════════════════════════
//  Steps 2-3: finding the food
// ═══════════════════════════════════════════════════════════════════════

fn entry_method_prompt() -> String {
    "🔍 **How to Add Your Food**\n\n1. **Search** - Find it in the food database\n2. **Manual Entry** - Type the nutrition facts yourself\n3. **Recent Foods** - Pick something you logged before\n\nChoose a method, or just type a food name to search.".to_string()
}

fn search_prompt() -> String {
    "🔎 **Search Food Database**\n\nWhat did you eat? Type a food name (e.g., 'banana', 'chicken', 'oats').".to_string()
}

fn manual_prompt() -> String {
    "📝 **Manual Food Entry**\n\nEnter the food in this format:\n`Food name, calories, protein(g), carbs(g), fat(g)`\n\nExample: `Protein Shake, 250, 30, 10, 5`\nOnly the name and calories are required.".to_string()
}

fn entry_method(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    ctx.advance(3);

    if text == "1" || text == "search" {
        ctx.record("entry_mode", &EntryMode::Search)?;
        return Ok(search_prompt());
    }
    if text == "2" || mentions(&text, &["manual", "custom", "enter"]) {
        ctx.record("entry_mode", &EntryMode::Manual)?;
        return Ok(manual_prompt());
    }
    if text == "3" || mentions(&text, &["recent", "previous", "again"]) {
        return recent_foods(ctx);
    }

    ctx.record("entry_mode", &EntryMode::Search)?;
    search(ctx, &text)
}

fn recent_foods(ctx: &mut TurnContext<'_>) -> Result<String> {
    let diary = diary(ctx)?;
    let recent = diary.recent_foods(RECENT_LIMIT);
    if recent.is_empty() {
        ctx.record("entry_mode", &EntryMode::Search)?;
        return Ok(format!("You haven't logged any foods yet.\n\n{}", search_prompt()));
    }

    let mut text = String::from("🕐 **Recent Foods**\n\n");
    for (i, entry) in recent.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {} ({} cal)\n",
            i + 1,
            entry.food_name,
            entry.serving_description,
            entry.calories
        ));
    }
    text.push_str("\nPick a number, or type a food name to search instead.");

    let foods: Vec<Food> = recent.iter().map(|e| food_for_entry(ctx, e)).collect();
    ctx.record("entry_mode", &EntryMode::Recent)?;
    ctx.record("candidates", &foods)?;
    Ok(text)
}

/// The catalog food behind a diary entry, or a one-serving stand-in for a
/// custom food.
fn food_for_entry(ctx: &TurnContext<'_>, entry: &FoodEntry) -> Food {
    if let Some(food) = ctx.catalog.food(&entry.food_id) {
        return food.clone();
    }
    let quantity = if entry.quantity > 0.0 { entry.quantity } else { 1.0 };
    let description = entry
        .serving_description
        .split_once(" x ")
        .map(|(_, d)| d.to_string())
        .unwrap_or_else(|| entry.serving_description.clone());
    let macros = entry.macros.scaled(1.0 / quantity);
    Food {
        id: entry.food_id.clone(),
        name: entry.food_name.clone(),
        category: "custom".to_string(),
        common_names: Vec::new(),
        dietary_tags: Vec::new(),
        allergens: Vec::new(),
        per_100g: Default::default(),
        serving_options: vec![ServingOption {
            id: entry.serving_id.clone(),
            description,
            weight_g: 100.0,
            calories: (f64::from(entry.calories) / quantity).round(),
            macros,
        }],
    }
}

fn food_identification(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let mode: EntryMode = ctx.decision("entry_mode")?.unwrap_or(EntryMode::Search);

    if mode != EntryMode::Manual && mentions(&text, &["manual"]) {
        ctx.record("entry_mode", &EntryMode::Manual)?;
        return Ok(manual_prompt());
    }

    match mode {
        EntryMode::Manual => manual_entry(ctx, input),
        EntryMode::Search | EntryMode::Recent => {
            if let Ok(n) = text.parse::<usize>() {
                let candidates: Vec<Food> = ctx.decision("candidates")?.unwrap_or_default();
                return match n.checked_sub(1).and_then(|i| candidates.into_iter().nth(i)) {
                    Some(food) => select_food(ctx, food),
                    None => Ok("Please pick one of the numbers shown, or type a food name to search.".to_string()),
                };
            }
            if text.is_empty() {
                return Ok(search_prompt());
            }
            ctx.record("entry_mode", &EntryMode::Search)?;
            search(ctx, &text)
        }
    }
}

fn search(ctx: &mut TurnContext<'_>, query: &str) -> Result<String> {
    let catalog = ctx.catalog;
    let hits = catalog.search_foods_ranked(query, SEARCH_LIMIT);
    if hits.is_empty() {
        ctx.forget("candidates")?;
        return Ok(format!(
            "🔍 No foods found matching your search '{query}'.\n\nSearch again or type 'manual' for manual entry."
        ));
    }

    let mut text = format!("🔍 **Search Results for '{query}'**\n\n");
    for (i, food) in hits.iter().enumerate() {
        let macros = food.per_100g.macros();
        text.push_str(&format!(
            "{}. **{}** ({})\n   ~{:.0} cal/100g, {:.1}g protein, {} serving option{}\n",
            i + 1,
            food.name,
            food.category,
            food.per_100g.calories,
            macros.protein,
            food.servings().len(),
            if food.servings().len() == 1 { "" } else { "s" }
        ));
    }
    text.push_str("\nPick a number, search again, or type 'manual' for manual entry.");

    let foods: Vec<Food> = hits.into_iter().cloned().collect();
    ctx.record("candidates", &foods)?;
    Ok(text)
}

fn manual_entry(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(food) = parse_manual_entry(input, ctx.now) else {
        return Ok(format!(
            "I couldn't read that entry.\n\n{}",
            manual_prompt()
        ));
    };
    let serving = food.servings().into_iter().next().unwrap_or_else(|| ServingOption {
        id: "serving_custom".to_string(),
        description: "As entered".to_string(),
        weight_g: 100.0,
        calories: food.per_100g.calories,
        macros: food.per_100g.macros(),
    });

    let header = format!(
        "✅ **Custom Food Added**\n\n**{}**: {:.0} cal, {:.1}g protein, {:.1}g carbs, {:.1}g fat",
        food.name, serving.calories, serving.macros.protein, serving.macros.carbs, serving.macros.fat
    );
    ctx.record("food", &food)?;
    ctx.record(
        "portion",
        &Portion {
            serving,
            quantity: 1.0,
        },
    )?;
    ctx.advance(5);
    Ok(format!("{header}\n\n{}", meal_prompt(ctx)))
}

// ═══════════════════════════════════════════════════════════════════════
//  Steps 4-5: portion and meal
// ═══════════════════════════════════════════════════════════════════════

fn select_food(ctx: &mut TurnContext<'_>, food: Food) -> Result<String> {
    let prompt = portion_prompt(&food);
    ctx.record("food", &food)?;
    ctx.advance(4);
    Ok(prompt)
}

fn portion_prompt(food: &Food) -> String {
    let mut text = format!("🥄 **Portion Size for {}**\n\n", food.name);
    for (i, serving) in food.servings().iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {:.0} cal, {:.1}g protein\n",
            i + 1,
            serving.description,
            serving.calories,
            serving.macros.protein
        ));
    }
    text.push_str("\nType a number ('2'), or a quantity times an option ('1.5 x 3' or '0.5 x 1').");
    text
}

fn portion_size(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let food: Food = ctx.require_decision("food")?;
    let servings = food.servings();

    match parse_portion(input, servings.len()) {
        Ok(picked) => {
            let serving = scale_serving(&servings[picked.index], picked.quantity);
            ctx.record(
                "portion",
                &Portion {
                    serving,
                    quantity: picked.quantity,
                },
            )?;
            ctx.advance(5);
            Ok(meal_prompt(ctx))
        }
        Err(e) => Ok(format!("{e}\n\n{}", portion_prompt(&food))),
    }
}

fn meal_prompt(ctx: &TurnContext<'_>) -> String {
    let suggested = suggest_meal_type_now(ctx.now);
    let mut text = String::from("🍽️ **Meal Classification**\n\nWhich meal was this?\n\n");
    for (i, meal_type) in MealType::STANDARD.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, meal_type.label()));
    }
    text.push_str(&format!(
        "\nBased on the time, I'd suggest **{}**. Reply 'ok' to accept it or choose another.",
        suggested.label()
    ));
    text
}

fn parse_meal_type(ctx: &TurnContext<'_>, input: &str) -> Option<MealType> {
    let text = normalized(input);
    if text.is_empty() || is_yes(&text) {
        return Some(suggest_meal_type_now(ctx.now));
    }
    if let Ok(n) = text.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| MealType::STANDARD.get(i)).cloned();
    }
    match MealType::parse(&text) {
        MealType::Other(_) => None,
        meal_type => Some(meal_type),
    }
}

fn meal_classification(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(meal_type) = parse_meal_type(ctx, input) else {
        return Ok(format!("Please choose 1-4 or a meal name.\n\n{}", meal_prompt(ctx)));
    };
    let food: Food = ctx.require_decision("food")?;
    let portion: Portion = ctx.require_decision("portion")?;

    let entry = FoodEntry::new(&food, &portion.serving, portion.quantity, meal_type, ctx.now);
    let mut diary = diary(ctx)?;
    diary.add(entry.clone());
    ctx.set_context(keys::FOOD_DIARY, &diary)?;
    info!(food = %entry.food_name, calories = entry.calories, meal = %entry.meal_type, "food logged");

    let today = ctx.now.date_naive();
    let totals = diary.totals_on(today);
    let progress = goals().progress(&totals);

    let mut sections = Vec::with_capacity(5);
    ctx.advance(6);
    sections.push(logged_summary(&entry));
    ctx.advance(7);
    sections.push(daily_progress(&totals, &progress));
    ctx.advance(8);
    sections.push(insights(&totals, &progress));
    ctx.advance(9);
    sections.push(goal_achievement(&totals, &progress));
    ctx.advance(10);
    sections.push(next_steps(&diary, &totals, &progress));
    ctx.complete();

    Ok(sections.join("\n\n"))
}

// ═══════════════════════════════════════════════════════════════════════
//  Steps 6-10: the report
// ═══════════════════════════════════════════════════════════════════════

fn logged_summary(entry: &FoodEntry) -> String {
    let pct = MacroPercentages::of(&entry.macros, entry.calories);
    format!(
        "✅ **Food Logged Successfully!**\n\n**{}** - {}\nMeal: {}\n\n📊 **Nutritional Breakdown:**\n• Calories: {}\n• Protein: {:.1}g\n• Carbs: {:.1}g\n• Fat: {:.1}g\n• Fiber: {:.1}g\n\n⚖️ **Macro Balance:** Protein {:.0}% | Carbs {:.0}% | Fat {:.0}%",
        entry.food_name,
        entry.serving_description,
        entry.meal_type.label(),
        entry.calories,
        entry.macros.protein,
        entry.macros.carbs,
        entry.macros.fat,
        entry.macros.fiber,
        pct.protein,
        pct.carbs,
        pct.fat
    )
}

fn daily_progress(totals: &DailyTotals, progress: &GoalProgress) -> String {
    let mut text = format!(
        "📈 **Updated Daily Progress**\n\n🔥 Calories: {}/{:.0} ({:.0}%)\n💪 Protein: {:.1}/{:.0}g\n🍞 Carbs: {:.1}/{:.0}g\n🥑 Fat: {:.1}/{:.0}g\n",
        totals.calories,
        progress.calories.goal,
        progress.calories.percentage,
        totals.macros.protein,
        progress.protein.goal,
        totals.macros.carbs,
        progress.carbs.goal,
        totals.macros.fat,
        progress.fat.goal
    );
    for (meal_type, slot) in &totals.meal_breakdown {
        if slot.count > 0 {
            text.push_str(&format!("\n{}: {} cal", meal_type.label(), slot.calories));
        }
    }
    text.push_str(&format!("\n\n{}", progress.status));
    text
}

fn insights(totals: &DailyTotals, progress: &GoalProgress) -> String {
    let balance = analyze_balance(totals);
    let mut text = format!(
        "💡 **Personalized Insights**\n\n**Nutrition Balance Score:** {}/100\n",
        balance.score
    );
    for insight in &balance.insights {
        text.push_str(&format!("• {insight}\n"));
    }
    if !balance.recommendations.is_empty() {
        text.push_str("\n**Recommendations:**\n");
        for rec in &balance.recommendations {
            text.push_str(&format!("• {rec}\n"));
        }
    }
    text.push_str("\n🎯 **Goal-Based Tips:**\n");
    for tip in progress.recommendations() {
        text.push_str(&format!("• {tip}\n"));
    }
    text.trim_end().to_string()
}

fn goal_line(label: &str, progress: &Progress, unit: &str) -> String {
    let tail = if progress.remaining <= 0.0 {
        "✅ Goal reached!".to_string()
    } else {
        format!("{:.0}{unit} remaining", progress.remaining)
    };
    format!("{label}: {} {:.0}% ({tail})", bar(progress.percentage), progress.percentage)
}

fn goal_achievement(totals: &DailyTotals, progress: &GoalProgress) -> String {
    let mut text = String::from("🏆 **Goal Achievement Status**\n\n");
    text.push_str(&goal_line("Calories", &progress.calories, " cal"));
    text.push('\n');
    text.push_str(&goal_line("Protein ", &progress.protein, "g"));
    text.push('\n');
    text.push_str(&goal_line("Carbs   ", &progress.carbs, "g"));
    text.push('\n');
    text.push_str(&goal_line("Fat     ", &progress.fat, "g"));

    let badges = progress.badges(totals.entry_count);
    text.push_str("\n\n🏅 **Today's Achievements:**\n");
    if badges.is_empty() {
        text.push_str("Keep logging to earn badges today!");
    } else {
        let labels: Vec<&str> = badges.iter().map(|b| b.label()).collect();
        text.push_str(&labels.join("\n"));
    }
    text
}

fn next_steps(diary: &FoodDiary, totals: &DailyTotals, progress: &GoalProgress) -> String {
    let mut suggestions = Vec::new();
    if progress.calories.percentage < 70.0 {
        suggestions.push("🍽️ **Plan your meals** - Say 'help me plan meals' to reach your calorie goal");
    }
    if progress.protein.percentage < 70.0 {
        suggestions.push("🔍 **Find high-protein recipes** - Say 'find me a recipe'");
    }
    if totals.entry_count >= 3 {
        suggestions.push("🛒 **Build a grocery list** - Say 'make a grocery list'");
    }
    let custom = diary
        .recent_foods(RECENT_LIMIT)
        .iter()
        .filter(|e| e.food_id.starts_with("custom_"))
        .count();
    if custom >= 2 {
        suggestions.push("👨‍🍳 **Cook at home** - Say 'help me cook' for step-by-step guidance");
    }

    let mut text = String::from("🔄 **What's Next?**\n\n");
    for s in &suggestions {
        text.push_str(&format!("• {s}\n"));
    }
    text.push_str("\n**Quick actions:** say 'log food' to add another item or 'show my food diary' to review today.\n\n✅ **Food logging complete!**");
    text
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use nutribot_catalog::Catalog;
    use nutribot_store::{Sender, Session};

    use super::*;

    fn breakfast_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap()
    }

    fn drive(session: &mut Session, catalog: &Catalog, inputs: &[&str]) -> Vec<String> {
        session.start_journey(JourneyKind::FoodCalorieTracking);
        let mut ctx = TurnContext::new(session, catalog, breakfast_time());
        let mut replies = vec![FoodTracking.start(&mut ctx).unwrap()];
        for input in inputs {
            ctx.session.add_message(Sender::User, *input);
            replies.push(
                FoodTracking
                    .process_input(&mut ctx, input)
                    .unwrap()
                    .unwrap_or_default(),
            );
        }
        replies
    }

    fn logged(session: &Session) -> FoodDiary {
        session
            .user_context
            .get_typed(keys::FOOD_DIARY)
            .unwrap()
            .unwrap_or_default()
    }

    #[test]
    fn search_portion_and_suggested_meal() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "1", "banana", "1", "1", "ok"]);

        assert!(replies[0].starts_with("🍎 **Food Calorie Tracking**"));
        assert!(replies[2].starts_with("🔎 **Search Food Database**"));
        assert!(replies[3].starts_with("🔍 **Search Results for 'banana'**"));
        assert!(replies[4].starts_with("🥄 **Portion Size for Banana**"));
        assert!(replies[4].contains("1 medium banana (118g)"));
        assert!(replies[5].contains("I'd suggest **Breakfast**"));

        let report = &replies[6];
        assert!(report.starts_with("✅ **Food Logged Successfully!**"));
        assert!(report.contains("Meal: Breakfast"));
        assert!(report.contains("📈 **Updated Daily Progress**"));
        assert!(report.contains("🔥 Calories: 105/2000"));
        assert!(report.contains("🏆 **Goal Achievement Status**"));
        assert!(report.contains("Food logging complete!"));
        assert!(session.current_journey.is_none());

        let diary = logged(&session);
        assert_eq!(diary.entries.len(), 1);
        assert_eq!(diary.entries[0].food_id, "banana");
        assert_eq!(diary.entries[0].meal_type, MealType::Breakfast);
    }

    #[test]
    fn manual_entry_skips_portion() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(
            &mut session,
            &catalog,
            &["log", "2", "Protein Shake, 250, 30, 10, 5", "lunch"],
        );
        assert!(replies[2].starts_with("📝 **Manual Food Entry**"));
        assert!(replies[3].starts_with("✅ **Custom Food Added**"));
        assert!(replies[3].contains("🍽️ **Meal Classification**"));
        assert!(replies[4].contains("Meal: Lunch"));

        let diary = logged(&session);
        assert_eq!(diary.entries[0].calories, 250);
        assert!(diary.entries[0].food_id.starts_with("custom_"));
    }

    #[test]
    fn quantity_times_option_scales_the_serving() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "chicken", "1", "1.5 x 3", "3"]);
        assert!(replies[2].contains("Chicken Breast"));
        assert!(replies[3].contains("1 large serving (150g)"));
        assert!(replies[5].contains("1.5 x 1 large serving (150g)"));
        assert_eq!(logged(&session).entries[0].calories, 370);
        assert_eq!(logged(&session).entries[0].meal_type, MealType::Dinner);
    }

    #[test]
    fn bad_portion_and_meal_are_reprompted() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "banana", "1", "9", "2", "brunch"]);
        assert!(replies[4].starts_with("Please choose a number between 1 and 3."));
        assert_eq!(session.current_step, Some(5));
        assert!(replies[6].starts_with("Please choose 1-4 or a meal name."));
    }

    #[test]
    fn recent_foods_and_delete() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        drive(&mut session, &catalog, &["1", "banana", "1", "1", ""]);

        let replies = drive(&mut session, &catalog, &["1", "3", "1"]);
        assert!(replies[2].starts_with("🕐 **Recent Foods**"));
        assert!(replies[3].starts_with("🥄 **Portion Size for Banana**"));

        let replies = drive(&mut session, &catalog, &["3", "delete 4", "delete 1", "2"]);
        assert!(replies[1].contains("1. Banana - 1 medium banana (118g)"));
        assert!(replies[2].starts_with("Please choose an entry between 1 and 1."));
        assert!(replies[3].starts_with("🗑️ Removed **Banana**"));
        assert!(replies[4].contains("No foods logged today yet."));
        assert!(logged(&session).entries.is_empty());
    }

    #[test]
    fn help_restart_and_quit_work_anywhere() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "banana", "1", "help", "restart", "quit"]);
        assert!(replies[4].starts_with("🆘 **Help - Portion Size**"));
        assert!(replies[5].contains("🍎 **Food Calorie Tracking**"));
        assert!(replies[6].starts_with("👋 **Food Tracking Complete!**"));
        assert!(session.current_journey.is_none());
    }

    #[test]
    fn leave_request_is_declined() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        session.start_journey(JourneyKind::FoodCalorieTracking);
        let mut ctx = TurnContext::new(&mut session, &catalog, breakfast_time());
        assert_eq!(FoodTracking.process_input(&mut ctx, "cancel").unwrap(), None);
    }

    #[test]
    fn progress_bar_width() {
        assert_eq!(bar(0.0), "░░░░░░░░░░");
        assert_eq!(bar(54.0), "█████░░░░░");
        assert_eq!(bar(100.0), "██████████");
    }
}
