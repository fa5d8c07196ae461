//! Meal recommendations driven by a calorie target.

use nutribot_catalog::{Meal, MealFilter, MealType};
use nutribot_kernel::JourneyKind;
use nutribot_planner::calorie::{
    CalorieRange, RangeAlternative, RangeKind, analyze_meal, daily_distribution, parse_calorie_input,
    suggest_alternatives, typical_range,
};
use nutribot_planner::cooking::format_quantity;
use nutribot_store::memory::keys;
use tracing::{debug, info};

use crate::error::{JourneyError, Result};
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{format_options, is_leave_request, normalized, parse_choice};

const SCOPES: [&str; 3] = [
    "Single Meal - Find one optimal meal",
    "Daily Plan - All meals for today",
    "Multiple Days - Week or specific days",
];

const MEAL_TYPES: [&str; 5] = ["Breakfast", "Lunch", "Dinner", "Snack", "All Meals"];

const NO_PREFERENCE: &str = "No special requirements";

const CONFIRMATIONS: [&str; 4] = [
    "Yes, confirm this meal",
    "Show me similar meals",
    "Go back to meal list",
    "Start over with different criteria",
];

const ACTIONS: [&str; 5] = [
    "Start cooking this meal",
    "Add to meal plan",
    "Generate grocery list",
    "Save to favorites",
    "Find more meals",
];

const PAGE: usize = 5;
const SIMILAR_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    CalorieGoal,
    Scope,
    MealType,
    Dietary,
    Results,
    Details,
    FinalActions,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::CalorieGoal),
            2 => Some(Self::Scope),
            3 => Some(Self::MealType),
            4 => Some(Self::Dietary),
            5 => Some(Self::Results),
            6 => Some(Self::Details),
            7 => Some(Self::FinalActions),
            _ => None,
        }
    }
}

/// Find a meal that fits a calorie target.
pub struct CalorieMealRecommendation;

impl Journey for CalorieMealRecommendation {
    fn kind(&self) -> JourneyKind {
        JourneyKind::CalorieMealRecommendation
    }

    fn start(&self, ctx: &mut TurnContext<'_>) -> Result<String> {
        let mut greeting = "I'll help you find meals that fit your calorie goals! 🍽️".to_string();
        let restrictions = &ctx.session.user_preferences.dietary_restrictions;
        if !restrictions.is_empty() {
            greeting.push_str(&format!(
                " I'll keep in mind your dietary preferences: {}.",
                restrictions.join(", ")
            ));
        }
        Ok(format!(
            "{greeting}\n\nWhat's your calorie target? You can say things like:\n• 'I need exactly 400 calories'\n• 'Between 300-500 calories'\n• 'Low calorie meals'\n• 'High protein, moderate calories'\n\nPlease tell me your calorie goal:"
        ))
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let reply = match Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))? {
            Step::CalorieGoal => calorie_goal(ctx, input)?,
            Step::Scope => scope(ctx, input)?,
            Step::MealType => meal_type(ctx, input)?,
            Step::Dietary => dietary(ctx, input)?,
            Step::Results => self.results(ctx, input)?,
            Step::Details => self.confirmation(ctx, input)?,
            Step::FinalActions => final_action(ctx, input)?,
        };
        Ok(Some(reply))
    }
}

fn calorie_goal(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let range = parse_calorie_input(input);
    debug!(min = range.min, max = range.max, kind = ?range.kind, "calorie goal parsed");
    ctx.record("calorie_range", &range)?;
    ctx.advance(2);
    Ok(format!(
        "Great! I'll find meals with {}.\n\nAre you planning for:{}",
        range.display(),
        format_options(&SCOPES, "planning scope")
    ))
}

fn scope(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(index) = parse_choice(input, &SCOPES) else {
        return Ok(format!(
            "I didn't understand that choice. {}",
            format_options(&SCOPES, "planning scope")
        ));
    };
    ctx.record("scope", &index)?;
    ctx.advance(3);

    let mut text = match index {
        0 => "Perfect! I'll find you one optimal meal.\n\n".to_string(),
        1 => {
            let range: CalorieRange = ctx.require_decision("calorie_range")?;
            let total = (range.min + range.max) / 2 * 4;
            let mut preview = format!(
                "Great! I'll plan all meals for today.\nDaily distribution (based on ~{total} total calories):\n"
            );
            for (meal_type, calories) in daily_distribution(total) {
                preview.push_str(&format!("• {}: ~{calories} calories\n", meal_type.label()));
            }
            preview.push('\n');
            preview
        }
        _ => "Excellent! I'll help you plan for multiple days.\n\n".to_string(),
    };
    text.push_str("Which meal(s) are you planning?");
    text.push_str(&format_options(&MEAL_TYPES, "meal type"));
    Ok(text)
}

fn dietary_options(ctx: &TurnContext<'_>) -> Vec<String> {
    std::iter::once(NO_PREFERENCE.to_string())
        .chain(ctx.catalog.meal_dietary_tags())
        .collect()
}

fn meal_type(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(index) = parse_choice(input, &MEAL_TYPES) else {
        return Ok(format!(
            "I didn't understand that choice. {}",
            format_options(&MEAL_TYPES, "meal type")
        ));
    };
    let chosen = (index < MealType::STANDARD.len()).then(|| MealType::STANDARD[index].clone());
    ctx.record("meal_type", &chosen)?;
    ctx.advance(4);

    if ctx.catalog.meal_dietary_tags().is_empty() {
        ctx.record("dietary", &Vec::<String>::new())?;
        return search(ctx);
    }

    let mut text = format!("You selected: {}\n\n", MEAL_TYPES[index]);
    if let Some(meal_type) = &chosen {
        let (lo, hi) = typical_range(meal_type);
        text.push_str(&format!(
            "Typical {} range: {lo}-{hi} calories\n\n",
            meal_type.as_str()
        ));
    }
    text.push_str("Any dietary preferences or restrictions?");
    text.push_str(&format_options(&dietary_options(ctx), "dietary option"));
    Ok(text)
}

fn dietary(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let options = dietary_options(ctx);
    let Some(index) = parse_choice(input, &options) else {
        return Ok(format!(
            "I didn't understand that choice. {}",
            format_options(&options, "dietary option")
        ));
    };
    let tags: Vec<String> = if index == 0 {
        Vec::new()
    } else {
        vec![options[index].clone()]
    };
    ctx.record("dietary", &tags)?;
    search(ctx)
}

// ═══════════════════════════════════════════════════════════════════════
//  Search and results
// ═══════════════════════════════════════════════════════════════════════

fn search(ctx: &mut TurnContext<'_>) -> Result<String> {
    let catalog = ctx.catalog;
    let range: CalorieRange = ctx.require_decision("calorie_range")?;
    let meal_type: Option<MealType> = ctx.decision("meal_type")?.flatten();
    let tags: Vec<String> = ctx.decision("dietary")?.unwrap_or_default();

    let mut filter = MealFilter::new()
        .with_calories(range.min, range.max)
        .with_dietary_tags(&tags);
    if let Some(t) = &meal_type {
        filter = filter.with_meal_type(t.clone());
    }
    let meals = catalog.filter_meals(&filter);
    info!(min = range.min, max = range.max, hits = meals.len(), "meal search");

    ctx.forget("shown_more")?;
    if meals.is_empty() {
        let alternatives = suggest_alternatives(range.min, range.max);
        ctx.record("alternatives", &alternatives)?;
        ctx.advance_with(5, &Vec::<String>::new())?;
        return Ok(no_results(&range, meal_type.as_ref(), &tags, &alternatives));
    }

    let heading = format!("Great! I found {} meals with {}:", meals.len(), range.display());
    let ids: Vec<String> = meals.iter().map(|m| m.id.clone()).collect();
    ctx.forget("alternatives")?;
    ctx.advance_with(5, &ids)?;
    Ok(render_results(&heading, &meals))
}

fn no_results(
    range: &CalorieRange,
    meal_type: Option<&MealType>,
    tags: &[String],
    alternatives: &[RangeAlternative],
) -> String {
    let mut text = format!("I couldn't find meals matching {}-{} calories", range.min, range.max);
    if let Some(t) = meal_type {
        text.push_str(&format!(" for {}", t.as_str()));
    }
    if !tags.is_empty() {
        text.push_str(&format!(" with {} requirements", tags.join(", ")));
    }
    text.push_str(".\n\nLet me suggest some alternatives:\n\n");
    for (i, alt) in alternatives.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: {}\n",
            i + 1,
            alt.description,
            nutribot_planner::calorie::format_calorie_range(alt.min, alt.max)
        ));
    }
    let n = alternatives.len();
    text.push_str(&format!("{}. Remove dietary restrictions\n", n + 1));
    text.push_str(&format!("{}. Try different meal type\n", n + 2));
    text.push_str(&format!("{}. Start over\n", n + 3));
    text.push_str("\nWhich alternative would you like to try?");
    text
}

fn render_results(heading: &str, meals: &[&Meal]) -> String {
    let mut text = format!("{heading}\n\n");
    for (i, meal) in meals.iter().take(PAGE).enumerate() {
        text.push_str(&format!(
            "{}. {}\n   🔥 {} calories | ⏱️ {} min prep\n   💪 {}g protein | 🌾 {}g carbs | 🥑 {}g fat\n",
            i + 1,
            meal.name,
            meal.calories,
            meal.prep_time,
            meal.nutrition.protein,
            meal.nutrition.carbs,
            meal.nutrition.fat
        ));
        if !meal.dietary_tags.is_empty() {
            text.push_str(&format!("   🏷️ {}\n", meal.dietary_tags.join(", ")));
        }
        if !meal.components.is_empty() {
            let names: Vec<&str> = meal.components.iter().take(3).map(|c| c.name.as_str()).collect();
            text.push_str(&format!("   📋 Components: {}", names.join(", ")));
            if meal.components.len() > 3 {
                text.push_str(&format!(" + {} more", meal.components.len() - 3));
            }
            text.push('\n');
        }
        text.push('\n');
    }
    if meals.len() > PAGE {
        text.push_str(&format!("...and {} more meals!\n\n", meals.len() - PAGE));
    }
    text.push_str(
        "Please enter the number of the meal you'd like to see details for, or type 'more' for additional options:",
    );
    text
}

fn listed_meals<'c>(ctx: &TurnContext<'c>) -> Result<Vec<&'c Meal>> {
    let catalog = ctx.catalog;
    let ids: Vec<String> = ctx.get(5)?.unwrap_or_default();
    Ok(ids.iter().filter_map(|id| catalog.meal(id)).collect())
}

impl CalorieMealRecommendation {
    fn results(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let alternatives: Option<Vec<RangeAlternative>> = ctx.decision("alternatives")?;
        if let Some(alternatives) = alternatives {
            return self.alternative(ctx, input, &alternatives);
        }

        let meals = listed_meals(ctx)?;
        if meals.is_empty() {
            return Ok("I don't have any meals to show you. Let's start over.".to_string());
        }

        let text = normalized(input);
        if text == "more" {
            if meals.len() <= PAGE {
                return Ok("I've already shown you all available meals matching your criteria.".to_string());
            }
            ctx.record("shown_more", &true)?;
            let mut reply = String::from("Here are more meal options:\n\n");
            for (i, meal) in meals.iter().enumerate().skip(PAGE).take(PAGE) {
                reply.push_str(&format!(
                    "{}. {}\n   🔥 {} calories | ⏱️ {} min prep\n\n",
                    i + 1,
                    meal.name,
                    meal.calories,
                    meal.prep_time
                ));
            }
            reply.push_str("Please enter the number of the meal you'd like to see details for:");
            return Ok(reply);
        }

        let shown_more: bool = ctx.decision("shown_more")?.unwrap_or(false);
        let limit = meals.len().min(if shown_more { PAGE * 2 } else { PAGE });
        match text.parse::<usize>() {
            Ok(n) if (1..=limit).contains(&n) => {
                let meal = meals[n - 1];
                show_details(ctx, meal)
            }
            Ok(_) => Ok(format!(
                "Please enter a number between 1 and {limit}, or type 'more' for additional options."
            )),
            Err(_) => Ok("Please enter a number, or type 'more' for additional options.".to_string()),
        }
    }

    /// Step 5 when nothing matched: widen the range, drop the dietary tag,
    /// pick another meal type, or start over.
    fn alternative(
        &self,
        ctx: &mut TurnContext<'_>,
        input: &str,
        alternatives: &[RangeAlternative],
    ) -> Result<String> {
        let n = alternatives.len();
        let choice = normalized(input).parse::<usize>().ok().filter(|c| (1..=n + 3).contains(c));
        let Some(choice) = choice else {
            return Ok(format!("Please choose an alternative between 1 and {}.", n + 3));
        };

        if choice <= n {
            let alt = &alternatives[choice - 1];
            let range = CalorieRange {
                min: alt.min,
                max: alt.max,
                kind: RangeKind::Range,
            };
            ctx.record("calorie_range", &range)?;
            return search(ctx);
        }
        match choice - n {
            1 => {
                ctx.record("dietary", &Vec::<String>::new())?;
                search(ctx)
            }
            2 => {
                ctx.forget("alternatives")?;
                ctx.advance(3);
                Ok(format!(
                    "Which meal(s) are you planning?{}",
                    format_options(&MEAL_TYPES, "meal type")
                ))
            }
            _ => {
                ctx.restart(self.kind());
                self.start(ctx)
            }
        }
    }

    fn confirmation(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let Some(index) = parse_choice(input, &CONFIRMATIONS) else {
            return Ok(format!(
                "I didn't understand that choice. {}",
                format_options(&CONFIRMATIONS, "option")
            ));
        };
        let meal = selected_meal(ctx)?;

        match index {
            0 => {
                ctx.advance(7);
                Ok(format!(
                    "Perfect! You've selected: **{}** 🎉\n\nWhat would you like to do next?\n{}",
                    meal.name,
                    crate::prompt::numbered(&ACTIONS, 1)
                ))
            }
            1 => {
                let catalog = ctx.catalog;
                let similar = catalog.find_similar_meals(meal, SIMILAR_LIMIT);
                if similar.is_empty() {
                    let meals = listed_meals(ctx)?;
                    ctx.advance(5);
                    return Ok(format!(
                        "I couldn't find similar meals. Here are the original results instead.\n\n{}",
                        render_results("Your meal options:", &meals)
                    ));
                }
                let ids: Vec<String> = similar.iter().map(|m| m.id.clone()).collect();
                ctx.forget("shown_more")?;
                ctx.advance_with(5, &ids)?;
                Ok(render_results(
                    &format!("Here are {} meals similar to {}:", similar.len(), meal.name),
                    &similar,
                ))
            }
            2 => {
                let meals = listed_meals(ctx)?;
                ctx.advance(5);
                Ok(render_results("Your meal options:", &meals))
            }
            _ => {
                ctx.restart(self.kind());
                self.start(ctx)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Details and final actions
// ═══════════════════════════════════════════════════════════════════════

fn selected_meal<'c>(ctx: &TurnContext<'c>) -> Result<&'c Meal> {
    let catalog = ctx.catalog;
    let id: String = ctx.require(6, "selected meal")?;
    catalog
        .meal(&id)
        .ok_or_else(|| JourneyError::missing(format!("meal `{id}`")))
}

fn show_details(ctx: &mut TurnContext<'_>, meal: &Meal) -> Result<String> {
    ctx.advance_with(6, &meal.id)?;
    let analysis = analyze_meal(meal);
    let pct = analysis.percentages;
    let types: Vec<String> = meal.meal_type.iter().map(MealType::label).collect();

    let mut text = format!(
        "🍽️ **{}**\n\n🔥 Calories: {}\n⏱️ Prep Time: {} minutes\n🍴 Meal Type: {}\n\n",
        meal.name,
        meal.calories,
        meal.prep_time,
        types.join(", ")
    );
    text.push_str(&format!(
        "📊 **Nutrition Breakdown:**\n💪 Protein: {}g ({}%)\n🌾 Carbohydrates: {}g ({}%)\n🥑 Fat: {}g ({}%)\n🌿 Fiber: {}g\n\n",
        meal.nutrition.protein, pct.protein, meal.nutrition.carbs, pct.carbs, meal.nutrition.fat, pct.fat, meal.nutrition.fiber
    ));
    if !meal.dietary_tags.is_empty() {
        text.push_str(&format!("🏷️ **Dietary Tags:** {}\n\n", meal.dietary_tags.join(", ")));
    }
    if !meal.components.is_empty() {
        text.push_str("📋 **Components:**\n");
        for c in &meal.components {
            text.push_str(&format!("• {} {} {}\n", format_quantity(c.amount), c.unit, c.name));
        }
        text.push('\n');
    }
    text.push_str("💡 **Health Insights:**\n");
    for insight in &analysis.insights {
        text.push_str(&format!("• {insight}\n"));
    }
    text.push_str(&format!(
        "\n🏆 Health Score: {}/100\n⚖️ Macro Balance: {}\n\nIs this meal selection final?\n{}",
        analysis.health_score,
        analysis.macro_balance,
        crate::prompt::numbered(&CONFIRMATIONS, 1)
    ));
    Ok(text)
}

fn final_action(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(index) = parse_choice(input, &ACTIONS) else {
        return Ok(format!(
            "I didn't understand that choice. {}",
            format_options(&ACTIONS, "action")
        ));
    };
    let meal = selected_meal(ctx)?;
    let catalog = ctx.catalog;

    match index {
        0 => {
            // A meal with a same-named recipe gets full guidance; others are
            // assembled from their components.
            if let Some(recipe) = catalog.search_recipes_by_name(&meal.name).first() {
                ctx.set_context(keys::SELECTED_RECIPE, &recipe.id)?;
                ctx.complete();
                info!(meal_id = %meal.id, recipe_id = %recipe.id, "meal handed to cooking guidance");
                return Ok(format!(
                    "Great! Let's start cooking {}! Say \"start cooking\" and I'll guide you through each step.",
                    meal.name
                ));
            }
            let mut text = format!(
                "👨‍🍳 **Putting together {}** (about {} minutes)\n\n",
                meal.name, meal.prep_time
            );
            for (i, c) in meal.components.iter().enumerate() {
                text.push_str(&format!(
                    "{}. Prepare {} {} {}\n",
                    i + 1,
                    format_quantity(c.amount),
                    c.unit,
                    c.name
                ));
            }
            text.push_str(&format!(
                "{}. Plate everything together and enjoy!\n\nFor step-by-step guidance on a full recipe, say \"help me cook\".",
                meal.components.len() + 1
            ));
            ctx.complete();
            Ok(text)
        }
        1 => {
            ctx.complete();
            Ok(format!(
                "Perfect! {} fits your calorie goals. Say \"plan my meals\" and I'll build a plan with the right timing and portions.",
                meal.name
            ))
        }
        2 => {
            let mut text = format!("🛒 **Grocery List for {}**\n\n", meal.name);
            for c in &meal.components {
                text.push_str(&format!("☐ {} {} {}\n", format_quantity(c.amount), c.unit, c.name));
            }
            text.push_str("\nFor an organized list across several recipes, say \"make a grocery list\".");
            ctx.complete();
            Ok(text)
        }
        3 => {
            let mut favorites: Vec<String> = ctx.context(keys::FAVORITE_MEALS)?.unwrap_or_default();
            if !favorites.contains(&meal.id) {
                favorites.push(meal.id.clone());
            }
            ctx.set_context(keys::FAVORITE_MEALS, &favorites)?;
            Ok(format!(
                "✅ {} has been saved to your favorites! You can quickly find it again while we're chatting.\n\nWould you like to find more meals or do something else with this one?",
                meal.name
            ))
        }
        _ => search(ctx),
    }
}
