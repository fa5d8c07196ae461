//! Meal planning: collect scope and constraints, generate a plan, let the
//! user approve or regenerate it, then act on it.

use nutribot_catalog::MealType;
use nutribot_kernel::JourneyKind;
use nutribot_planner::text::integers;
use nutribot_planner::{
    IngredientExtractor, ListConsolidator, MealPlan, MealPlanGenerator, MealPlanRequest,
    Organization, StoreOrganizer,
};
use nutribot_store::memory::keys;
use tracing::info;

use crate::artifacts::SavedMealPlan;
use crate::error::Result;
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{is_leave_request, is_yes, mentions, normalized};

const MIN_DAYS: u32 = 1;
const MAX_DAYS: u32 = 28;
const MIN_CALORIES: u32 = 1200;
const MAX_CALORIES: u32 = 4000;

/// Tags shown on the dietary step, grouped for readability.  Only tags the
/// catalog actually carries are offered.
const DIET_CATEGORIES: [(&str, &[&str]); 4] = [
    ("Diet Types", &["vegetarian", "vegan", "keto_friendly", "mediterranean"]),
    ("Health Focus", &["heart_healthy", "high_protein", "high_fiber", "low_carb"]),
    ("Restrictions", &["gluten_free", "dairy_free", "nut_free"]),
    ("Special Needs", &["omega_3", "anti_inflammatory", "probiotic"]),
];

/// Everyday phrasings of catalog tags.
const DIET_ALIASES: [(&str, &[&str]); 5] = [
    ("vegetarian", &["veggie", "vegetarian"]),
    ("gluten_free", &["gluten free", "celiac", "no gluten"]),
    ("dairy_free", &["dairy free", "lactose free", "no dairy"]),
    ("keto_friendly", &["keto", "ketogenic", "low carb"]),
    ("high_protein", &["protein", "high protein"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    PlanningScope,
    MealScope,
    CalorieGoals,
    DietaryPreferences,
    LifestyleConstraints,
    GeneratePlan,
    PlanDisplay,
    FinalActions,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::PlanningScope),
            2 => Some(Self::MealScope),
            3 => Some(Self::CalorieGoals),
            4 => Some(Self::DietaryPreferences),
            5 => Some(Self::LifestyleConstraints),
            6 => Some(Self::GeneratePlan),
            7 => Some(Self::PlanDisplay),
            8 => Some(Self::FinalActions),
            _ => None,
        }
    }
}

/// Multi-day meal plan generation.
pub struct MealPlanning;

impl Journey for MealPlanning {
    fn kind(&self) -> JourneyKind {
        JourneyKind::MealPlanning
    }

    fn start(&self, _ctx: &mut TurnContext<'_>) -> Result<String> {
        Ok(scope_prompt())
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let text = normalized(input);
        let reply = match Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))? {
            Step::PlanningScope => planning_scope(ctx, &text)?,
            Step::MealScope => meal_scope(ctx, &text)?,
            Step::CalorieGoals => calorie_goals(ctx, &text)?,
            Step::DietaryPreferences => dietary_preferences(ctx, &text)?,
            Step::LifestyleConstraints => lifestyle_constraints(ctx, &text)?,
            Step::GeneratePlan => generate_plan(ctx, &text)?,
            Step::PlanDisplay => plan_display(ctx, &text)?,
            Step::FinalActions => final_actions(ctx, &text)?,
        };
        Ok(Some(reply))
    }
}

// ── step handlers ────────────────────────────────────────────────────

fn planning_scope(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let (days, scope) = match text {
        "1" | "daily" | "single day" | "one day" => (1, "daily meal plan".to_string()),
        "2" | "weekly" | "week" | "7 days" | "seven days" => (7, "weekly meal plan (7 days)".to_string()),
        "3" | "custom" | "custom range" => {
            return Ok("How many days should I plan? You can say something like '3 days' or '2 weeks'.".to_string());
        }
        _ if mentions(text, &["custom", "day", "week"]) => {
            let Some(&n) = integers(text).first() else {
                return Ok("I didn't catch the number of days. Could you specify like '3 days' or '2 weeks'?".to_string());
            };
            let days = if text.contains("week") { n.saturating_mul(7) } else { n };
            if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
                return Ok(format!(
                    "Please choose a duration between {MIN_DAYS} and {MAX_DAYS} days. What would you prefer?"
                ));
            }
            (days, format!("custom {days}-day meal plan"))
        }
        _ => {
            return Ok("Please choose 1 for Daily, 2 for Weekly, or specify a custom duration like '5 days'.".to_string());
        }
    };
    ctx.record("days", &days)?;
    ctx.advance(2);
    Ok(format!("Great! I'll create a {scope} for you.\n\n{}", meal_scope_prompt()))
}

fn meal_scope(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let (meal_types, description) = match text {
        "1" | "all meals" | "all" | "complete" => (
            MealType::STANDARD.to_vec(),
            "all meals (breakfast, lunch, dinner, and snacks)".to_string(),
        ),
        "2" | "main meals" | "main" | "no snacks" => (
            vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner],
            "main meals (breakfast, lunch, and dinner)".to_string(),
        ),
        "3" | "4" | "specific" | "custom" => {
            return Ok("Please specify which meals you'd like planned:\n- Type meal names like: \"breakfast and lunch\"\n- Or: \"dinner only\"\n- Or: \"lunch, dinner, snacks\"\n\nWhat meals would you like me to plan?".to_string());
        }
        _ => {
            let named: Vec<MealType> = MealType::STANDARD
                .into_iter()
                .filter(|t| text.contains(t.as_str()))
                .collect();
            if named.is_empty() {
                return Ok("Please choose 1-4 or tell me which specific meals you'd like planned.".to_string());
            }
            let description = named.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(" and ");
            (named, description)
        }
    };
    let days: u32 = ctx.require_decision("days")?;
    ctx.record("meal_types", &meal_types)?;
    ctx.advance(3);
    Ok(format!(
        "Perfect! I'll plan {description} for your {days}-day period.\n\n{}",
        calorie_prompt()
    ))
}

fn calorie_goals(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let explicit = integers(text).into_iter().find(|n| *n >= 1000);
    let (target, description) = match (explicit, text) {
        (Some(n), _) if (MIN_CALORIES..=MAX_CALORIES).contains(&n) => (n, format!("{n} calories per day")),
        (Some(_), _) => {
            return Ok(format!(
                "That calorie target seems unusual. Most people need between {MIN_CALORIES}-{MAX_CALORIES} calories daily. Could you confirm your target?"
            ));
        }
        (None, "1" | "maintain" | "current weight" | "maintain weight") => (
            2000,
            "maintenance calories (~2000/day, we'll adjust as needed)".to_string(),
        ),
        (None, "2" | "specific") => {
            return Ok("Please tell me your specific daily calorie target (e.g., '1800 calories' or just '1800'):".to_string());
        }
        (None, "3" | "help" | "help me decide" | "guidance") => (
            1800,
            "balanced approach (~1800 calories/day for healthy nutrition)".to_string(),
        ),
        (None, "4" | "flexible" | "balanced" | "nutrition focused") => {
            (1800, "nutrition-focused approach (~1800 calories/day)".to_string())
        }
        _ => {
            return Ok("Please choose 1-4 or tell me your specific calorie target (like '2000 calories').".to_string());
        }
    };
    ctx.record("calorie_target", &target)?;
    ctx.advance(4);
    Ok(format!(
        "Great! I'm targeting {description}.\n\n{}",
        dietary_prompt(ctx)
    ))
}

fn dietary_preferences(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let restrictions = if matches!(text, "none" | "no restrictions" | "nothing" | "no") {
        Vec::new()
    } else {
        let found = parse_dietary_tags(&ctx.catalog.meal_dietary_tags(), text);
        if found.is_empty() {
            return Ok("I didn't recognize those dietary preferences. Could you choose from the available options or type 'none' for no restrictions?".to_string());
        }
        found
    };
    let description = if restrictions.is_empty() {
        "no specific dietary restrictions".to_string()
    } else {
        format!("dietary preferences: {}", restrictions.join(", "))
    };
    ctx.record("dietary_restrictions", &restrictions)?;
    ctx.advance(5);
    Ok(format!("Noted: {description}.\n\n{}", lifestyle_prompt()))
}

fn lifestyle_constraints(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let (skill, skill_text) = if mentions(text, &["beginner", "basic", "simple", "1"]) {
        ("beginner", "beginner-friendly recipes")
    } else if mentions(text, &["intermediate", "comfortable", "moderate", "2"]) {
        ("intermediate", "intermediate cooking techniques")
    } else if mentions(text, &["advanced", "complex", "expert", "3"]) {
        ("advanced", "advanced cooking methods")
    } else {
        ("intermediate", "intermediate cooking techniques")
    };

    let (max_prep, time_text) = if mentions(text, &["quick", "15", "fast", "busy"]) {
        (15, "quick meals (≤15 minutes)")
    } else if mentions(text, &["time to cook", "longer", "extended"]) {
        (60, "flexible prep time")
    } else {
        (30, "moderate prep time (≤30 minutes)")
    };

    let household = integers(text)
        .into_iter()
        .find(|n| (1..=8).contains(n))
        .unwrap_or(2);

    ctx.record("skill_level", &skill)?;
    ctx.record("max_prep_time", &max_prep)?;
    ctx.record("household_size", &household)?;
    ctx.advance(6);

    let request = build_request(ctx)?;
    let meal_list = request
        .meal_types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let diet = if request.dietary_restrictions.is_empty() {
        String::new()
    } else {
        format!(" with {}", request.dietary_restrictions.join(", "))
    };
    Ok(format!(
        "Perfect! Here's your profile:\n• **Cooking Level**: {skill_text}\n• **Time Preference**: {time_text}\n• **Household Size**: {household} {}\n\n🎯 **READY TO GENERATE YOUR MEAL PLAN!**\n\nI'll create a {}-day plan with {meal_list} targeting {} calories per day{diet}.\n\nWould you like me to generate your personalized meal plan now? (Type 'yes' to proceed)",
        if household == 1 { "person" } else { "people" },
        request.days,
        request.daily_calorie_target,
    ))
}

fn generate_plan(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    if !is_yes(text) {
        return Ok("No problem! Feel free to adjust any of your preferences, or type 'yes' when you're ready for me to generate your meal plan.".to_string());
    }
    let request = build_request(ctx)?;
    let plan = MealPlanGenerator::new(ctx.catalog).generate(&request)?;
    info!(
        days = request.days,
        slots = plan.slot_count(),
        placeholders = plan.placeholder_count(),
        "meal plan generated"
    );
    let text = render_plan(&plan);
    ctx.advance_with(7, &plan)?;
    Ok(text)
}

fn plan_display(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let customizing = ctx.decision::<bool>("customizing")?.unwrap_or(false);
    if customizing {
        return customize(ctx, text);
    }
    match text {
        "1" | "approve" | "looks good" | "perfect" | "great" => {
            ctx.advance(8);
            Ok(final_actions_prompt())
        }
        "2" | "regenerate" | "try again" | "different" => {
            let previous: MealPlan = ctx.require(7, "meal plan")?;
            let plan = MealPlanGenerator::new(ctx.catalog).regenerate(&previous.request, &previous)?;
            let text = render_plan(&plan);
            ctx.put(7, &plan)?;
            Ok(format!("🔄 **Here's a new meal plan for you:**\n\n{text}"))
        }
        "3" | "customize" | "changes" | "modify" => {
            ctx.record("customizing", &true)?;
            Ok("🔧 **CUSTOMIZATION OPTIONS:**\n\nWhat would you like to adjust?\n1. **Swap meals** - Try different meal combinations\n2. **Different calorie target** - Adjust daily calories\n3. **Modify dietary restrictions** - Add/remove dietary preferences\n4. **Change time constraints** - Adjust prep time limits\n\nTell me what you'd like to customize!".to_string())
        }
        _ => Ok("Please choose 1 to Approve, 2 to Regenerate, or 3 to Customize your meal plan.".to_string()),
    }
}

/// Route a customization choice back to the step that owns the setting.
fn customize(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let target = if text == "1" || mentions(text, &["swap", "meal"]) {
        None
    } else if text == "2" || text.contains("calorie") {
        Some(3)
    } else if text == "3" || mentions(text, &["diet", "restriction"]) {
        Some(4)
    } else if text == "4" || mentions(text, &["time", "prep"]) {
        Some(5)
    } else {
        return Ok("Please choose 1-4, or tell me what you'd like to customize.".to_string());
    };
    ctx.forget("customizing")?;
    match target {
        None => {
            let previous: MealPlan = ctx.require(7, "meal plan")?;
            let plan = MealPlanGenerator::new(ctx.catalog).regenerate(&previous.request, &previous)?;
            let text = render_plan(&plan);
            ctx.put(7, &plan)?;
            Ok(format!("🔄 **I've swapped in different meals:**\n\n{text}"))
        }
        Some(3) => {
            ctx.advance(3);
            Ok(format!("Let's adjust your calorie target.\n\n{}", calorie_prompt()))
        }
        Some(4) => {
            ctx.advance(4);
            Ok(format!("Let's update your dietary preferences.\n\n{}", dietary_prompt(ctx)))
        }
        Some(_) => {
            ctx.advance(5);
            Ok(format!("Let's revisit your cooking situation.\n\n{}", lifestyle_prompt()))
        }
    }
}

fn final_actions(ctx: &mut TurnContext<'_>, text: &str) -> Result<String> {
    let plan: MealPlan = ctx.require(7, "meal plan")?;
    let follow_up = "Would you like me to help you with anything else for your meal plan? (Choose 1-5)";
    match text {
        "1" | "grocery" | "shopping" | "grocery list" => {
            save_plan(ctx, &plan)?;
            Ok(format!("{}\n\n{follow_up}", grocery_list(ctx, &plan)?))
        }
        "2" | "export" | "pdf" | "email" => Ok(format!("{}\n{follow_up}", export_plan(&plan))),
        "3" | "calendar" | "ics" | "download" => Ok(format!("{}\n{follow_up}", calendar_guide(&plan))),
        "4" | "cook" | "cooking" | "start cooking" => {
            Ok(format!("{}\n\n{follow_up}", first_meal(ctx, &plan)?))
        }
        "5" | "save" | "exit" | "finish" | "done" => {
            save_plan(ctx, &plan)?;
            let skill: String = ctx.require_decision("skill_level")?;
            ctx.complete();
            info!(days = plan.request.days, "meal plan saved");
            let meal_list = plan
                .request
                .meal_types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>();
            let diet = if plan.request.dietary_restrictions.is_empty() {
                "No restrictions".to_string()
            } else {
                plan.request.dietary_restrictions.join(", ")
            };
            Ok(format!(
                "✅ **MEAL PLAN SAVED SUCCESSFULLY!**\n\n🎯 **Your {}-day meal plan** has been created and saved with:\n• **{} meal types** per day: {}\n• **{} calorie target** per day\n• **Dietary preferences**: {diet}\n• **Skill level**: {} cooking\n\n💡 **Remember**: This meal plan is flexible - feel free to swap meals, adjust portions, or modify based on your daily needs!\n\nSay \"make a grocery list\" any time to shop for this plan. Is there anything else I can help you with today?",
                plan.request.days,
                meal_list.len(),
                meal_list.join(", "),
                plan.request.daily_calorie_target,
                capitalize(&skill),
            ))
        }
        _ => Ok("Please choose 1-5 for your preferred action, or tell me what you'd like to do with your meal plan.".to_string()),
    }
}

// ── helpers ──────────────────────────────────────────────────────────

fn build_request(ctx: &TurnContext<'_>) -> Result<MealPlanRequest> {
    let days: u32 = ctx.require_decision("days")?;
    let meal_types: Vec<MealType> = ctx.require_decision("meal_types")?;
    let target: u32 = ctx.require_decision("calorie_target")?;
    let restrictions: Vec<String> = ctx.require_decision("dietary_restrictions")?;
    let max_prep: u32 = ctx.require_decision("max_prep_time")?;
    Ok(MealPlanRequest::new(days, meal_types, target)
        .with_dietary_restrictions(restrictions)
        .with_max_prep_time(max_prep))
}

fn save_plan(ctx: &mut TurnContext<'_>, plan: &MealPlan) -> Result<()> {
    let saved = SavedMealPlan {
        plan: plan.clone(),
        household_size: ctx.require_decision("household_size")?,
        skill_level: ctx.require_decision("skill_level")?,
        saved_at: ctx.now,
    };
    ctx.set_context(keys::COMPLETED_MEAL_PLAN, &saved)
}

/// Tags named in `text`, directly (`gluten_free` or `gluten free`) or via
/// an alias.  Only tags in `available` are returned.
fn parse_dietary_tags(available: &[String], text: &str) -> Vec<String> {
    let mut found: Vec<String> = available
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            text.contains(&tag) || text.contains(&tag.replace('_', " "))
        })
        .cloned()
        .collect();
    for (tag, aliases) in DIET_ALIASES {
        if available.iter().any(|a| a == tag)
            && mentions(text, aliases)
            && !found.iter().any(|f| f == tag)
        {
            found.push(tag.to_string());
        }
    }
    found
}

fn meal_emoji(meal_type: &MealType) -> &'static str {
    match meal_type {
        MealType::Breakfast => "🌅",
        MealType::Lunch => "🌞",
        MealType::Dinner => "🌙",
        MealType::Snack => "🍎",
        MealType::Other(_) => "🍽️",
    }
}

fn render_plan(plan: &MealPlan) -> String {
    let mut text = "🎉 **YOUR PERSONALIZED MEAL PLAN**\n\n".to_string();
    for day in &plan.days {
        text.push_str(&format!("**{}:**\n", day.label.to_uppercase()));
        for planned in &day.meals {
            text.push_str(&format!(
                "{} **{}**: {} - {}cal ({}min)\n",
                meal_emoji(&planned.meal_type),
                planned.meal_type.label(),
                planned.meal.name,
                planned.meal.calories,
                planned.meal.prep_time
            ));
        }
        text.push_str(&format!("📊 **Daily Total**: {}cal\n\n", day.total_calories()));
    }

    let s = &plan.summary;
    text.push_str(&format!(
        "📈 **NUTRITION SUMMARY ({} days):**\n• **Average daily calories**: {:.0}\n• **Protein**: {:.1}g avg ({:.1}% of calories)\n• **Carbohydrates**: {:.1}g avg ({:.1}% of calories)\n• **Fat**: {:.1}g avg ({:.1}% of calories)\n• **Fiber**: {:.1}g avg\n\n⚡ **NUTRITIONAL ANALYSIS:**\n",
        s.days,
        s.avg_daily_calories,
        s.avg_macros.protein,
        s.protein_pct,
        s.avg_macros.carbs,
        s.carbs_pct,
        s.avg_macros.fat,
        s.fat_pct,
        s.avg_macros.fiber,
    ));
    for rec in &s.recommendations {
        text.push_str(&format!("• {rec}\n"));
    }
    if plan.placeholder_count() > 0 {
        text.push_str(&format!(
            "• {} slot(s) had no matching meal and use a custom placeholder\n",
            plan.placeholder_count()
        ));
    }
    text.push_str("\n🎯 **How does this meal plan look?**\n1. **Approve** - This looks great!\n2. **Regenerate** - Try different meal combinations\n3. **Customize** - Make specific changes\n\nWhat would you like to do?");
    text
}

fn grocery_list(ctx: &TurnContext<'_>, plan: &MealPlan) -> Result<String> {
    let household: u32 = ctx.require_decision("household_size")?;
    let multiplier = f64::from(household) / 2.0;
    let raw = IngredientExtractor::new(ctx.catalog).from_meal_plan(&plan.days, multiplier);
    if raw.is_empty() {
        return Ok("🛒 **GROCERY LIST - No Ingredients Found**\n\nIt looks like your meal plan doesn't have detailed ingredient information available. This might be because some meals are placeholder entries.\n\nYou can still use your meal plan as a guide and shop for the general meal types shown in your plan.".to_string());
    }
    let items = ListConsolidator::new(ctx.catalog).consolidate(&raw);
    let groups = StoreOrganizer::new(ctx.catalog).organize(&items, Organization::StoreSections);

    let mut text = format!(
        "🛒 **GROCERY LIST - {} Day Meal Plan**\n\n",
        plan.request.days
    );
    for group in &groups {
        text.push_str(&format!("{} **{}:**\n", group.icon, group.title.to_uppercase()));
        for item in &group.items {
            text.push_str(&format!("  {}\n", item.checklist_line()));
        }
        text.push('\n');
    }
    text.push_str(&format!(
        "💡 **TIPS:**\n• Amounts are scaled for {household} {}\n• Check your pantry for items you may already have\n• Consider buying in bulk for better value",
        if household == 1 { "person" } else { "people" }
    ));
    Ok(text)
}

fn export_plan(plan: &MealPlan) -> String {
    let mut text = format!(
        "📧 **MEAL PLAN EXPORT**\n\nCopy the schedule below into any document or email:\n\nMeal plan - {} day(s), {} kcal/day target\n",
        plan.request.days, plan.request.daily_calorie_target
    );
    for day in &plan.days {
        text.push_str(&format!("\n{}\n", day.label));
        for planned in &day.meals {
            text.push_str(&format!(
                "- {}: {} ({} kcal, {} min prep)\n",
                planned.meal_type.label(),
                planned.meal.name,
                planned.meal.calories,
                planned.meal.prep_time
            ));
        }
        text.push_str(&format!("  Total: {} kcal\n", day.total_calories()));
    }
    text.push_str(&format!(
        "\nAverage: {:.0} kcal/day\n",
        plan.summary.avg_daily_calories
    ));
    text
}

fn calendar_guide(plan: &MealPlan) -> String {
    let mut text = "🗓️ **CALENDAR INTEGRATION GUIDE**\n\nFor each meal, create a calendar event titled 🍽️ [Meal Name] ([prep time] min) with a reminder 30 minutes before.\n\n⏰ **Suggested Meal Times:**\n".to_string();
    for meal_type in &plan.request.meal_types {
        let time = match meal_type {
            MealType::Breakfast => "7:00 AM - 8:00 AM",
            MealType::Lunch => "12:00 PM - 1:00 PM",
            MealType::Dinner => "6:00 PM - 7:00 PM",
            MealType::Snack => "3:00 PM or 8:00 PM",
            MealType::Other(_) => "whenever suits you",
        };
        text.push_str(&format!("• {}: {time}\n", meal_type.label()));
    }
    text.push_str("\n📋 **Additional Events to Add:**\n• 🛒 Grocery Shopping (day before meal plan starts)\n• 🥘 Meal Prep Day (if batch cooking)\n• 📊 Weekly Menu Review (end of week)\n");
    text
}

/// The first meal of day 1, breakfast if planned.
fn first_meal(ctx: &TurnContext<'_>, plan: &MealPlan) -> Result<String> {
    let Some(day) = plan.days.first() else {
        return Ok("No meal plan available to start cooking from.".to_string());
    };
    let Some(planned) = day
        .meals
        .iter()
        .find(|m| m.meal_type == MealType::Breakfast)
        .or_else(|| day.meals.first())
    else {
        return Ok("No meal plan available to start cooking from.".to_string());
    };
    let skill: String = ctx.require_decision("skill_level")?;
    let meal = &planned.meal;
    let mut text = format!(
        "👨‍🍳 **LET'S START COOKING!**\n\n**Your First Meal**: {} ({})\n\n🎯 **Meal Details:**\n• **Calories**: {}cal\n• **Prep Time**: {} minutes\n• **Nutrition**: {}g protein, {}g carbs\n\n📝 **Ingredients Needed:**",
        meal.name,
        planned.meal_type.label(),
        meal.calories,
        meal.prep_time,
        meal.nutrition.protein,
        meal.nutrition.carbs
    );
    for component in &meal.components {
        let name = component
            .food_id
            .as_deref()
            .and_then(|id| ctx.catalog.food(id))
            .map(|f| f.name.as_str())
            .unwrap_or(component.name.as_str());
        text.push_str(&format!("\n• {}{} {}", component.amount, component.unit, name));
    }
    text.push_str(&format!(
        "\n\n🔄 **Ready to cook?** Prepare this meal with basic methods suited to your {skill} skill level:\n1. Gather your ingredients\n2. Follow your preferred cooking method\n3. Track your meal completion\n4. Move on to the next planned meal"
    ));
    Ok(text)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── prompts ──────────────────────────────────────────────────────────

fn scope_prompt() -> String {
    "🗓️ **MEAL PLANNING - Let's Get Started!**\n\nWhat would you like to plan?\n\n1. **Daily** - Single day meal plan\n2. **Weekly** - Complete 7-day meal plan\n3. **Custom Range** - Specific number of days (e.g., \"3 days\", \"2 weeks\")\n\nPlease choose your planning scope by typing the number or describing your preference.".to_string()
}

fn meal_scope_prompt() -> String {
    "🍽️ **MEAL COVERAGE**\n\nWhich meals should I plan for each day?\n\n1. **All Meals** - Breakfast + Lunch + Dinner + Snacks (complete daily nutrition)\n2. **Main Meals** - Breakfast + Lunch + Dinner (no snacks)\n3. **Specific Meals** - Choose which meals you want planned\n4. **Custom Selection** - Tell me your preferences (e.g., \"only dinner and snacks\")\n\nWhat works best for your lifestyle?".to_string()
}

fn calorie_prompt() -> String {
    "🎯 **CALORIE GOALS**\n\nWhat's your daily calorie target?\n\n1. **Maintain Current Weight** - A sensible ~2000 calorie starting point\n2. **Specific Goal** - You have a target number (e.g., \"1800 calories per day\")\n3. **Help Me Decide** - Get guidance on determining your calorie needs\n4. **Flexible** - Focus on balanced nutrition rather than strict calorie counting\n\nPlease choose your approach or tell me your specific calorie target.".to_string()
}

fn dietary_prompt(ctx: &TurnContext<'_>) -> String {
    let available = ctx.catalog.meal_dietary_tags();
    let mut text = "🥗 **DIETARY PREFERENCES**\n\nAny dietary restrictions or preferences? You can:\n\n• **Mix and match** from these options:\n".to_string();
    for (category, tags) in DIET_CATEGORIES {
        let offered: Vec<&str> = tags
            .iter()
            .copied()
            .filter(|t| available.iter().any(|a| a == t))
            .collect();
        if !offered.is_empty() {
            text.push_str(&format!("  - {category}: {}\n", offered.join(", ")));
        }
    }
    text.push_str("\n• **Type 'none'** if you have no restrictions\n• **Combine multiple** like: 'vegetarian and gluten_free'\n• **Tell me your needs** in your own words\n\nWhat dietary preferences should I consider?");
    text
}

fn lifestyle_prompt() -> String {
    "⏱️ **LIFESTYLE & COOKING PREFERENCES**\n\nTell me about your cooking situation:\n\n**Cooking Experience:**\n1. **Beginner** - Simple meals, basic techniques\n2. **Intermediate** - Comfortable with most cooking methods\n3. **Advanced** - Enjoy complex recipes and techniques\n\n**Time Constraints:**\n- **Quick meals only** (≤15 minutes prep)\n- **Moderate time** (15-30 minutes is fine)\n- **I have time to cook** (30+ minutes okay)\n\n**Household size** (how many people?)\n\nYou can answer like: \"Beginner, quick meals, cooking for 2 people\" or answer each part separately.\n\nWhat's your cooking situation?".to_string()
}

fn final_actions_prompt() -> String {
    "🎉 **YOUR MEAL PLAN IS READY!**\n\nWhat would you like to do next?\n\n1. **Generate Grocery List** - Get a complete shopping list with all ingredients\n2. **Export Plan** - A plain-text copy to paste anywhere\n3. **Calendar** - Suggested meal times for your calendar app\n4. **Start Cooking** - Get guidance for your first meal\n5. **Save & Exit** - Keep this plan and finish\n\nChoose your next action!".to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use nutribot_catalog::Catalog;
    use nutribot_store::Session;

    use super::*;

    fn drive(session: &mut Session, catalog: &Catalog, inputs: &[&str]) -> Vec<String> {
        session.start_journey(JourneyKind::MealPlanning);
        let mut ctx = TurnContext::new(session, catalog, Utc::now());
        let mut replies = vec![MealPlanning.start(&mut ctx).unwrap()];
        for input in inputs {
            replies.push(MealPlanning.process_input(&mut ctx, input).unwrap().unwrap_or_default());
        }
        replies
    }

    const TO_DISPLAY: [&str; 6] = ["1", "2", "1800", "vegetarian", "beginner, quick meals, 2 people", "yes"];

    #[test]
    fn scope_parsing() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["2 weeks"]);
        assert!(replies[1].starts_with("Great! I'll create a custom 14-day meal plan"));

        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["30 days", "3", "5 days"]);
        assert!(replies[1].contains("between 1 and 28 days"));
        assert!(replies[2].contains("How many days"));
        assert!(replies[3].contains("custom 5-day meal plan"));
        assert_eq!(session.current_step, Some(2));
    }

    #[test]
    fn calorie_bounds() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "dinner only", "5000", "flexible"]);
        assert!(replies[2].starts_with("Perfect! I'll plan dinner for your 1-day period."));
        assert!(replies[3].contains("seems unusual"));
        assert!(replies[4].contains("~1800 calories/day"));
        assert_eq!(session.current_step, Some(4));
    }

    #[test]
    fn dietary_aliases_resolve_to_tags() {
        let tags = vec!["vegetarian".to_string(), "gluten_free".to_string(), "vegan".to_string()];
        assert_eq!(parse_dietary_tags(&tags, "veggie please"), vec!["vegetarian"]);
        assert_eq!(
            parse_dietary_tags(&tags, "gluten free and vegan"),
            vec!["gluten_free", "vegan"]
        );
        assert!(parse_dietary_tags(&tags, "paleo").is_empty());
    }

    #[test]
    fn full_run_saves_plan() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let mut inputs = TO_DISPLAY.to_vec();
        inputs.extend(["approve", "5"]);
        let replies = drive(&mut session, &catalog, &inputs);

        assert!(replies[5].contains("**Household Size**: 2 people"));
        assert!(replies[6].starts_with("🎉 **YOUR PERSONALIZED MEAL PLAN**"));
        assert!(replies[6].contains("**DAY 1:**"));
        assert!(replies[7].contains("YOUR MEAL PLAN IS READY"));
        assert!(replies[8].contains("MEAL PLAN SAVED SUCCESSFULLY"));
        assert!(replies[8].contains("**Skill level**: Beginner cooking"));
        assert!(session.current_journey.is_none());

        let saved: SavedMealPlan = session
            .user_context
            .get_typed(keys::COMPLETED_MEAL_PLAN)
            .unwrap()
            .unwrap();
        assert_eq!(saved.household_size, 2);
        assert_eq!(saved.plan.slot_count(), 3);
        assert_eq!(saved.plan.request.max_prep_time, Some(15));
    }

    #[test]
    fn regenerate_and_customize() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let mut inputs = TO_DISPLAY.to_vec();
        inputs.extend(["regenerate", "customize", "calories"]);
        let replies = drive(&mut session, &catalog, &inputs);
        assert!(replies[7].starts_with("🔄 **Here's a new meal plan for you:**"));
        assert!(replies[8].contains("CUSTOMIZATION OPTIONS"));
        assert!(replies[9].contains("CALORIE GOALS"));
        assert_eq!(session.current_step, Some(3));
    }

    #[test]
    fn grocery_action_keeps_journey_open() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let mut inputs = TO_DISPLAY.to_vec();
        inputs.extend(["1", "grocery"]);
        let replies = drive(&mut session, &catalog, &inputs);
        assert!(replies[8].contains("GROCERY LIST"));
        assert_eq!(session.current_step, Some(8));
        assert!(session.get_context(keys::COMPLETED_MEAL_PLAN).is_some());
    }

    #[test]
    fn declining_generation_waits() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "2", "2000", "none", "advanced", "not yet"]);
        assert!(replies[6].starts_with("No problem!"));
        assert_eq!(session.current_step, Some(6));
    }
}
