//! Grocery assistance.
//!
//! The list source picks one of three sub-flows (recipes, a saved meal plan,
//! or typed items).  Every sub-flow ends by handing raw lines to
//! [`gathered`], which either consolidates them straight away or, in
//! multiple-source mode, banks them and returns to the source menu.  From
//! consolidation on, the flow is shared: organization preference, the final
//! list, then actions on it.

use nutribot_catalog::RecipeFilter;
use nutribot_kernel::JourneyKind;
use nutribot_planner::text::integers;
use nutribot_planner::{
    ConsolidatedIngredient, GroceryIngredient, IngredientExtractor, ListConsolidator, ListGroup,
    Organization, StoreOrganizer,
};
use nutribot_store::memory::keys;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifacts::{GroceryTemplate, SavedMealPlan};
use crate::error::Result;
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{is_leave_request, normalized, parse_choice, parse_selection};

/// Recipes listed per search.
const RECIPE_PAGE: usize = 10;

/// Items shown in the consolidation preview.
const PREVIEW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ListSource,
    RecipeSelection,
    MealPlanSelection,
    ManualInput,
    OrganizationPreference,
    FinalActions,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::ListSource),
            2 => Some(Self::RecipeSelection),
            3 => Some(Self::MealPlanSelection),
            4 => Some(Self::ManualInput),
            5 => Some(Self::OrganizationPreference),
            6 => Some(Self::FinalActions),
            _ => None,
        }
    }
}

/// Step 6 artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FinalList {
    items: Vec<ConsolidatedIngredient>,
    organization: Organization,
}

/// Build a consolidated, store-ordered grocery list.
pub struct GroceryAssistance;

impl Journey for GroceryAssistance {
    fn kind(&self) -> JourneyKind {
        JourneyKind::GroceryAssistance
    }

    fn start(&self, ctx: &mut TurnContext<'_>) -> Result<String> {
        let handed_off: Option<String> = ctx.context(keys::GROCERY_RECIPE)?;
        if let Some(id) = handed_off {
            ctx.session.user_context.remove(keys::GROCERY_RECIPE);
            let catalog = ctx.catalog;
            if let Some(recipe) = catalog.recipe(&id) {
                info!(recipe_id = %id, "grocery list started from handed-off recipe");
                let raw = IngredientExtractor::new(catalog).from_recipes(&[id.clone()], 1.0);
                let body = consolidate(ctx, raw)?;
                return Ok(format!(
                    "🛒 Let's build a grocery list for **{}**!\n\n{body}",
                    recipe.name
                ));
            }
        }
        Ok(source_prompt(ctx))
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let reply = match Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))? {
            Step::ListSource => list_source(ctx, input)?,
            Step::RecipeSelection => recipe_selection(ctx, input)?,
            Step::MealPlanSelection => meal_plan_selection(ctx, input)?,
            Step::ManualInput => manual_input(ctx, input)?,
            Step::OrganizationPreference => organization_preference(ctx, input)?,
            Step::FinalActions => final_actions(ctx, input)?,
        };
        Ok(Some(reply))
    }
}

// ── sources ──────────────────────────────────────────────────────────

fn list_source(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let multiple = is_multiple(ctx)?;

    match text.as_str() {
        "1" | "recipes" | "from recipes" | "recipe" => {
            ctx.advance(2);
            Ok(recipe_prompt())
        }
        "2" | "meal plan" | "from meal plan" | "meal plans" => {
            if ctx.context::<SavedMealPlan>(keys::COMPLETED_MEAL_PLAN)?.is_none() {
                return Ok("I don't see a saved meal plan yet. Say \"plan my meals\" to create one, or choose another way to build your list (1, 3 or 4).".to_string());
            }
            ctx.advance(3);
            Ok(meal_plan_prompt())
        }
        "3" | "manual" | "manual entry" | "add items" | "specific items" => {
            ctx.advance(4);
            Ok(manual_prompt())
        }
        "4" | "multiple" | "multiple sources" | "combine" | "mix" if !multiple => {
            ctx.record("multiple", &true)?;
            ctx.record("collected", &Vec::<GroceryIngredient>::new())?;
            Ok("🔄 **MULTIPLE SOURCES**\n\nGreat choice! I'll collect ingredients from as many sources as you like and merge them into one list.\n\nWhere should we start?\n1. **Recipes**\n2. **Meal Plan**\n3. **Manual Entry**".to_string())
        }
        "5" | "done" | "finish" | "build" if multiple => {
            let collected: Vec<GroceryIngredient> = ctx.require_decision("collected")?;
            if collected.is_empty() {
                return Ok("Nothing has been added yet. Choose 1-3 to add ingredients from a source.".to_string());
            }
            consolidate(ctx, collected)
        }
        "template" | "saved template" | "use my template" | "use template" => {
            let Some(template) = ctx.context::<GroceryTemplate>(keys::SAVED_GROCERY_TEMPLATE)? else {
                return Ok("You don't have a saved grocery template yet. Choose 1-4 to build a new list.".to_string());
            };
            let list = FinalList {
                items: template.items,
                organization: template.organization,
            };
            let text = render_final_list(ctx, &list);
            ctx.advance_with(6, &list)?;
            Ok(format!("📂 Loaded your saved template.\n\n{text}"))
        }
        _ if multiple => Ok("Please choose 1-3 to add more ingredients, or 5 when you're done.".to_string()),
        _ => Ok("Please choose 1-4 or tell me how you'd like to create your grocery list.".to_string()),
    }
}

fn recipe_selection(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let catalog = ctx.catalog;
    let text = normalized(input);

    if let Some(candidates) = ctx.get::<Vec<String>>(2)? {
        let picked = parse_selection(&text, candidates.len());
        if !picked.is_empty() {
            let ids: Vec<String> = picked.iter().map(|&i| candidates[i].clone()).collect();
            let names: Vec<String> = ids
                .iter()
                .filter_map(|id| catalog.recipe(id).map(|r| r.name.clone()))
                .collect();
            let raw = IngredientExtractor::new(catalog).from_recipes(&ids, 1.0);
            let body = gathered(ctx, raw)?;
            return Ok(format!("📖 Using {}.\n\n{body}", names.join(", ")));
        }
    }

    if ctx.decision::<bool>("browsing_cuisines")?.unwrap_or(false) {
        let cuisines = catalog.cuisine_types();
        if let Some(i) = parse_choice(&text, &cuisines) {
            ctx.forget("browsing_cuisines")?;
            let ids: Vec<String> = catalog
                .filter_recipes(&RecipeFilter::new().with_cuisine(cuisines[i].clone()))
                .into_iter()
                .map(|r| r.id.clone())
                .collect();
            return show_recipes(ctx, ids, &cuisines[i]);
        }
    }

    match text.as_str() {
        "1" | "search" | "search by name" => Ok("Great! What type of recipes are you looking for? (e.g., 'chicken', 'pasta', 'curry')".to_string()),
        "2" | "browse" | "browse by cuisine" | "cuisine" => {
            let cuisines = catalog.cuisine_types();
            if cuisines.is_empty() {
                return Ok("I don't have cuisine information available. Please tell me what type of recipes you're looking for.".to_string());
            }
            ctx.session.state_mut()?.clear_step(2);
            ctx.record("browsing_cuisines", &true)?;
            let mut reply = "🌍 **Available Cuisines:**\n\n".to_string();
            for (i, cuisine) in cuisines.iter().enumerate() {
                reply.push_str(&format!("{}. {cuisine}\n", i + 1));
            }
            reply.push_str("\nChoose a number or tell me which cuisine interests you!");
            Ok(reply)
        }
        "3" | "specific" | "specific recipe" => Ok("Perfect! What's the name of the recipe you want to use?".to_string()),
        "4" | "favorites" | "saved" | "recent" => {
            let saved: Vec<String> = ctx.context(keys::SAVED_RECIPES)?.unwrap_or_default();
            if saved.is_empty() {
                return Ok("You haven't saved any recipes yet. Would you like to search for recipes or tell me a specific recipe name?".to_string());
            }
            show_recipes(ctx, saved, "your saved recipes")
        }
        _ => {
            let mut hits: Vec<String> = catalog
                .search_recipes_by_name(&text)
                .into_iter()
                .map(|r| r.id.clone())
                .collect();
            if hits.is_empty() {
                hits = catalog
                    .filter_recipes(&RecipeFilter::new().with_cuisine(text.clone()))
                    .into_iter()
                    .map(|r| r.id.clone())
                    .collect();
            }
            if hits.is_empty() {
                return Ok(format!(
                    "I couldn't find recipes matching '{}'. Try different keywords like 'chicken', 'curry', or 'Italian'.",
                    input.trim()
                ));
            }
            show_recipes(ctx, hits, &format!("'{}'", input.trim()))
        }
    }
}

fn show_recipes(ctx: &mut TurnContext<'_>, ids: Vec<String>, label: &str) -> Result<String> {
    let catalog = ctx.catalog;
    let shown: Vec<String> = ids.iter().take(RECIPE_PAGE).cloned().collect();
    let mut text = format!("🔍 **Found {} recipes for {label}:**\n\n", ids.len());
    for (i, id) in shown.iter().enumerate() {
        if let Some(recipe) = catalog.recipe(id) {
            text.push_str(&format!(
                "{}. **{}** ({} min)\n   Cuisine: {}\n   Servings: {}\n\n",
                i + 1,
                recipe.name,
                recipe.total_time(),
                recipe.cuisine,
                recipe.servings
            ));
        }
    }
    if ids.len() > RECIPE_PAGE {
        text.push_str(&format!("... and {} more recipes\n\n", ids.len() - RECIPE_PAGE));
    }
    text.push_str("**Select recipes by number** (e.g., '1, 3') or search for something else.");
    ctx.put(2, &shown)?;
    Ok(text)
}

fn meal_plan_selection(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let Some(saved) = ctx.context::<SavedMealPlan>(keys::COMPLETED_MEAL_PLAN)? else {
        ctx.advance(1);
        return Ok(format!(
            "I don't have a meal plan available anymore.\n\n{}",
            source_prompt(ctx)
        ));
    };
    let text = normalized(input);
    let days = match text.as_str() {
        "1" | "current" | "current plan" | "active" | "whole plan" | "all" | "4" | "recent" => {
            saved.plan.days.clone()
        }
        "2" | "specific days" | "specific" => {
            return Ok(format!(
                "Which days would you like ingredients for? Your plan has {} day(s). (e.g., 'Day 1, Day 2' or '1 and 3')",
                saved.plan.days.len()
            ));
        }
        _ => {
            let wanted = integers(&text);
            let picked: Vec<_> = saved
                .plan
                .days
                .iter()
                .enumerate()
                .filter(|(i, _)| wanted.contains(&(*i as u32 + 1)))
                .map(|(_, day)| day.clone())
                .collect();
            if picked.is_empty() {
                return Ok("I didn't understand your selection. Please choose 1 or 2, or tell me which days you want ingredients for.".to_string());
            }
            picked
        }
    };

    let multiplier = f64::from(saved.household_size) / 2.0;
    let raw = IngredientExtractor::new(ctx.catalog).from_meal_plan(&days, multiplier);
    if raw.is_empty() {
        ctx.advance(4);
        return Ok(format!(
            "I couldn't extract ingredients from those days, probably because they hold placeholder meals. Let's add items by hand instead.\n\n{}",
            manual_prompt()
        ));
    }
    let body = gathered(ctx, raw)?;
    Ok(format!(
        "📅 Using {} day(s) of your meal plan, scaled for {} {}.\n\n{body}",
        days.len(),
        saved.household_size,
        if saved.household_size == 1 { "person" } else { "people" }
    ))
}

fn manual_input(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    if matches!(text.as_str(), "1" | "list" | "list format" | "help") {
        return Ok("📝 **List Format Entry**\n\nPlease type your ingredients separated by commas, semicolons or new lines.\n\nExamples:\n• \"2 lbs chicken, 1 cup rice, spinach\"\n• \"eggs, milk, bread, 3 tomatoes\"\n\nWhat ingredients do you need?".to_string());
    }
    let raw = IngredientExtractor::new(ctx.catalog).from_manual(input);
    if raw.is_empty() {
        return Ok("I couldn't parse those ingredients. Try a format like '2 lbs chicken, 1 cup rice, spinach'. What ingredients do you need?".to_string());
    }
    gathered(ctx, raw)
}

/// Bank `raw` in multiple-source mode, otherwise consolidate it.
fn gathered(ctx: &mut TurnContext<'_>, raw: Vec<GroceryIngredient>) -> Result<String> {
    if !is_multiple(ctx)? {
        return consolidate(ctx, raw);
    }
    let added = raw.len();
    let mut collected: Vec<GroceryIngredient> = ctx.require_decision("collected")?;
    collected.extend(raw);
    ctx.record("collected", &collected)?;
    ctx.session.state_mut()?.clear_step(2);
    ctx.advance(1);
    Ok(format!(
        "➕ Added {added} ingredient line(s). {} collected so far.\n\nAdd more from another source?\n1. **Recipes**\n2. **Meal Plan**\n3. **Manual Entry**\n5. **Done** - Build my list",
        collected.len()
    ))
}

fn is_multiple(ctx: &TurnContext<'_>) -> Result<bool> {
    Ok(ctx.decision::<bool>("multiple")?.unwrap_or(false))
}

// ── consolidation and organization ───────────────────────────────────

fn consolidate(ctx: &mut TurnContext<'_>, raw: Vec<GroceryIngredient>) -> Result<String> {
    let items = ListConsolidator::new(ctx.catalog).consolidate(&raw);
    info!(raw = raw.len(), unique = items.len(), "grocery list consolidated");

    let mut text = format!(
        "✅ **INGREDIENT CONSOLIDATION COMPLETE**\n\nFound **{}** ingredients from your sources\nConsolidated to **{}** unique items\n\n📋 **Preview of your ingredients:**\n",
        raw.len(),
        items.len()
    );
    for item in items.iter().take(PREVIEW) {
        text.push_str(&format!("• {}\n", item.checklist_line().trim_start_matches("☐ ")));
    }
    if items.len() > PREVIEW {
        text.push_str(&format!("... and {} more items\n", items.len() - PREVIEW));
    }
    text.push_str("\n📊 **LIST ORGANIZATION**\n\nHow would you like your grocery list organized?\n\n1. **By Store Sections** - Produce, Meat, Dairy, etc. (optimal shopping route)\n2. **By Meal Type** - Breakfast ingredients, lunch ingredients, etc.\n3. **By Recipe** - Keep ingredients for each recipe together\n4. **Alphabetical** - Simple A-Z sorting\n\n**Recommended**: Store sections for the most efficient shopping experience!");

    ctx.advance_with(5, &items)?;
    Ok(text)
}

fn organization_preference(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let organization = match normalized(input).as_str() {
        "1" | "store sections" | "store" | "sections" => Organization::StoreSections,
        "2" | "meal type" | "meals" | "meal" => Organization::MealType,
        "3" | "recipe" | "recipes" | "by recipe" => Organization::Recipe,
        "4" | "alphabetical" | "alphabetic" | "a-z" => Organization::Alphabetical,
        _ => return Ok("Please choose 1-4 or tell me your organization preference.".to_string()),
    };
    let items: Vec<ConsolidatedIngredient> = ctx.require(5, "consolidated ingredients")?;
    let list = FinalList { items, organization };
    let text = render_final_list(ctx, &list);
    ctx.advance_with(6, &list)?;
    Ok(text)
}

// ── final list ───────────────────────────────────────────────────────

fn groups(ctx: &TurnContext<'_>, list: &FinalList) -> Vec<ListGroup> {
    StoreOrganizer::new(ctx.catalog).organize(&list.items, list.organization)
}

fn render_groups(groups: &[ListGroup]) -> String {
    let mut text = String::new();
    for group in groups {
        text.push_str(&format!("{} **{}**\n", group.icon, group.title.to_uppercase()));
        for item in &group.items {
            text.push_str(&format!("  {}\n", item.checklist_line()));
        }
        text.push('\n');
    }
    text
}

fn render_final_list(ctx: &TurnContext<'_>, list: &FinalList) -> String {
    let mut text = format!(
        "🎉 **YOUR GROCERY LIST IS READY!**\n\n📊 **Summary:** {} items organized by {}\n\n",
        list.items.len(),
        list.organization.label()
    );
    text.push_str(&render_groups(&groups(ctx, list)));
    text.push_str("💡 **SHOPPING TIPS:**\n");
    if list.organization == Organization::StoreSections {
        text.push_str("• Follow the list order for optimal shopping route\n• Start with produce, end with frozen/refrigerated items\n");
    }
    text.push_str("• Check expiration dates\n• Bring reusable bags\n\n");
    text.push_str(&actions_prompt());
    text
}

fn actions_prompt() -> String {
    "🎯 **GROCERY LIST ACTIONS**\n\nWhat would you like to do next?\n\n1. **Export List** - Plain text ready to copy\n2. **Share with Others** - Send to family/roommates\n3. **Save as Template** - Reuse this list in the future\n4. **Start Shopping Mode** - Walk the store section by section\n5. **Edit List** - Add, remove, or modify items\n6. **Show Substitutions** - See alternatives for ingredients\n7. **Done** - Finish up\n\nChoose your next action!".to_string()
}

fn final_actions(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let mut list: FinalList = ctx.require(6, "grocery list")?;

    if let Some(rest) = text.strip_prefix("add ") {
        let raw = IngredientExtractor::new(ctx.catalog).from_manual(rest);
        if raw.is_empty() {
            return Ok("I couldn't parse that. Try something like 'add 2 lbs ground beef'.".to_string());
        }
        let consolidator = ListConsolidator::new(ctx.catalog);
        let mut items = list.items.clone();
        items.extend(consolidator.consolidate(&raw));
        list.items = consolidator.consolidate(&items);
        ctx.put(6, &list)?;
        return Ok(format!(
            "➕ Added {} item(s).\n\n{}",
            raw.len(),
            render_final_list(ctx, &list)
        ));
    }

    if let Some(rest) = text.strip_prefix("remove ") {
        let needle = rest.trim();
        let canonical = needle.replace(' ', "_");
        let before = list.items.len();
        list.items.retain(|item| {
            !(item.display_name.to_lowercase().contains(needle) || item.canonical_name.contains(&canonical))
        });
        if list.items.len() == before {
            return Ok(format!("I couldn't find '{needle}' on your list."));
        }
        ctx.put(6, &list)?;
        return Ok(format!(
            "➖ Removed {} item(s).\n\n{}",
            before - list.items.len(),
            render_final_list(ctx, &list)
        ));
    }

    if let Some(section) = ctx.decision::<usize>("shopping_section")? {
        if matches!(text.as_str(), "next" | "n" | "found" | "got it") {
            return shopping_section(ctx, &list, section + 1);
        }
    }

    match text.as_str() {
        "1" | "export" | "export list" => Ok(format!("{}\nAnything else? (1-7)", export_list(ctx, &list))),
        "2" | "share" | "send" | "share list" => Ok("👨‍👩‍👧‍👦 **SHARE GROCERY LIST**\n\nCopy the list above into any messaging app, or export it (option 1) for a plain-text version. Split shopping by store section to divide the work, and share before you go so others can add what they need.\n\nAnything else? (1-7)".to_string()),
        "3" | "template" | "save template" | "save as template" => {
            let template = GroceryTemplate {
                items: list.items.clone(),
                organization: list.organization,
                saved_at: ctx.now,
            };
            ctx.set_context(keys::SAVED_GROCERY_TEMPLATE, &template)?;
            info!(items = template.items.len(), "grocery template saved");
            Ok(format!(
                "💾 **TEMPLATE SAVED SUCCESSFULLY!**\n\nYour template includes all {} ingredients and keeps your {} organization. Next time, say \"make a grocery list\" and type 'template' to start from it.\n\nAnything else? (1-7)",
                list.items.len(),
                list.organization.label()
            ))
        }
        "4" | "shopping" | "shopping mode" | "start shopping" => shopping_section(ctx, &list, 0),
        "5" | "edit" | "modify" | "edit list" => Ok("✏️ **EDIT GROCERY LIST**\n\n**➕ ADD ITEMS:** \"add 2 lbs ground beef\" or \"add bread, 3 apples\"\n**➖ REMOVE ITEMS:** \"remove spinach\"\n\nWhat changes would you like to make?".to_string()),
        "6" | "substitutions" | "alternatives" | "substitutes" => Ok(substitutions(ctx, &list)),
        "7" | "done" | "finish" | "finished" => {
            ctx.complete();
            info!(items = list.items.len(), "grocery list finished");
            Ok(format!(
                "✅ Your grocery list of {} items is all set. Happy shopping! 🛒",
                list.items.len()
            ))
        }
        _ => Ok("Please choose 1-7 or tell me what you'd like to do with your grocery list.".to_string()),
    }
}

/// Show group `index` of the list in shopping mode.
fn shopping_section(ctx: &mut TurnContext<'_>, list: &FinalList, index: usize) -> Result<String> {
    let groups = groups(ctx, list);
    let Some(group) = groups.get(index) else {
        ctx.forget("shopping_section")?;
        return Ok("🎉 You've been through every section. Happy cooking!\n\nAnything else? (1-7)".to_string());
    };
    ctx.record("shopping_section", &index)?;
    let mut text = if index == 0 {
        "🛒 **INTERACTIVE SHOPPING MODE**\n\nI'll walk you through the store one section at a time.\n\n".to_string()
    } else {
        String::new()
    };
    text.push_str(&format!(
        "{} **{}** ({} of {})\n",
        group.icon,
        group.title.to_uppercase(),
        index + 1,
        groups.len()
    ));
    if !group.tips.is_empty() {
        text.push_str(&format!("💡 {}\n", group.tips));
    }
    for item in &group.items {
        text.push_str(&format!("{}\n", item.checklist_line()));
    }
    text.push_str("\n**Found everything in this section?** Type 'next' to continue.");
    Ok(text)
}

fn export_list(ctx: &TurnContext<'_>, list: &FinalList) -> String {
    let mut text = "📧 **EXPORT**\n\nGrocery list\n".to_string();
    for group in groups(ctx, list) {
        text.push_str(&format!("\n{}\n", group.title));
        for item in &group.items {
            text.push_str(&format!("- {}\n", item.checklist_line().trim_start_matches("☐ ")));
        }
    }
    text
}

fn substitutions(ctx: &TurnContext<'_>, list: &FinalList) -> String {
    let restrictions = &ctx.session.user_preferences.dietary_restrictions;
    let mut text = "🔄 **INGREDIENT SUBSTITUTIONS**\n\n".to_string();
    let mut shown = 0;
    for item in &list.items {
        if shown == 5 {
            break;
        }
        let subs = ctx.catalog.substitutions_for(&item.canonical_name, restrictions);
        if subs.is_empty() {
            continue;
        }
        text.push_str(&format!("**{}** alternatives:\n", item.display_name));
        for (i, sub) in subs.iter().take(3).enumerate() {
            text.push_str(&format!("  {}. {}", i + 1, sub.substitute));
            if !sub.ratio.is_empty() {
                text.push_str(&format!(" ({})", sub.ratio));
            }
            if !sub.notes.is_empty() {
                text.push_str(&format!(" - {}", sub.notes));
            }
            text.push('\n');
        }
        text.push('\n');
        shown += 1;
    }
    if shown == 0 {
        text.push_str("No specific substitutions are available for your ingredients, but you can always ask for alternatives while shopping!\n");
    }
    text.push_str("\nAnything else? (1-7)");
    text
}

// ── prompts ──────────────────────────────────────────────────────────

fn source_prompt(ctx: &TurnContext<'_>) -> String {
    let mut text = "🛒 **GROCERY ASSISTANCE - Let's Create Your Shopping List!**\n\nHow would you like to create your grocery list?\n\n1. **From Recipes** - Select recipes and I'll extract all ingredients\n2. **From Meal Plan** - Use your saved meal plan to generate the list\n3. **Manual Entry** - Add specific items you need\n4. **Multiple Sources** - Combine recipes, meal plans, and manual items\n".to_string();
    if ctx.session.user_context.contains(keys::SAVED_GROCERY_TEMPLATE) {
        text.push_str("\nYou also have a saved template. Type 'template' to start from it.\n");
    }
    text.push_str("\nWhat works best for you today?");
    text
}

fn recipe_prompt() -> String {
    "📖 **RECIPE-BASED GROCERY LIST**\n\nHow would you like to select recipes?\n\n1. **Search by Name** - \"chicken\" or \"curry\"\n2. **Browse by Cuisine** - Italian, Mexican, Asian, etc.\n3. **Specific Recipe** - If you know exactly which recipe you want\n4. **Saved Recipes** - Choose from recipes you've saved\n\nOr just type what you're looking for!".to_string()
}

fn meal_plan_prompt() -> String {
    "📅 **MEAL PLAN-BASED GROCERY LIST**\n\nWhich part of your saved meal plan should I shop for?\n\n1. **Whole Plan** - Every day of the plan\n2. **Specific Days** - Choose days (e.g., \"Day 1, Day 2\")\n\nWhich option works for you?".to_string()
}

fn manual_prompt() -> String {
    "✍️ **MANUAL INGREDIENT ENTRY**\n\nType your ingredients separated by commas, semicolons or new lines:\n*Example: \"2 lbs chicken breast, 1 cup rice, spinach, 3 apples\"*\n\nWhat ingredients do you need?".to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use nutribot_catalog::{Catalog, MealType};
    use nutribot_planner::{MealPlanGenerator, MealPlanRequest};
    use nutribot_store::Session;

    use super::*;

    fn drive(session: &mut Session, catalog: &Catalog, inputs: &[&str]) -> Vec<String> {
        session.start_journey(JourneyKind::GroceryAssistance);
        let mut ctx = TurnContext::new(session, catalog, Utc::now());
        let mut replies = vec![GroceryAssistance.start(&mut ctx).unwrap()];
        for input in inputs {
            replies.push(
                GroceryAssistance
                    .process_input(&mut ctx, input)
                    .unwrap()
                    .unwrap_or_default(),
            );
        }
        replies
    }

    #[test]
    fn recipe_search_to_template() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["1", "lasagna", "1", "1", "3", "7"]);
        assert!(replies[2].contains("Classic Lasagna"));
        assert!(replies[3].contains("INGREDIENT CONSOLIDATION COMPLETE"));
        assert!(replies[4].starts_with("🎉 **YOUR GROCERY LIST IS READY!**"));
        assert!(replies[5].contains("TEMPLATE SAVED"));
        assert!(session.current_journey.is_none());
        assert!(session.get_context(keys::SAVED_GROCERY_TEMPLATE).is_some());
    }

    #[test]
    fn manual_entry_then_edits() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(
            &mut session,
            &catalog,
            &["3", "2 lbs chicken breast, 1 cup rice, spinach", "alphabetical", "add 3 apples", "remove spinach"],
        );
        assert!(replies[2].contains("Consolidated to **3** unique items"));
        assert!(replies[3].contains("ALL INGREDIENTS"));
        assert!(replies[4].contains("apples"));
        assert!(!replies[5].to_lowercase().contains("spinach"));
        let list: FinalList = session.state().unwrap().step(6).unwrap().unwrap();
        assert_eq!(list.items.len(), 3);
    }

    #[test]
    fn meal_plan_source_needs_a_saved_plan() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(&mut session, &catalog, &["2"]);
        assert!(replies[1].contains("I don't see a saved meal plan"));
        assert_eq!(session.current_step, Some(1));
    }

    #[test]
    fn meal_plan_days_are_selectable() {
        let catalog = Catalog::embedded().unwrap();
        let request = MealPlanRequest::new(2, vec![MealType::Breakfast, MealType::Dinner], 2000);
        let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
        let mut session = Session::with_id("t");
        session
            .user_context
            .set_typed(
                keys::COMPLETED_MEAL_PLAN,
                &SavedMealPlan {
                    plan,
                    household_size: 4,
                    skill_level: "beginner".into(),
                    saved_at: Utc::now(),
                },
            )
            .unwrap();
        let replies = drive(&mut session, &catalog, &["2", "day 2"]);
        assert!(replies[2].starts_with("📅 Using 1 day(s) of your meal plan, scaled for 4 people."));
        assert_eq!(session.current_step, Some(5));
    }

    #[test]
    fn multiple_sources_accumulate() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(
            &mut session,
            &catalog,
            &["4", "3", "8 oz chicken", "1", "tacos", "1", "5"],
        );
        assert!(replies[3].contains("1 collected so far"));
        assert!(replies[6].starts_with("📖 Using Chicken Tacos."));
        assert!(replies[7].contains("INGREDIENT CONSOLIDATION COMPLETE"));
        let items: Vec<ConsolidatedIngredient> = session.state().unwrap().step(5).unwrap().unwrap();
        let chicken = items.iter().find(|i| i.canonical_name == "chicken_breast").unwrap();
        assert_eq!(chicken.sources.len(), 2);
    }

    #[test]
    fn handed_off_recipe_skips_source_menu() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        session
            .user_context
            .set_typed(keys::GROCERY_RECIPE, &"chickpea_curry")
            .unwrap();
        let replies = drive(&mut session, &catalog, &[]);
        assert!(replies[0].contains("Let's build a grocery list for **Chickpea Spinach Curry**"));
        assert_eq!(session.current_step, Some(5));
        assert!(session.get_context(keys::GROCERY_RECIPE).is_none());
    }

    #[test]
    fn shopping_mode_walks_sections() {
        let catalog = Catalog::embedded().unwrap();
        let mut session = Session::with_id("t");
        let replies = drive(
            &mut session,
            &catalog,
            &["3", "spinach, 1 lb chicken breast", "1", "4", "next", "next"],
        );
        assert!(replies[4].contains("INTERACTIVE SHOPPING MODE"));
        assert!(replies[4].contains("(1 of 2)"));
        assert!(replies[5].contains("(2 of 2)"));
        assert!(replies[6].contains("every section"));
    }
}
