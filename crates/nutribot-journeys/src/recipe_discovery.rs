//! Recipe discovery: pick a search path, browse matches, inspect one recipe,
//! then hand it on to cooking, saving or grocery shopping.

use nutribot_catalog::{Recipe, RecipeFilter};
use nutribot_kernel::JourneyKind;
use nutribot_store::memory::keys;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{format_options, is_leave_request, normalized, parse_choice, truncate};

const METHODS: [&str; 5] = [
    "Cuisine Type",
    "Available Ingredients",
    "Dietary Restrictions",
    "Cooking Time",
    "Special Occasion",
];

const TIME_OPTIONS: [(&str, u32); 4] = [
    ("Quick (under 15 minutes)", 15),
    ("Medium (15-30 minutes)", 30),
    ("Normal (30-60 minutes)", 60),
    ("Extended (1+ hours)", 999),
];

const OCCASIONS: [&str; 7] = [
    "Weeknight Dinner",
    "Weekend Cooking",
    "Date Night",
    "Family Gathering",
    "Meal Prep",
    "Comfort Food",
    "Healthy Eating",
];

const ACTIONS: [&str; 5] = [
    "Start cooking this recipe",
    "Save recipe for later",
    "Find similar recipes",
    "Search for different recipes",
    "Create grocery list for this recipe",
];

/// Results shown per page.
const PAGE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Method {
    Cuisine,
    Ingredients,
    Dietary,
    Time,
    Occasion,
}

impl Method {
    const ALL: [Method; 5] = [
        Method::Cuisine,
        Method::Ingredients,
        Method::Dietary,
        Method::Time,
        Method::Occasion,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    DiscoveryMethod,
    PathInput,
    Results,
    FinalActions,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            2 => Some(Self::DiscoveryMethod),
            3 => Some(Self::PathInput),
            4 => Some(Self::Results),
            5 => Some(Self::FinalActions),
            _ => None,
        }
    }
}

/// Step 4 artifact: every matching recipe id, best first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ResultPage {
    recipe_ids: Vec<String>,
    /// How many results the user has been shown so far.
    shown: usize,
}

/// Find and inspect a recipe.
pub struct RecipeDiscovery;

impl Journey for RecipeDiscovery {
    fn kind(&self) -> JourneyKind {
        JourneyKind::RecipeDiscovery
    }

    fn start(&self, ctx: &mut TurnContext<'_>) -> Result<String> {
        let mut greeting = "I'd love to help you find the perfect recipe! 🍳".to_string();
        let restrictions = &ctx.session.user_preferences.dietary_restrictions;
        if !restrictions.is_empty() {
            greeting.push_str(&format!(
                " I'll keep in mind your dietary preferences: {}.",
                restrictions.join(", ")
            ));
        }
        ctx.advance(2);
        Ok(format!(
            "{greeting}\n\nHow would you like to discover recipes today?{}",
            format_options(&METHODS, "discovery method")
        ))
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let reply = match Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))? {
            Step::DiscoveryMethod => self.choose_method(ctx, input)?,
            Step::PathInput => self.path_input(ctx, input)?,
            Step::Results => self.pick_result(ctx, input)?,
            Step::FinalActions => self.final_action(ctx, input)?,
        };
        Ok(Some(reply))
    }
}

impl RecipeDiscovery {
    fn choose_method(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let Some(index) = parse_choice(input, &METHODS) else {
            return Ok(format!(
                "I didn't understand that choice. {}",
                format_options(&METHODS, "discovery method")
            ));
        };
        let method = Method::ALL[index];
        ctx.record("discovery_method", &method)?;
        ctx.advance(3);
        Ok(path_prompt(ctx, method))
    }

    fn path_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let catalog = ctx.catalog;
        let method: Method = ctx.require_decision("discovery_method")?;
        let (recipes, context): (Vec<&Recipe>, String) = match method {
            Method::Cuisine => {
                let cuisines = catalog.cuisine_types();
                let Some(i) = parse_choice(input, &cuisines) else {
                    return Ok(format!(
                        "I didn't recognize that cuisine. {}",
                        format_options(&cuisines, "cuisine")
                    ));
                };
                let cuisine = &cuisines[i];
                ctx.record("cuisine_choice", cuisine)?;
                (
                    catalog.filter_recipes(&RecipeFilter::new().with_cuisine(cuisine.clone())),
                    format!("{cuisine} recipes"),
                )
            }
            Method::Ingredients => {
                let ingredients: Vec<String> = input
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if ingredients.is_empty() {
                    return Ok(path_prompt(ctx, method));
                }
                ctx.record("available_ingredients", &ingredients)?;
                (
                    catalog.filter_recipes(&RecipeFilter::new().with_ingredients(&ingredients)),
                    "recipes you can make with your ingredients".to_string(),
                )
            }
            Method::Dietary => {
                let tags = catalog.recipe_dietary_tags();
                let Some(i) = parse_choice(input, &tags) else {
                    return Ok(format!(
                        "I didn't recognize that dietary option. {}",
                        format_options(&tags, "dietary option")
                    ));
                };
                let tag = &tags[i];
                ctx.record("dietary_restriction", tag)?;
                (
                    catalog.filter_recipes(&RecipeFilter::new().with_dietary_tag(tag.clone())),
                    format!("{tag} recipes"),
                )
            }
            Method::Time => {
                let labels: Vec<&str> = TIME_OPTIONS.iter().map(|(l, _)| *l).collect();
                let Some(i) = parse_choice(input, &labels) else {
                    return Ok(format!(
                        "I didn't understand that time option. {}",
                        format_options(&labels, "time option")
                    ));
                };
                let (label, minutes) = TIME_OPTIONS[i];
                ctx.record("cooking_time", &label)?;
                let span = label
                    .split_once('(')
                    .and_then(|(_, rest)| rest.split_once(')'))
                    .map(|(inner, _)| inner)
                    .unwrap_or(label);
                (
                    catalog.filter_recipes(&RecipeFilter::new().with_max_prep_time(minutes)),
                    format!("recipes under {span}"),
                )
            }
            Method::Occasion => {
                let Some(i) = parse_choice(input, &OCCASIONS) else {
                    return Ok(format!(
                        "I didn't recognize that occasion. {}",
                        format_options(&OCCASIONS, "occasion")
                    ));
                };
                let occasion = OCCASIONS[i];
                ctx.record("occasion", &occasion)?;
                let mut hits: Vec<&Recipe> = catalog
                    .recipes()
                    .iter()
                    .filter(|r| r.occasions.iter().any(|o| o.eq_ignore_ascii_case(occasion)))
                    .collect();
                if hits.is_empty() {
                    hits = catalog.recipes().iter().take(10).collect();
                }
                (hits, format!("recipes perfect for {occasion}"))
            }
        };

        if recipes.is_empty() {
            return Ok(format!(
                "I couldn't find any {context}. Would you like to try a different approach?\n\n{}",
                path_prompt(ctx, method)
            ));
        }
        show_results(ctx, &recipes, &context)
    }

    fn pick_result(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let catalog = ctx.catalog;
        let mut page: ResultPage = ctx.require(4, "recipe results")?;
        let choice = normalized(input);

        if choice == "more" {
            if page.recipe_ids.len() <= PAGE {
                return Ok("I've already shown you all available recipes.".to_string());
            }
            let mut text = "Here are more recipes:\n\n".to_string();
            for (i, id) in page.recipe_ids.iter().enumerate().skip(PAGE).take(PAGE) {
                if let Some(recipe) = catalog.recipe(id) {
                    text.push_str(&format!("{}. {}\n{}\n", i + 1, recipe.name, summary_line(recipe)));
                }
            }
            text.push_str("Please enter the number of the recipe you'd like to see:");
            page.shown = page.recipe_ids.len().min(PAGE * 2);
            ctx.put(4, &page)?;
            return Ok(text);
        }

        let limit = page.shown.max(1);
        match choice.parse::<usize>() {
            Ok(n) if (1..=limit).contains(&n) => {
                let id = page.recipe_ids[n - 1].clone();
                match catalog.recipe(&id) {
                    Some(recipe) => {
                        ctx.record("selected_recipe", &id)?;
                        ctx.advance_with(5, &id)?;
                        Ok(recipe_details(ctx, recipe))
                    }
                    None => Ok("I don't have any recipes to show you. Let's start over.".to_string()),
                }
            }
            Ok(_) => Ok(format!(
                "Please enter a number between 1 and {limit}, or type 'more' for additional recipes."
            )),
            Err(_) => Ok("Please enter a number, or type 'more' to see additional recipes.".to_string()),
        }
    }

    fn final_action(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
        let Some(index) = parse_choice(input, &ACTIONS) else {
            return Ok(format!(
                "I didn't understand that choice. {}",
                format_options(&ACTIONS, "action")
            ));
        };
        let catalog = ctx.catalog;
        let id: String = ctx.require(5, "selected recipe")?;
        let recipe = catalog.recipe(&id);
        let name = recipe.map(|r| r.name.clone()).unwrap_or_else(|| "this recipe".to_string());

        match index {
            0 => {
                ctx.set_context(keys::SELECTED_RECIPE, &id)?;
                ctx.complete();
                info!(recipe_id = %id, "recipe handed to cooking guidance");
                Ok(format!(
                    "Perfect! Let's start cooking {name}! Say \"start cooking\" whenever you're ready and I'll guide you through each step."
                ))
            }
            1 => {
                let mut saved: Vec<String> = ctx.context(keys::SAVED_RECIPES)?.unwrap_or_default();
                if !saved.contains(&id) {
                    saved.push(id.clone());
                }
                ctx.set_context(keys::SAVED_RECIPES, &saved)?;
                ctx.complete();
                Ok(format!(
                    "Great! I've saved {name} to your favorites. You now have {} saved recipe{}.",
                    saved.len(),
                    if saved.len() == 1 { "" } else { "s" }
                ))
            }
            2 => {
                let mut similar: Vec<&Recipe> = match recipe {
                    Some(r) => catalog
                        .filter_recipes(&RecipeFilter::new().with_cuisine(r.cuisine.clone()))
                        .into_iter()
                        .filter(|s| s.id != r.id)
                        .collect(),
                    None => Vec::new(),
                };
                if similar.is_empty() {
                    similar = catalog.recipes().iter().filter(|r| r.id != id).take(10).collect();
                }
                show_results(ctx, &similar, &format!("recipes similar to {name}"))
            }
            3 => {
                ctx.restart(self.kind());
                self.start(ctx)
            }
            _ => {
                ctx.set_context(keys::GROCERY_RECIPE, &id)?;
                ctx.complete();
                info!(recipe_id = %id, "recipe handed to grocery assistance");
                Ok(format!(
                    "I'll create a grocery list for {name}! Say \"make a grocery list\" and I'll start with this recipe."
                ))
            }
        }
    }
}

fn path_prompt(ctx: &TurnContext<'_>, method: Method) -> String {
    match method {
        Method::Cuisine => {
            let cuisines = ctx.catalog.cuisine_types();
            if cuisines.is_empty() {
                "I'm sorry, I don't have cuisine data available right now. Let's try a different approach.".to_string()
            } else {
                format!(
                    "What cuisine are you in the mood for?{}",
                    format_options(&cuisines, "cuisine")
                )
            }
        }
        Method::Ingredients => "What ingredients do you have available? Please list them separated by commas.\nFor example: 'chicken, rice, onions, tomatoes'".to_string(),
        Method::Dietary => {
            let tags = ctx.catalog.recipe_dietary_tags();
            if tags.is_empty() {
                "I'm sorry, I don't have dietary restriction data available right now.".to_string()
            } else {
                format!(
                    "What dietary requirements do you have?{}",
                    format_options(&tags, "dietary option")
                )
            }
        }
        Method::Time => {
            let labels: Vec<&str> = TIME_OPTIONS.iter().map(|(l, _)| *l).collect();
            format!(
                "How much time do you have for cooking?{}",
                format_options(&labels, "time option")
            )
        }
        Method::Occasion => format!("What's the occasion?{}", format_options(&OCCASIONS, "occasion")),
    }
}

fn summary_line(recipe: &Recipe) -> String {
    format!(
        "   ⏱️ {} minutes | 📊 {} difficulty\n",
        recipe.prep_time, recipe.difficulty
    )
}

/// Store the hits as the step 4 artifact and render the first page.
fn show_results(ctx: &mut TurnContext<'_>, recipes: &[&Recipe], context: &str) -> Result<String> {
    let page = ResultPage {
        recipe_ids: recipes.iter().map(|r| r.id.clone()).collect(),
        shown: recipes.len().min(PAGE),
    };
    ctx.advance_with(4, &page)?;

    let mut text = format!("Great! I found {} {context}:\n\n", recipes.len());
    for (i, recipe) in recipes.iter().take(PAGE).enumerate() {
        text.push_str(&format!("{}. {}\n{}", i + 1, recipe.name, summary_line(recipe)));
        if !recipe.description.is_empty() {
            text.push_str(&format!("   📝 {}\n", truncate(&recipe.description, 80)));
        }
        text.push('\n');
    }
    if recipes.len() > PAGE {
        text.push_str(&format!("...and {} more recipes!\n\n", recipes.len() - PAGE));
    }
    text.push_str(
        "Please enter the number of the recipe you'd like to see, or type 'more' to see additional recipes:",
    );
    Ok(text)
}

fn recipe_details(ctx: &TurnContext<'_>, recipe: &Recipe) -> String {
    let mut text = format!("🍳 **{}**\n\n", recipe.name);
    if !recipe.description.is_empty() {
        text.push_str(&format!("📝 {}\n\n", recipe.description));
    }
    text.push_str(&format!(
        "⏱️ Prep Time: {} minutes\n🔥 Cook Time: {} minutes\n👥 Servings: {}\n📊 Difficulty: {}\n🔥 Calories: {} per serving\n\n",
        recipe.prep_time, recipe.cook_time, recipe.servings, recipe.difficulty, recipe.nutrition.calories
    ));

    if !recipe.ingredients.is_empty() {
        text.push_str("🛒 **Ingredients:**\n");
        for ing in &recipe.ingredients {
            text.push_str(&format!("• {} {} {}\n", ing.amount, ing.unit, ing.name));
        }
        text.push('\n');
    }

    if let Some(instructions) = ctx.catalog.cooking_instructions(&recipe.id) {
        text.push_str("👩‍🍳 **Instructions Preview:**\n");
        for (i, step) in instructions.steps.iter().take(3).enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, step.instruction));
        }
        if instructions.steps.len() > 3 {
            text.push_str(&format!("...and {} more steps\n", instructions.steps.len() - 3));
        }
        text.push('\n');
    }

    text.push_str("What would you like to do next?\n");
    for (i, action) in ACTIONS.iter().enumerate() {
        text.push_str(&format!("{}. {action}\n", i + 1));
    }
    text
}
