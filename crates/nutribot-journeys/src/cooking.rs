//! Guided cooking.
//!
//! A recipe is chosen (or handed over through `selected_recipe`), scaled to
//! the cook's serving count, and walked step by step.  Everything the walk
//! needs between turns (the scaler, the step cursor, running timers) is kept
//! as recorded decisions, so the journey itself stays stateless.
//!
//! Timers are logical: one conversation turn stands for one minute.

use nutribot_catalog::{CookingInstructions, CookingStep, Recipe};
use nutribot_kernel::JourneyKind;
use nutribot_planner::cooking::format_quantity;
use nutribot_planner::text::integers;
use nutribot_planner::{CookingTimer, ServingScaler, StepNavigator, TimeScaling};
use nutribot_store::memory::keys;
use tracing::{debug, info};

use crate::artifacts::CookingLogEntry;
use crate::error::{JourneyError, Result};
use crate::journey::{Journey, TurnContext, out_of_range};
use crate::prompt::{is_leave_request, mentions, normalized, truncate};

const MAX_SERVINGS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    RecipeValidation,
    ServingSetup,
    EquipmentCheck,
    PrepPhase,
    CookingSteps,
    Completion,
}

impl Step {
    fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::RecipeValidation),
            2 => Some(Self::ServingSetup),
            3 => Some(Self::EquipmentCheck),
            4 => Some(Self::PrepPhase),
            5 => Some(Self::CookingSteps),
            6 => Some(Self::Completion),
            _ => None,
        }
    }
}

/// Step-by-step recipe walkthrough with scaling and timers.
pub struct CookingGuidance;

impl Journey for CookingGuidance {
    fn kind(&self) -> JourneyKind {
        JourneyKind::CookingGuidance
    }

    fn start(&self, ctx: &mut TurnContext<'_>) -> Result<String> {
        let handed_off: Option<String> = ctx.context(keys::SELECTED_RECIPE)?;
        if let Some(id) = handed_off {
            ctx.session.user_context.remove(keys::SELECTED_RECIPE);
            if ctx.catalog.recipe(&id).is_some() {
                info!(recipe_id = %id, "cooking started from handed-off recipe");
                return load_recipe(ctx, &id);
            }
        }
        Ok(intro_prompt())
    }

    fn process_input(&self, ctx: &mut TurnContext<'_>, input: &str) -> Result<Option<String>> {
        if is_leave_request(input) {
            return Ok(None);
        }
        let step = ctx.step();
        let reply = match Step::from_number(step).ok_or_else(|| out_of_range(self.kind(), step))? {
            Step::RecipeValidation => recipe_validation(ctx, input)?,
            Step::ServingSetup => serving_setup(ctx, input)?,
            Step::EquipmentCheck => equipment_check(ctx, input)?,
            Step::PrepPhase => prep_phase(ctx, input)?,
            Step::CookingSteps => cooking_steps(ctx, input)?,
            Step::Completion => completion(ctx, input)?,
        };
        Ok(Some(reply))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Loaded recipe
// ═══════════════════════════════════════════════════════════════════════

/// The recipe being cooked, with its guide and current scaling.
struct Loaded<'c> {
    recipe: &'c Recipe,
    guide: CookingInstructions,
    scaler: ServingScaler,
}

impl<'c> Loaded<'c> {
    fn from_ctx(ctx: &TurnContext<'c>) -> Result<Self> {
        let id: String = ctx.require_decision("recipe_id")?;
        let catalog = ctx.catalog;
        let recipe = catalog
            .recipe(&id)
            .ok_or_else(|| JourneyError::missing(format!("recipe `{id}`")))?;
        let guide = catalog
            .cooking_instructions(&id)
            .cloned()
            .unwrap_or_else(|| CookingInstructions::fallback(&id));
        let scaler = ctx
            .decision("scaler")?
            .unwrap_or_else(|| ServingScaler::new(recipe.servings));
        Ok(Self { recipe, guide, scaler })
    }

    /// Steps the cursor walks: everything outside the prep phase, or every
    /// step when the guide has nothing else.
    fn cooking_steps(&self) -> Vec<&CookingStep> {
        let rest: Vec<&CookingStep> = self.guide.steps.iter().filter(|s| !s.is_prep()).collect();
        if rest.is_empty() {
            self.guide.steps.iter().collect()
        } else {
            rest
        }
    }

    /// Prep steps listed up front.  Empty when they are walked instead.
    fn prep_steps(&self) -> Vec<&CookingStep> {
        if self.guide.steps.iter().all(CookingStep::is_prep) {
            return Vec::new();
        }
        self.guide.steps.iter().filter(|s| s.is_prep()).collect()
    }

    /// Step duration at the current serving count.  Prep work grows with
    /// the batch, oven time grows slowly, stovetop time does not change.
    fn minutes(&self, step: &CookingStep) -> u32 {
        if step.duration_minutes == 0 {
            return 0;
        }
        let oven = step
            .temperature
            .as_deref()
            .is_some_and(|t| t.contains("oven") || t.contains('°'));
        let mode = if step.is_prep() {
            TimeScaling::Linear
        } else if oven {
            TimeScaling::Logarithmic
        } else {
            TimeScaling::Fixed
        };
        self.scaler.scale_time(step.duration_minutes, mode)
    }

    fn current_step(&self, nav: &StepNavigator) -> Result<&CookingStep> {
        self.cooking_steps()
            .get(nav.current() as usize - 1)
            .copied()
            .ok_or_else(|| JourneyError::missing(format!("cooking step {}", nav.current())))
    }
}

fn navigator(ctx: &TurnContext<'_>) -> Result<StepNavigator> {
    ctx.require_decision("navigator")
}

fn timers(ctx: &TurnContext<'_>) -> Result<Vec<CookingTimer>> {
    Ok(ctx.decision("timers")?.unwrap_or_default())
}

fn title(text: &str) -> String {
    text.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ═══════════════════════════════════════════════════════════════════════
//  Steps 1-4: choosing and preparing
// ═══════════════════════════════════════════════════════════════════════

fn intro_prompt() -> String {
    "👨‍🍳 **COOKING GUIDANCE - Let's Start Cooking!**\n\nWhat recipe would you like to cook today?\n\n**Options:**\n1. **Tell me the recipe name** (e.g., \"Classic Lasagna\")\n2. **Search for recipes** (e.g., \"chicken\", \"curry\")\n3. **Browse available recipes** - Show me all cookable recipes\n\nWhat sounds good to you?".to_string()
}

fn recipe_validation(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let catalog = ctx.catalog;
    let text = normalized(input);

    if let Ok(n) = text.parse::<usize>() {
        if let Some(candidates) = ctx.get::<Vec<String>>(1)? {
            if let Some(id) = n.checked_sub(1).and_then(|i| candidates.get(i)) {
                return load_recipe(ctx, id);
            }
        }
    }

    match text.as_str() {
        "1" | "recipe name" | "tell me" => Ok("Perfect! What's the name of the recipe you want to cook?".to_string()),
        "2" | "search" | "search for recipes" => Ok("What type of recipe are you looking for? (e.g., 'chicken', 'pasta', 'curry')".to_string()),
        "3" | "browse" | "show all" | "show all recipes" | "available recipes" => {
            let recipes = catalog.cookable_recipes();
            if recipes.is_empty() {
                return Ok("I don't have any cooking instructions available right now.".to_string());
            }
            let mut reply = "📚 **Available Recipes for Cooking:**\n\n".to_string();
            for (i, recipe) in recipes.iter().enumerate() {
                let steps = catalog
                    .cooking_instructions(&recipe.id)
                    .map(|c| c.steps.len())
                    .unwrap_or(0);
                reply.push_str(&format!(
                    "{}. **{}**\n   ⏱️ Time: {} minutes | 📋 Steps: {steps}\n\n",
                    i + 1,
                    recipe.name,
                    catalog.recipe_active_time(&recipe.id)
                ));
            }
            reply.push_str("**Select a recipe by number or tell me the recipe name!**");
            let ids: Vec<String> = recipes.iter().map(|r| r.id.clone()).collect();
            ctx.put(1, &ids)?;
            Ok(reply)
        }
        _ => {
            let term = text.trim_end_matches(" recipes").trim_end_matches(" recipe");
            let matches = catalog.search_recipes_for_cooking(term);
            match matches.as_slice() {
                [] => Ok(format!(
                    "I couldn't find any cookable recipes matching '{}'. Try different keywords or say 'show all recipes'.",
                    input.trim()
                )),
                [only] => {
                    let id = only.id.clone();
                    load_recipe(ctx, &id)
                }
                many => {
                    let mut reply = format!(
                        "🔍 **Found {} recipes matching '{}':**\n\n",
                        many.len(),
                        input.trim()
                    );
                    for (i, recipe) in many.iter().enumerate() {
                        reply.push_str(&format!("{}. **{}** ({} min)\n", i + 1, recipe.name, recipe.total_time()));
                    }
                    reply.push_str("\n**Select by number or tell me which recipe you want to cook!**");
                    let ids: Vec<String> = many.iter().map(|r| r.id.clone()).collect();
                    ctx.put(1, &ids)?;
                    Ok(reply)
                }
            }
        }
    }
}

fn load_recipe(ctx: &mut TurnContext<'_>, id: &str) -> Result<String> {
    let catalog = ctx.catalog;
    let Some(recipe) = catalog.recipe(id) else {
        return Ok("I couldn't load the cooking instructions for that recipe. Please try another recipe.".to_string());
    };
    if catalog.cooking_instructions(id).is_none() {
        debug!(recipe_id = %id, "no guided instructions, using the generic walkthrough");
    }
    ctx.record("recipe_id", &recipe.id)?;
    ctx.record("scaler", &ServingScaler::new(recipe.servings))?;
    ctx.advance(2);
    Ok(format!(
        "🍽️ **SERVING SIZE SETUP - {}**\n\nThis recipe serves **{} people** and takes about **{} minutes** to cook.\n\nHow many servings would you like to make?\n\n**Options:**\n• Type a number (e.g., \"2\", \"6\", \"8\")\n• Say \"same\" to keep the original servings ({})\n• Say \"double\" or \"half\" for quick adjustments\n\nHow many people are you cooking for?",
        recipe.name,
        recipe.servings,
        recipe.total_time(),
        recipe.servings
    ))
}

fn serving_setup(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let mut loaded = Loaded::from_ctx(ctx)?;
    let original = loaded.recipe.servings.max(1);
    let text = normalized(input);

    let target = match text.as_str() {
        "same" | "original" | "keep" => original,
        "double" | "2x" | "twice" => original * 2,
        "half" | "0.5x" | "halve" => (original / 2).max(1),
        "triple" | "3x" => original * 3,
        _ => match integers(&text).first() {
            Some(&n) if (1..=MAX_SERVINGS).contains(&n) => n,
            Some(_) => {
                return Ok(format!(
                    "Please choose between 1 and {MAX_SERVINGS} servings. How many people are you cooking for?"
                ));
            }
            None => {
                return Ok("I didn't understand that. Please tell me how many servings you want (e.g., '4', 'double', 'same').".to_string());
            }
        },
    };

    loaded.scaler.set_target(target);
    ctx.record("scaler", &loaded.scaler)?;
    ctx.advance(3);
    Ok(equipment_summary(&loaded))
}

fn equipment_summary(loaded: &Loaded<'_>) -> String {
    let info = loaded.scaler.info();
    let mut text = "🔧 **EQUIPMENT & INGREDIENTS CHECK**\n\n".to_string();
    if info.scaling_needed {
        text.push_str(&format!(
            "📊 **Scaled for {} servings** ({})\n\n",
            info.target,
            if info.scaling_up { "↗️ scaling up" } else { "↘️ scaling down" }
        ));
    }

    text.push_str("**🛠️ Equipment Needed:**\n");
    if loaded.guide.equipment_needed.is_empty() {
        text.push_str("  • Basic cooking utensils\n");
    }
    for item in &loaded.guide.equipment_needed {
        text.push_str(&format!("  • {}\n", title(item)));
    }

    text.push_str("\n**🥘 Ingredients Needed:**\n");
    for line in loaded.scaler.ingredient_lines(loaded.recipe) {
        text.push_str(&format!("  • {line}\n"));
    }
    text.push_str("\n**Ready to start cooking?**\nSay 'yes' when you have everything ready, or 'missing' if you need to get something.");
    text
}

fn equipment_check(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    match text.as_str() {
        "yes" | "y" | "ready" | "good" | "good to go" | "lets start" | "let's start" | "start" => {
            let loaded = Loaded::from_ctx(ctx)?;
            if loaded.prep_steps().is_empty() {
                return begin_cooking(ctx, &loaded);
            }
            ctx.advance(4);
            Ok(prep_summary(&loaded))
        }
        "no" | "not ready" | "missing" | "need more time" => Ok("⏸️ **No Problem!**\n\nTake your time to gather everything you need.\n\n**What you can do:**\n• **Get missing ingredients** - Say 'cancel', then 'make a grocery list'\n• **Find substitutes** - Tell me what you're missing\n• **Adjust the recipe** - We can modify ingredients if needed\n\nSay **'ready'** when you have everything!".to_string()),
        _ if mentions(&text, &["missing", "dont have", "don't have"]) => Ok("🤔 **Missing Something?**\n\nNo worries! Most ingredients have a stand-in:\n\n• **Missing ingredients** - Check the substitutions in your grocery list\n• **Missing equipment** - A heavy pan or a baking dish usually covers it\n• **Need more time** - Say 'ready' whenever you're set\n\nWhat specifically do you need help with?".to_string()),
        _ => Ok("I didn't catch that. Are you **ready to start cooking** (say 'yes') or do you need more time to prepare?".to_string()),
    }
}

fn prep_summary(loaded: &Loaded<'_>) -> String {
    let prep = loaded.prep_steps();
    let mut text = format!(
        "🥄 **PREP PHASE - {}**\n\nLet's prepare our ingredients first. You have **{} prep steps**:\n\n",
        loaded.recipe.name,
        prep.len()
    );
    for (i, step) in prep.iter().enumerate() {
        text.push_str(&format!("**Step {}:** {}\n", i + 1, step.instruction));
        let minutes = loaded.minutes(step);
        if minutes > 0 {
            text.push_str(&format!("  ⏱️ Time: ~{minutes} minutes\n"));
        }
        if !step.tips.is_empty() {
            text.push_str(&format!("  💡 Tip: {}\n", step.tips));
        }
        text.push('\n');
    }
    text.push_str("**Work through these prep steps at your own pace.**\nSay **'done with prep'** or **'ready to cook'** when you've finished all preparation!");
    text
}

fn prep_phase(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let loaded = Loaded::from_ctx(ctx)?;
    match text.as_str() {
        "done" | "done with prep" | "ready to cook" | "ready" | "finished prep" | "prep done" => {
            begin_cooking(ctx, &loaded)
        }
        "help" | "need help" | "stuck" => Ok("🆘 **Prep Help Available**\n\nWhat do you need help with?\n\n• **Specific technique** - Tell me what you're struggling with\n• **Time management** - Need help organizing the prep steps\n• **Substitutions** - Missing an ingredient or tool\n\nDescribe what you need help with, and I'll guide you through it!".to_string()),
        _ if mentions(&text, &["how long", "time"]) => {
            let total: u32 = loaded.prep_steps().iter().map(|s| loaded.minutes(s)).sum();
            Ok(format!(
                "The prep phase should take about **{total} minutes** total. Take your time and say **'ready to cook'** when finished!"
            ))
        }
        _ => Ok("Take your time with the prep! Say **'done with prep'** when you're ready to start cooking, or ask for **'help'** if you need assistance.".to_string()),
    }
}

fn begin_cooking(ctx: &mut TurnContext<'_>, loaded: &Loaded<'_>) -> Result<String> {
    let nav = StepNavigator::new(loaded.cooking_steps().len() as u32);
    ctx.record("navigator", &nav)?;
    ctx.record("timers", &Vec::<CookingTimer>::new())?;
    let turn = ctx.turn();
    ctx.record("cooking_started_turn", &turn)?;
    ctx.advance(5);
    info!(recipe_id = %loaded.recipe.id, steps = nav.total(), "cooking steps started");
    show_step(loaded, &nav)
}

// ═══════════════════════════════════════════════════════════════════════
//  Step 5: cooking
// ═══════════════════════════════════════════════════════════════════════

fn show_step(loaded: &Loaded<'_>, nav: &StepNavigator) -> Result<String> {
    let step = loaded.current_step(nav)?;
    let progress = nav.progress();
    let minutes = loaded.minutes(step);

    let mut text = format!(
        "👨‍🍳 **STEP {} of {}** ({:.0}% complete)\n\n**🔸 {}**\n\n",
        progress.current, progress.total, progress.percentage, step.instruction
    );
    if minutes > 0 {
        text.push_str(&format!("⏱️ **Time:** {minutes} minutes\n"));
    }
    if let Some(temperature) = &step.temperature {
        text.push_str(&format!("🌡️ **Heat:** {}\n", title(temperature)));
    }
    if !step.equipment.is_empty() {
        let names: Vec<String> = step.equipment.iter().map(|e| title(e)).collect();
        text.push_str(&format!("🛠️ **Equipment:** {}\n", names.join(", ")));
    }
    text.push('\n');
    if !step.tips.is_empty() {
        text.push_str(&format!("💡 **Tip:** {}\n", step.tips));
    }
    if !step.visual_cues.is_empty() {
        text.push_str(&format!("👀 **Look for:** {}\n", step.visual_cues));
    }
    text.push('\n');

    let timed = minutes > 0 && step.timer_needed;
    if timed {
        text.push_str("**⏰ TIMER AVAILABLE** - Say 'start timer' to begin countdown\n");
    }
    text.push_str("**Navigation:**\n• **'next'** - Continue to next step\n• **'repeat'** - Show this step again\n");
    if !progress.is_first {
        text.push_str("• **'back'** - Go to previous step\n");
    }
    text.push_str("• **'pause'** - Pause cooking session\n");
    if timed {
        text.push_str("• **'check timer'** - See how long is left\n");
    }
    Ok(text)
}

fn cooking_steps(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let loaded = Loaded::from_ctx(ctx)?;
    let mut nav = navigator(ctx)?;

    if ctx.decision::<bool>("paused")?.unwrap_or(false) {
        return match text.as_str() {
            "resume" | "resume cooking" | "continue cooking" | "continue" | "unpause" => {
                let turn = ctx.turn();
                let mut running = timers(ctx)?;
                for timer in &mut running {
                    timer.resume(turn);
                }
                ctx.record("timers", &running)?;
                ctx.forget("paused")?;
                Ok(format!("▶️ **Welcome back!**\n\n{}", show_step(&loaded, &nav)?))
            }
            "status" | "progress" | "cooking status" | "where am i" => cooking_status(ctx, &loaded, &nav),
            _ => Ok("⏸️ Your cooking session is paused. Say **'resume cooking'** to pick up where you left off.".to_string()),
        };
    }

    match text.as_str() {
        "timer" | "start timer" | "set timer" => start_timer(ctx, &loaded, &nav),
        "check timer" | "check timers" | "timer status" => check_timers(ctx),
        "next" | "continue" | "done" | "finished" => {
            if nav.progress().is_last {
                nav.mark_complete(nav.current());
                ctx.record("navigator", &nav)?;
                return finish_cooking(ctx, &loaded, &nav);
            }
            nav.next();
            ctx.record("navigator", &nav)?;
            show_step(&loaded, &nav)
        }
        "back" | "previous" | "prev" => {
            nav.previous();
            ctx.record("navigator", &nav)?;
            Ok(format!("⬅️ **Going back to previous step**\n\n{}", show_step(&loaded, &nav)?))
        }
        "repeat" | "again" | "show again" => {
            Ok(format!("🔄 **Repeating current step**\n\n{}", show_step(&loaded, &nav)?))
        }
        "pause" | "stop" | "hold on" => {
            let turn = ctx.turn();
            let mut running = timers(ctx)?;
            for timer in &mut running {
                timer.pause(turn);
            }
            ctx.record("timers", &running)?;
            ctx.record("paused", &true)?;
            Ok("⏸️ **COOKING SESSION PAUSED**\n\nYour cooking progress has been saved!\n\n**While paused:**\n• All timers are paused\n• Your progress is saved\n\n**To resume cooking:** say **'resume cooking'** and I'll restore your exact position and timers.\n\nTake your time! I'll be here when you're ready to continue.".to_string())
        }
        "help" | "stuck" => cooking_help(&loaded, &nav),
        "status" | "progress" | "cooking status" | "where am i" => cooking_status(ctx, &loaded, &nav),
        _ if mentions(&text, PROBLEM_WORDS) => Ok(troubleshoot(&text)),
        _ => Ok("I didn't understand that command. Try:\n• **'next'** - Continue\n• **'timer'** - Set timer\n• **'repeat'** - Show step again\n• **'help'** - Get assistance".to_string()),
    }
}

fn start_timer(ctx: &mut TurnContext<'_>, loaded: &Loaded<'_>, nav: &StepNavigator) -> Result<String> {
    let step = loaded.current_step(nav)?;
    let minutes = loaded.minutes(step);
    if !step.timer_needed || minutes == 0 {
        return Ok("This step doesn't need a timer. Say 'next' when you're ready to continue.".to_string());
    }

    let turn = ctx.turn();
    let mut running = timers(ctx)?;
    if let Some(existing) = running
        .iter()
        .find(|t| t.step == nav.current() && !t.is_done(turn))
    {
        return Ok(format!(
            "A timer for this step is already running: {} minutes left.",
            existing.remaining(turn)
        ));
    }
    running.push(CookingTimer::start(nav.current(), minutes, turn));
    ctx.record("timers", &running)?;
    debug!(step = nav.current(), minutes, turn, "timer started");

    let mut text = format!("⏰ **TIMER STARTED** - {minutes} minutes\n\nFor: Step {}\n\n", nav.current());
    if !step.visual_cues.is_empty() {
        text.push_str(&format!("**While you wait, look for:** {}\n\n", step.visual_cues));
    }
    text.push_str("Every message counts as a minute on the timer. You can:\n• Continue with other steps\n• Say 'check timer' for status\n• Say 'next' when ready to move on");
    Ok(text)
}

/// Report every timer; finished ones are reported once and dropped.
fn check_timers(ctx: &mut TurnContext<'_>) -> Result<String> {
    let turn = ctx.turn();
    let running = timers(ctx)?;
    let (finished, active): (Vec<CookingTimer>, Vec<CookingTimer>) =
        running.into_iter().partition(|t| t.is_done(turn));

    let mut text = "⏰ **TIMER STATUS**\n\n".to_string();
    if !finished.is_empty() {
        text.push_str("🔔 **FINISHED TIMERS:**\n");
        for timer in &finished {
            text.push_str(&format!("• Step {} ({} min) - ✅ DONE!\n", timer.step, timer.minutes));
        }
        text.push('\n');
    }
    if !active.is_empty() {
        text.push_str("⏳ **ACTIVE TIMERS:**\n");
        for timer in &active {
            text.push_str(&format!(
                "• Step {}: {} minutes left{}\n",
                timer.step,
                timer.remaining(turn),
                if timer.is_paused() { " (paused)" } else { "" }
            ));
        }
        text.push('\n');
    }
    if finished.is_empty() && active.is_empty() {
        text.push_str("No active timers.\n\n");
    }
    text.push_str("Say 'next' to continue cooking!");
    ctx.record("timers", &active)?;
    Ok(text)
}

fn cooking_help(loaded: &Loaded<'_>, nav: &StepNavigator) -> Result<String> {
    let step = loaded.current_step(nav)?;
    let mut text = "🆘 **COOKING HELP**\n\nWhat do you need help with?\n\n**Common Issues:**\n• **'not browning'** - Heat or timing adjustments\n• **'too salty'** - How to fix overseasoning\n• **'not thickening'** - Sauce consistency help\n• **'overcooked'** - Recovery strategies\n\n".to_string();
    if !step.tips.is_empty() {
        text.push_str(&format!("**💡 Current Step Tip:** {}\n\n", step.tips));
    }
    if !step.visual_cues.is_empty() {
        text.push_str(&format!("**👀 What to Look For:** {}\n\n", step.visual_cues));
    }
    text.push_str("Describe your specific problem and I'll help you solve it!");
    Ok(text)
}

const PROBLEM_WORDS: &[&str] = &[
    "not working",
    "problem",
    "wrong",
    "not browning",
    "no color",
    "too salty",
    "oversalted",
    "not thickening",
    "too thin",
    "overcooked",
    "burnt",
];

fn troubleshoot(text: &str) -> String {
    if mentions(text, &["not browning", "no color"]) {
        "🔥 **BROWNING ISSUES**\n\n**Solutions:**\n• **Increase heat** - Try medium-high instead of medium\n• **Don't overcrowd** - Give food space in the pan\n• **Pat dry** - Remove excess moisture from proteins\n• **Wait longer** - Let it develop color before flipping\n\nTry one of these adjustments and continue with the current step!".to_string()
    } else if mentions(text, &["too salty", "oversalted"]) {
        "🧂 **TOO SALTY - RECOVERY OPTIONS**\n\n**Quick fixes:**\n• **Add acid** - Lemon juice or vinegar balances salt\n• **Add dairy** - Yogurt, cream, or cheese helps\n• **Add starch** - Rice, pasta, or bread absorbs salt\n• **Dilute** - Add more base ingredients if possible\n\nApply one of these fixes and continue cooking!".to_string()
    } else if mentions(text, &["not thickening", "too thin"]) {
        "🥄 **THICKENING SOLUTIONS**\n\n**Options:**\n• **Cook longer** - Let liquid reduce naturally\n• **Cornstarch slurry** - Mix 1 tbsp cornstarch + 2 tbsp cold water\n• **Flour roux** - Cook equal parts flour and butter, then add liquid\n\nTry one method and give it a few minutes to work!".to_string()
    } else if mentions(text, &["overcooked", "burnt"]) {
        "🚨 **OVERCOOKED RECOVERY**\n\n**Don't panic! Options:**\n• **Lower heat** - Reduce to prevent further cooking\n• **Add liquid** - Broth or water to deglaze\n• **Adjust seasoning** - May need extra salt or acid\n• **Serve differently** - Turn it into a different dish\n\nAssess the damage and let's adapt the recipe if needed!".to_string()
    } else {
        "🤔 **GENERAL COOKING HELP**\n\nTell me a bit more: what's not working as expected, and how does it look, smell or taste right now?\n\n**Common solutions:**\n• Adjust heat (higher/lower)\n• Give it more time\n• Add liquid or seasoning\n\nDescribe what you're seeing and I'll give you specific guidance!".to_string()
    }
}

fn cooking_status(ctx: &TurnContext<'_>, loaded: &Loaded<'_>, nav: &StepNavigator) -> Result<String> {
    let turn = ctx.turn();
    let progress = nav.progress();
    let step = loaded.current_step(nav)?;
    let mut text = format!(
        "📊 **COOKING STATUS - {}**\n\n**Progress:** Step {} of {} ({:.0}% complete)\n\n**Current Step:** {}\n\n",
        loaded.recipe.name,
        progress.current,
        progress.total,
        progress.percentage,
        truncate(&step.instruction, 100)
    );
    let running = timers(ctx)?;
    let active: Vec<&CookingTimer> = running.iter().filter(|t| !t.is_done(turn)).collect();
    if !active.is_empty() {
        text.push_str(&format!("**Active Timers:** {}\n", active.len()));
        for timer in &active {
            text.push_str(&format!("  • {} min remaining\n", timer.remaining(turn)));
        }
        text.push('\n');
    }
    let finished = running.len() - active.len();
    if finished > 0 {
        text.push_str(&format!("**⏰ {finished} timer(s) finished!**\n\n"));
    }
    text.push_str(&format!("**Cooking Time:** {} minutes elapsed\n\n", elapsed(ctx)?));
    text.push_str("Say 'next' to continue or 'help' if you need assistance!");
    Ok(text)
}

fn elapsed(ctx: &TurnContext<'_>) -> Result<u64> {
    let started: u64 = ctx.decision("cooking_started_turn")?.unwrap_or(0);
    Ok(ctx.turn().saturating_sub(started))
}

// ═══════════════════════════════════════════════════════════════════════
//  Step 6: completion
// ═══════════════════════════════════════════════════════════════════════

fn finish_cooking(ctx: &mut TurnContext<'_>, loaded: &Loaded<'_>, nav: &StepNavigator) -> Result<String> {
    let entry = CookingLogEntry {
        recipe_id: loaded.recipe.id.clone(),
        recipe_name: loaded.recipe.name.clone(),
        servings: loaded.scaler.target,
        rating: None,
        notes: None,
        finished_at: ctx.now,
    };
    ctx.push_context(keys::COOKING_LOG, &entry)?;
    ctx.advance(6);
    info!(recipe_id = %entry.recipe_id, servings = entry.servings, "cooking finished");

    Ok(format!(
        "🎉 **CONGRATULATIONS! You've finished cooking {}!**\n\n**📊 Cooking Summary:**\n• Total cooking time: {} minutes\n• Steps completed: {}\n• Servings made: {}\n\n**🍽️ SERVING SUGGESTIONS:**\n• Let it rest for a few minutes before serving\n• Taste and adjust seasoning if needed\n• Garnish as desired\n\n{}",
        loaded.recipe.name,
        elapsed(ctx)?,
        nav.progress().completed,
        loaded.scaler.target,
        completion_menu()
    ))
}

fn completion_menu() -> String {
    "**What would you like to do next?**\n1. **Rate this recipe** - Share your experience\n2. **Add cooking notes** - Record what you learned\n3. **Share recipe** - Send to friends/family\n4. **Cook something else** - Find another recipe\n5. **Track this meal** - See its nutrition\n6. **Plan leftovers** - Organize remaining food\n7. **Done** - Finish up".to_string()
}

/// Update the newest log entry for `recipe_id`.
fn update_log(ctx: &mut TurnContext<'_>, recipe_id: &str, apply: impl FnOnce(&mut CookingLogEntry)) -> Result<()> {
    let mut log: Vec<CookingLogEntry> = ctx.context(keys::COOKING_LOG)?.unwrap_or_default();
    if let Some(entry) = log.iter_mut().rev().find(|e| e.recipe_id == recipe_id) {
        apply(entry);
        ctx.set_context(keys::COOKING_LOG, &log)?;
    }
    Ok(())
}

fn completion(ctx: &mut TurnContext<'_>, input: &str) -> Result<String> {
    let text = normalized(input);
    let loaded = Loaded::from_ctx(ctx)?;
    let name = loaded.recipe.name.clone();
    let recipe_id = loaded.recipe.id.clone();

    match ctx.decision::<String>("awaiting")?.as_deref() {
        Some("rating") => {
            let rating = match integers(&text).first() {
                Some(&n) if (1..=5).contains(&n) => n as u8,
                _ => return Ok("Please rate from 1 (didn't work out) to 5 (amazing!).".to_string()),
            };
            update_log(ctx, &recipe_id, |e| e.rating = Some(rating))?;
            ctx.forget("awaiting")?;
            return Ok(format!(
                "{} Thanks! I've saved your {rating}-star rating for {name}.\n\nAnything else? (1-7)",
                "⭐".repeat(rating as usize)
            ));
        }
        Some("notes") => {
            let notes = input.trim().to_string();
            update_log(ctx, &recipe_id, |e| e.notes = Some(notes))?;
            ctx.forget("awaiting")?;
            return Ok(format!("📝 Notes saved for {name}. They'll be here next time you cook it.\n\nAnything else? (1-7)"));
        }
        _ => {}
    }

    match text.as_str() {
        "1" | "rate" | "rate recipe" | "rating" => {
            ctx.record("awaiting", &"rating")?;
            Ok(format!(
                "⭐ **RATE THIS RECIPE**\n\nHow would you rate your cooking experience with {name}?\n\n**Rating Scale:**\n⭐ 1 - Didn't work out\n⭐⭐ 2 - Needs improvement\n⭐⭐⭐ 3 - Good\n⭐⭐⭐⭐ 4 - Great\n⭐⭐⭐⭐⭐ 5 - Amazing!\n\nType a number (1-5)!"
            ))
        }
        "2" | "notes" | "add notes" | "cooking notes" => {
            ctx.record("awaiting", &"notes")?;
            Ok(format!(
                "📝 **ADD COOKING NOTES - {name}**\n\nShare your thoughts about cooking this recipe:\n\n• What worked really well?\n• What would you change next time?\n• Any substitutions you made?\n\nTell me your notes and I'll save them for future reference!"
            ))
        }
        "3" | "share" | "share recipe" => {
            let mut reply = format!(
                "📤 **SHARE RECIPE - {name}**\n\nServes {}\n\n",
                loaded.scaler.target
            );
            for line in loaded.scaler.ingredient_lines(loaded.recipe) {
                reply.push_str(&format!("• {line}\n"));
            }
            reply.push('\n');
            for (i, step) in loaded.guide.steps.iter().enumerate() {
                reply.push_str(&format!("{}. {}\n", i + 1, step.instruction));
            }
            reply.push_str("\nReady to copy and send to friends and family!\n\nAnything else? (1-7)");
            Ok(reply)
        }
        "4" | "cook more" | "cook something else" | "another recipe" => {
            ctx.restart(JourneyKind::CookingGuidance);
            Ok(format!("🔍 You're on a cooking roll!\n\n{}", intro_prompt()))
        }
        "5" | "track" | "track meal" | "log meal" => {
            let n = loaded.recipe.nutrition;
            Ok(format!(
                "📊 **TRACK YOUR MEAL - {name}**\n\nOne serving has **{} calories** ({}g protein, {}g carbs, {}g fat). You made {} servings.\n\nTo add it to your food diary, say 'cancel' and then 'track my food'.\n\nAnything else? (1-7)",
                n.calories,
                format_quantity(n.macros.protein),
                format_quantity(n.macros.carbs),
                format_quantity(n.macros.fat),
                loaded.scaler.target
            ))
        }
        "6" | "leftovers" | "plan leftovers" => Ok(format!(
            "📅 **PLAN YOUR LEFTOVERS - {name}**\n\nYou made {} servings.\n\n**Storage & Planning:**\n• Cool leftovers within 2 hours, then refrigerate in airtight containers\n• Eat refrigerated leftovers within 3-4 days, or freeze portions for up to 3 months\n• Reheat until piping hot all the way through\n\nAnything else? (1-7)",
            loaded.scaler.target
        )),
        "7" | "done" | "finish" | "bye" | "no" => {
            ctx.complete();
            Ok(format!("Congratulations on cooking {name}! 👨‍🍳"))
        }
        _ if mentions(&text, &["not good", "bad", "terrible"]) => Ok("😔 Sorry it didn't turn out as expected. Would you like to **add notes** about what went wrong so I can help you improve next time?".to_string()),
        _ if mentions(&text, &["great", "good", "amazing", "delicious"]) => Ok("🌟 Wonderful! I'm so glad it turned out well. Would you like to **rate the recipe** or **cook something else**?".to_string()),
        _ if mentions(&text, &["okay", "fine"]) => Ok("👍 Not bad! Would you like to **add some notes** about what could be improved, or try **cooking something else**?".to_string()),
        _ => Ok("I'd love to hear more! Would you like to **rate the recipe**, **add notes**, or **cook something else**? (1-7)".to_string()),
    }
}
