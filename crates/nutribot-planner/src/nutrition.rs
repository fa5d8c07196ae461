//! Food-diary arithmetic: serving scaling, daily totals, balance analysis
//! and goal progress.
//!
//! The diary itself is plain data so it can live in a session's context
//! memory as JSON between turns.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use nutribot_catalog::{Food, Macros, MealType, NutrientProfile, ServingOption};
use serde::{Deserialize, Serialize};

use crate::calorie::MacroPercentages;
use crate::text::{decimals, round1};

// ═══════════════════════════════════════════════════════════════════════
//  Entries and servings
// ═══════════════════════════════════════════════════════════════════════

/// One logged food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub food_id: String,
    pub food_name: String,
    pub serving_id: String,
    pub serving_description: String,
    pub quantity: f64,
    pub calories: u32,
    pub macros: Macros,
    pub meal_type: MealType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FoodEntry {
    /// Log an already-scaled serving of `food`.
    pub fn new(food: &Food, serving: &ServingOption, quantity: f64, meal_type: MealType, timestamp: DateTime<Utc>) -> Self {
        Self {
            food_id: food.id.clone(),
            food_name: food.name.clone(),
            serving_id: serving.id.clone(),
            serving_description: serving.description.clone(),
            quantity,
            calories: serving.calories as u32,
            macros: serving.macros,
            meal_type,
            timestamp,
            notes: None,
        }
    }
}

/// `serving` multiplied by `quantity`: calories truncated, macros to one
/// decimal.  A quantity other than 1 is reflected in the description.
pub fn scale_serving(serving: &ServingOption, quantity: f64) -> ServingOption {
    let description = if quantity == 1.0 {
        serving.description.clone()
    } else {
        format!("{quantity} x {}", serving.description)
    };
    ServingOption {
        id: serving.id.clone(),
        description,
        weight_g: serving.weight_g * quantity,
        calories: (serving.calories * quantity).trunc(),
        macros: serving.macros.scaled(quantity),
    }
}

/// A serving picked from a numbered list, with its multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portion {
    /// Zero-based index into the offered servings.
    pub index: usize,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortionError {
    #[error("Please choose a number between 1 and {count}.")]
    OutOfRange { count: usize },
    #[error("Invalid format. Please use a number (1-{count}) or 'quantity x number' (e.g., '1.5 x 2').")]
    InvalidFormat { count: usize },
}

/// Parse `"2"` (option 2) or `"1.5 x 2"` (1.5 times option 2).
pub fn parse_portion(input: &str, count: usize) -> Result<Portion, PortionError> {
    let input = input.trim().to_lowercase();
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        let choice: usize = input.parse().map_err(|_| PortionError::OutOfRange { count })?;
        return if (1..=count).contains(&choice) {
            Ok(Portion {
                index: choice - 1,
                quantity: 1.0,
            })
        } else {
            Err(PortionError::OutOfRange { count })
        };
    }

    match decimals(&input).as_slice() {
        [quantity, choice, ..] if input.contains('x') && choice.fract() == 0.0 && *quantity > 0.0 => {
            let choice = *choice as usize;
            if (1..=count).contains(&choice) {
                Ok(Portion {
                    index: choice - 1,
                    quantity: *quantity,
                })
            } else {
                Err(PortionError::OutOfRange { count })
            }
        }
        _ => Err(PortionError::InvalidFormat { count }),
    }
}

/// Build a one-off food from `"name, calories, protein, carbs, fat"`.
/// Only the name and calories are required.
pub fn parse_manual_entry(input: &str, now: DateTime<Utc>) -> Option<Food> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    let [name, calories, rest @ ..] = parts.as_slice() else {
        return None;
    };
    if name.is_empty() {
        return None;
    }
    let calories: u32 = calories.parse().ok()?;
    let mut grams = [0.0_f64; 3];
    for (slot, raw) in grams.iter_mut().zip(rest) {
        *slot = raw.parse().ok()?;
    }
    let macros = Macros {
        protein: grams[0],
        carbs: grams[1],
        fat: grams[2],
        fiber: 0.0,
    };

    Some(Food {
        id: format!("custom_{}", now.timestamp_millis()),
        name: name.to_string(),
        category: "custom".to_string(),
        common_names: Vec::new(),
        dietary_tags: Vec::new(),
        allergens: Vec::new(),
        per_100g: NutrientProfile {
            calories: f64::from(calories),
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
            fiber: 0.0,
            sugar: 0.0,
        },
        serving_options: vec![ServingOption {
            id: "serving_custom".to_string(),
            description: "As entered".to_string(),
            weight_g: 100.0,
            calories: f64::from(calories),
            macros,
        }],
    })
}

/// Default slot for a food logged at `hour` (0..24).
pub fn suggest_meal_type(hour: u32) -> MealType {
    match hour {
        5..=10 => MealType::Breakfast,
        11..=15 => MealType::Lunch,
        16..=20 => MealType::Dinner,
        _ => MealType::Snack,
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Diary
// ═══════════════════════════════════════════════════════════════════════

/// Every entry the user has logged, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodDiary {
    pub entries: Vec<FoodEntry>,
}

impl FoodDiary {
    pub fn add(&mut self, entry: FoodEntry) {
        self.entries.push(entry);
    }

    /// Entries logged on `day` (UTC), oldest first.
    pub fn entries_on(&self, day: NaiveDate) -> Vec<&FoodEntry> {
        self.entries
            .iter()
            .filter(|e| e.timestamp.date_naive() == day)
            .collect()
    }

    /// Remove the `index`-th entry (zero-based) of `day`.
    pub fn remove_on(&mut self, day: NaiveDate, index: usize) -> Option<FoodEntry> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.timestamp.date_naive() == day)
            .nth(index)
            .map(|(i, _)| i)?;
        Some(self.entries.remove(position))
    }

    /// Most recent entry per distinct food, newest first.
    pub fn recent_foods(&self, limit: usize) -> Vec<&FoodEntry> {
        let mut sorted: Vec<&FoodEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut seen = std::collections::HashSet::new();
        sorted
            .into_iter()
            .filter(|e| seen.insert(e.food_id.as_str()))
            .take(limit)
            .collect()
    }

    pub fn totals_on(&self, day: NaiveDate) -> DailyTotals {
        DailyTotals::from_entries(self.entries_on(day))
    }
}

/// Calories and count per meal slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealTotals {
    pub calories: u32,
    pub count: usize,
}

/// Sum of a day's entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub entry_count: usize,
    pub calories: u32,
    /// Rounded to one decimal.
    pub macros: Macros,
    /// The four standard slots, always present.
    pub meal_breakdown: BTreeMap<MealType, MealTotals>,
}

impl DailyTotals {
    pub fn from_entries<'e>(entries: impl IntoIterator<Item = &'e FoodEntry>) -> Self {
        let mut totals = Self {
            meal_breakdown: MealType::STANDARD
                .iter()
                .map(|t| (t.clone(), MealTotals::default()))
                .collect(),
            ..Self::default()
        };
        let mut macros = Macros::default();
        for entry in entries {
            totals.entry_count += 1;
            totals.calories += entry.calories;
            macros = macros.add(&entry.macros);
            if let Some(slot) = totals.meal_breakdown.get_mut(&entry.meal_type) {
                slot.calories += entry.calories;
                slot.count += 1;
            }
        }
        totals.macros = macros.scaled(1.0);
        totals
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Balance analysis
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAnalysis {
    pub percentages: MacroPercentages,
    /// 0..=100.
    pub score: u32,
    /// At most four.
    pub insights: Vec<String>,
    /// At most three.
    pub recommendations: Vec<String>,
}

pub fn analyze_balance(totals: &DailyTotals) -> BalanceAnalysis {
    if totals.calories == 0 {
        return BalanceAnalysis {
            percentages: MacroPercentages::default(),
            score: 0,
            insights: vec!["No food entries logged yet today".to_string()],
            recommendations: vec!["Start logging your meals to get nutritional insights".to_string()],
        };
    }

    let pct = MacroPercentages::of(&totals.macros, totals.calories);
    let fiber = totals.macros.fiber;

    BalanceAnalysis {
        percentages: pct,
        score: balance_score(&pct, fiber),
        insights: balance_insights(&pct, fiber, totals.calories),
        recommendations: balance_recommendations(&pct, fiber),
    }
}

fn balance_score(pct: &MacroPercentages, fiber: f64) -> u32 {
    let band = |v: f64, ideal: (f64, f64), ok: (f64, f64)| -> i32 {
        if (ideal.0..=ideal.1).contains(&v) {
            15
        } else if (ok.0..=ok.1).contains(&v) {
            10
        } else {
            -5
        }
    };
    let mut score = 50
        + band(pct.protein, (15.0, 25.0), (10.0, 30.0))
        + band(pct.carbs, (45.0, 65.0), (30.0, 75.0))
        + band(pct.fat, (20.0, 35.0), (15.0, 40.0));
    if fiber >= 25.0 {
        score += 10;
    } else if fiber >= 15.0 {
        score += 5;
    }
    score.clamp(0, 100) as u32
}

fn balance_insights(pct: &MacroPercentages, fiber: f64, calories: u32) -> Vec<String> {
    let mut insights = Vec::new();
    if pct.protein >= 25.0 {
        insights.push("🏋️ Excellent protein intake - great for muscle maintenance!");
    } else if pct.protein < 15.0 {
        insights.push("💪 Consider adding more protein sources to your meals");
    }
    if fiber >= 25.0 {
        insights.push("🌾 Outstanding fiber intake - excellent for digestive health!");
    } else if fiber < 15.0 {
        insights.push("🥬 Try adding more vegetables, fruits, or whole grains for fiber");
    }
    if calories < 1200 {
        insights.push("⚠️ Daily calories seem quite low - ensure you're meeting energy needs");
    } else if calories > 2500 {
        insights.push("🔥 High calorie day - great for active or high-energy days");
    }
    if (pct.carbs - 55.0).abs() <= 10.0 && (pct.fat - 30.0).abs() <= 10.0 {
        insights.push("⚖️ Well-balanced macronutrient distribution!");
    }
    insights.into_iter().take(4).map(String::from).collect()
}

fn balance_recommendations(pct: &MacroPercentages, fiber: f64) -> Vec<String> {
    let mut recs = Vec::new();
    if pct.protein < 15.0 {
        recs.push("Add lean protein: chicken breast, fish, Greek yogurt, or tofu");
    }
    if pct.carbs < 45.0 {
        recs.push("Include healthy carbs: quinoa, sweet potatoes, or whole grain bread");
    } else if pct.carbs > 65.0 {
        recs.push("Balance with more protein and healthy fats");
    }
    if pct.fat < 20.0 {
        recs.push("Add healthy fats: avocado, nuts, olive oil, or salmon");
    } else if pct.fat > 35.0 {
        recs.push("Reduce high-fat foods and focus on lean proteins");
    }
    if fiber < 15.0 {
        recs.push("Boost fiber: add berries, broccoli, beans, or oatmeal");
    }
    recs.into_iter().take(3).map(String::from).collect()
}

// ═══════════════════════════════════════════════════════════════════════
//  Goals
// ═══════════════════════════════════════════════════════════════════════

/// Daily targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 75.0,
            carbs: 275.0,
            fat: 67.0,
        }
    }
}

impl NutritionGoals {
    /// Macro targets derived from a calorie goal (15/55/30 split).
    pub fn from_calories(calories: u32) -> Self {
        let c = f64::from(calories);
        Self {
            calories: c,
            protein: c * 0.15 / 4.0,
            carbs: c * 0.55 / 4.0,
            fat: c * 0.30 / 9.0,
        }
    }

    pub fn progress(&self, totals: &DailyTotals) -> GoalProgress {
        let calories = Progress::new(f64::from(totals.calories), self.calories);
        let protein = Progress::new(totals.macros.protein, self.protein);
        let carbs = Progress::new(totals.macros.carbs, self.carbs);
        let fat = Progress::new(totals.macros.fat, self.fat);
        let average = (calories.percentage + protein.percentage + carbs.percentage + fat.percentage) / 4.0;
        GoalProgress {
            calories,
            protein,
            carbs,
            fat,
            overall: round1(average),
            status: progress_status(average).to_string(),
        }
    }
}

/// Progress toward one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: f64,
    pub goal: f64,
    /// Capped at 100.
    pub percentage: f64,
    pub remaining: f64,
}

impl Progress {
    fn new(current: f64, goal: f64) -> Self {
        let percentage = if goal > 0.0 {
            (current / goal * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            current,
            goal,
            percentage,
            remaining: (goal - current).max(0.0),
        }
    }

    pub fn exceeded(&self) -> bool {
        self.goal > 0.0 && self.current > self.goal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub calories: Progress,
    pub protein: Progress,
    pub carbs: Progress,
    pub fat: Progress,
    /// Mean of the four percentages, one decimal.
    pub overall: f64,
    pub status: String,
}

fn progress_status(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "🎯 Excellent progress - almost there!"
    } else if percentage >= 70.0 {
        "👍 Good progress - keep it up!"
    } else if percentage >= 50.0 {
        "📈 Making progress - you're halfway there!"
    } else if percentage >= 25.0 {
        "🚀 Getting started - stay consistent!"
    } else {
        "💪 Just beginning - every meal counts!"
    }
}

impl GoalProgress {
    /// At most two suggestions.
    pub fn recommendations(&self) -> Vec<String> {
        let mut recs = Vec::new();
        if self.calories.percentage < 50.0 {
            recs.push(
                "You're under halfway to your calorie goal - consider adding a nutritious snack".to_string(),
            );
        } else if self.calories.exceeded() {
            recs.push("You've exceeded your calorie goal - that's okay for active days!".to_string());
        }
        if self.protein.percentage < 70.0 {
            recs.push(format!(
                "Add {:.0}g more protein - try Greek yogurt or lean meat",
                self.protein.remaining
            ));
        }
        if recs.is_empty() {
            recs.push("Great balance! You're on track with your nutrition goals".to_string());
        }
        recs.truncate(2);
        recs
    }

    pub fn badges(&self, entry_count: usize) -> Vec<Badge> {
        let mut badges = Vec::new();
        if self.calories.percentage >= 80.0 {
            badges.push(Badge::CalorieCrusher);
        }
        if self.protein.percentage >= 100.0 {
            badges.push(Badge::ProteinPro);
        }
        if self.overall >= 90.0 {
            badges.push(Badge::GoalGetter);
        }
        if entry_count >= 5 {
            badges.push(Badge::LoggingLegend);
        }
        badges
    }
}

/// Daily achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    CalorieCrusher,
    ProteinPro,
    GoalGetter,
    LoggingLegend,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Self::CalorieCrusher => "🔥 Calorie Crusher",
            Self::ProteinPro => "💪 Protein Pro",
            Self::GoalGetter => "🎯 Goal Getter",
            Self::LoggingLegend => "📝 Logging Legend",
        }
    }
}

/// Meal slot for an entry logged now, by UTC hour.
pub fn suggest_meal_type_now(now: DateTime<Utc>) -> MealType {
    suggest_meal_type(now.hour())
}
