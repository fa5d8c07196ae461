//! Calorie-goal parsing and single-meal nutrition analysis used by the
//! calorie-based recommendation flow.

use nutribot_catalog::{Macros, Meal, MealType};
use serde::{Deserialize, Serialize};

use crate::text::{integers, round1};

/// Daily calorie split used when previewing a whole day of recommendations.
/// Differs from the meal-plan weights: breakfast is heavier, snacks lighter.
pub const DAILY_DISTRIBUTION: [(MealType, f64); 4] = [
    (MealType::Breakfast, 0.25),
    (MealType::Lunch, 0.35),
    (MealType::Dinner, 0.35),
    (MealType::Snack, 0.05),
];

// ═══════════════════════════════════════════════════════════════════════
//  Goals and ranges
// ═══════════════════════════════════════════════════════════════════════

/// Named calorie bands a user can ask for in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieGoal {
    Low,
    Moderate,
    High,
}

impl CalorieGoal {
    pub const ALL: [CalorieGoal; 3] = [CalorieGoal::Low, CalorieGoal::Moderate, CalorieGoal::High];

    pub fn bounds(self) -> (u32, u32) {
        match self {
            Self::Low => (0, 300),
            Self::Moderate => (300, 450),
            Self::High => (450, 1000),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Low => "Low calorie meals (under 300 calories)",
            Self::Moderate => "Moderate calorie meals (300-450 calories)",
            Self::High => "High calorie meals (450+ calories)",
        }
    }
}

/// How a [`CalorieRange`] was derived from the user's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Two numbers were given.
    Range,
    /// One number was given; the range is ±50 around it.
    Specific,
    Goal(CalorieGoal),
}

/// Inclusive calorie bounds for a single meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieRange {
    pub min: u32,
    pub max: u32,
    pub kind: RangeKind,
}

impl CalorieRange {
    pub fn contains(&self, calories: u32) -> bool {
        (self.min..=self.max).contains(&calories)
    }

    /// `"400 calories"` or `"300-500 calories"`.
    pub fn display(&self) -> String {
        format_calorie_range(self.min, self.max)
    }
}

/// Interpret free text as a calorie range.
///
/// Two numbers form a range (reordered if reversed); one number is widened
/// by 50 either way; otherwise goal words pick a band, defaulting to
/// moderate.
pub fn parse_calorie_input(text: &str) -> CalorieRange {
    let lower = text.trim().to_lowercase();
    let numbers = integers(&lower);

    match numbers.as_slice() {
        [a, b] => CalorieRange {
            min: (*a).min(*b),
            max: (*a).max(*b),
            kind: RangeKind::Range,
        },
        [target] => CalorieRange {
            min: target.saturating_sub(50),
            max: target + 50,
            kind: RangeKind::Specific,
        },
        _ => {
            let goal = if ["low", "light", "small"].iter().any(|w| lower.contains(w)) {
                CalorieGoal::Low
            } else if ["high", "large", "big"].iter().any(|w| lower.contains(w)) {
                CalorieGoal::High
            } else {
                CalorieGoal::Moderate
            };
            let (min, max) = goal.bounds();
            CalorieRange {
                min,
                max,
                kind: RangeKind::Goal(goal),
            }
        }
    }
}

/// Split a daily total across the four standard slots (truncated).
pub fn daily_distribution(total_calories: u32) -> Vec<(MealType, u32)> {
    DAILY_DISTRIBUTION
        .iter()
        .map(|(meal_type, share)| (meal_type.clone(), (f64::from(total_calories) * share) as u32))
        .collect()
}

/// Typical calorie bounds for one meal of the given type.
pub fn typical_range(meal_type: &MealType) -> (u32, u32) {
    match meal_type {
        MealType::Breakfast => (185, 315),
        MealType::Lunch => (285, 445),
        MealType::Dinner => (295, 465),
        MealType::Snack => (50, 200),
        MealType::Other(_) => (200, 500),
    }
}

pub fn format_calorie_range(min: u32, max: u32) -> String {
    if min == max {
        format!("{min} calories")
    } else {
        format!("{min}-{max} calories")
    }
}

/// A different range to offer when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAlternative {
    pub min: u32,
    pub max: u32,
    pub description: String,
}

/// Up to three alternatives: the range widened by 100 each way, then every
/// goal band that does not already contain `min`.
pub fn suggest_alternatives(min: u32, max: u32) -> Vec<RangeAlternative> {
    let expanded = RangeAlternative {
        min: min.saturating_sub(100),
        max: max + 100,
        description: "Expand calorie range".to_string(),
    };
    std::iter::once(expanded)
        .chain(CalorieGoal::ALL.iter().filter_map(|goal| {
            let (lo, hi) = goal.bounds();
            (!(lo..=hi).contains(&min)).then(|| RangeAlternative {
                min: lo,
                max: hi,
                description: goal.description().to_string(),
            })
        }))
        .take(3)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
//  Meal analysis
// ═══════════════════════════════════════════════════════════════════════

/// Share of calories from each macro, one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroPercentages {
    pub fn of(macros: &Macros, calories: u32) -> Self {
        if calories == 0 {
            return Self::default();
        }
        let kcal = f64::from(calories);
        Self {
            protein: round1(macros.protein * 4.0 / kcal * 100.0),
            carbs: round1(macros.carbs * 4.0 / kcal * 100.0),
            fat: round1(macros.fat * 9.0 / kcal * 100.0),
        }
    }

    /// Verbal verdict on the split.
    pub fn balance(&self) -> &'static str {
        let within = |v: f64, lo: f64, hi: f64| (lo..=hi).contains(&v);
        if within(self.protein, 15.0, 25.0) && within(self.carbs, 45.0, 65.0) && within(self.fat, 20.0, 35.0) {
            "Excellent macro balance"
        } else if within(self.protein, 10.0, 30.0)
            && within(self.carbs, 30.0, 70.0)
            && within(self.fat, 15.0, 40.0)
        {
            "Good macro balance"
        } else {
            "Could be better balanced"
        }
    }
}

/// Nutrition report for one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAnalysis {
    pub calories: u32,
    pub percentages: MacroPercentages,
    pub insights: Vec<String>,
    pub macro_balance: String,
    /// 0..=100.
    pub health_score: u32,
}

pub fn analyze_meal(meal: &Meal) -> MealAnalysis {
    let calories = meal.calories;
    let nutrition = &meal.nutrition;
    let percentages = MacroPercentages::of(nutrition, calories);

    let mut insights = Vec::new();
    insights.push(
        if percentages.protein >= 25.0 {
            "High protein content - great for muscle building!"
        } else if percentages.protein >= 15.0 {
            "Good protein balance"
        } else {
            "Consider adding protein sources"
        }
        .to_string(),
    );
    if nutrition.fiber >= 10.0 {
        insights.push("Excellent fiber content for digestive health".to_string());
    } else if nutrition.fiber >= 5.0 {
        insights.push("Good fiber content".to_string());
    }
    if calories <= 300 {
        insights.push("Light meal - perfect for weight management".to_string());
    } else if calories >= 500 {
        insights.push("Hearty meal - great for active days".to_string());
    }

    MealAnalysis {
        calories,
        percentages,
        insights,
        macro_balance: percentages.balance().to_string(),
        health_score: health_score(nutrition, calories),
    }
}

fn health_score(nutrition: &Macros, calories: u32) -> u32 {
    let mut score: i32 = 50;
    if nutrition.protein >= 20.0 {
        score += 15;
    } else if nutrition.protein >= 10.0 {
        score += 10;
    }
    if nutrition.fiber >= 8.0 {
        score += 15;
    } else if nutrition.fiber >= 5.0 {
        score += 10;
    }
    if calories > 600 && nutrition.protein < 15.0 {
        score -= 10;
    }
    if (200..=500).contains(&calories) {
        score += 10;
    }
    score.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(calories: u32, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Meal {
        Meal {
            id: "m".into(),
            name: "Meal".into(),
            description: String::new(),
            meal_type: vec![MealType::Lunch],
            calories,
            prep_time: 10,
            dietary_tags: Vec::new(),
            nutrition: Macros {
                protein,
                carbs,
                fat,
                fiber,
            },
            components: Vec::new(),
            is_placeholder: false,
        }
    }

    #[test]
    fn parse_range_in_either_order() {
        let r = parse_calorie_input("500-300");
        assert_eq!((r.min, r.max, r.kind), (300, 500, RangeKind::Range));
        let r = parse_calorie_input("between 200 and 350 calories");
        assert_eq!((r.min, r.max), (200, 350));
    }

    #[test]
    fn parse_specific_number() {
        let r = parse_calorie_input("about 400 calories");
        assert_eq!((r.min, r.max, r.kind), (350, 450, RangeKind::Specific));
        let r = parse_calorie_input("30");
        assert_eq!(r.min, 0);
    }

    #[test]
    fn parse_goal_words() {
        assert_eq!(parse_calorie_input("something light").kind, RangeKind::Goal(CalorieGoal::Low));
        assert_eq!(parse_calorie_input("a BIG meal").kind, RangeKind::Goal(CalorieGoal::High));
        let r = parse_calorie_input("whatever");
        assert_eq!((r.min, r.max), (300, 450));
    }

    #[test]
    fn distribution_truncates() {
        let d = daily_distribution(1999);
        assert_eq!(d[0], (MealType::Breakfast, 499));
        assert_eq!(d[3], (MealType::Snack, 99));
    }

    #[test]
    fn typical_ranges() {
        assert_eq!(typical_range(&MealType::Snack), (50, 200));
        assert_eq!(typical_range(&MealType::parse("brunch")), (200, 500));
    }

    #[test]
    fn range_formatting() {
        assert_eq!(format_calorie_range(400, 400), "400 calories");
        assert_eq!(format_calorie_range(300, 450), "300-450 calories");
    }

    #[test]
    fn alternatives_skip_band_containing_min() {
        let alts = suggest_alternatives(350, 400);
        assert_eq!(alts.len(), 3);
        assert_eq!((alts[0].min, alts[0].max), (250, 500));
        assert_eq!(alts[1].description, CalorieGoal::Low.description());
        assert_eq!(alts[2].description, CalorieGoal::High.description());

        let alts = suggest_alternatives(50, 80);
        assert_eq!(alts[0].min, 0);
    }

    #[test]
    fn balanced_meal_analysis() {
        // 400 kcal: protein 20% carbs 55% fat 25%.
        let analysis = analyze_meal(&meal(400, 20.0, 55.0, 11.1, 10.0));
        assert_eq!(analysis.percentages.protein, 20.0);
        assert_eq!(analysis.percentages.carbs, 55.0);
        assert_eq!(analysis.macro_balance, "Excellent macro balance");
        assert_eq!(analysis.insights[0], "Good protein balance");
        assert_eq!(analysis.insights[1], "Excellent fiber content for digestive health");
        assert_eq!(analysis.health_score, 90);
    }

    #[test]
    fn fiber_just_under_ten_is_good_not_excellent() {
        let analysis = analyze_meal(&meal(400, 20.0, 55.0, 11.1, 9.0));
        assert_eq!(analysis.insights[1], "Good fiber content");
        assert_eq!(analysis.health_score, 90);
    }

    #[test]
    fn heavy_low_protein_meal() {
        let analysis = analyze_meal(&meal(800, 10.0, 120.0, 30.0, 2.0));
        assert_eq!(analysis.insights, vec![
            "Consider adding protein sources".to_string(),
            "Hearty meal - great for active days".to_string(),
        ]);
        assert_eq!(analysis.health_score, 50);
        assert_eq!(analysis.macro_balance, "Could be better balanced");
    }

    #[test]
    fn zero_calorie_meal_has_zero_percentages() {
        let analysis = analyze_meal(&meal(0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(analysis.percentages, MacroPercentages::default());
    }
}
