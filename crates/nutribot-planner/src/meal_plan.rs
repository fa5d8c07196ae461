//! Constrained multi-day meal-plan generation.
//!
//! For every (day, meal type) slot the generator computes a calorie target,
//! pulls a candidate pool from the catalog through an ordered relaxation
//! pipeline, and picks the best-scoring candidate.  Scoring trades calorie
//! proximity (60%) against variety (40%).  A slot whose pool is empty at
//! every relaxation stage receives a labelled placeholder, so generation
//! never fails for lack of matches.

use std::collections::HashSet;

use nutribot_catalog::{Catalog, Macros, Meal, MealFilter, MealType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PlannerError, Result};

/// Calorie target for meal types without a standard weight.
pub const DEFAULT_SLOT_CALORIES: u32 = 400;

/// Calorie distance that still earns part of the proximity score.
const PROXIMITY_TOLERANCE: f64 = 75.0;

/// Variety points for a candidate not used recently.
const UNUSED_SCORE: f64 = 100.0;

/// Variety points for a candidate already used.
const REUSED_SCORE: f64 = 20.0;

// ═══════════════════════════════════════════════════════════════════════
//  Request
// ═══════════════════════════════════════════════════════════════════════

/// Everything the generator needs to know about the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub days: u32,
    pub meal_types: Vec<MealType>,
    pub daily_calorie_target: u32,
    /// Every selected meal must carry all of these tags.
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Upper bound on prep minutes, if any.
    #[serde(default)]
    pub max_prep_time: Option<u32>,
}

impl MealPlanRequest {
    pub fn new(days: u32, meal_types: Vec<MealType>, daily_calorie_target: u32) -> Self {
        Self {
            days,
            meal_types,
            daily_calorie_target,
            dietary_restrictions: Vec::new(),
            max_prep_time: None,
        }
    }

    pub fn with_dietary_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.dietary_restrictions = restrictions;
        self
    }

    pub fn with_max_prep_time(mut self, minutes: u32) -> Self {
        self.max_prep_time = Some(minutes);
        self
    }

    /// Reject requests that cannot produce a plan.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(PlannerError::InvalidRequest {
                reason: "a plan needs at least one day".into(),
            });
        }
        if self.meal_types.is_empty() {
            return Err(PlannerError::InvalidRequest {
                reason: "a plan needs at least one meal type".into(),
            });
        }
        if self.daily_calorie_target == 0 {
            return Err(PlannerError::InvalidRequest {
                reason: "the daily calorie target must be positive".into(),
            });
        }
        Ok(())
    }

    /// Per-slot calorie targets, in request order.
    ///
    /// Standard slots get their share of the daily target (truncated);
    /// anything else gets [`DEFAULT_SLOT_CALORIES`].
    pub fn meal_targets(&self) -> Vec<(MealType, u32)> {
        self.meal_types
            .iter()
            .map(|meal_type| {
                let target = meal_type
                    .calorie_weight()
                    .map(|w| (f64::from(self.daily_calorie_target) * w) as u32)
                    .unwrap_or(DEFAULT_SLOT_CALORIES);
                (meal_type.clone(), target)
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Relaxation pipeline
// ═══════════════════════════════════════════════════════════════════════

/// One stage of the candidate-pool relaxation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    /// Calories within `tolerance` of the target, never below `floor`.
    Within { tolerance: u32, floor: u32 },
    /// Calories ignored; dietary tags and prep time still apply.
    DietaryAndPrepOnly,
}

impl Relaxation {
    /// Stages in the order they are tried.  The first non-empty pool wins.
    pub const PIPELINE: [Relaxation; 3] = [
        Relaxation::Within { tolerance: 100, floor: 0 },
        Relaxation::Within { tolerance: 150, floor: 100 },
        Relaxation::DietaryAndPrepOnly,
    ];

    /// The catalog query this stage runs for one slot.
    pub fn filter(&self, meal_type: &MealType, target: u32, request: &MealPlanRequest) -> MealFilter {
        let mut filter = MealFilter::new()
            .with_meal_type(meal_type.clone())
            .with_dietary_tags(&request.dietary_restrictions);
        if let Some(max) = request.max_prep_time {
            filter = filter.with_max_prep_time(max);
        }
        match *self {
            Relaxation::Within { tolerance, floor } => filter.with_calories(
                target.saturating_sub(tolerance).max(floor),
                target + tolerance,
            ),
            Relaxation::DietaryAndPrepOnly => filter,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Plan
// ═══════════════════════════════════════════════════════════════════════

/// A selected meal in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub meal: Meal,
}

/// One day of the plan, slots in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanDay {
    /// `"Day N"`, 1-based.
    pub label: String,
    pub meals: Vec<PlannedMeal>,
}

impl MealPlanDay {
    pub fn total_calories(&self) -> u32 {
        self.meals.iter().map(|m| m.meal.calories).sum()
    }

    pub fn meal(&self, meal_type: &MealType) -> Option<&Meal> {
        self.meals
            .iter()
            .find(|m| &m.meal_type == meal_type)
            .map(|m| &m.meal)
    }
}

/// Averages and advice computed once per generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub days: u32,
    pub avg_daily_calories: f64,
    /// Average grams per day.
    pub avg_macros: Macros,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
    pub recommendations: Vec<String>,
}

impl NutritionSummary {
    /// Summarize `days` of planned meals.
    pub fn from_days(days: &[MealPlanDay]) -> Self {
        let count = days.len().max(1) as f64;
        let total_calories: u32 = days.iter().map(MealPlanDay::total_calories).sum();
        let total = days
            .iter()
            .flat_map(|d| d.meals.iter())
            .fold(Macros::default(), |acc, m| acc.add(&m.meal.nutrition));

        let avg_daily_calories = f64::from(total_calories) / count;
        let avg_macros = Macros {
            protein: total.protein / count,
            carbs: total.carbs / count,
            fat: total.fat / count,
            fiber: total.fiber / count,
        };
        let pct = |grams: f64, kcal_per_gram: f64| {
            if avg_daily_calories > 0.0 {
                grams * kcal_per_gram / avg_daily_calories * 100.0
            } else {
                0.0
            }
        };
        let protein_pct = pct(avg_macros.protein, 4.0);
        let carbs_pct = pct(avg_macros.carbs, 4.0);
        let fat_pct = pct(avg_macros.fat, 9.0);

        let mut recommendations = Vec::new();
        if protein_pct < 20.0 {
            recommendations.push("Consider adding more protein-rich foods".to_string());
        } else if protein_pct > 35.0 {
            recommendations
                .push("Protein intake is very high - consider balancing with more carbs".to_string());
        }
        if avg_macros.fiber < 25.0 {
            recommendations.push("Try to include more high-fiber foods".to_string());
        } else if avg_macros.fiber > 35.0 {
            recommendations.push("Excellent fiber intake!".to_string());
        }
        if (20.0..=35.0).contains(&protein_pct)
            && (45.0..=65.0).contains(&carbs_pct)
            && (20.0..=35.0).contains(&fat_pct)
        {
            recommendations.push("Your macro balance looks excellent!".to_string());
        }

        Self {
            days: days.len() as u32,
            avg_daily_calories,
            avg_macros,
            protein_pct,
            carbs_pct,
            fat_pct,
            recommendations,
        }
    }
}

/// A complete generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub request: MealPlanRequest,
    pub days: Vec<MealPlanDay>,
    pub summary: NutritionSummary,
}

impl MealPlan {
    /// Number of filled slots across all days.
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.meals.len()).sum()
    }

    /// Number of slots that fell back to a placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter())
            .filter(|m| m.meal.is_placeholder)
            .count()
    }

    /// Ids of every real (non-placeholder) meal in the plan.
    pub fn meal_ids(&self) -> HashSet<String> {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter())
            .filter(|m| !m.meal.is_placeholder)
            .map(|m| m.meal.id.clone())
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Generator
// ═══════════════════════════════════════════════════════════════════════

/// Builds meal plans from the catalog.  Stateless apart from the borrowed
/// catalog; every call to [`generate`](Self::generate) starts fresh.
pub struct MealPlanGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> MealPlanGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Generate a plan with exactly `days × meal_types` slots.
    pub fn generate(&self, request: &MealPlanRequest) -> Result<MealPlan> {
        self.generate_avoiding(request, HashSet::new())
    }

    /// Generate again, treating the meals of `previous` as already used so
    /// the new plan differs wherever the catalog allows.
    pub fn regenerate(&self, request: &MealPlanRequest, previous: &MealPlan) -> Result<MealPlan> {
        self.generate_avoiding(request, previous.meal_ids())
    }

    fn generate_avoiding(&self, request: &MealPlanRequest, mut used: HashSet<String>) -> Result<MealPlan> {
        request.validate()?;
        let targets = request.meal_targets();

        let mut days = Vec::with_capacity(request.days as usize);
        for day in 1..=request.days {
            let mut meals = Vec::with_capacity(targets.len());
            for (meal_type, target) in &targets {
                let meal = match self.candidate_pool(meal_type, *target, request) {
                    Some(pool) => {
                        let mut available: Vec<&Meal> =
                            pool.iter().copied().filter(|m| !used.contains(&m.id)).collect();
                        if available.is_empty() {
                            used.clear();
                            available = pool;
                        }
                        let pick = select_optimal(&available, *target, &used).clone();
                        used.insert(pick.id.clone());
                        if used.len() as f64 > available.len() as f64 * 0.8 {
                            used = HashSet::from([pick.id.clone()]);
                        }
                        pick
                    }
                    None => {
                        warn!(%meal_type, day, "no candidates at any relaxation stage, using placeholder");
                        placeholder(meal_type, day, *target)
                    }
                };
                meals.push(PlannedMeal {
                    meal_type: meal_type.clone(),
                    meal,
                });
            }
            days.push(MealPlanDay {
                label: format!("Day {day}"),
                meals,
            });
        }

        let summary = NutritionSummary::from_days(&days);
        let plan = MealPlan {
            request: request.clone(),
            days,
            summary,
        };
        info!(
            days = request.days,
            slots = plan.slot_count(),
            placeholders = plan.placeholder_count(),
            "meal plan generated"
        );
        Ok(plan)
    }

    /// The first non-empty pool along the relaxation pipeline.
    fn candidate_pool(&self, meal_type: &MealType, target: u32, request: &MealPlanRequest) -> Option<Vec<&'a Meal>> {
        Relaxation::PIPELINE.iter().find_map(|stage| {
            let pool = self
                .catalog
                .filter_meals(&stage.filter(meal_type, target, request));
            debug!(%meal_type, target, ?stage, size = pool.len(), "candidate pool");
            (!pool.is_empty()).then_some(pool)
        })
    }
}

/// Score every candidate and return the best; the first wins ties.
///
/// `pool` must not be empty.
fn select_optimal<'m>(pool: &[&'m Meal], target: u32, used: &HashSet<String>) -> &'m Meal {
    let mut best = pool[0];
    let mut best_score = f64::MIN;
    for &meal in pool {
        let score = score_candidate(meal, target, used);
        if score > best_score {
            best = meal;
            best_score = score;
        }
    }
    best
}

/// `0.6 × proximity + 0.4 × variety`.
pub fn score_candidate(meal: &Meal, target: u32, used: &HashSet<String>) -> f64 {
    let diff = f64::from(meal.calories.abs_diff(target));
    let proximity = (100.0 - diff / PROXIMITY_TOLERANCE * 100.0).max(0.0);
    let variety = if used.contains(&meal.id) {
        REUSED_SCORE
    } else {
        UNUSED_SCORE
    };
    0.6 * proximity + 0.4 * variety
}

fn placeholder(meal_type: &MealType, day: u32, target: u32) -> Meal {
    Meal {
        id: format!("placeholder_{meal_type}_{day}"),
        name: format!("Custom {}", meal_type.label()),
        description: String::new(),
        meal_type: vec![meal_type.clone()],
        calories: target,
        prep_time: 15,
        dietary_tags: Vec::new(),
        nutrition: Macros::default(),
        components: Vec::new(),
        is_placeholder: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: &str, calories: u32, types: &[&str], tags: &[&str], prep: u32) -> Meal {
        Meal {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            meal_type: types.iter().map(|t| MealType::parse(t)).collect(),
            calories,
            prep_time: prep,
            dietary_tags: tags.iter().map(|t| t.to_string()).collect(),
            nutrition: Macros {
                protein: 20.0,
                carbs: 50.0,
                fat: 10.0,
                fiber: 5.0,
            },
            components: Vec::new(),
            is_placeholder: false,
        }
    }

    fn catalog(meals: Vec<Meal>) -> Catalog {
        Catalog::from_parts(Vec::new(), meals, Vec::new(), Vec::new(), Default::default())
    }

    #[test]
    fn targets_follow_standard_weights() {
        let request = MealPlanRequest::new(
            1,
            vec![MealType::Breakfast, MealType::Lunch, MealType::Snack, MealType::parse("brunch")],
            2000,
        );
        let targets: Vec<u32> = request.meal_targets().into_iter().map(|(_, t)| t).collect();
        assert_eq!(targets, vec![400, 700, 200, DEFAULT_SLOT_CALORIES]);
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let catalog = catalog(Vec::new());
        let generator = MealPlanGenerator::new(&catalog);
        let zero_days = MealPlanRequest::new(0, vec![MealType::Lunch], 2000);
        assert!(matches!(
            generator.generate(&zero_days),
            Err(PlannerError::InvalidRequest { .. })
        ));
        let no_types = MealPlanRequest::new(2, Vec::new(), 2000);
        assert!(generator.generate(&no_types).is_err());
    }

    #[test]
    fn relaxation_stages_widen() {
        let request = MealPlanRequest::new(1, vec![MealType::Snack], 1000);
        let strict = Relaxation::PIPELINE[0].filter(&MealType::Snack, 100, &request);
        assert_eq!((strict.min_calories, strict.max_calories), (Some(0), Some(200)));
        let loose = Relaxation::PIPELINE[1].filter(&MealType::Snack, 100, &request);
        assert_eq!((loose.min_calories, loose.max_calories), (Some(100), Some(250)));
        let open = Relaxation::PIPELINE[2].filter(&MealType::Snack, 100, &request);
        assert_eq!(open.min_calories, None);
    }

    #[test]
    fn proximity_dominates_when_both_unused() {
        let used = HashSet::new();
        let close = meal("close", 410, &["lunch"], &[], 10);
        let far = meal("far", 480, &["lunch"], &[], 10);
        assert!(score_candidate(&close, 400, &used) > score_candidate(&far, 400, &used));
    }

    #[test]
    fn variety_penalizes_reuse() {
        let used = HashSet::from(["a".to_string()]);
        let a = meal("a", 400, &["lunch"], &[], 10);
        let b = meal("b", 430, &["lunch"], &[], 10);
        // a: 0.6*100 + 0.4*20 = 68; b: 0.6*60 + 0.4*100 = 76.
        assert!(score_candidate(&b, 400, &used) > score_candidate(&a, 400, &used));
    }

    #[test]
    fn falls_back_to_dietary_only_stage() {
        let catalog = catalog(vec![meal("huge", 1500, &["dinner"], &["vegan"], 10)]);
        let request = MealPlanRequest::new(1, vec![MealType::Dinner], 1000)
            .with_dietary_restrictions(vec!["vegan".into()]);
        let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
        assert_eq!(plan.days[0].meals[0].meal.id, "huge");
        assert_eq!(plan.placeholder_count(), 0);
    }

    #[test]
    fn placeholder_when_nothing_matches() {
        let catalog = catalog(vec![meal("slow", 500, &["dinner"], &[], 90)]);
        let request = MealPlanRequest::new(2, vec![MealType::Dinner], 1500).with_max_prep_time(30);
        let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
        let slot = &plan.days[1].meals[0].meal;
        assert!(slot.is_placeholder);
        assert_eq!(slot.id, "placeholder_dinner_2");
        assert_eq!(slot.name, "Custom Dinner");
        assert_eq!(slot.calories, 525);
        assert_eq!(slot.prep_time, 15);
        assert_eq!(slot.nutrition, Macros::default());
    }

    #[test]
    fn single_candidate_is_reused_every_day() {
        let catalog = catalog(vec![meal("only", 400, &["breakfast"], &[], 5)]);
        let request = MealPlanRequest::new(3, vec![MealType::Breakfast], 2000);
        let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
        assert!(plan.days.iter().all(|d| d.meals[0].meal.id == "only"));
    }

    #[test]
    fn variety_rotates_between_close_candidates() {
        let catalog = catalog(vec![
            meal("a", 400, &["breakfast"], &[], 5),
            meal("b", 410, &["breakfast"], &[], 5),
            meal("c", 420, &["breakfast"], &[], 5),
        ]);
        let request = MealPlanRequest::new(2, vec![MealType::Breakfast], 2000);
        let plan = MealPlanGenerator::new(&catalog).generate(&request).unwrap();
        assert_eq!(plan.days[0].meals[0].meal.id, "a");
        assert_ne!(plan.days[1].meals[0].meal.id, "a");
    }

    #[test]
    fn summary_percentages_and_advice() {
        let day = MealPlanDay {
            label: "Day 1".into(),
            meals: vec![PlannedMeal {
                meal_type: MealType::Lunch,
                meal: meal("m", 800, &["lunch"], &[], 10),
            }],
        };
        let summary = NutritionSummary::from_days(&[day]);
        assert_eq!(summary.avg_daily_calories, 800.0);
        assert_eq!(summary.protein_pct, 10.0);
        assert_eq!(summary.carbs_pct, 25.0);
        assert!(summary.recommendations.contains(&"Consider adding more protein-rich foods".to_string()));
        assert!(summary.recommendations.contains(&"Try to include more high-fiber foods".to_string()));
    }
}
