//! Typed catalog records.
//!
//! These mirror the JSON data files.  Optional fields default so that sparse
//! records still load; the loader rejects only structurally broken data.

use serde::{Deserialize, Serialize};

use crate::meal_type::MealType;

// ═══════════════════════════════════════════════════════════════════════
//  Nutrition
// ═══════════════════════════════════════════════════════════════════════

/// Macro nutrients in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    pub protein: f64,
    #[serde(alias = "carbohydrates")]
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Macros {
    /// Every macro multiplied by `factor`, rounded to one decimal.
    pub fn scaled(&self, factor: f64) -> Self {
        let r = |v: f64| (v * factor * 10.0).round() / 10.0;
        Self {
            protein: r(self.protein),
            carbs: r(self.carbs),
            fat: r(self.fat),
            fiber: r(self.fiber),
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Macros) -> Self {
        Self {
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Recipes
// ═══════════════════════════════════════════════════════════════════════

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default = "one")]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub food_id: Option<String>,
}

/// Per-serving nutrition of a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeNutrition {
    pub calories: u32,
    #[serde(flatten)]
    pub macros: Macros,
}

/// A full recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub description: String,
    /// Minutes of preparation.
    #[serde(default)]
    pub prep_time: u32,
    /// Minutes of cooking.
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub nutrition: RecipeNutrition,
}

impl Recipe {
    /// Prep plus cook time, in minutes.
    pub fn total_time(&self) -> u32 {
        self.prep_time + self.cook_time
    }

    /// Case-insensitive tag check.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.dietary_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Meals
// ═══════════════════════════════════════════════════════════════════════

/// One food inside a prepared meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealComponent {
    pub name: String,
    #[serde(default = "one")]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub food_id: Option<String>,
}

/// A meal suggestion: the candidate unit for planning and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meal_type: Vec<MealType>,
    pub calories: u32,
    /// Minutes of preparation.
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub nutrition: Macros,
    #[serde(default)]
    pub components: Vec<MealComponent>,
    /// Set only on meals synthesized by the planner when nothing matched.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
}

impl Meal {
    /// Case-insensitive tag check.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.dietary_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the meal carries every tag in `tags`.
    pub fn has_all_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|tag| self.has_tag(tag))
    }

    /// Whether the meal can fill the given slot.
    pub fn serves(&self, meal_type: &MealType) -> bool {
        self.meal_type.contains(meal_type)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Foods
// ═══════════════════════════════════════════════════════════════════════

/// Nutrient values for 100 g of a food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutrientProfile {
    pub fn macros(&self) -> Macros {
        Macros {
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
        }
    }
}

/// A concrete portion of a food with precomputed nutrition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingOption {
    pub id: String,
    pub description: String,
    pub weight_g: f64,
    pub calories: f64,
    pub macros: Macros,
}

/// A single food with per-100 g nutrition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub per_100g: NutrientProfile,
    /// Explicit portions.  When empty, portions are derived from
    /// `per_100g` and the category.
    #[serde(default)]
    pub serving_options: Vec<ServingOption>,
}

impl Food {
    /// Portions to offer the user.
    ///
    /// Explicit options win.  Otherwise a 100 g portion is always offered,
    /// plus a piece and a large serving for proteins, or a cup for dairy,
    /// vegetables and grains.
    pub fn servings(&self) -> Vec<ServingOption> {
        if !self.serving_options.is_empty() {
            return self.serving_options.clone();
        }

        let mut options = vec![self.portion("serving_100g", "100g", 100.0)];
        match self.category.to_lowercase().as_str() {
            "protein" => {
                options.push(self.portion("serving_85g", "1 piece (85g)", 85.0));
                options.push(self.portion("serving_150g", "1 large serving (150g)", 150.0));
            }
            "dairy" => options.push(self.portion("serving_200g", "1 cup (200g)", 200.0)),
            "vegetable" | "grain" => {
                options.push(self.portion("serving_150g", "1 cup (150g)", 150.0));
            }
            _ => {}
        }
        options
    }

    fn portion(&self, id: &str, description: &str, weight_g: f64) -> ServingOption {
        let factor = weight_g / 100.0;
        ServingOption {
            id: id.to_string(),
            description: description.to_string(),
            weight_g,
            calories: (self.per_100g.calories * factor).floor(),
            macros: self.per_100g.macros().scaled(factor),
        }
    }

    /// All names a user might type for this food, lowercased.
    pub fn search_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.to_lowercase())
            .chain(self.common_names.iter().map(|n| n.to_lowercase()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Cooking instructions
// ═══════════════════════════════════════════════════════════════════════

/// One step of a guided cooking walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingStep {
    pub step_number: u32,
    /// "prep", "cooking", "assembly", "finishing"...
    #[serde(default)]
    pub phase: String,
    pub instruction: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub timer_needed: bool,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub visual_cues: String,
}

impl CookingStep {
    pub fn is_prep(&self) -> bool {
        self.phase.eq_ignore_ascii_case("prep")
    }
}

/// Guided instructions for one recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingInstructions {
    pub recipe_id: String,
    /// Estimated hands-on minutes.
    #[serde(default)]
    pub estimated_active_time: u32,
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    #[serde(default)]
    pub steps: Vec<CookingStep>,
}

impl CookingInstructions {
    /// Generic single-step walkthrough used when a recipe has no guided
    /// instructions.
    pub fn fallback(recipe_id: &str) -> Self {
        Self {
            recipe_id: recipe_id.to_string(),
            estimated_active_time: 30,
            equipment_needed: Vec::new(),
            steps: vec![CookingStep {
                step_number: 1,
                phase: "cooking".to_string(),
                instruction: "Follow the recipe instructions to prepare this dish.".to_string(),
                duration_minutes: 30,
                timer_needed: false,
                temperature: None,
                equipment: Vec::new(),
                tips: "Take your time and taste as you go.".to_string(),
                visual_cues: "Dish should be cooked through and properly seasoned.".to_string(),
            }],
        }
    }

    /// Steps of the given phase, case-insensitively.
    pub fn steps_in_phase<'a>(&'a self, phase: &'a str) -> impl Iterator<Item = &'a CookingStep> {
        self.steps
            .iter()
            .filter(move |s| s.phase.eq_ignore_ascii_case(phase))
    }

    /// Distinct phases, sorted.
    pub fn phases(&self) -> Vec<String> {
        let mut phases: Vec<String> = self
            .steps
            .iter()
            .filter(|s| !s.phase.is_empty())
            .map(|s| s.phase.to_lowercase())
            .collect();
        phases.sort();
        phases.dedup();
        phases
    }
}

fn one() -> f64 {
    1.0
}

fn default_servings() -> u32 {
    4
}
