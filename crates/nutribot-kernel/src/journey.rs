//! Journey labels.
//!
//! A [`JourneyKind`] names one of the structured multi-turn conversations the
//! assistant can run.  The string form (`as_str`) is the label stored in
//! session state and written to logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// The closed set of journeys a conversation can be routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyKind {
    /// Step-by-step walkthrough of a single recipe.
    CookingGuidance,
    /// Multi-day meal plan generation.
    MealPlanning,
    /// Find and inspect a recipe.
    RecipeDiscovery,
    /// Log foods into a daily diary and report progress.
    FoodCalorieTracking,
    /// Build a consolidated, store-ordered grocery list.
    GroceryAssistance,
    /// Recommend meals that fit a calorie goal.
    CalorieMealRecommendation,
}

impl JourneyKind {
    /// Every journey, in default classification priority order.
    pub const ALL: [JourneyKind; 6] = [
        JourneyKind::CookingGuidance,
        JourneyKind::MealPlanning,
        JourneyKind::RecipeDiscovery,
        JourneyKind::FoodCalorieTracking,
        JourneyKind::GroceryAssistance,
        JourneyKind::CalorieMealRecommendation,
    ];

    /// Stable snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CookingGuidance => "cooking_guidance",
            Self::MealPlanning => "meal_planning",
            Self::RecipeDiscovery => "recipe_discovery",
            Self::FoodCalorieTracking => "food_calorie_tracking",
            Self::GroceryAssistance => "grocery_assistance",
            Self::CalorieMealRecommendation => "calorie_meal_recommendation",
        }
    }

    /// Human-facing title used in greetings and status output.
    pub fn title(&self) -> &'static str {
        match self {
            Self::CookingGuidance => "Cooking Guidance",
            Self::MealPlanning => "Meal Planning",
            Self::RecipeDiscovery => "Recipe Discovery",
            Self::FoodCalorieTracking => "Food Tracking",
            Self::GroceryAssistance => "Grocery Assistance",
            Self::CalorieMealRecommendation => "Calorie-Based Meal Recommendations",
        }
    }
}

impl fmt::Display for JourneyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JourneyKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == label)
            .ok_or(KernelError::UnknownJourney { label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for kind in JourneyKind::ALL {
            let parsed: JourneyKind = kind.as_str().parse().expect("known label");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        let parsed: JourneyKind = " Meal_Planning ".parse().unwrap();
        assert_eq!(parsed, JourneyKind::MealPlanning);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "weather_forecast".parse::<JourneyKind>().unwrap_err();
        assert!(matches!(err, KernelError::UnknownJourney { .. }));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&JourneyKind::FoodCalorieTracking).unwrap();
        assert_eq!(json, "\"food_calorie_tracking\"");
    }
}
