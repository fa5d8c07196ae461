//! Canonical meal-type tokens.
//!
//! Source data spells meal types inconsistently ("Snacks", "snack",
//! " Dinner").  Every token is normalized here, at the catalog boundary, so
//! filters can compare enum values instead of strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A meal slot within a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    /// Any other slot name (e.g. "brunch"), lowercased.
    Other(String),
}

impl MealType {
    /// The four standard slots in the order a day is displayed.
    pub const STANDARD: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Normalize a raw token.
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim().to_lowercase();
        match token.as_str() {
            "breakfast" | "breakfasts" => Self::Breakfast,
            "lunch" | "lunches" => Self::Lunch,
            "dinner" | "dinners" | "supper" => Self::Dinner,
            "snack" | "snacks" => Self::Snack,
            _ => Self::Other(token),
        }
    }

    /// Lowercase token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Other(token) => token,
        }
    }

    /// Capitalized label for display ("Breakfast", "Brunch").
    pub fn label(&self) -> String {
        let token = self.as_str();
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Share of the daily calorie target this slot receives, if it is a
    /// standard slot.
    pub fn calorie_weight(&self) -> Option<f64> {
        match self {
            Self::Breakfast => Some(0.20),
            Self::Lunch => Some(0.35),
            Self::Dinner => Some(0.35),
            Self::Snack => Some(0.10),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for MealType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for MealType {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<MealType> for String {
    fn from(meal_type: MealType) -> Self {
        meal_type.as_str().to_string()
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_and_case_variants_normalize() {
        assert_eq!(MealType::parse("Snacks"), MealType::Snack);
        assert_eq!(MealType::parse(" snack "), MealType::Snack);
        assert_eq!(MealType::parse("DINNER"), MealType::Dinner);
    }

    #[test]
    fn unknown_tokens_are_kept_lowercased() {
        assert_eq!(MealType::parse("Brunch"), MealType::Other("brunch".into()));
        assert_eq!(MealType::parse("Brunch").label(), "Brunch");
        assert_eq!(MealType::parse("brunch").calorie_weight(), None);
    }

    #[test]
    fn serde_normalizes_on_load() {
        let types: Vec<MealType> = serde_json::from_str(r#"["Breakfast", "snacks"]"#).unwrap();
        assert_eq!(types, vec![MealType::Breakfast, MealType::Snack]);
        assert_eq!(serde_json::to_string(&types).unwrap(), r#"["breakfast","snack"]"#);
    }

    #[test]
    fn standard_weights_sum_to_one() {
        let total: f64 = MealType::STANDARD
            .iter()
            .filter_map(MealType::calorie_weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
