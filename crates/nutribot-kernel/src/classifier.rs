//! Priority-ordered intent classifier.
//!
//! The classifier maps a free-text utterance to a [`JourneyKind`] using an
//! explicit, ordered list of `(kind, patterns)` categories.  Text is
//! lowercased once, then categories are tried in order and the first one with
//! any matching pattern wins.
//!
//! Patterns overlap heavily ("guide me through cooking lasagna" also looks
//! like a recipe request), so the category order is part of the behaviour.
//! It lives in a `Vec`, never a map, so routing is reproducible.
//!
//! # Example
//!
//! ```rust
//! # use nutribot_kernel::{IntentClassifier, JourneyKind};
//! let classifier = IntentClassifier::with_defaults();
//!
//! assert_eq!(
//!     classifier.classify("guide me through cooking lasagna"),
//!     Some(JourneyKind::CookingGuidance),
//! );
//! assert_eq!(classifier.classify("what's the weather like"), None);
//! ```

use regex::Regex;
use serde::Serialize;

use crate::error::{KernelError, Result};
use crate::journey::JourneyKind;

// ---------------------------------------------------------------------------
// Default pattern tables
// ---------------------------------------------------------------------------

const COOKING_GUIDANCE: &[&str] = &[
    r"guide.*through.*cooking",
    r"guide.*me.*cooking",
    r"walk.*through.*cooking",
    r"help.*me.*cook",
    r"cooking.*guidance",
    r"interactive.*cooking",
    r"cooking.*assistant",
    r"start.*cooking",
    r"cook.*this",
    r"step.*step.*cook",
    r"cooking.*help",
    r"help.*cook.*this",
    r"cook.*with.*me",
];

const MEAL_PLANNING: &[&str] = &[
    r"meal.*plan",
    r"plan.*meal",
    r"weekly.*plan",
    r"plan.*week",
    r"menu.*plan",
    r"plan.*menu",
    r"create.*meal.*plan",
    r"generate.*meal.*plan",
    r"help.*plan",
    r"daily.*plan",
    r"plan.*eating",
    r"organize.*meal",
    r"schedule.*meal",
    r"meal.*schedule",
    r"eating.*schedule",
];

const RECIPE_DISCOVERY: &[&str] = &[
    r"find.*recipe",
    r"what.*cook",
    r"show.*recipe",
    r"recipe.*for",
    r"want.*recipe",
    r"suggest.*recipe",
    r"search.*recipe",
    r"get.*recipe",
];

const FOOD_CALORIE_TRACKING: &[&str] = &[
    r"track.*calorie",
    r"log.*food",
    r"calorie.*count",
    r"food.*diary",
    r"nutrition.*track",
    r"track.*food",
    r"add.*food",
    r"log.*meal",
    r"food.*log",
    r"track.*what.*ate",
    r"record.*food",
    r"diary.*food",
    r"nutrition.*diary",
    r"calorie.*diary",
    r"food.*tracking",
    r"my.*food.*diary",
    r"show.*diary",
    r"view.*diary",
    r"daily.*food",
    r"track.*eating",
    r"log.*breakfast",
    r"log.*lunch",
    r"log.*dinner",
    r"log.*snack",
];

const GROCERY_ASSISTANCE: &[&str] = &[
    r"grocery.*list",
    r"shopping.*list",
    r"buy.*ingredient",
    r"what.*buy",
    r"grocery.*help",
    r"create.*grocery",
    r"generate.*grocery",
    r"need.*ingredients",
    r"shopping.*assistance",
    r"grocery.*shopping",
    r"make.*list",
    r"ingredient.*list",
    r"what.*ingredients",
    r"go.*shopping",
    r"need.*shop",
    r"grocery.*store",
];

const CALORIE_MEAL_RECOMMENDATION: &[&str] = &[
    r"calorie.*meal",
    r"low.*calorie",
    r"healthy.*meal",
    r"diet.*meal",
    r"weight.*loss",
    r"calorie.*recommendation",
    r"meals.*with.*\d+.*calorie",
    r"find.*meal.*calorie",
    r"need.*\d+.*calorie",
    r"under.*\d+.*calorie",
    r"high.*calorie.*meal",
    r"moderate.*calorie",
    r"calorie.*goal",
    r"calorie.*target",
];

/// The default pattern table for a journey.
fn default_patterns(kind: JourneyKind) -> &'static [&'static str] {
    match kind {
        JourneyKind::CookingGuidance => COOKING_GUIDANCE,
        JourneyKind::MealPlanning => MEAL_PLANNING,
        JourneyKind::RecipeDiscovery => RECIPE_DISCOVERY,
        JourneyKind::FoodCalorieTracking => FOOD_CALORIE_TRACKING,
        JourneyKind::GroceryAssistance => GROCERY_ASSISTANCE,
        JourneyKind::CalorieMealRecommendation => CALORIE_MEAL_RECOMMENDATION,
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A classification result with a rough confidence figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// The winning journey.
    pub kind: JourneyKind,
    /// Fraction of the winning category's patterns that matched, in `0..=1`.
    pub confidence: f64,
    /// The source text of the first pattern that matched.
    pub matched_pattern: String,
}

/// One category: a journey and its compiled patterns, kept in insertion
/// order.
#[derive(Debug, Clone)]
struct Category {
    kind: JourneyKind,
    patterns: Vec<Regex>,
}

// ---------------------------------------------------------------------------
// IntentClassifier
// ---------------------------------------------------------------------------

/// Ordered regex classifier.
///
/// Build once and share; classification takes `&self`.
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    categories: Vec<Category>,
}

impl IntentClassifier {
    /// Create an empty classifier that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Create a classifier with the built-in pattern tables in default
    /// priority order (see [`JourneyKind::ALL`]).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut classifier = Self::new();
        for kind in JourneyKind::ALL {
            for pattern in default_patterns(kind) {
                // The built-in tables are known-good; a failure here would be
                // caught by the unit tests below.
                if let Err(e) = classifier.add_pattern(kind, *pattern) {
                    tracing::error!(error = %e, "built-in pattern rejected");
                }
            }
        }
        classifier
    }

    /// Register a pattern for `kind`.
    ///
    /// A kind seen for the first time is appended at the lowest priority;
    /// patterns for an existing kind join that kind's category without
    /// changing the order.  Returns an error if the regex fails to compile.
    pub fn add_pattern(&mut self, kind: JourneyKind, pattern: impl AsRef<str>) -> Result<()> {
        let pattern = pattern.as_ref();
        let compiled = Regex::new(&pattern.to_lowercase()).map_err(|e| {
            KernelError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;

        match self.categories.iter_mut().find(|c| c.kind == kind) {
            Some(category) => category.patterns.push(compiled),
            None => self.categories.push(Category {
                kind,
                patterns: vec![compiled],
            }),
        }

        tracing::trace!(kind = %kind, pattern = %pattern, "classifier pattern added");
        Ok(())
    }

    /// Map text to a journey, or `None` when no category matches.
    pub fn classify(&self, text: &str) -> Option<JourneyKind> {
        let lowered = text.to_lowercase();
        let kind = self
            .categories
            .iter()
            .find(|c| c.patterns.iter().any(|p| p.is_match(&lowered)))
            .map(|c| c.kind);

        match kind {
            Some(kind) => tracing::debug!(text = %text, kind = %kind, "intent classified"),
            None => tracing::debug!(text = %text, "no intent matched"),
        }
        kind
    }

    /// Like [`classify`](Self::classify) but also reports how strongly the
    /// winning category matched.
    pub fn classify_with_confidence(&self, text: &str) -> Option<Classification> {
        let lowered = text.to_lowercase();
        self.categories.iter().find_map(|category| {
            let matched: Vec<&Regex> = category
                .patterns
                .iter()
                .filter(|p| p.is_match(&lowered))
                .collect();
            let first = matched.first()?;
            Some(Classification {
                kind: category.kind,
                confidence: matched.len() as f64 / category.patterns.len() as f64,
                matched_pattern: first.as_str().to_string(),
            })
        })
    }

    /// Journeys in the order they are tried.
    pub fn priority(&self) -> Vec<JourneyKind> {
        self.categories.iter().map(|c| c.kind).collect()
    }

    /// Total number of registered patterns.
    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compile_every_pattern() {
        let classifier = IntentClassifier::with_defaults();
        let expected: usize = JourneyKind::ALL
            .iter()
            .map(|k| default_patterns(*k).len())
            .sum();
        assert_eq!(classifier.pattern_count(), expected);
        assert_eq!(classifier.priority(), JourneyKind::ALL.to_vec());
    }

    #[test]
    fn cooking_guidance_beats_recipe_discovery() {
        let classifier = IntentClassifier::with_defaults();
        assert_eq!(
            classifier.classify("guide me through cooking lasagna"),
            Some(JourneyKind::CookingGuidance)
        );
    }

    #[test]
    fn each_journey_has_a_reachable_phrase() {
        let classifier = IntentClassifier::with_defaults();
        let cases = [
            ("Help me cook dinner tonight", JourneyKind::CookingGuidance),
            ("Help me plan meals for the week", JourneyKind::MealPlanning),
            ("Find me a recipe with chicken", JourneyKind::RecipeDiscovery),
            ("I want to track my calories", JourneyKind::FoodCalorieTracking),
            ("Create a grocery list", JourneyKind::GroceryAssistance),
            ("I need low calorie meals", JourneyKind::CalorieMealRecommendation),
        ];
        for (text, expected) in cases {
            assert_eq!(classifier.classify(text), Some(expected), "text: {text}");
        }
    }

    #[test]
    fn unmatched_text_returns_none() {
        let classifier = IntentClassifier::with_defaults();
        assert_eq!(classifier.classify("tell me a joke"), None);
        assert_eq!(classifier.classify(""), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let classifier = IntentClassifier::with_defaults();
        assert_eq!(
            classifier.classify("SHOPPING LIST please"),
            Some(JourneyKind::GroceryAssistance)
        );
    }

    #[test]
    fn numeric_calorie_patterns() {
        let classifier = IntentClassifier::with_defaults();
        assert_eq!(
            classifier.classify("meals under 400 calories"),
            Some(JourneyKind::CalorieMealRecommendation)
        );
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let mut classifier = IntentClassifier::new();
        let err = classifier
            .add_pattern(JourneyKind::MealPlanning, "[broken(")
            .unwrap_err();
        match err {
            KernelError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[broken("),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
        assert_eq!(classifier.pattern_count(), 0);
    }

    #[test]
    fn custom_order_is_respected() {
        let mut classifier = IntentClassifier::new();
        classifier
            .add_pattern(JourneyKind::RecipeDiscovery, "lasagna")
            .unwrap();
        classifier
            .add_pattern(JourneyKind::CookingGuidance, "cooking")
            .unwrap();
        assert_eq!(
            classifier.classify("cooking lasagna"),
            Some(JourneyKind::RecipeDiscovery)
        );
    }

    #[test]
    fn confidence_reflects_matched_share() {
        let mut classifier = IntentClassifier::new();
        classifier.add_pattern(JourneyKind::MealPlanning, "meal").unwrap();
        classifier.add_pattern(JourneyKind::MealPlanning, "plan").unwrap();
        classifier.add_pattern(JourneyKind::MealPlanning, "week").unwrap();
        classifier.add_pattern(JourneyKind::MealPlanning, "month").unwrap();

        let result = classifier
            .classify_with_confidence("meal plan for the week")
            .expect("should match");
        assert_eq!(result.kind, JourneyKind::MealPlanning);
        assert!((result.confidence - 0.75).abs() < f64::EPSILON);
        assert_eq!(result.matched_pattern, "meal");
    }
}
