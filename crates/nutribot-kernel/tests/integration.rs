//! Integration tests for the nutribot-kernel crate.
//!
//! These tests exercise the default classifier as other crates use it:
//! one shared instance, many utterances, label strings round-tripping
//! through session state.

use std::sync::Arc;

use nutribot_kernel::{IntentClassifier, JourneyKind};

// ═══════════════════════════════════════════════════════════════════════
//  Priority ordering
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn overlapping_phrases_resolve_by_priority() {
    let classifier = IntentClassifier::with_defaults();

    // "cook this" (guidance) and "recipe for" (discovery) both match.
    assert_eq!(
        classifier.classify("can you help me cook this recipe for lasagna"),
        Some(JourneyKind::CookingGuidance)
    );
    // "meal plan" (planning) and "calorie" (recommendation) both match.
    assert_eq!(
        classifier.classify("make a low calorie meal plan"),
        Some(JourneyKind::MealPlanning)
    );
    // "log food" (tracking) and "grocery list" (grocery) both match.
    assert_eq!(
        classifier.classify("log food from my grocery list"),
        Some(JourneyKind::FoodCalorieTracking)
    );
}

#[test]
fn classification_is_stable_across_calls() {
    let classifier = IntentClassifier::with_defaults();
    let text = "I want a recipe for pasta";
    let first = classifier.classify(text);
    for _ in 0..10 {
        assert_eq!(classifier.classify(text), first);
    }
    assert_eq!(first, Some(JourneyKind::RecipeDiscovery));
}

// ═══════════════════════════════════════════════════════════════════════
//  Shared use
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn classifier_is_shareable_across_threads() {
    let classifier = Arc::new(IntentClassifier::with_defaults());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&classifier);
            std::thread::spawn(move || c.classify("show my food diary"))
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            Some(JourneyKind::FoodCalorieTracking)
        );
    }
}

#[test]
fn confidence_is_reported_for_the_winning_category() {
    let classifier = IntentClassifier::with_defaults();
    let result = classifier
        .classify_with_confidence("guide me through cooking, step by step cook with me")
        .expect("should classify");
    assert_eq!(result.kind, JourneyKind::CookingGuidance);
    assert!(result.confidence > 0.0 && result.confidence <= 1.0);
}

#[test]
fn labels_survive_json_round_trip() {
    for kind in JourneyKind::ALL {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json.as_str(), Some(kind.as_str()));
        let back: JourneyKind = serde_json::from_value(json).unwrap();
        assert_eq!(back, kind);
    }
}
