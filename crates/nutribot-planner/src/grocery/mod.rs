//! Grocery-list building: extraction, consolidation and store organization.
//!
//! The pipeline is
//!
//! 1. **[`extract`]** -- turn recipes, meal-plan days or free text into raw
//!    [`GroceryIngredient`] lines, each tagged with where it came from.
//! 2. **[`consolidate`]** -- merge lines that name the same ingredient into
//!    one [`ConsolidatedIngredient`], converting units where the catalog
//!    knows how.
//! 3. **[`organize`]** -- group the merged list for display, by default in
//!    store-aisle order.
//!
//! Consolidation accepts its own output, so running it twice is a no-op.

pub mod consolidate;
pub mod extract;
pub mod organize;

use serde::{Deserialize, Serialize};

pub use consolidate::ListConsolidator;
pub use extract::{IngredientExtractor, parse_ingredient_text};
pub use organize::{ListGroup, Organization, StoreOrganizer};

/// Source tag for free-text entries.
pub const MANUAL_SOURCE: &str = "manual_input";

/// One raw line of a grocery list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// `recipe:{name}`, `meal_plan:{day}:{meal type}` or `manual_input`.
    pub source: String,
    #[serde(default)]
    pub food_id: Option<String>,
    /// Canonical name already resolved at extraction time, if any.
    #[serde(default)]
    pub canonical_name: Option<String>,
}

/// A merged grocery line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedIngredient {
    pub canonical_name: String,
    /// The most descriptive (longest) raw name in the group.
    pub display_name: String,
    pub amount: f64,
    pub unit: String,
    /// Distinct sources in first-seen order.
    pub sources: Vec<String>,
    /// How many raw lines were merged into this one.
    pub original_count: usize,
    #[serde(default)]
    pub food_id: Option<String>,
}

impl ConsolidatedIngredient {
    /// `"☐ Chicken breast - 1.5 lb"`; the amount is omitted when it is a
    /// bare 1 with no unit.
    pub fn checklist_line(&self) -> String {
        let amount = if self.amount.fract() == 0.0 {
            format!("{:.0}", self.amount)
        } else {
            format!("{:.1}", self.amount)
        };
        if amount == "1" && self.unit.is_empty() {
            format!("☐ {}", self.display_name)
        } else {
            format!("☐ {} - {}", self.display_name, format!("{amount} {}", self.unit).trim_end())
        }
    }
}

/// Anything the consolidator can merge.  Implemented by raw lines and by
/// already-consolidated lines so consolidation can be re-applied.
pub trait IngredientRecord {
    fn name(&self) -> &str;
    fn amount(&self) -> f64;
    fn unit(&self) -> &str;
    fn sources(&self) -> Vec<&str>;
    fn food_id(&self) -> Option<&str>;
    /// A canonical name that should be trusted as-is.
    fn canonical_hint(&self) -> Option<&str>;
    /// Number of raw lines this record stands for.
    fn line_count(&self) -> usize;
}

impl IngredientRecord for GroceryIngredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn unit(&self) -> &str {
        &self.unit
    }

    fn sources(&self) -> Vec<&str> {
        vec![self.source.as_str()]
    }

    fn food_id(&self) -> Option<&str> {
        self.food_id.as_deref()
    }

    fn canonical_hint(&self) -> Option<&str> {
        self.canonical_name.as_deref()
    }

    fn line_count(&self) -> usize {
        1
    }
}

impl IngredientRecord for ConsolidatedIngredient {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn unit(&self) -> &str {
        &self.unit
    }

    fn sources(&self) -> Vec<&str> {
        self.sources.iter().map(String::as_str).collect()
    }

    fn food_id(&self) -> Option<&str> {
        self.food_id.as_deref()
    }

    fn canonical_hint(&self) -> Option<&str> {
        Some(&self.canonical_name)
    }

    fn line_count(&self) -> usize {
        self.original_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(amount: f64, unit: &str) -> ConsolidatedIngredient {
        ConsolidatedIngredient {
            canonical_name: "eggs".into(),
            display_name: "Eggs".into(),
            amount,
            unit: unit.into(),
            sources: vec![MANUAL_SOURCE.into()],
            original_count: 1,
            food_id: None,
        }
    }

    #[test]
    fn checklist_lines() {
        assert_eq!(item(1.0, "").checklist_line(), "☐ Eggs");
        assert_eq!(item(12.0, "").checklist_line(), "☐ Eggs - 12");
        assert_eq!(item(1.5, "dozen").checklist_line(), "☐ Eggs - 1.5 dozen");
        assert_eq!(item(1.0, "dozen").checklist_line(), "☐ Eggs - 1 dozen");
    }
}
