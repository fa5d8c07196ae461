//! Grocery-support tables: ingredient aliases, unit conversions, store
//! sections, and substitutions.
//!
//! All lookups are pure and case-insensitive.  Misses are answered with a
//! sensible default (the unconverted amount, the catch-all section) rather
//! than an error, so list building always degrades gracefully.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
//  Tables
// ═══════════════════════════════════════════════════════════════════════

/// Conversion factors.
///
/// `volume` maps `"{unit}_to_ml"` and `weight` maps `"{unit}_to_g"`.
/// `ingredient_specific` maps a canonical ingredient to `"1_{unit}"` →
/// strings such as `"240ml"` or `"120g"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConversions {
    pub volume: BTreeMap<String, f64>,
    pub weight: BTreeMap<String, f64>,
    pub ingredient_specific: BTreeMap<String, BTreeMap<String, String>>,
}

/// A store aisle as described in the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSectionData {
    pub display_name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_order")]
    pub order: u32,
    /// Food categories shelved in this aisle.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub shopping_tips: String,
}

/// A resolved store section, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreSection {
    pub section_id: String,
    pub display_name: String,
    pub icon: String,
    pub order: u32,
    pub shopping_tips: String,
}

impl StoreSection {
    /// Catch-all section for anything that cannot be placed.
    pub fn fallback() -> Self {
        Self {
            section_id: "pantry_grains".to_string(),
            display_name: "Pantry & Grains".to_string(),
            icon: default_icon(),
            order: default_order(),
            shopping_tips: "Store in cool, dry place".to_string(),
        }
    }
}

/// A replacement for an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub substitute: String,
    #[serde(default)]
    pub ratio: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

/// Everything the grocery consolidator needs from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrocerySupport {
    /// canonical name → aliases.
    pub ingredient_aliases: BTreeMap<String, Vec<String>>,
    pub unit_conversions: UnitConversions,
    pub store_sections: BTreeMap<String, StoreSectionData>,
    pub substitutions: BTreeMap<String, Vec<Substitution>>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Lookups
// ═══════════════════════════════════════════════════════════════════════

impl GrocerySupport {
    /// Resolve a raw ingredient name to its canonical name.
    ///
    /// A canonical name resolves to itself; otherwise the first alias that
    /// equals the input (case-insensitively, trimmed) wins.
    pub fn find_ingredient_by_alias(&self, name: &str) -> Option<String> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if self.ingredient_aliases.contains_key(&needle) {
            return Some(needle);
        }
        self.ingredient_aliases
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a.to_lowercase() == needle))
            .map(|(canonical, _)| canonical.clone())
    }

    /// Convert `amount` of `ingredient` between units, or `None` if no
    /// factor is known.
    ///
    /// Ingredient-specific factors are tried first, then the generic volume
    /// table, then the generic weight table.  Identical units always
    /// convert.
    pub fn try_convert(
        &self,
        ingredient: &str,
        amount: f64,
        from_unit: &str,
        to_unit: &str,
    ) -> Option<f64> {
        let from = from_unit.trim().to_lowercase();
        let to = to_unit.trim().to_lowercase();
        if from == to {
            return Some(amount);
        }

        let key = ingredient.trim().to_lowercase().replace(' ', "_");
        if let Some(factor) = self
            .unit_conversions
            .ingredient_specific
            .get(&key)
            .and_then(|table| table.get(&format!("1_{from}")))
            .and_then(|target| split_quantity(target))
            .filter(|(_, unit)| *unit == to)
            .map(|(factor, _)| factor)
        {
            return Some(amount * factor);
        }

        via_base(&self.unit_conversions.volume, "ml", amount, &from, &to)
            .or_else(|| via_base(&self.unit_conversions.weight, "g", amount, &from, &to))
    }

    /// Convert, leaving the amount unchanged when no factor is known.
    pub fn convert_unit(&self, ingredient: &str, amount: f64, from_unit: &str, to_unit: &str) -> f64 {
        self.try_convert(ingredient, amount, from_unit, to_unit)
            .unwrap_or(amount)
    }

    /// Store section for a food category, or the catch-all section.
    pub fn map_category_to_store_section(&self, category: &str) -> StoreSection {
        let category = category.trim().to_lowercase();
        if category.is_empty() {
            return StoreSection::fallback();
        }
        self.store_sections
            .iter()
            .find(|(_, data)| data.categories.iter().any(|c| c.to_lowercase() == category))
            .map(|(id, data)| StoreSection {
                section_id: id.clone(),
                display_name: data.display_name.clone(),
                icon: data.icon.clone(),
                order: data.order,
                shopping_tips: data.shopping_tips.clone(),
            })
            .unwrap_or_else(StoreSection::fallback)
    }

    /// Substitutes for an ingredient.
    ///
    /// With restrictions, only substitutes tagged with at least one of them
    /// are returned, unless none are, in which case all are returned.
    pub fn substitutions_for(&self, ingredient: &str, restrictions: &[String]) -> Vec<Substitution> {
        let key = ingredient.trim().to_lowercase().replace(' ', "_");
        let Some(all) = self.substitutions.get(&key) else {
            return Vec::new();
        };
        if restrictions.is_empty() {
            return all.clone();
        }

        let compatible: Vec<Substitution> = all
            .iter()
            .filter(|sub| {
                restrictions.iter().any(|r| {
                    sub.dietary_tags
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(r))
                })
            })
            .cloned()
            .collect();

        if compatible.is_empty() {
            all.clone()
        } else {
            compatible
        }
    }
}

/// Convert through a base unit table (`{unit}_to_{base}`).  The base unit
/// itself has factor 1.
fn via_base(
    table: &BTreeMap<String, f64>,
    base: &str,
    amount: f64,
    from: &str,
    to: &str,
) -> Option<f64> {
    let factor = |unit: &str| {
        if unit == base {
            Some(1.0)
        } else {
            table.get(&format!("{unit}_to_{base}")).copied()
        }
    };
    let from_factor = factor(from)?;
    let to_factor = factor(to)?;
    (to_factor != 0.0).then(|| amount * from_factor / to_factor)
}

/// Leading numeric run of strings like `"240ml"`.
/// Split a stored quantity such as `"240ml"` into its number and unit.
fn split_quantity(text: &str) -> Option<(f64, String)> {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let number = text[..end].parse().ok()?;
    Some((number, text[end..].trim().to_lowercase()))
}

fn default_icon() -> String {
    "📦".to_string()
}

fn default_order() -> u32 {
    99
}

#[cfg(test)]
mod tests {
    use super::*;

    fn support() -> GrocerySupport {
        serde_json::from_str(
            r#"{
                "ingredient_aliases": {
                    "chicken_breast": ["chicken breast", "grilled chicken breast"],
                    "olive_oil": ["extra virgin olive oil", "EVOO"]
                },
                "unit_conversions": {
                    "volume": {"cup_to_ml": 240, "tbsp_to_ml": 15, "tsp_to_ml": 5, "l_to_ml": 1000},
                    "weight": {"kg_to_g": 1000, "lb_to_g": 453.6, "oz_to_g": 28.35},
                    "ingredient_specific": {"milk": {"1_cup": "240ml"}, "flour": {"1_cup": "120g"}}
                },
                "store_sections": {
                    "produce": {"display_name": "Produce", "icon": "🥬", "order": 1,
                                "categories": ["vegetable", "fruit"], "shopping_tips": "Pick firm produce"},
                    "meat_seafood": {"display_name": "Meat & Seafood", "icon": "🥩", "order": 2,
                                     "categories": ["protein"]}
                },
                "substitutions": {
                    "butter": [
                        {"substitute": "olive oil", "ratio": "3/4", "dietary_tags": ["dairy_free", "vegan"]},
                        {"substitute": "greek yogurt", "ratio": "1/2", "dietary_tags": ["vegetarian"]}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn alias_lookup() {
        let s = support();
        assert_eq!(s.find_ingredient_by_alias("Grilled Chicken Breast").as_deref(), Some("chicken_breast"));
        assert_eq!(s.find_ingredient_by_alias("chicken_breast").as_deref(), Some("chicken_breast"));
        assert_eq!(s.find_ingredient_by_alias("evoo").as_deref(), Some("olive_oil"));
        assert_eq!(s.find_ingredient_by_alias("tofu"), None);
        assert_eq!(s.find_ingredient_by_alias("  "), None);
    }

    #[test]
    fn ingredient_specific_conversion() {
        let s = support();
        assert_eq!(s.convert_unit("milk", 1.0, "cup", "ml"), 240.0);
        assert_eq!(s.convert_unit("flour", 2.0, "cup", "g"), 240.0);
    }

    #[test]
    fn ingredient_specific_requires_matching_target_unit() {
        let s = support();
        // Flour's entry is in grams, so a cup→ml request falls through to the
        // generic volume table.
        assert_eq!(s.convert_unit("flour", 1.0, "cup", "ml"), 240.0);
        // "240ml" ends in "l" but is not litres.
        let litres = s.convert_unit("milk", 1.0, "cup", "l");
        assert!((litres - 0.24).abs() < 1e-9);
    }

    #[test]
    fn stored_quantity_splits_into_number_and_unit() {
        assert_eq!(split_quantity("240ml"), Some((240.0, "ml".to_string())));
        assert_eq!(split_quantity(" 14 g"), Some((14.0, "g".to_string())));
        assert_eq!(split_quantity("ml"), None);
    }

    #[test]
    fn generic_conversions() {
        let s = support();
        assert_eq!(s.convert_unit("water", 2.0, "tbsp", "tsp"), 6.0);
        assert_eq!(s.convert_unit("rice", 1.0, "kg", "g"), 1000.0);
        let lb = s.convert_unit("rice", 453.6, "g", "lb");
        assert!((lb - 1.0).abs() < 1e-9);
        assert_eq!(s.convert_unit("milk", 480.0, "ml", "cup"), 2.0);
        let lb = s.convert_unit("rice", 1.0, "kg", "lb");
        assert!((lb - 2.2046).abs() < 1e-3);
    }

    #[test]
    fn unknown_conversion_keeps_amount() {
        let s = support();
        assert_eq!(s.try_convert("eggs", 3.0, "piece", "cup"), None);
        assert_eq!(s.convert_unit("eggs", 3.0, "piece", "cup"), 3.0);
        assert_eq!(s.convert_unit("eggs", 3.0, "Piece", "piece"), 3.0);
    }

    #[test]
    fn category_to_section() {
        let s = support();
        let section = s.map_category_to_store_section("Vegetable");
        assert_eq!(section.section_id, "produce");
        assert_eq!(section.order, 1);

        let section = s.map_category_to_store_section("spices");
        assert_eq!(section, StoreSection::fallback());
        assert_eq!(section.display_name, "Pantry & Grains");
        assert_eq!(section.order, 99);
    }

    #[test]
    fn substitutions_filter_with_fallback() {
        let s = support();
        let vegan = s.substitutions_for("butter", &["vegan".to_string()]);
        assert_eq!(vegan.len(), 1);
        assert_eq!(vegan[0].substitute, "olive oil");

        let keto = s.substitutions_for("butter", &["keto_friendly".to_string()]);
        assert_eq!(keto.len(), 2);

        assert!(s.substitutions_for("saffron", &[]).is_empty());
    }
}
