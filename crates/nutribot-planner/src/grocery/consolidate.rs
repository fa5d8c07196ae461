//! Duplicate merging and unit reconciliation.

use nutribot_catalog::Catalog;
use tracing::debug;

use super::{ConsolidatedIngredient, IngredientRecord};

/// Merges grocery lines that name the same ingredient.
pub struct ListConsolidator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ListConsolidator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// The identifier duplicates are merged under: a trusted hint, else the
    /// catalog alias table, else the lowercased name with `_` for spaces.
    pub fn canonical_name<R: IngredientRecord>(&self, record: &R) -> String {
        if let Some(hint) = record.canonical_hint() {
            return hint.to_string();
        }
        let name = record.name().trim();
        self.catalog
            .find_ingredient_by_alias(name)
            .unwrap_or_else(|| name.to_lowercase().replace(' ', "_"))
    }

    /// Merge `records` into one line per canonical name, in first-seen
    /// order.
    pub fn consolidate<R: IngredientRecord>(&self, records: &[R]) -> Vec<ConsolidatedIngredient> {
        let mut groups: Vec<(String, Vec<&R>)> = Vec::new();
        for record in records {
            let canonical = self.canonical_name(record);
            match groups.iter_mut().find(|(name, _)| *name == canonical) {
                Some((_, members)) => members.push(record),
                None => groups.push((canonical, vec![record])),
            }
        }

        let merged: Vec<ConsolidatedIngredient> = groups
            .into_iter()
            .map(|(canonical, members)| self.merge_group(canonical, &members))
            .collect();
        debug!(input = records.len(), output = merged.len(), "grocery list consolidated");
        merged
    }

    fn merge_group<R: IngredientRecord>(&self, canonical: String, members: &[&R]) -> ConsolidatedIngredient {
        // Longest name wins; the first of equal length is kept.
        let mut display_name = "";
        for member in members {
            if member.name().len() > display_name.len() {
                display_name = member.name();
            }
        }

        let mut per_unit: Vec<(String, f64)> = Vec::new();
        let mut sources: Vec<String> = Vec::new();
        for member in members {
            let unit = member.unit().trim().to_lowercase();
            match per_unit.iter_mut().find(|(u, _)| *u == unit) {
                Some((_, total)) => *total += member.amount(),
                None => per_unit.push((unit, member.amount())),
            }
            for source in member.sources() {
                if !sources.iter().any(|s| s == source) {
                    sources.push(source.to_string());
                }
            }
        }

        let (amount, unit) = self.reconcile_units(&canonical, per_unit);

        ConsolidatedIngredient {
            display_name: display_name.to_string(),
            amount,
            unit,
            sources,
            original_count: members.iter().map(|m| m.line_count()).sum(),
            food_id: members.iter().find_map(|m| m.food_id()).map(str::to_string),
            canonical_name: canonical,
        }
    }

    /// Collapse per-unit totals into one amount.  Amounts the catalog cannot
    /// convert are added unchanged.
    fn reconcile_units(&self, ingredient: &str, per_unit: Vec<(String, f64)>) -> (f64, String) {
        if let [(unit, amount)] = per_unit.as_slice() {
            return (*amount, unit.clone());
        }

        // `min_by_key` keeps the first of equal priority.
        let Some(primary) = per_unit
            .iter()
            .map(|(u, _)| u.clone())
            .min_by_key(|u| unit_priority(u))
        else {
            return (0.0, "item".to_string());
        };

        let total = per_unit
            .iter()
            .map(|(unit, amount)| {
                if *unit == primary {
                    *amount
                } else {
                    self.catalog.convert_unit(ingredient, *amount, unit, &primary)
                }
            })
            .sum();
        (total, primary)
    }
}

/// Lower is preferred as the common unit of a merged line.
pub fn unit_priority(unit: &str) -> u8 {
    match unit {
        "kg" | "l" => 1,
        "lb" | "gallon" => 2,
        "g" | "quart" => 3,
        "oz" | "cup" => 4,
        "ml" => 5,
        "tbsp" => 6,
        "tsp" => 7,
        "piece" => 8,
        "item" => 9,
        _ => 99,
    }
}
