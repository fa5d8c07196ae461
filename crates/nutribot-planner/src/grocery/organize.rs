//! Grouping a consolidated list for display.
//!
//! Store-section grouping resolves each item's aisle from its food's
//! catalog category.  Items without a known food, or whose food category
//! has no aisle, fall back to a keyword guess on the canonical name,
//! matched with a single Aho-Corasick pass.

use aho_corasick::AhoCorasick;
use nutribot_catalog::{Catalog, StoreSection};
use serde::{Deserialize, Serialize};

use super::{ConsolidatedIngredient, MANUAL_SOURCE};

/// Keyword table for guessing a category from an ingredient name.  Earlier
/// categories win when several match.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("protein", &["chicken", "beef", "pork", "fish", "turkey", "tofu", "salmon", "tuna"]),
    ("dairy", &["milk", "cheese", "yogurt", "butter", "cream"]),
    ("vegetable", &["spinach", "broccoli", "carrots", "onion", "tomato", "pepper", "lettuce"]),
    ("fruit", &["apple", "banana", "orange", "berry", "grape", "lemon"]),
    ("grain", &["rice", "quinoa", "oats", "bread", "pasta"]),
    ("nut", &["almond", "walnut", "peanut", "cashew"]),
    ("fat", &["oil", "olive_oil", "coconut_oil"]),
];

/// How the final list is grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organization {
    #[default]
    StoreSections,
    MealType,
    Recipe,
    Alphabetical,
}

impl Organization {
    pub const ALL: [Organization; 4] = [
        Organization::StoreSections,
        Organization::MealType,
        Organization::Recipe,
        Organization::Alphabetical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StoreSections => "store sections",
            Self::MealType => "meal type",
            Self::Recipe => "recipe",
            Self::Alphabetical => "alphabetical",
        }
    }
}

/// One titled group of the final list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListGroup {
    pub title: String,
    pub icon: String,
    /// Aisle advice; empty outside store-section grouping.
    #[serde(default)]
    pub tips: String,
    pub items: Vec<ConsolidatedIngredient>,
}

impl ListGroup {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: "📦".to_string(),
            tips: String::new(),
            items: Vec::new(),
        }
    }
}

/// Groups consolidated items by aisle, meal, recipe or name.
pub struct StoreOrganizer<'a> {
    catalog: &'a Catalog,
    /// `None` only if the keyword automaton failed to build; guessing then
    /// falls back to substring search.
    keywords: Option<AhoCorasick>,
    /// Category index of each automaton pattern.
    keyword_category: Vec<usize>,
}

impl<'a> StoreOrganizer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut patterns = Vec::new();
        let mut keyword_category = Vec::new();
        for (index, (_, words)) in CATEGORY_KEYWORDS.iter().enumerate() {
            for word in *words {
                patterns.push(*word);
                keyword_category.push(index);
            }
        }
        let keywords = match AhoCorasick::new(&patterns) {
            Ok(ac) => Some(ac),
            Err(e) => {
                tracing::error!(error = %e, "failed to build grocery keyword automaton");
                None
            }
        };
        Self {
            catalog,
            keywords,
            keyword_category,
        }
    }

    /// Category guessed from a name, or `"other"`.
    pub fn guess_category(&self, name: &str) -> &'static str {
        let lower = name.to_lowercase();
        let best = match &self.keywords {
            Some(ac) => ac
                .find_overlapping_iter(&lower)
                .map(|m| self.keyword_category[m.pattern().as_usize()])
                .min(),
            None => CATEGORY_KEYWORDS
                .iter()
                .position(|(_, words)| words.iter().any(|w| lower.contains(w))),
        };
        best.map(|i| CATEGORY_KEYWORDS[i].0).unwrap_or("other")
    }

    /// Aisle for one item.  A food whose catalog category has no aisle is
    /// placed by the keyword guess instead.
    pub fn section_for(&self, item: &ConsolidatedIngredient) -> StoreSection {
        item.food_id
            .as_deref()
            .and_then(|id| self.catalog.food_category(id))
            .map(|category| self.catalog.map_category_to_store_section(category))
            .filter(|section| *section != StoreSection::fallback())
            .unwrap_or_else(|| {
                self.catalog
                    .map_category_to_store_section(self.guess_category(&item.canonical_name))
            })
    }

    pub fn organize(&self, items: &[ConsolidatedIngredient], mode: Organization) -> Vec<ListGroup> {
        match mode {
            Organization::StoreSections => self.by_store_section(items),
            Organization::MealType => group_by(items, meal_type_titles),
            Organization::Recipe => group_by(items, recipe_titles),
            Organization::Alphabetical => {
                let mut sorted = items.to_vec();
                sorted.sort_by_key(|i| i.display_name.to_lowercase());
                let mut group = ListGroup::new("All Ingredients");
                group.items = sorted;
                vec![group]
            }
        }
    }

    /// Groups in shopping order; sections of equal order keep first-seen
    /// order.  The catch-all aisle shares its id with a real section, so a
    /// group takes the title, icon, tips and order of the lowest-ordered
    /// section placed in it.
    fn by_store_section(&self, items: &[ConsolidatedIngredient]) -> Vec<ListGroup> {
        let mut groups: Vec<(u32, String, ListGroup)> = Vec::new();
        for item in items {
            let section = self.section_for(item);
            match groups.iter_mut().find(|(_, id, _)| *id == section.section_id) {
                Some((order, _, group)) => {
                    if section.order < *order {
                        *order = section.order;
                        group.title = section.display_name.clone();
                        group.icon = section.icon.clone();
                        group.tips = section.shopping_tips.clone();
                    }
                    group.items.push(item.clone());
                }
                None => {
                    let mut group = ListGroup::new(section.display_name.clone());
                    group.icon = section.icon.clone();
                    group.tips = section.shopping_tips.clone();
                    group.items.push(item.clone());
                    groups.push((section.order, section.section_id, group));
                }
            }
        }
        groups.sort_by_key(|(order, _, _)| *order);
        groups.into_iter().map(|(_, _, group)| group).collect()
    }
}

/// Group items under every title `titles` yields for them, first-seen order.
fn group_by(items: &[ConsolidatedIngredient], titles: fn(&ConsolidatedIngredient) -> Vec<String>) -> Vec<ListGroup> {
    let mut groups: Vec<ListGroup> = Vec::new();
    for item in items {
        for title in titles(item) {
            match groups.iter_mut().find(|g| g.title == title) {
                Some(group) => group.items.push(item.clone()),
                None => {
                    let mut group = ListGroup::new(title);
                    group.items.push(item.clone());
                    groups.push(group);
                }
            }
        }
    }
    groups
}

fn meal_type_titles(item: &ConsolidatedIngredient) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for source in &item.sources {
        let parts: Vec<&str> = source.split(':').collect();
        let title = match parts.as_slice() {
            ["meal_plan", _, meal_type, ..] => title_case(meal_type),
            ["recipe", ..] => "Recipe Ingredients".to_string(),
            _ => "Other Items".to_string(),
        };
        if !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

fn recipe_titles(item: &ConsolidatedIngredient) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for source in &item.sources {
        let title = match source.split_once(':') {
            Some(("recipe", name)) => name.to_string(),
            Some(("meal_plan", detail)) => format!("Meal Plan ({detail})"),
            Some((_, rest)) => title_case(rest),
            None if source == MANUAL_SOURCE => "Manual Input".to_string(),
            None => title_case(source),
        };
        if !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

fn title_case(text: &str) -> String {
    text.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(canonical: &str, food_id: Option<&str>, sources: &[&str]) -> ConsolidatedIngredient {
        ConsolidatedIngredient {
            canonical_name: canonical.into(),
            display_name: canonical.replace('_', " "),
            amount: 1.0,
            unit: "piece".into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            original_count: 1,
            food_id: food_id.map(str::to_string),
        }
    }

    #[test]
    fn keyword_guess_prefers_earlier_category() {
        let catalog = Catalog::default();
        let organizer = StoreOrganizer::new(&catalog);
        assert_eq!(organizer.guess_category("chicken_thigh"), "protein");
        assert_eq!(organizer.guess_category("Peanut Butter"), "dairy");
        assert_eq!(organizer.guess_category("sesame_oil"), "fat");
        assert_eq!(organizer.guess_category("saffron"), "other");
    }

    #[test]
    fn sections_follow_shopping_order() {
        let catalog = Catalog::embedded().unwrap();
        let organizer = StoreOrganizer::new(&catalog);
        let groups = organizer.organize(
            &[
                item("olive_oil", Some("olive_oil"), &["recipe:A"]),
                item("saffron", None, &["recipe:A"]),
                item("spinach", Some("spinach"), &["recipe:A"]),
                item("chicken_thigh", None, &["recipe:A"]),
            ],
            Organization::StoreSections,
        );
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles.first().copied(), Some("Produce"));
        assert_eq!(groups[1].items[0].canonical_name, "chicken_thigh");
        // Unknown items land in the catch-all aisle, which sorts last.
        assert_eq!(groups.last().unwrap().items[0].canonical_name, "saffron");
    }

    fn small_catalog() -> Catalog {
        let foods = r#"{"foods": [
            {"id": "oat_milk", "name": "Oat Milk", "category": "beverage"}
        ]}"#;
        let grocery = r#"{"store_sections": {
            "produce": {"display_name": "Produce", "icon": "🥬", "order": 1,
                        "categories": ["vegetable"]},
            "dairy_eggs": {"display_name": "Dairy & Eggs", "icon": "🥛", "order": 3,
                           "categories": ["dairy"]},
            "pantry_grains": {"display_name": "Pantry & Grains", "icon": "🥫", "order": 5,
                              "categories": ["grain"], "shopping_tips": "Check dates"}
        }}"#;
        Catalog::from_json("{}", "{}", foods, "{}", grocery).unwrap()
    }

    #[test]
    fn unshelved_food_category_falls_back_to_name_guess() {
        let catalog = small_catalog();
        let organizer = StoreOrganizer::new(&catalog);
        let section = organizer.section_for(&item("oat_milk", Some("oat_milk"), &["recipe:A"]));
        assert_eq!(section.section_id, "dairy_eggs");
    }

    #[test]
    fn catch_all_first_still_shows_real_pantry_aisle() {
        let catalog = small_catalog();
        let groups = StoreOrganizer::new(&catalog).organize(
            &[
                item("saffron", None, &["recipe:A"]),
                item("rice", None, &["recipe:A"]),
                item("spinach", None, &["recipe:A"]),
            ],
            Organization::StoreSections,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "Produce");
        let pantry = &groups[1];
        assert_eq!(pantry.title, "Pantry & Grains");
        assert_eq!(pantry.icon, "🥫");
        assert_eq!(pantry.tips, "Check dates");
        assert_eq!(pantry.items.len(), 2);
    }

    #[test]
    fn meal_type_grouping_reads_sources() {
        let catalog = Catalog::default();
        let groups = StoreOrganizer::new(&catalog).organize(
            &[
                item("oats", None, &["meal_plan:Day 1:breakfast", "meal_plan:Day 2:breakfast"]),
                item("rice", None, &["recipe:Pilaf", MANUAL_SOURCE]),
            ],
            Organization::MealType,
        );
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Breakfast", "Recipe Ingredients", "Other Items"]);
        assert_eq!(groups[0].items.len(), 1);
    }

    #[test]
    fn recipe_grouping() {
        let catalog = Catalog::default();
        let groups = StoreOrganizer::new(&catalog).organize(
            &[item("rice", None, &["recipe:Pilaf", "meal_plan:Day 1:lunch", MANUAL_SOURCE])],
            Organization::Recipe,
        );
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Pilaf", "Meal Plan (Day 1:lunch)", "Manual Input"]);
    }

    #[test]
    fn alphabetical_is_one_group() {
        let catalog = Catalog::default();
        let groups = StoreOrganizer::new(&catalog).organize(
            &[item("zucchini", None, &[]), item("Apple", None, &[])],
            Organization::Alphabetical,
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].canonical_name, "Apple");
    }
}
