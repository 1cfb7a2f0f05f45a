//! Brand prioritization for the brand filter.
//!
//! Brands whose product types overlap a category's types are listed first;
//! the rest are tucked behind a "show all" toggle unless the user searches.

use serde::{Deserialize, Serialize};

use crate::catalog::{Brand, ProductType};

/// Brands split by relevance to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandPartition<'a> {
    /// Brands sharing at least one product type with the category.
    pub prioritized: Vec<&'a Brand>,
    /// Every other brand.
    pub other: Vec<&'a Brand>,
}

/// Split `brands` into prioritized and other, each sorted case-insensitively.
pub fn partition_brands<'a>(brands: &'a [Brand], types: &[ProductType]) -> BrandPartition<'a> {
    let (mut prioritized, mut other): (Vec<&Brand>, Vec<&Brand>) =
        brands.iter().partition(|b| b.serves_any(types));
    prioritized.sort_by_cached_key(|b| b.name.to_lowercase());
    other.sort_by_cached_key(|b| b.name.to_lowercase());
    BrandPartition { prioritized, other }
}

/// Display state of the brand filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandQuery {
    /// Free-text brand search.
    #[serde(default)]
    pub search: Option<String>,
    /// Whether the user expanded the "other brands" list.
    #[serde(default)]
    pub show_all: bool,
    /// Currently selected brand names.
    #[serde(default)]
    pub selected: Vec<String>,
}

impl BrandQuery {
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

/// The brand names to render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandListing {
    pub prioritized: Vec<String>,
    /// Empty when the other list is collapsed.
    pub other: Vec<String>,
    /// Number of other brands behind the "show all" toggle.
    pub hidden_other: usize,
}

impl BrandListing {
    /// Every visible name, prioritized first.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.prioritized.iter().chain(self.other.iter()).map(String::as_str)
    }
}

/// Build the brand list for a category's product types.
///
/// A search term filters both lists and shows both. Without one, the other
/// list shows only when `show_all` is set or nothing is prioritized. Selected
/// brands float to the top of each list.
pub fn list_brands(brands: &[Brand], types: &[ProductType], query: &BrandQuery) -> BrandListing {
    let partition = partition_brands(brands, types);
    let term = query.search_term();

    let matches = |b: &&Brand| match &term {
        Some(term) => b.name.to_lowercase().contains(term.as_str()),
        None => true,
    };
    let prioritized: Vec<&Brand> = partition.prioritized.into_iter().filter(&matches).collect();
    let other: Vec<&Brand> = partition.other.into_iter().filter(&matches).collect();

    let show_other = term.is_some() || query.show_all || prioritized.is_empty();

    let mut listing = BrandListing {
        prioritized: selected_first(prioritized, query),
        ..Default::default()
    };
    if show_other {
        listing.other = selected_first(other, query);
    } else {
        listing.hidden_other = other.len();
    }
    listing
}

// Stable partition: input is already alphabetical.
fn selected_first(brands: Vec<&Brand>, query: &BrandQuery) -> Vec<String> {
    let (selected, unselected): (Vec<&Brand>, Vec<&Brand>) =
        brands.into_iter().partition(|b| query.is_selected(b.name));
    selected
        .into_iter()
        .chain(unselected)
        .map(|b| b.name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BRANDS;
    use std::collections::HashSet;

    static SMALL: &[Brand] = &[
        Brand { name: "shoei", product_types: &[ProductType::Helmets] },
        Brand { name: "Arai", product_types: &[ProductType::Helmets] },
        Brand { name: "Michelin", product_types: &[ProductType::Tires] },
        Brand { name: "bell", product_types: &[ProductType::Helmets] },
        Brand { name: "Dunlop", product_types: &[ProductType::Tires] },
    ];

    fn names(brands: &[&Brand]) -> Vec<&'static str> {
        brands.iter().map(|b| b.name).collect()
    }

    #[test]
    fn test_partition_sorted_case_insensitive() {
        let partition = partition_brands(SMALL, &[ProductType::Helmets]);
        assert_eq!(names(&partition.prioritized), vec!["Arai", "bell", "shoei"]);
        assert_eq!(names(&partition.other), vec!["Dunlop", "Michelin"]);
    }

    #[test]
    fn test_partition_complete_and_disjoint() {
        for types in [
            vec![ProductType::Helmets],
            vec![ProductType::Tires, ProductType::Atv],
            vec![ProductType::Oils],
            vec![],
        ] {
            let partition = partition_brands(BRANDS, &types);
            let prioritized: HashSet<_> = partition.prioritized.iter().map(|b| b.name).collect();
            let other: HashSet<_> = partition.other.iter().map(|b| b.name).collect();
            assert!(prioritized.is_disjoint(&other));
            assert_eq!(prioritized.len() + other.len(), BRANDS.len());
        }
    }

    #[test]
    fn test_other_hidden_without_search() {
        let listing = list_brands(SMALL, &[ProductType::Helmets], &BrandQuery::default());
        assert_eq!(listing.prioritized, vec!["Arai", "bell", "shoei"]);
        assert!(listing.other.is_empty());
        assert_eq!(listing.hidden_other, 2);
    }

    #[test]
    fn test_show_all_reveals_other() {
        let query = BrandQuery { show_all: true, ..Default::default() };
        let listing = list_brands(SMALL, &[ProductType::Helmets], &query);
        assert_eq!(listing.other, vec!["Dunlop", "Michelin"]);
        assert_eq!(listing.hidden_other, 0);
    }

    #[test]
    fn test_search_filters_both_lists() {
        let query = BrandQuery { search: Some(" L ".to_string()), ..Default::default() };
        let listing = list_brands(SMALL, &[ProductType::Helmets], &query);
        assert_eq!(listing.prioritized, vec!["bell"]);
        assert_eq!(listing.other, vec!["Dunlop", "Michelin"]);
    }

    #[test]
    fn test_blank_search_is_no_search() {
        let query = BrandQuery { search: Some("   ".to_string()), ..Default::default() };
        let listing = list_brands(SMALL, &[ProductType::Helmets], &query);
        assert!(listing.other.is_empty());
    }

    #[test]
    fn test_no_prioritized_shows_other() {
        let listing = list_brands(SMALL, &[ProductType::Oils], &BrandQuery::default());
        assert!(listing.prioritized.is_empty());
        assert_eq!(listing.other.len(), SMALL.len());
    }

    #[test]
    fn test_selected_first_within_each_list() {
        let query = BrandQuery {
            show_all: true,
            selected: vec!["SHOEI".to_string(), "Michelin".to_string(), "bell".to_string()],
            ..Default::default()
        };
        let listing = list_brands(SMALL, &[ProductType::Helmets], &query);
        assert_eq!(listing.prioritized, vec!["bell", "shoei", "Arai"]);
        assert_eq!(listing.other, vec!["Michelin", "Dunlop"]);
    }

    #[test]
    fn test_visible_order() {
        let query = BrandQuery { show_all: true, ..Default::default() };
        let listing = list_brands(SMALL, &[ProductType::Tires], &query);
        let visible: Vec<_> = listing.visible().collect();
        assert_eq!(visible, vec!["Dunlop", "Michelin", "Arai", "bell", "shoei"]);
    }
}
