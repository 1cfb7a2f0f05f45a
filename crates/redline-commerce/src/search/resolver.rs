//! Category slug to filter-control resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::brands::partition_brands;
use super::price::PRICE_PRESETS;
use super::schema::{FilterKind, FilterOption, FilterSchema, FilterSet};
use super::selection::{BRANDS_KEY, IN_STOCK_KEY, PRICE_RANGE_KEY, PRODUCT_TYPE_KEY, SEARCH_KEY};
use crate::catalog::{find_category, Category, ProductType, BRANDS};

/// Keyword families used when a slug is not in the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeywordBucket {
    Atv,
    Apparel,
    Helmets,
    Tires,
    Exhaust,
    Brakes,
    Batteries,
    Oils,
    Lighting,
    Luggage,
    Drivetrain,
    DirtBike,
}

impl KeywordBucket {
    /// Buckets in match priority order.
    pub const PRIORITY: [KeywordBucket; 12] = [
        KeywordBucket::Atv,
        KeywordBucket::Apparel,
        KeywordBucket::Helmets,
        KeywordBucket::Tires,
        KeywordBucket::Exhaust,
        KeywordBucket::Brakes,
        KeywordBucket::Batteries,
        KeywordBucket::Oils,
        KeywordBucket::Lighting,
        KeywordBucket::Luggage,
        KeywordBucket::Drivetrain,
        KeywordBucket::DirtBike,
    ];

    /// Substrings that select this bucket.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordBucket::Atv => &["atv", "utv"],
            KeywordBucket::Apparel => &["apparel", "clothing", "gear", "jacket", "pant", "glove", "boot"],
            KeywordBucket::Helmets => &["helmet"],
            KeywordBucket::Tires => &["tire", "wheel"],
            KeywordBucket::Exhaust => &["exhaust", "muffler", "pipe"],
            KeywordBucket::Brakes => &["brake", "rotor", "pad"],
            KeywordBucket::Batteries => &["battery", "electrical"],
            KeywordBucket::Oils => &["oil", "fluid", "lube"],
            KeywordBucket::Lighting => &["light", "led", "lamp"],
            KeywordBucket::Luggage => &["luggage", "bag", "saddlebag"],
            KeywordBucket::Drivetrain => &["chain", "sprocket"],
            KeywordBucket::DirtBike => &["dirt", "mx", "motocross"],
        }
    }

    /// Slug of the category whose filters this bucket borrows.
    pub fn category_slug(&self) -> &'static str {
        match self {
            KeywordBucket::Atv => "atv-parts",
            KeywordBucket::Apparel => "riding-apparel",
            KeywordBucket::Helmets => "helmets",
            KeywordBucket::Tires => "tires",
            KeywordBucket::Exhaust => "exhaust",
            KeywordBucket::Brakes => "brakes",
            KeywordBucket::Batteries => "batteries",
            KeywordBucket::Oils => "oils-fluids",
            KeywordBucket::Lighting => "lighting",
            KeywordBucket::Luggage => "luggage",
            KeywordBucket::Drivetrain => "chains-sprockets",
            KeywordBucket::DirtBike => "dirt-bike-parts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordBucket::Atv => "atv",
            KeywordBucket::Apparel => "apparel",
            KeywordBucket::Helmets => "helmets",
            KeywordBucket::Tires => "tires",
            KeywordBucket::Exhaust => "exhaust",
            KeywordBucket::Brakes => "brakes",
            KeywordBucket::Batteries => "batteries",
            KeywordBucket::Oils => "oils",
            KeywordBucket::Lighting => "lighting",
            KeywordBucket::Luggage => "luggage",
            KeywordBucket::Drivetrain => "drivetrain",
            KeywordBucket::DirtBike => "dirt-bike",
        }
    }

    /// First bucket whose keywords occur in `slug`.
    pub fn match_slug(slug: &str) -> Option<KeywordBucket> {
        Self::PRIORITY
            .into_iter()
            .find(|bucket| bucket.keywords().iter().any(|k| slug.contains(k)))
    }
}

impl fmt::Display for KeywordBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a slug was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", content = "bucket", rename_all = "kebab-case")]
pub enum Resolution {
    /// Slug found in the category table.
    Exact,
    /// Slug matched a keyword bucket.
    Keyword(KeywordBucket),
    /// Nothing matched; generic filters.
    Fallback,
}

/// Filters resolved for a slug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFilters {
    /// Normalized slug.
    pub slug: String,
    /// Category the filters came from, if any.
    #[serde(skip)]
    pub category: Option<&'static Category>,
    pub resolution: Resolution,
    pub filters: FilterSet,
}

impl ResolvedFilters {
    /// Product types used for brand prioritization; empty on fallback.
    pub fn product_types(&self) -> &'static [ProductType] {
        self.category.map(|c| c.product_types).unwrap_or(&[])
    }
}

/// Resolve the ordered filter controls for a category slug.
///
/// Never fails: unknown slugs get the generic list.
pub fn resolve_filters(slug: &str) -> ResolvedFilters {
    let normalized = slug.trim().to_lowercase();

    let (resolution, category) = match find_category(&normalized) {
        Some(category) => (Resolution::Exact, Some(category)),
        None => match KeywordBucket::match_slug(&normalized) {
            Some(bucket) => (Resolution::Keyword(bucket), find_category(bucket.category_slug())),
            None => (Resolution::Fallback, None),
        },
    };

    let filters = match category {
        Some(category) => category_filters(category),
        None => generic_filters(),
    };

    match resolution {
        Resolution::Fallback => {
            tracing::debug!(slug = %normalized, "no category match, using generic filters")
        }
        Resolution::Keyword(bucket) => {
            tracing::debug!(slug = %normalized, %bucket, "category matched by keyword")
        }
        Resolution::Exact => tracing::trace!(slug = %normalized, "category matched exactly"),
    }

    ResolvedFilters {
        slug: normalized,
        category,
        resolution,
        filters,
    }
}

/// Search, price and in-stock controls that lead every filter list.
pub fn base_filters() -> Vec<FilterSchema> {
    vec![
        FilterSchema {
            key: SEARCH_KEY.to_string(),
            label: "Search".to_string(),
            kind: FilterKind::Search,
            options: Vec::new(),
            default_expanded: true,
            default_value: None,
        },
        FilterSchema {
            key: PRICE_RANGE_KEY.to_string(),
            label: "Price".to_string(),
            kind: FilterKind::PriceRange,
            options: PRICE_PRESETS
                .iter()
                .map(|p| FilterOption::new(p.range().encode(), p.label))
                .collect(),
            default_expanded: true,
            default_value: None,
        },
        FilterSchema {
            key: IN_STOCK_KEY.to_string(),
            label: "In Stock Only".to_string(),
            kind: FilterKind::Checkbox,
            options: vec![FilterOption::new("true", "In stock")],
            default_expanded: true,
            default_value: Some("true".to_string()),
        },
    ]
}

fn category_filters(category: &Category) -> FilterSet {
    let mut filters = base_filters();

    let prioritized = partition_brands(BRANDS, category.product_types).prioritized;
    if !prioritized.is_empty() {
        filters.push(FilterSchema {
            key: BRANDS_KEY.to_string(),
            label: "Brand".to_string(),
            kind: FilterKind::Checkbox,
            options: prioritized
                .iter()
                .map(|b| FilterOption::new(b.name, b.name))
                .collect(),
            default_expanded: true,
            default_value: None,
        });
    }

    filters.extend(category.filters.iter().map(|def| def.to_schema()));
    FilterSet::new(filters)
}

fn generic_filters() -> FilterSet {
    let mut filters = base_filters();
    filters.push(FilterSchema {
        key: PRODUCT_TYPE_KEY.to_string(),
        label: "Product Type".to_string(),
        kind: FilterKind::Select,
        options: ProductType::ALL
            .iter()
            .map(|t| FilterOption::new(t.as_str(), t.display_name()))
            .collect(),
        default_expanded: true,
        default_value: None,
    });
    FilterSet::new(filters)
}
