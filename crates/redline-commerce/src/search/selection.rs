//! The user's current filter selections.
//!
//! Empty values are never stored: setting a key to `""` or `[]` removes it,
//! so the active count and the query string only ever see real filters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::price::PriceRange;
use super::schema::{FilterKind, FilterSchema, FilterSet};

/// Reserved key for the free-text search filter.
pub const SEARCH_KEY: &str = "search";
/// Reserved key for the price filter.
pub const PRICE_RANGE_KEY: &str = "price_range";
/// Reserved key for the in-stock filter.
pub const IN_STOCK_KEY: &str = "in_stock";
/// Reserved key for the brand filter.
pub const BRANDS_KEY: &str = "brands";
/// Key of the product-type select on the generic filter list.
pub const PRODUCT_TYPE_KEY: &str = "product_type";

/// A selected value: one string, or a list for accumulating filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multi(Vec<String>),
}

impl FilterValue {
    /// Values as a slice-like list.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(v) => vec![v.as_str()],
            FilterValue::Multi(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Whether the value carries nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(v) => v.trim().is_empty(),
            FilterValue::Multi(vs) => vs.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// Flatten for a query string: lists are comma-joined.
    pub fn to_param(&self) -> String {
        self.values().join(",")
    }

    fn normalized(self) -> Option<Self> {
        match self {
            FilterValue::Single(v) => {
                let v = v.trim().to_string();
                (!v.is_empty()).then_some(FilterValue::Single(v))
            }
            FilterValue::Multi(vs) => {
                let mut out: Vec<String> = Vec::with_capacity(vs.len());
                for v in vs {
                    let v = v.trim().to_string();
                    if !v.is_empty() && !out.contains(&v) {
                        out.push(v);
                    }
                }
                (!out.is_empty()).then_some(FilterValue::Multi(out))
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Single(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Single(v)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(vs: Vec<String>) -> Self {
        FilterValue::Multi(vs)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(vs: Vec<&str>) -> Self {
        FilterValue::Multi(vs.into_iter().map(String::from).collect())
    }
}

/// Map from filter key to selected value.
///
/// Serialized as a plain map. Deserialized entries go through [`set`](Self::set),
/// so stored empty values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, FilterValue>", into = "BTreeMap<String, FilterValue>")]
pub struct SelectedFilters {
    values: BTreeMap<String, FilterValue>,
}

impl From<BTreeMap<String, FilterValue>> for SelectedFilters {
    fn from(values: BTreeMap<String, FilterValue>) -> Self {
        let mut selected = Self::new();
        for (key, value) in values {
            selected.set(&key, value);
        }
        selected
    }
}

impl From<SelectedFilters> for BTreeMap<String, FilterValue> {
    fn from(selected: SelectedFilters) -> Self {
        selected.values
    }
}

impl SelectedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selections seeded with each filter's default value (e.g. in-stock).
    pub fn with_defaults(filters: &FilterSet) -> Self {
        let mut selected = Self::new();
        for filter in filters {
            if let Some(default) = &filter.default_value {
                selected.set(&filter.key, default.as_str());
            }
        }
        selected
    }

    /// Set a key. Empty values delete the key instead of being stored.
    pub fn set(&mut self, key: &str, value: impl Into<FilterValue>) {
        match value.into().normalized() {
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
            None => {
                self.values.remove(key);
            }
        }
    }

    /// Toggle one value of an accumulating filter: add if absent, remove if present.
    pub fn toggle(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let mut current: Vec<String> = self
            .values
            .remove(key)
            .map(|v| v.values().into_iter().map(String::from).collect())
            .unwrap_or_default();

        match current.iter().position(|v| v == value) {
            Some(index) => {
                current.remove(index);
            }
            None => current.push(value.to_string()),
        }
        self.set(key, current);
    }

    /// Apply a price preset or custom range; `None` clears the price filter.
    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        match range {
            Some(range) => self.set(PRICE_RANGE_KEY, range.encode()),
            None => self.remove(PRICE_RANGE_KEY),
        }
    }

    /// Apply a weight or size range picked from the schema's ordered options.
    ///
    /// Endpoints are reordered by option position; values the schema does not
    /// list are passed through in the order given.
    pub fn set_option_range(&mut self, schema: &FilterSchema, low: &str, high: &str) {
        let (low, high) = (low.trim(), high.trim());
        let encoded = match (low.is_empty(), high.is_empty()) {
            (true, true) => String::new(),
            (false, true) => format!("{low}-"),
            (true, false) => format!("-{high}"),
            (false, false) => match (schema.option_position(low), schema.option_position(high)) {
                (Some(a), Some(b)) if a > b => format!("{high}-{low}"),
                _ => format!("{low}-{high}"),
            },
        };
        self.set(&schema.key, encoded);
    }

    /// Apply a raw user entry according to the schema's kind.
    ///
    /// Accumulating filters toggle the value; everything else replaces it.
    pub fn apply(&mut self, schema: &FilterSchema, value: &str) {
        if schema.kind.accumulates() {
            self.toggle(&schema.key, value);
        } else if schema.kind == FilterKind::PriceRange {
            let range = super::price::find_preset(value)
                .map(|p| p.range())
                .or_else(|| PriceRange::decode(value));
            self.set_price_range(range);
        } else {
            self.set(&schema.key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of filters currently set.
    pub fn active_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterOption;

    fn size_schema() -> FilterSchema {
        FilterSchema {
            key: "size".to_string(),
            label: "Size".to_string(),
            kind: FilterKind::SizeRange,
            options: ["s", "m", "l", "xl"]
                .iter()
                .map(|v| FilterOption::new(*v, v.to_uppercase()))
                .collect(),
            default_expanded: false,
            default_value: None,
        }
    }

    #[test]
    fn test_empty_string_removes_key() {
        let mut selected = SelectedFilters::new();
        selected.set("search", "chain");
        assert_eq!(selected.active_count(), 1);

        selected.set("search", "");
        assert!(!selected.is_active("search"));
        assert_eq!(selected.active_count(), 0);
    }

    #[test]
    fn test_empty_list_removes_key() {
        let mut selected = SelectedFilters::new();
        selected.set("color", vec!["red"]);
        selected.set("color", Vec::<String>::new());
        assert!(selected.get("color").is_none());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let mut selected = SelectedFilters::new();
        selected.set("search", "   ");
        selected.set("color", vec![" ", ""]);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_toggle_is_symmetric() {
        let mut selected = SelectedFilters::new();
        selected.toggle("brands", "Shoei");
        selected.toggle("brands", "Arai");
        assert_eq!(
            selected.get("brands"),
            Some(&FilterValue::Multi(vec!["Shoei".into(), "Arai".into()]))
        );

        selected.toggle("brands", "Shoei");
        assert_eq!(selected.get("brands"), Some(&FilterValue::Multi(vec!["Arai".into()])));

        selected.toggle("brands", "Arai");
        assert!(!selected.is_active("brands"));
    }

    #[test]
    fn test_toggle_promotes_single() {
        let mut selected = SelectedFilters::new();
        selected.set("color", "red");
        selected.toggle("color", "blue");
        assert_eq!(selected.get("color").unwrap().to_param(), "red,blue");
    }

    #[test]
    fn test_multi_dedupes() {
        let mut selected = SelectedFilters::new();
        selected.set("color", vec!["red", "red", "blue"]);
        assert_eq!(selected.get("color").unwrap().values(), vec!["red", "blue"]);
    }

    #[test]
    fn test_price_range_cleared_by_none() {
        let mut selected = SelectedFilters::new();
        selected.set_price_range(PriceRange::custom("10", "20"));
        assert_eq!(selected.get(PRICE_RANGE_KEY).unwrap().to_param(), "10-20");

        selected.set_price_range(PriceRange::custom("", ""));
        assert!(!selected.is_active(PRICE_RANGE_KEY));
    }

    #[test]
    fn test_option_range_orders_by_position() {
        let schema = size_schema();
        let mut selected = SelectedFilters::new();
        selected.set_option_range(&schema, "xl", "m");
        assert_eq!(selected.get("size").unwrap().to_param(), "m-xl");

        selected.set_option_range(&schema, "s", "");
        assert_eq!(selected.get("size").unwrap().to_param(), "s-");

        selected.set_option_range(&schema, "", "");
        assert!(!selected.is_active("size"));
    }

    #[test]
    fn test_apply_dispatches_on_kind() {
        let mut selected = SelectedFilters::new();
        let price = FilterSchema {
            key: PRICE_RANGE_KEY.to_string(),
            label: "Price".to_string(),
            kind: FilterKind::PriceRange,
            options: vec![],
            default_expanded: true,
            default_value: None,
        };
        selected.apply(&price, "under-25");
        assert_eq!(selected.get(PRICE_RANGE_KEY).unwrap().to_param(), "0-25");

        selected.apply(&price, "30-45");
        assert_eq!(selected.get(PRICE_RANGE_KEY).unwrap().to_param(), "30-45");

        selected.apply(&price, "garbage");
        assert!(!selected.is_active(PRICE_RANGE_KEY));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut selected = SelectedFilters::new();
        selected.set("in_stock", "true");
        selected.set("brands", vec!["EBC"]);
        let json = serde_json::to_string(&selected).unwrap();
        assert_eq!(json, r#"{"brands":["EBC"],"in_stock":"true"}"#);

        let back: SelectedFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selected);
    }

    #[test]
    fn test_deserialize_drops_empty_values() {
        let json = r#"{"search":"","brands":[" ",""],"size":[" M ","M"],"in_stock":"true"}"#;
        let selected: SelectedFilters = serde_json::from_str(json).unwrap();

        assert!(!selected.is_active(SEARCH_KEY));
        assert!(!selected.is_active(BRANDS_KEY));
        assert_eq!(selected.get("size"), Some(&FilterValue::Multi(vec!["M".into()])));
        assert_eq!(selected.active_count(), 2);
    }
}
