//! Filter schema: declarative descriptions of filter controls.

use serde::{Deserialize, Serialize};

/// The kind of UI control a filter renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Free-text search box.
    Search,
    /// Single choice from a list.
    Select,
    /// Several choices from a list.
    MultiSelect,
    /// Checkbox group; accumulates like a multi-select.
    Checkbox,
    /// Price preset or custom min/max.
    PriceRange,
    /// Low/high pair drawn from ordered weight options.
    WeightRange,
    /// Low/high pair drawn from ordered size options.
    SizeRange,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Search => "search",
            FilterKind::Select => "select",
            FilterKind::MultiSelect => "multi-select",
            FilterKind::Checkbox => "checkbox",
            FilterKind::PriceRange => "price-range",
            FilterKind::WeightRange => "weight-range",
            FilterKind::SizeRange => "size-range",
        }
    }

    /// Whether selections accumulate into a list.
    pub fn accumulates(&self) -> bool {
        matches!(self, FilterKind::MultiSelect | FilterKind::Checkbox)
    }

    /// Whether the selection encodes a `"<lo>-<hi>"` range.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            FilterKind::PriceRange | FilterKind::WeightRange | FilterKind::SizeRange
        )
    }
}

/// One choice within a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent to the catalog service.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Result count for display, when the catalog reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            count: None,
        }
    }
}

/// A filter control and the query parameter it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSchema {
    /// Query-parameter name.
    pub key: String,
    /// Display name.
    pub label: String,
    /// Control type.
    pub kind: FilterKind,
    /// Ordered choices; empty for free-form controls.
    #[serde(default)]
    pub options: Vec<FilterOption>,
    /// Initial disclosure state.
    #[serde(default)]
    pub default_expanded: bool,
    /// Value applied before the user touches anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FilterSchema {
    /// Position of an option value, used to order range endpoints.
    pub fn option_position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    /// Attach result counts to options by value. Unknown values are ignored.
    pub fn apply_counts<'a>(&mut self, counts: impl IntoIterator<Item = (&'a str, u64)>) {
        for (value, count) in counts {
            if let Some(option) = self.options.iter_mut().find(|o| o.value == value) {
                option.count = Some(count);
            }
        }
    }
}

/// Compile-time filter definition used by the static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
    /// `(value, label)` pairs.
    pub options: &'static [(&'static str, &'static str)],
    pub default_expanded: bool,
}

impl FilterDef {
    /// Materialize an owned schema.
    pub fn to_schema(&self) -> FilterSchema {
        FilterSchema {
            key: self.key.to_string(),
            label: self.label.to_string(),
            kind: self.kind,
            options: self
                .options
                .iter()
                .map(|(value, label)| FilterOption::new(*value, *label))
                .collect(),
            default_expanded: self.default_expanded,
            default_value: None,
        }
    }
}

/// The ordered filter controls for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<FilterSchema>,
}

impl FilterSet {
    pub fn new(filters: Vec<FilterSchema>) -> Self {
        Self { filters }
    }

    /// Look up a filter by key.
    pub fn get(&self, key: &str) -> Option<&FilterSchema> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Mutable lookup, e.g. to attach result counts.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FilterSchema> {
        self.filters.iter_mut().find(|f| f.key == key)
    }

    /// Filter keys in display order.
    pub fn keys(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterSchema> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn into_vec(self) -> Vec<FilterSchema> {
        self.filters
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterSchema;
    type IntoIter = std::slice::Iter<'a, FilterSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_filter() -> FilterSchema {
        FilterDef {
            key: "size",
            label: "Size",
            kind: FilterKind::SizeRange,
            options: &[("s", "S"), ("m", "M"), ("l", "L")],
            default_expanded: false,
        }
        .to_schema()
    }

    #[test]
    fn test_def_to_schema() {
        let schema = size_filter();
        assert_eq!(schema.key, "size");
        assert_eq!(schema.options.len(), 3);
        assert_eq!(schema.option_position("l"), Some(2));
        assert_eq!(schema.option_position("xl"), None);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FilterKind::MultiSelect).unwrap();
        assert_eq!(json, "\"multi-select\"");
        assert_eq!(FilterKind::WeightRange.as_str(), "weight-range");
    }

    #[test]
    fn test_apply_counts() {
        let mut schema = size_filter();
        schema.apply_counts([("m", 12), ("xxl", 3)]);
        assert_eq!(schema.options[1].count, Some(12));
        assert_eq!(schema.options[0].count, None);
    }

    #[test]
    fn test_kind_predicates() {
        assert!(FilterKind::Checkbox.accumulates());
        assert!(!FilterKind::Select.accumulates());
        assert!(FilterKind::SizeRange.is_range());
        assert!(!FilterKind::Search.is_range());
    }
}
