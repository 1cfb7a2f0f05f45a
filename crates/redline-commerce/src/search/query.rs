//! Selected filters to catalog query parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::selection::SelectedFilters;

/// Sort options for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Catalog's own ranking.
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by newest first.
    Newest,
    /// Sort by highest rated.
    Rating,
}

impl SortOption {
    pub const ALL: [SortOption; 7] = [
        SortOption::Relevance,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::Newest,
        SortOption::Rating,
    ];

    /// Value of the `sort` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::NameAsc => "name_asc",
            SortOption::NameDesc => "name_desc",
            SortOption::Newest => "newest",
            SortOption::Rating => "rating",
        }
    }

    /// Parse a `sort` parameter; unknown values fall back to relevance.
    pub fn from_param(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|o| o.as_param() == s.trim())
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::Newest => "Newest",
            SortOption::Rating => "Highest Rated",
        }
    }
}

/// Flat `key=value` parameters in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten selections: lists are comma-joined, unknown keys pass through.
    pub fn from_selected(selected: &SelectedFilters) -> Self {
        let params = selected
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_param()))
            .collect();
        Self { params }
    }

    /// Parse a query string, tolerating a leading `?` and `+` for spaces.
    pub fn parse(qs: &str) -> Self {
        let mut params = BTreeMap::new();
        for pair in qs.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent_decode(key);
            if !key.is_empty() {
                params.insert(key, percent_decode(value));
            }
        }
        Self { params }
    }

    /// Insert a parameter; empty values remove it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if value.is_empty() {
            self.params.remove(&key);
        } else {
            self.params.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rebuild selections from parameters; comma-separated values become lists.
    pub fn to_selected(&self) -> SelectedFilters {
        let mut selected = SelectedFilters::new();
        for (key, value) in self.iter() {
            if value.contains(',') {
                selected.set(key, value.split(',').collect::<Vec<_>>());
            } else {
                selected.set(key, value);
            }
        }
        selected
    }

    /// Render as a percent-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// A catalog listing request: category, selections, sort and page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Category slug, sent as `category`.
    pub category: Option<String>,
    /// Filter selections.
    pub filters: SelectedFilters,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogQuery {
    pub const DEFAULT_PER_PAGE: u32 = 24;
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new() -> Self {
        Self {
            category: None,
            filters: SelectedFilters::new(),
            sort: SortOption::Relevance,
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }

    /// Set the category slug. Blank slugs clear it.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into().trim().to_lowercase();
        self.category = (!slug.is_empty()).then_some(slug);
        self
    }

    /// Replace the filter selections.
    pub fn with_filters(mut self, filters: SelectedFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination, clamping to valid bounds.
    pub fn with_pagination(mut self, page: u32, per_page: u32) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, Self::MAX_PER_PAGE);
        self
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Full parameter set sent to the catalog service.
    ///
    /// Paging and sort keys overwrite any selection that reused their names.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::from_selected(&self.filters);
        if let Some(category) = &self.category {
            params.insert("category", category.as_str());
        }
        params.insert("page", self.page.to_string());
        params.insert("per_page", self.per_page.to_string());
        if self.sort != SortOption::Relevance {
            params.insert("sort", self.sort.as_param());
        }
        params
    }

    /// Parse a listing URL's query string back into a query.
    pub fn from_query_string(qs: &str) -> Self {
        let mut params = QueryParams::parse(qs);
        let mut query = Self::new();

        if let Some(category) = params.params.remove("category") {
            query = query.with_category(category);
        }
        if let Some(sort) = params.params.remove("sort") {
            query.sort = SortOption::from_param(&sort);
        }
        let page = params.params.remove("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let per_page = params
            .params
            .remove("per_page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::DEFAULT_PER_PAGE);

        query.filters = params.to_selected();
        query.with_pagination(page, per_page)
    }

    /// Stable key for caching listing responses.
    pub fn cache_key(&self) -> String {
        format!("catalog:{}", self.to_params().to_query_string())
    }
}

// Unreserved characters and ',' stay literal so list values remain readable.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b',' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterValue;

    fn selected() -> SelectedFilters {
        let mut selected = SelectedFilters::new();
        selected.set("search", "chain lube");
        selected.set("brands", vec!["Motul", "Maxima"]);
        selected.set("in_stock", "true");
        selected.set("viscosity", "10w-40");
        selected
    }

    #[test]
    fn test_lists_comma_joined_and_sorted() {
        let params = QueryParams::from_selected(&selected());
        assert_eq!(
            params.to_query_string(),
            "brands=Motul,Maxima&in_stock=true&search=chain%20lube&viscosity=10w-40"
        );
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let mut selected = SelectedFilters::new();
        selected.set("fitment_year", "2019");
        let params = QueryParams::from_selected(&selected);
        assert_eq!(params.get("fitment_year"), Some("2019"));
    }

    #[test]
    fn test_parse_decodes() {
        let params = QueryParams::parse("?search=chain%20lube&brands=Motul,Maxima&q=a+b&empty");
        assert_eq!(params.get("search"), Some("chain lube"));
        assert_eq!(params.get("q"), Some("a b"));
        assert_eq!(params.get("empty"), Some(""));
    }

    #[test]
    fn test_decode_utf8_and_bad_escapes() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_params_round_trip_to_selected() {
        let original = selected();
        let params = QueryParams::parse(&QueryParams::from_selected(&original).to_query_string());
        assert_eq!(params.to_selected(), original);
        assert_eq!(
            params.to_selected().get("brands"),
            Some(&FilterValue::Multi(vec!["Motul".into(), "Maxima".into()]))
        );
    }

    #[test]
    fn test_catalog_query_params() {
        let query = CatalogQuery::new()
            .with_category(" Oils-Fluids ")
            .with_filters(selected())
            .with_sort(SortOption::PriceAsc)
            .with_pagination(2, 500);

        assert_eq!(query.per_page, 100);
        assert_eq!(query.offset(), 100);

        let params = query.to_params();
        assert_eq!(params.get("category"), Some("oils-fluids"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("per_page"), Some("100"));
        assert_eq!(params.get("sort"), Some("price_asc"));
    }

    #[test]
    fn test_relevance_sort_omitted() {
        let params = CatalogQuery::new().to_params();
        assert!(params.get("sort").is_none());
        assert_eq!(params.to_query_string(), "page=1&per_page=24");
    }

    #[test]
    fn test_from_query_string() {
        let query = CatalogQuery::from_query_string(
            "category=helmets&page=0&per_page=abc&sort=rating&brands=Shoei,Arai&in_stock=true",
        );
        assert_eq!(query.category.as_deref(), Some("helmets"));
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, CatalogQuery::DEFAULT_PER_PAGE);
        assert_eq!(query.sort, SortOption::Rating);
        assert_eq!(query.filters.active_count(), 2);
        assert!(query.filters.get("page").is_none());
    }

    #[test]
    fn test_sort_from_param_unknown() {
        assert_eq!(SortOption::from_param("price_desc"), SortOption::PriceDesc);
        assert_eq!(SortOption::from_param("bogus"), SortOption::Relevance);
    }

    #[test]
    fn test_cache_key_stable_across_insert_order() {
        let mut a = SelectedFilters::new();
        a.set("color", "red");
        a.set("size", "m");
        let mut b = SelectedFilters::new();
        b.set("size", "m");
        b.set("color", "red");
        let qa = CatalogQuery::new().with_filters(a);
        let qb = CatalogQuery::new().with_filters(b);
        assert_eq!(qa.cache_key(), qb.cache_key());
    }
}
