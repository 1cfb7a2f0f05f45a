//! Search module.
//!
//! Category filter resolution, brand prioritization, filter selections and
//! their translation into catalog query parameters.

mod brands;
mod price;
mod query;
mod resolver;
mod results;
mod schema;
mod selection;

pub use brands::{list_brands, partition_brands, BrandListing, BrandPartition, BrandQuery};
pub use price::{find_preset, PricePreset, PriceRange, PRICE_PRESETS};
pub use query::{CatalogQuery, QueryParams, SortOption};
pub use resolver::{base_filters, resolve_filters, KeywordBucket, Resolution, ResolvedFilters};
pub use results::{CatalogPage, Pagination};
pub use schema::{FilterDef, FilterKind, FilterOption, FilterSchema, FilterSet};
pub use selection::{
    FilterValue, SelectedFilters, BRANDS_KEY, IN_STOCK_KEY, PRICE_RANGE_KEY, PRODUCT_TYPE_KEY,
    SEARCH_KEY,
};
