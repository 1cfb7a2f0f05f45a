//! Catalog module.
//!
//! Static storefront knowledge about the external catalog: product types,
//! the category table, the brand table and the item shape the cart consumes.

mod brand;
mod category;
mod item;
mod product_type;

pub use brand::{Brand, BRANDS};
pub use category::{find_category, Category, CATEGORIES};
pub use item::CatalogItem;
pub use product_type::ProductType;
