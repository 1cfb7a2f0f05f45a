//! Product-type tags shared by categories and brands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product-type tag.
///
/// Categories list the types they are relevant to; brands list the types they
/// make. The overlap drives brand prioritization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    Tires,
    Helmets,
    Apparel,
    Gloves,
    Boots,
    Exhaust,
    Brakes,
    Batteries,
    Oils,
    Lighting,
    Luggage,
    Drivetrain,
    Suspension,
    Atv,
    DirtBike,
}

impl ProductType {
    /// Every product type, in display order.
    pub const ALL: [ProductType; 15] = [
        ProductType::Tires,
        ProductType::Helmets,
        ProductType::Apparel,
        ProductType::Gloves,
        ProductType::Boots,
        ProductType::Exhaust,
        ProductType::Brakes,
        ProductType::Batteries,
        ProductType::Oils,
        ProductType::Lighting,
        ProductType::Luggage,
        ProductType::Drivetrain,
        ProductType::Suspension,
        ProductType::Atv,
        ProductType::DirtBike,
    ];

    /// Query-parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Tires => "tires",
            ProductType::Helmets => "helmets",
            ProductType::Apparel => "apparel",
            ProductType::Gloves => "gloves",
            ProductType::Boots => "boots",
            ProductType::Exhaust => "exhaust",
            ProductType::Brakes => "brakes",
            ProductType::Batteries => "batteries",
            ProductType::Oils => "oils",
            ProductType::Lighting => "lighting",
            ProductType::Luggage => "luggage",
            ProductType::Drivetrain => "drivetrain",
            ProductType::Suspension => "suspension",
            ProductType::Atv => "atv",
            ProductType::DirtBike => "dirt-bike",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::Tires => "Tires",
            ProductType::Helmets => "Helmets",
            ProductType::Apparel => "Riding Apparel",
            ProductType::Gloves => "Gloves",
            ProductType::Boots => "Boots",
            ProductType::Exhaust => "Exhaust",
            ProductType::Brakes => "Brakes",
            ProductType::Batteries => "Batteries",
            ProductType::Oils => "Oils & Fluids",
            ProductType::Lighting => "Lighting",
            ProductType::Luggage => "Luggage",
            ProductType::Drivetrain => "Chains & Sprockets",
            ProductType::Suspension => "Suspension",
            ProductType::Atv => "ATV / UTV",
            ProductType::DirtBike => "Dirt Bike",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
