//! Known brands and the product types they make.

use super::ProductType;

/// A brand the storefront carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    /// Display name, also used as the `brands` query value.
    pub name: &'static str,
    /// Product types this brand is known for.
    pub product_types: &'static [ProductType],
}

impl Brand {
    /// Whether this brand makes any of the given product types.
    pub fn serves_any(&self, types: &[ProductType]) -> bool {
        self.product_types.iter().any(|t| types.contains(t))
    }
}

use ProductType::*;

/// Brand table. Order is irrelevant; listings sort by name.
pub static BRANDS: &[Brand] = &[
    Brand { name: "Akrapovic", product_types: &[Exhaust] },
    Brand { name: "Alpinestars", product_types: &[Apparel, Gloves, Boots] },
    Brand { name: "Arai", product_types: &[Helmets] },
    Brand { name: "Bell", product_types: &[Helmets] },
    Brand { name: "Brembo", product_types: &[Brakes] },
    Brand { name: "Bridgestone", product_types: &[Tires] },
    Brand { name: "Dainese", product_types: &[Apparel, Gloves, Boots] },
    Brand { name: "Denali", product_types: &[Lighting] },
    Brand { name: "DID", product_types: &[Drivetrain] },
    Brand { name: "Dunlop", product_types: &[Tires, DirtBike] },
    Brand { name: "EBC", product_types: &[Brakes, Atv, DirtBike] },
    Brand { name: "FMF", product_types: &[Exhaust, Atv, DirtBike] },
    Brand { name: "Fox Racing", product_types: &[Apparel, Gloves, Helmets, DirtBike] },
    Brand { name: "HJC", product_types: &[Helmets] },
    Brand { name: "ITP", product_types: &[Tires, Atv] },
    Brand { name: "Kuryakyn", product_types: &[Lighting, Luggage] },
    Brand { name: "Maxima", product_types: &[Oils, Atv, DirtBike] },
    Brand { name: "Michelin", product_types: &[Tires] },
    Brand { name: "Moose Racing", product_types: &[Atv, Luggage] },
    Brand { name: "Motul", product_types: &[Oils] },
    Brand { name: "Ohlins", product_types: &[Suspension] },
    Brand { name: "Pirelli", product_types: &[Tires] },
    Brand { name: "Progressive Suspension", product_types: &[Suspension] },
    Brand { name: "Renthal", product_types: &[Drivetrain, DirtBike] },
    Brand { name: "RK", product_types: &[Drivetrain, Atv] },
    Brand { name: "Shoei", product_types: &[Helmets] },
    Brand { name: "Sidi", product_types: &[Boots] },
    Brand { name: "SW-Motech", product_types: &[Luggage] },
    Brand { name: "Yoshimura", product_types: &[Exhaust] },
    Brand { name: "Yuasa", product_types: &[Batteries, Atv] },
];
