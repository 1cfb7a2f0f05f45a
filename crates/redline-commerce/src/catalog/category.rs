//! Category table: product types and category-specific filter controls.
//!
//! Base filters (search, price, in-stock) and the brand list are added by the
//! resolver, so only the controls unique to a category live here.

use super::ProductType;
use crate::search::{FilterDef, FilterKind};

/// A storefront category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable slug used in URLs and as the lookup key.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Product types relevant to this category; drives brand prioritization.
    pub product_types: &'static [ProductType],
    /// Category-specific filter controls, in display order.
    pub filters: &'static [FilterDef],
}

/// Look up a category by exact slug.
pub fn find_category(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

const APPAREL_SIZES: &[(&str, &str)] = &[
    ("xs", "XS"),
    ("s", "S"),
    ("m", "M"),
    ("l", "L"),
    ("xl", "XL"),
    ("2xl", "2XL"),
    ("3xl", "3XL"),
];

const COLORS: &[(&str, &str)] = &[
    ("black", "Black"),
    ("white", "White"),
    ("gray", "Gray"),
    ("red", "Red"),
    ("blue", "Blue"),
    ("hi-viz", "Hi-Viz"),
];

const fn def(
    key: &'static str,
    label: &'static str,
    kind: FilterKind,
    options: &'static [(&'static str, &'static str)],
) -> FilterDef {
    FilterDef {
        key,
        label,
        kind,
        options,
        default_expanded: false,
    }
}

const fn expanded(filter: FilterDef) -> FilterDef {
    FilterDef {
        default_expanded: true,
        ..filter
    }
}

use FilterKind::*;
use ProductType as P;

/// Category table.
pub static CATEGORIES: &[Category] = &[
    Category {
        slug: "tires",
        name: "Tires",
        product_types: &[P::Tires],
        filters: &[
            expanded(def(
                "tire_size",
                "Tire Size",
                MultiSelect,
                &[
                    ("90/90-21", "90/90-21"),
                    ("110/80-19", "110/80-19"),
                    ("120/70-17", "120/70-17"),
                    ("150/70-17", "150/70-17"),
                    ("180/55-17", "180/55-17"),
                    ("190/50-17", "190/50-17"),
                ],
            )),
            def("tire_position", "Position", Select, &[("front", "Front"), ("rear", "Rear")]),
            def(
                "tire_type",
                "Tire Type",
                MultiSelect,
                &[
                    ("sport", "Sport"),
                    ("touring", "Touring"),
                    ("dual-sport", "Dual Sport"),
                    ("off-road", "Off-Road"),
                    ("cruiser", "Cruiser"),
                ],
            ),
        ],
    },
    Category {
        slug: "helmets",
        name: "Helmets",
        product_types: &[P::Helmets],
        filters: &[
            expanded(def(
                "helmet_type",
                "Helmet Type",
                MultiSelect,
                &[
                    ("full-face", "Full Face"),
                    ("modular", "Modular"),
                    ("open-face", "Open Face"),
                    ("off-road", "Off-Road"),
                    ("dual-sport", "Dual Sport"),
                ],
            )),
            def("size", "Size", SizeRange, APPAREL_SIZES),
            def("color", "Color", MultiSelect, COLORS),
            def(
                "certification",
                "Certification",
                Checkbox,
                &[("dot", "DOT"), ("ece-22-06", "ECE 22.06"), ("snell", "Snell")],
            ),
        ],
    },
    Category {
        slug: "riding-apparel",
        name: "Riding Apparel",
        product_types: &[P::Apparel, P::Gloves, P::Boots],
        filters: &[
            expanded(def(
                "apparel_type",
                "Type",
                MultiSelect,
                &[
                    ("jackets", "Jackets"),
                    ("pants", "Pants"),
                    ("suits", "One-Piece Suits"),
                    ("gloves", "Gloves"),
                    ("boots", "Boots"),
                ],
            )),
            def("size", "Size", SizeRange, APPAREL_SIZES),
            def("gender", "Fit", Select, &[("men", "Men"), ("women", "Women"), ("youth", "Youth")]),
            def(
                "material",
                "Material",
                MultiSelect,
                &[("leather", "Leather"), ("textile", "Textile"), ("mesh", "Mesh")],
            ),
            def("color", "Color", MultiSelect, COLORS),
        ],
    },
    Category {
        slug: "atv-parts",
        name: "ATV & UTV Parts",
        product_types: &[P::Atv, P::Tires, P::Brakes, P::Drivetrain, P::Batteries],
        filters: &[
            expanded(def(
                "machine_type",
                "Machine",
                Select,
                &[("atv", "ATV"), ("utv", "UTV / Side-by-Side")],
            )),
            def(
                "atv_part_type",
                "Part Type",
                MultiSelect,
                &[
                    ("tires", "Tires & Wheels"),
                    ("brakes", "Brakes"),
                    ("drivetrain", "Drivetrain"),
                    ("winches", "Winches"),
                    ("plows", "Plows"),
                ],
            ),
            def(
                "tire_size",
                "Tire Size",
                MultiSelect,
                &[("25x8-12", "25x8-12"), ("26x9-14", "26x9-14"), ("27x11-14", "27x11-14")],
            ),
        ],
    },
    Category {
        slug: "exhaust",
        name: "Exhaust",
        product_types: &[P::Exhaust],
        filters: &[
            expanded(def(
                "exhaust_type",
                "Exhaust Type",
                MultiSelect,
                &[("full-system", "Full System"), ("slip-on", "Slip-On"), ("headers", "Headers")],
            )),
            def(
                "material",
                "Material",
                MultiSelect,
                &[("stainless", "Stainless Steel"), ("titanium", "Titanium"), ("carbon", "Carbon Fiber")],
            ),
        ],
    },
    Category {
        slug: "brakes",
        name: "Brakes",
        product_types: &[P::Brakes],
        filters: &[
            expanded(def(
                "brake_component",
                "Component",
                MultiSelect,
                &[("pads", "Pads"), ("rotors", "Rotors"), ("calipers", "Calipers"), ("lines", "Brake Lines")],
            )),
            def(
                "pad_compound",
                "Pad Compound",
                MultiSelect,
                &[("sintered", "Sintered"), ("organic", "Organic"), ("ceramic", "Ceramic")],
            ),
        ],
    },
    Category {
        slug: "batteries",
        name: "Batteries & Electrical",
        product_types: &[P::Batteries],
        filters: &[
            expanded(def(
                "battery_chemistry",
                "Chemistry",
                MultiSelect,
                &[("agm", "AGM"), ("lithium", "Lithium"), ("conventional", "Conventional")],
            )),
            def(
                "weight",
                "Weight (lb)",
                WeightRange,
                &[("1", "1 lb"), ("3", "3 lb"), ("5", "5 lb"), ("8", "8 lb"), ("12", "12 lb"), ("15", "15 lb")],
            ),
        ],
    },
    Category {
        slug: "oils-fluids",
        name: "Oils & Fluids",
        product_types: &[P::Oils],
        filters: &[
            expanded(def(
                "viscosity",
                "Viscosity",
                MultiSelect,
                &[("10w-30", "10W-30"), ("10w-40", "10W-40"), ("15w-50", "15W-50"), ("20w-50", "20W-50")],
            )),
            def(
                "oil_type",
                "Oil Type",
                Select,
                &[("synthetic", "Full Synthetic"), ("semi-synthetic", "Semi-Synthetic"), ("conventional", "Conventional")],
            ),
        ],
    },
    Category {
        slug: "lighting",
        name: "Lighting",
        product_types: &[P::Lighting],
        filters: &[
            expanded(def(
                "light_type",
                "Light Type",
                MultiSelect,
                &[
                    ("headlight", "Headlights"),
                    ("auxiliary", "Auxiliary"),
                    ("turn-signal", "Turn Signals"),
                    ("tail-light", "Tail Lights"),
                ],
            )),
            def("bulb_type", "Bulb", MultiSelect, &[("led", "LED"), ("halogen", "Halogen"), ("hid", "HID")]),
        ],
    },
    Category {
        slug: "luggage",
        name: "Luggage",
        product_types: &[P::Luggage],
        filters: &[expanded(def(
            "luggage_type",
            "Luggage Type",
            MultiSelect,
            &[
                ("saddlebags", "Saddlebags"),
                ("tank-bags", "Tank Bags"),
                ("tail-bags", "Tail Bags"),
                ("top-cases", "Top Cases"),
            ],
        ))],
    },
    Category {
        slug: "chains-sprockets",
        name: "Chains & Sprockets",
        product_types: &[P::Drivetrain],
        filters: &[
            expanded(def(
                "chain_pitch",
                "Chain Pitch",
                Select,
                &[("420", "420"), ("428", "428"), ("520", "520"), ("525", "525"), ("530", "530")],
            )),
            def(
                "drivetrain_component",
                "Component",
                MultiSelect,
                &[
                    ("chains", "Chains"),
                    ("front-sprockets", "Front Sprockets"),
                    ("rear-sprockets", "Rear Sprockets"),
                    ("kits", "Chain & Sprocket Kits"),
                ],
            ),
        ],
    },
    Category {
        slug: "dirt-bike-parts",
        name: "Dirt Bike Parts",
        product_types: &[P::DirtBike, P::Drivetrain, P::Suspension, P::Exhaust],
        filters: &[
            expanded(def(
                "engine_size",
                "Engine Size",
                Select,
                &[("50", "50cc"), ("125", "125cc"), ("250", "250cc"), ("350", "350cc"), ("450", "450cc")],
            )),
            def(
                "dirt_part_type",
                "Part Type",
                MultiSelect,
                &[
                    ("plastics", "Plastics"),
                    ("handlebars", "Handlebars"),
                    ("graphics", "Graphics"),
                    ("air-filters", "Air Filters"),
                ],
            ),
        ],
    },
    Category {
        slug: "suspension",
        name: "Suspension",
        product_types: &[P::Suspension],
        filters: &[expanded(def(
            "suspension_component",
            "Component",
            MultiSelect,
            &[("shocks", "Shocks"), ("fork-springs", "Fork Springs"), ("cartridges", "Fork Cartridges")],
        ))],
    },
];
