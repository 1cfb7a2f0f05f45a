//! End-to-end behaviour of the storefront core through the public API.

use redline_commerce::checkout::{format_card_number, format_expiry, format_phone, format_zip};
use redline_commerce::prelude::*;
use redline_commerce::search::{partition_brands, Resolution, PRICE_RANGE_KEY, PRODUCT_TYPE_KEY};

fn part(id: i64, cents: i64) -> CatalogItem {
    CatalogItem::new(id, format!("Part {id}"), format!("SKU-{id}"), Money::new(cents, Currency::USD))
}

fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn totals_are_stable_between_mutations() {
    let config = PricingConfig::default();
    let mut cart = Cart::new(Currency::USD);

    cart.add_item(&part(1, 1999), 3);
    assert_eq!(cart.totals(&config), cart.totals(&config));
    cart.update_quantity(CatalogItemId(1), 5);
    assert_eq!(cart.totals(&config), cart.totals(&config));
    cart.add_item(&part(2, 750), 1);
    cart.remove_item(CatalogItemId(1));
    assert_eq!(cart.totals(&config), cart.totals(&config));
}

#[test]
fn subtotal_ignores_insertion_order() {
    let lines = [(1, 4000, 2), (2, 2500, 1), (3, 899, 4), (4, 12_345, 1)];
    let expected: i64 = lines.iter().map(|(_, cents, qty)| cents * qty).sum();

    for order in permutations(&lines) {
        let mut cart = Cart::new(Currency::USD);
        for (id, cents, qty) in order {
            cart.add_item(&part(id, cents), qty as u32);
        }
        let totals = cart.totals(&PricingConfig::default());
        assert_eq!(totals.subtotal.amount_cents, expected);
    }
}

#[test]
fn free_shipping_starts_exactly_at_threshold() {
    let config = PricingConfig::default();

    let mut below = Cart::new(Currency::USD);
    below.add_item(&part(1, 9899), 1);
    assert_eq!(below.totals(&config).shipping.amount_cents, 1299);
    assert_eq!(below.totals(&config).free_shipping_remaining.amount_cents, 1);

    let mut at = Cart::new(Currency::USD);
    at.add_item(&part(1, 9900), 1);
    assert!(at.totals(&config).shipping.is_zero());
    assert!(at.totals(&config).has_free_shipping());
}

#[test]
fn quantity_never_drops_below_one() {
    let mut cart = Cart::new(Currency::USD);
    cart.add_item(&part(1, 500), 2);

    assert!(!cart.update_quantity(CatalogItemId(1), 0));
    assert!(!cart.update_quantity(CatalogItemId(1), -3));
    assert_eq!(cart.get_item(CatalogItemId(1)).map(|i| i.quantity), Some(2));

    assert!(cart.update_quantity(CatalogItemId(1), 1));
    assert_eq!(cart.item_count(), 1);
}

#[test]
fn empty_selections_are_not_counted() {
    let mut selected = SelectedFilters::new();
    selected.set("search", "pads");
    selected.set("brands", vec!["EBC", "Galfer"]);
    selected.set("color", "");
    assert_eq!(selected.active_count(), 2);

    selected.set("search", "   ");
    selected.set("brands", Vec::<String>::new());
    assert_eq!(selected.active_count(), 0);
    assert!(selected.is_empty());

    let params = QueryParams::from_selected(&selected);
    assert!(params.is_empty());
}

#[test]
fn brand_partition_covers_every_brand_once() {
    for category in CATEGORIES {
        let partition = partition_brands(BRANDS, category.product_types);
        assert_eq!(partition.prioritized.len() + partition.other.len(), BRANDS.len());
        for brand in &partition.prioritized {
            assert!(!partition.other.contains(brand), "{} in both lists", brand.name);
        }
        let names: Vec<String> = partition.prioritized.iter().map(|b| b.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}

#[test]
fn formatters_are_idempotent() {
    let inputs = ["", "4", "42424242", "4242 4242 4242 4242 99", "555-123-4567", "902101234", "1", "12", "1234", "12/34"];
    for raw in inputs {
        let card = format_card_number(raw);
        assert_eq!(format_card_number(&card), card);
        let phone = format_phone(raw);
        assert_eq!(format_phone(&phone), phone);
        let zip = format_zip(raw);
        assert_eq!(format_zip(&zip), zip);
        let expiry = format_expiry(raw, None);
        assert_eq!(format_expiry(&expiry, None), expiry);
    }
}

#[test]
fn cart_totals_scenario() {
    let mut cart = Cart::new(Currency::USD);
    cart.add_item(&part(1, 4000), 2);
    cart.add_item(&part(2, 2500), 1);

    let totals = cart.totals(&PricingConfig::default());
    assert_eq!(totals.subtotal.display(), "$105.00");
    assert!(totals.shipping.is_zero());
    assert_eq!(totals.tax.amount_cents, 893);
    assert_eq!(totals.grand_total.amount_cents, 11_393);
    assert_eq!(totals.item_count, 3);
}

#[test]
fn card_number_scenario() {
    assert_eq!(CheckoutField::CardNumber.format("4242424242424242", None), "4242 4242 4242 4242");
    assert_eq!(
        CheckoutField::CardNumber.format("41111111111111112222", None),
        "4111 1111 1111 1111"
    );
}

#[test]
fn expiry_backspace_scenario() {
    let typed = CheckoutField::Expiry.format("123", Some("12/"));
    assert_eq!(typed, "12/3");
    assert_eq!(CheckoutField::Expiry.format("12/", Some(&typed)), "12");
}

#[test]
fn unknown_slug_gets_generic_filters() {
    for slug in ["unknown-category-xyz", "quantum-widgets"] {
        let resolved = resolve_filters(slug);
        assert_eq!(resolved.resolution, Resolution::Fallback, "slug {slug:?}");
        assert_eq!(
            resolved.filters.keys(),
            vec![SEARCH_KEY, PRICE_RANGE_KEY, "in_stock", PRODUCT_TYPE_KEY]
        );
        let product_type = resolved.filters.get(PRODUCT_TYPE_KEY).unwrap();
        assert_eq!(product_type.options.len(), ProductType::ALL.len());
    }
}

#[test]
fn selections_round_trip_through_query_string() {
    let resolved = resolve_filters("helmets");
    let mut selected = SelectedFilters::with_defaults(&resolved.filters);
    selected.toggle("brands", "Bell");
    selected.set_price_range(Some(PriceRange::new(5000, Some(20_000))));

    let query = CatalogQuery::new()
        .with_category(resolved.slug.as_str())
        .with_filters(selected.clone())
        .with_sort(SortOption::PriceAsc);
    let parsed = CatalogQuery::from_query_string(&query.to_params().to_query_string());

    assert_eq!(
        QueryParams::from_selected(&parsed.filters).to_query_string(),
        QueryParams::from_selected(&selected).to_query_string()
    );
    assert_eq!(parsed.filters.get("brands").map(|v| v.to_param()), Some("Bell".to_string()));
    assert_eq!(parsed.sort, SortOption::PriceAsc);
}

#[test]
fn checkout_persists_order_for_confirmation() {
    let cache = redline_cache::Cache::in_memory();
    let config = PricingConfig::default();
    let mut session = CartSession::open(cache.clone(), CartId::new("rider-1"), Currency::USD);
    session.add_item(&part(1, 4000), 2);
    session.add_item(&part(2, 2500), 1);

    let mut flow = CheckoutFlow::start(session.cart()).unwrap();
    flow.advance().unwrap();
    flow.set_contact("Ada Rider", "ada@example.com", Some("5125550100"));
    flow.advance().unwrap();
    flow.set_shipping_address(Address::new("Ada", "Rider", "1 Pit Ln", "Austin", Some("TX"), "78701"));
    flow.advance().unwrap();
    flow.set_card("4242424242424242", "1230", "123", YearMonth::new(2026, 10)).unwrap();
    flow.advance().unwrap();

    let request = flow.payment_request(session.cart(), &config).unwrap();
    assert_eq!(request.amount, 11_393);
    assert_eq!(request.idempotency_key(), Some(flow.idempotency_key.as_str()));

    flow.complete(PaymentReference::Intent { id: "pi_42".into() }).unwrap();
    let order = Order::from_checkout(&flow, session.cart(), &config).unwrap();
    let store = OrderStore::new(cache, Currency::USD);
    store.save(&order).unwrap();
    session.clear();

    let located = locate_order(&store, "pi_42", Some("ADA@example.com")).unwrap();
    assert_eq!(located.order, order);
    assert!(session.cart().is_empty());
}
