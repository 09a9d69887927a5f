use catsync_clients::StorefrontVariant;
use catsync_core::parse_exclusions;
use rust_decimal::Decimal;

use super::*;

fn rules() -> ExclusionRules {
    parse_exclusions(
        "suffixes:\n  - '-A'\nproduct_lines:\n  - Wellness\nproduct_classes:\n  - MINLDY\n",
    )
    .unwrap()
}

fn detail(code: &str, line: Option<&str>, class: Option<&str>) -> DistributorItemDetail {
    let mut d = DistributorItemDetail::new(code, Decimal::from(10), Decimal::from(20));
    d.product_line = line.map(str::to_owned);
    d.product_class = class.map(str::to_owned);
    d
}

fn product(id: i64, sku: &str) -> StorefrontProduct {
    StorefrontProduct {
        id,
        vendor: Some("Distributor".to_owned()),
        status: Some("active".to_owned()),
        variants: vec![StorefrontVariant {
            id: id * 10,
            sku: Some(sku.to_owned()),
            price: None,
            compare_at_price: None,
            inventory_quantity: None,
        }],
        images: Vec::new(),
    }
}

// classify

#[test]
fn suffix_wins_over_everything() {
    // Even an otherwise eligible record with a good category is suffix-excluded.
    let d = detail("X100-A", Some("Fragrance"), Some("PERFUME"));
    assert_eq!(
        classify("X100-A", Some(&d), &rules()),
        Classification::SuffixExcluded {
            suffix: "-A".to_owned()
        }
    );
    assert!(matches!(
        classify("X100-A", None, &rules()),
        Classification::SuffixExcluded { .. }
    ));
}

#[test]
fn missing_detail_is_category_excluded_with_fetch_failed_reason() {
    match classify("X100", None, &rules()) {
        Classification::CategoryExcluded { reason } => assert!(reason.contains(FETCH_FAILED)),
        other => panic!("expected CategoryExcluded, got {other:?}"),
    }
}

#[test]
fn denylisted_line_or_class_is_excluded() {
    let by_line = detail("X1", Some("Wellness"), Some("PERFUME"));
    let by_class = detail("X2", Some("Fragrance"), Some("MINLDY"));
    assert!(matches!(
        classify("X1", Some(&by_line), &rules()),
        Classification::CategoryExcluded { .. }
    ));
    match classify("X2", Some(&by_class), &rules()) {
        Classification::CategoryExcluded { reason } => assert!(reason.contains("MINLDY")),
        other => panic!("expected CategoryExcluded, got {other:?}"),
    }
}

#[test]
fn category_match_is_exact() {
    let d = detail("X1", Some("wellness"), Some("MINLDY2"));
    assert_eq!(classify("X1", Some(&d), &rules()), Classification::Eligible);
}

#[test]
fn unclassified_item_is_eligible() {
    let d = detail("X1", None, None);
    assert_eq!(classify("X1", Some(&d), &rules()), Classification::Eligible);
}

// decide

#[test]
fn existing_product_is_updated() {
    let p = product(5, "X100");
    assert_eq!(
        decide("X100", Some(&p), true, true),
        Action::Update {
            product_id: 5,
            variant_id: 50
        }
    );
}

#[test]
fn existing_product_missing_upstream_is_drafted() {
    let p = product(5, "X100");
    assert_eq!(
        decide("X100", Some(&p), false, true),
        Action::Draft { product_id: 5 }
    );
}

#[test]
fn missing_upstream_without_product_is_skipped() {
    assert_eq!(decide("X100", None, false, false), Action::SkipMissing);
    assert_eq!(decide("X100", None, false, true), Action::SkipMissing);
}

#[test]
fn new_code_is_created() {
    assert_eq!(decide("X100", None, true, false), Action::Create);
}

#[test]
fn known_code_without_product_is_already_synced() {
    assert_eq!(decide("X100", None, true, true), Action::AlreadySynced);
}

#[test]
fn product_without_matching_variant_counts_as_absent() {
    let p = product(5, "OTHER");
    assert_eq!(decide("X100", Some(&p), true, false), Action::Create);
}

#[test]
fn exactly_one_action_for_every_input() {
    let p = product(5, "X100");
    for existing in [None, Some(&p)] {
        for in_distributor in [false, true] {
            for in_storefront in [false, true] {
                // `decide` is total; this pins that no combination panics and
                // that an existing product always wins over create.
                let action = decide("X100", existing, in_distributor, in_storefront);
                if existing.is_some() {
                    assert!(matches!(action, Action::Update { .. } | Action::Draft { .. }));
                } else {
                    assert!(!matches!(action, Action::Update { .. } | Action::Draft { .. }));
                }
            }
        }
    }
}
