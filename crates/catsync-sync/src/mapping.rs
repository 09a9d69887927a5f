//! Builds storefront payloads from distributor detail records.

use catsync_clients::{DistributorItemDetail, ImagePayload, NewProduct, ProductUpdate, VariantPayload};
use catsync_core::PriceQuote;
use rust_decimal::Decimal;

const UNCLASSIFIED: &str = "Unclassified";
const NO_FRAGRANCE: &str = "No Fragrance";
const INVENTORY_MANAGEMENT: &str = "shopify";
const WEIGHT_UNIT: &str = "oz";

/// Tags derived from product line, class, designer and fragrance, in that
/// order. Absent or blank fields fall back to a sentinel tag.
#[must_use]
pub fn tags(detail: &DistributorItemDetail) -> Vec<String> {
    vec![
        detail
            .product_line()
            .map_or_else(|| UNCLASSIFIED.to_owned(), |v| format!("ProductLine_{v}")),
        detail
            .product_class()
            .map_or_else(|| UNCLASSIFIED.to_owned(), |v| format!("ProductClass_{v}")),
        detail
            .designer()
            .map_or_else(|| UNCLASSIFIED.to_owned(), |v| format!("Designer_{v}")),
        detail
            .fragrance()
            .map_or_else(|| NO_FRAGRANCE.to_owned(), |v| format!("Fragrance_{v}")),
    ]
}

/// Labelled HTML description block.
#[must_use]
pub fn description_html(detail: &DistributorItemDetail) -> String {
    let description = [&detail.desc, &detail.desc2, &detail.desc3]
        .into_iter()
        .filter_map(|part| text(part.as_deref()))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = [
        ("Description", description.as_str()),
        ("UPC", text(detail.upc.as_deref()).unwrap_or_default()),
        ("Size", text(detail.size.as_deref()).unwrap_or_default()),
        ("Designer", detail.designer().unwrap_or_default()),
        ("Fragrance", detail.fragrance().unwrap_or_default()),
    ];

    lines
        .iter()
        .map(|(label, value)| format!("<strong>{label}:</strong> {value}"))
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// Full creation payload. The title falls back to the item code when the
/// record has no description.
#[must_use]
pub fn new_product(detail: &DistributorItemDetail, quote: &PriceQuote, vendor: &str) -> NewProduct {
    NewProduct {
        title: text(detail.desc.as_deref())
            .unwrap_or(detail.item.as_str())
            .to_owned(),
        body_html: description_html(detail),
        vendor: vendor.to_owned(),
        product_type: text(detail.product.as_deref()).map(str::to_owned),
        tags: tags(detail),
        variants: vec![variant_payload(detail, quote, None)],
        images: detail
            .image_url()
            .map(|src| {
                vec![ImagePayload {
                    src: src.to_owned(),
                }]
            })
            .unwrap_or_default(),
    }
}

/// Price and inventory update for the storefront variant that carries the SKU.
#[must_use]
pub fn product_update(detail: &DistributorItemDetail, quote: &PriceQuote, variant_id: i64) -> ProductUpdate {
    ProductUpdate {
        variants: vec![variant_payload(detail, quote, Some(variant_id))],
    }
}

fn variant_payload(
    detail: &DistributorItemDetail,
    quote: &PriceQuote,
    variant_id: Option<i64>,
) -> VariantPayload {
    VariantPayload {
        id: variant_id,
        sku: detail.item.clone(),
        price: quote.price,
        compare_at_price: quote.compare_at_price,
        inventory_quantity: detail.available,
        inventory_management: INVENTORY_MANAGEMENT.to_owned(),
        weight: detail.weight.unwrap_or(Decimal::ZERO),
        weight_unit: WEIGHT_UNIT.to_owned(),
    }
}

fn text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
