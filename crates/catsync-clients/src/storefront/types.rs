//! Storefront product records as returned by `GET /products.json`.
//!
//! Listings request only the fields the sync needs (`id`, `vendor`, `status`,
//! `variants`, `images`), so everything except `id` is optional here.

use serde::Deserialize;

use crate::paged::Page;

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct StorefrontProductsPage {
    #[serde(default)]
    pub products: Vec<StorefrontProduct>,
}

impl Page for StorefrontProductsPage {
    type Item = StorefrontProduct;

    fn into_items(self) -> Vec<StorefrontProduct> {
        self.products
    }
}

/// Response envelope for create and update calls.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    pub product: StorefrontProduct,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorefrontProduct {
    pub id: i64,
    #[serde(default)]
    pub vendor: Option<String>,
    /// `active`, `draft` or `archived`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub variants: Vec<StorefrontVariant>,
    #[serde(default)]
    pub images: Vec<StorefrontImage>,
}

impl StorefrontProduct {
    /// First variant whose SKU equals `sku` exactly.
    #[must_use]
    pub fn variant_by_sku(&self, sku: &str) -> Option<&StorefrontVariant> {
        self.variants
            .iter()
            .find(|v| v.sku.as_deref() == Some(sku))
    }

    /// Non-empty variant SKUs.
    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.variants
            .iter()
            .filter_map(|v| v.sku.as_deref())
            .filter(|sku| !sku.is_empty())
    }

    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status.as_deref() == Some("draft")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorefrontVariant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    /// Decimal string, e.g. `"26.00"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorefrontImage {
    #[serde(default)]
    pub id: Option<i64>,
    pub src: String,
}
