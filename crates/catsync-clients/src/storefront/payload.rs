//! Request bodies for storefront writes.
//!
//! Prices are serialized as decimal strings (`"26.00"`), tags as the
//! comma-separated string the admin API documents.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Full product body sent on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(serialize_with = "comma_separated")]
    pub tags: Vec<String>,
    pub variants: Vec<VariantPayload>,
    pub images: Vec<ImagePayload>,
}

/// Price and inventory fields of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantPayload {
    /// Existing variant id; set on updates, absent on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sku: String,
    pub price: Decimal,
    pub compare_at_price: Decimal,
    pub inventory_quantity: i64,
    pub inventory_management: String,
    pub weight: Decimal,
    pub weight_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub src: String,
}

/// Partial update for an existing product. Only variant price and inventory
/// fields are ever sent; title, description, tags and images stay as they
/// are on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub variants: Vec<VariantPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct Envelope<T> {
    pub product: T,
}

#[derive(Serialize)]
pub(crate) struct UpdateBody<'a> {
    pub id: i64,
    pub variants: &'a [VariantPayload],
}

#[derive(Serialize)]
pub(crate) struct StatusBody {
    pub id: i64,
    pub status: ProductStatus,
}

fn comma_separated<S>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&tags.join(", "))
}
