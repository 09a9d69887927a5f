//! Wire types for the distributor catalog API.
//!
//! Field names follow the API's `PascalCase` JSON. Prices arrive either as
//! JSON numbers or numeric strings; both decode into [`Decimal`]. Optional
//! text fields may be `null`, absent, or blank, and blank is treated as
//! absent by the accessors.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::paged::Page;

/// One page of `GET /products`.
#[derive(Debug, Deserialize)]
pub struct DistributorProductsPage {
    #[serde(rename = "Results", default)]
    pub results: Vec<DistributorItem>,
    /// Location of the next page; `null` or absent on the last page.
    #[serde(rename = "NextUrl", default)]
    pub next_url: Option<String>,
}

impl Page for DistributorProductsPage {
    type Item = DistributorItem;

    fn into_items(self) -> Vec<DistributorItem> {
        self.results
    }
}

/// Summary record from the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DistributorItem {
    /// Item code; the join key with storefront variant SKUs.
    #[serde(rename = "Item", default)]
    pub item: String,
}

impl DistributorItem {
    #[must_use]
    pub fn new(item: impl Into<String>) -> Self {
        Self { item: item.into() }
    }

    /// `true` when the code ends with any of `suffixes`.
    #[must_use]
    pub fn has_excluded_suffix<S: AsRef<str>>(&self, suffixes: &[S]) -> bool {
        suffixes
            .iter()
            .any(|suffix| self.item.ends_with(suffix.as_ref()))
    }
}

/// Full record from `GET /products/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributorItemDetail {
    pub item: String,
    pub net: Decimal,
    pub retail: Decimal,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub desc2: Option<String>,
    #[serde(default)]
    pub desc3: Option<String>,
    #[serde(rename = "UPC", default, deserialize_with = "lenient_string")]
    pub upc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(default)]
    pub designer: Option<String>,
    #[serde(default)]
    pub fragrance: Option<String>,
    /// Product category, published as the storefront product type.
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub product_line: Option<String>,
    #[serde(default)]
    pub product_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub available: i64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight: Option<Decimal>,
    #[serde(rename = "ImageURL", default)]
    pub image_url: Option<String>,
}

impl DistributorItemDetail {
    /// Minimal detail record; remaining fields are empty.
    #[must_use]
    pub fn new(item: impl Into<String>, net: Decimal, retail: Decimal) -> Self {
        Self {
            item: item.into(),
            net,
            retail,
            desc: None,
            desc2: None,
            desc3: None,
            upc: None,
            size: None,
            designer: None,
            fragrance: None,
            product: None,
            product_line: None,
            product_class: None,
            available: 0,
            weight: None,
            image_url: None,
        }
    }

    #[must_use]
    pub fn product_line(&self) -> Option<&str> {
        non_blank(self.product_line.as_deref())
    }

    #[must_use]
    pub fn product_class(&self) -> Option<&str> {
        non_blank(self.product_class.as_deref())
    }

    #[must_use]
    pub fn designer(&self) -> Option<&str> {
        non_blank(self.designer.as_deref())
    }

    #[must_use]
    pub fn fragrance(&self) -> Option<&str> {
        non_blank(self.fragrance.as_deref())
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        non_blank(self.image_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts a string or a number (UPCs and sizes are sometimes numeric).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a number, a numeric string, `null`, or a blank string.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s.trim().parse().map(Some).map_err(D::Error::custom),
        serde_json::Value::Number(n) => n.to_string().parse().map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected decimal, got {other}"))),
    }
}

/// Available quantity; negative or unparseable values count as zero.
#[allow(clippy::cast_possible_truncation)]
fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    Ok(quantity.max(0))
}
