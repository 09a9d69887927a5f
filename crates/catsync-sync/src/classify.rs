//! Per-item classification and the create/update/draft decision.
//!
//! Both steps are pure: they see only the item's code, its detail record,
//! the exclusion rules and the run's membership sets, so every rule can be
//! tested without a network.

use catsync_clients::{DistributorItemDetail, StorefrontProduct};
use catsync_core::ExclusionRules;

/// Reason logged when the detail lookup gave nothing to classify.
pub const FETCH_FAILED: &str = "Unknown - Fetch Failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The code carries a reserved suffix.
    SuffixExcluded { suffix: String },
    /// Detail missing, or product line/class on the denylist.
    CategoryExcluded { reason: String },
    Eligible,
}

/// Classifies one item. Rules are checked in order and the first match wins:
/// suffix, then category (including a failed detail fetch), then eligible.
#[must_use]
pub fn classify(
    code: &str,
    detail: Option<&DistributorItemDetail>,
    rules: &ExclusionRules,
) -> Classification {
    if let Some(suffix) = rules.excluded_suffix(code) {
        return Classification::SuffixExcluded {
            suffix: suffix.to_owned(),
        };
    }

    let Some(detail) = detail else {
        return Classification::CategoryExcluded {
            reason: format!("product class '{FETCH_FAILED}', product line '{FETCH_FAILED}'"),
        };
    };

    let line = detail.product_line();
    let class = detail.product_class();
    if rules.excludes_category(line, class) {
        return Classification::CategoryExcluded {
            reason: format!(
                "product class '{}', product line '{}'",
                class.unwrap_or_default(),
                line.unwrap_or_default()
            ),
        };
    }

    Classification::Eligible
}

/// What to do with an eligible item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Push new price and inventory to an existing variant.
    Update { product_id: i64, variant_id: i64 },
    /// Hide an existing product whose code is no longer offered upstream.
    Draft { product_id: i64 },
    /// Code is not offered upstream and nothing exists to draft.
    SkipMissing,
    Create,
    AlreadySynced,
}

/// Picks exactly one action for an eligible item.
///
/// `existing` is the storefront product carrying `sku`, if one was found.
/// `in_distributor` and `in_storefront` are membership in this run's SKU sets.
#[must_use]
pub fn decide(
    sku: &str,
    existing: Option<&StorefrontProduct>,
    in_distributor: bool,
    in_storefront: bool,
) -> Action {
    let existing_variant = existing.and_then(|p| p.variant_by_sku(sku).map(|v| (p.id, v.id)));

    match existing_variant {
        Some((product_id, _)) if !in_distributor => Action::Draft { product_id },
        Some((product_id, variant_id)) => Action::Update {
            product_id,
            variant_id,
        },
        None if !in_distributor => Action::SkipMissing,
        None if !in_storefront => Action::Create,
        None => Action::AlreadySynced,
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
