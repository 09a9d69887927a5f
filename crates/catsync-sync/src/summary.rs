use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of handling one distributor item or one sweep candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Created,
    Updated,
    Drafted,
    /// No write needed, or a write was deliberately withheld.
    Skipped,
    /// Suffix or category exclusion, including a failed detail fetch.
    Excluded,
    /// Pricing or a storefront write failed.
    Failed,
}

/// Counts for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub drafted: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub failed: usize,
    /// Items in the distributor listing.
    pub distributor_items: usize,
    /// Products in the storefront snapshot.
    pub storefront_products: usize,
    pub distributor_complete: bool,
    pub storefront_complete: bool,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncSummary {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            created: 0,
            updated: 0,
            drafted: 0,
            skipped: 0,
            excluded: 0,
            failed: 0,
            distributor_items: 0,
            storefront_products: 0,
            distributor_complete: false,
            storefront_complete: false,
            dry_run,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.created += 1,
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Drafted => self.drafted += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Excluded => self.excluded += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }

    /// `true` when both listings were complete and nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.distributor_complete && self.storefront_complete && self.failed == 0
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "created={} updated={} drafted={} skipped={} excluded={} failed={} \
             (distributor items={}{}, storefront products={}{}){}",
            self.created,
            self.updated,
            self.drafted,
            self.skipped,
            self.excluded,
            self.failed,
            self.distributor_items,
            if self.distributor_complete { "" } else { " partial" },
            self.storefront_products,
            if self.storefront_complete { "" } else { " partial" },
            if self.dry_run { " [dry run]" } else { "" },
        )
    }
}
