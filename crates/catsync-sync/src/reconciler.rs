//! One full reconciliation run.
//!
//! 1. Snapshot both catalogs (distributor listing, storefront listing) and
//!    build the SKU membership sets.
//! 2. Walk distributor items strictly in order: detail fetch, classify,
//!    price, decide, write. Each item is fully handled before the next one
//!    starts, so no two storefront writes are ever in flight.
//! 3. Draft sweep: hide this vendor's storefront products whose SKUs have
//!    all disappeared upstream.
//!
//! Failures are per item. Nothing short of a panic aborts the run; every
//! outcome lands in the returned [`SyncSummary`].

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use catsync_clients::{ClientError, DistributorItem, ProductStatus, StorefrontProduct};
use catsync_core::{compute_price, ExclusionRules};
use chrono::Utc;

use crate::classify::{classify, decide, Action, Classification};
use crate::mapping::{new_product, product_update};
use crate::ports::{DistributorCatalog, StorefrontCatalog};
use crate::summary::{ItemOutcome, SyncSummary};

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Vendor stamped on created products; also scopes the draft sweep.
    pub vendor: String,
    /// Log every decision without writing to the storefront.
    pub dry_run: bool,
    /// Run the draft sweep after the per-item pass. A drafted product is set
    /// back to active once its item is offered again.
    pub draft_missing: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            vendor: "Distributor".to_owned(),
            dry_run: false,
            draft_missing: true,
        }
    }
}

/// Per-run lookup state built from the two catalog snapshots.
struct Snapshot<'a> {
    distributor_skus: HashSet<&'a str>,
    /// Grows as products are created so a repeated code is never created twice.
    storefront_skus: HashSet<String>,
    by_sku: HashMap<&'a str, &'a StorefrontProduct>,
    storefront_complete: bool,
    drafted: HashSet<i64>,
}

impl<'a> Snapshot<'a> {
    fn new(
        distributor: &'a [DistributorItem],
        storefront: &'a [StorefrontProduct],
        storefront_complete: bool,
    ) -> Self {
        let mut by_sku = HashMap::new();
        for product in storefront {
            for sku in product.skus() {
                // First product wins when the storefront already holds a duplicate.
                by_sku.entry(sku).or_insert(product);
            }
        }

        Self {
            distributor_skus: distributor.iter().map(|i| i.item.as_str()).collect(),
            storefront_skus: by_sku.keys().map(|sku| (*sku).to_owned()).collect(),
            by_sku,
            storefront_complete,
            drafted: HashSet::new(),
        }
    }
}

pub struct Reconciler<D, S> {
    distributor: D,
    storefront: S,
    rules: ExclusionRules,
    options: ReconcileOptions,
}

impl<D, S> Reconciler<D, S>
where
    D: DistributorCatalog,
    S: StorefrontCatalog,
{
    #[must_use]
    pub fn new(distributor: D, storefront: S, rules: ExclusionRules, options: ReconcileOptions) -> Self {
        Self {
            distributor,
            storefront,
            rules,
            options,
        }
    }

    #[must_use]
    pub fn distributor(&self) -> &D {
        &self.distributor
    }

    #[must_use]
    pub fn storefront(&self) -> &S {
        &self.storefront
    }

    #[must_use]
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Runs one reconciliation and returns its counts.
    pub async fn run(&self) -> SyncSummary {
        let mut summary = SyncSummary::new(Utc::now(), self.options.dry_run);
        tracing::info!(
            vendor = %self.options.vendor,
            dry_run = self.options.dry_run,
            "sync run starting"
        );

        let distributor = self.distributor.list_products().await;
        let storefront = self.storefront.list_all().await;

        summary.distributor_items = distributor.items.len();
        summary.distributor_complete = distributor.complete;
        summary.storefront_products = storefront.items.len();
        summary.storefront_complete = storefront.complete;

        if !storefront.complete {
            tracing::warn!(
                products = storefront.items.len(),
                "storefront snapshot is partial; new products will not be created this run"
            );
        }

        let mut snapshot = Snapshot::new(&distributor.items, &storefront.items, storefront.complete);

        for item in &distributor.items {
            let outcome = self.sync_item(&item.item, &mut snapshot).await;
            summary.record(outcome);
        }

        if self.options.draft_missing {
            if distributor.complete {
                self.sweep_missing(&storefront.items, &snapshot, &mut summary)
                    .await;
            } else {
                tracing::warn!("distributor listing is partial; skipping draft sweep");
            }
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            drafted = summary.drafted,
            skipped = summary.skipped,
            excluded = summary.excluded,
            failed = summary.failed,
            elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
            "sync run finished"
        );
        summary
    }

    async fn sync_item(&self, code: &str, snapshot: &mut Snapshot<'_>) -> ItemOutcome {
        // Suffix-excluded codes never reach the detail endpoint.
        let detail = if self.rules.excludes_code(code) {
            None
        } else {
            self.distributor.fetch_detail(code).await
        };

        match classify(code, detail.as_ref(), &self.rules) {
            Classification::SuffixExcluded { suffix } => {
                tracing::info!(code, %suffix, "skipping item with excluded suffix");
                return ItemOutcome::Excluded;
            }
            Classification::CategoryExcluded { reason } => {
                tracing::info!(code, %reason, "skipping excluded item");
                return ItemOutcome::Excluded;
            }
            Classification::Eligible => {}
        }
        let Some(detail) = detail else {
            return ItemOutcome::Excluded;
        };

        let quote = match compute_price(detail.net, detail.retail) {
            Ok(quote) => quote,
            Err(err) => {
                tracing::error!(code, error = %err, "cannot price item");
                return ItemOutcome::Failed;
            }
        };

        let existing: Option<Cow<'_, StorefrontProduct>> = match snapshot.by_sku.get(code) {
            Some(product) => Some(Cow::Borrowed(*product)),
            None if !snapshot.storefront_complete => {
                self.storefront.find_by_sku(code).await.map(Cow::Owned)
            }
            None => None,
        };

        // A product the sweep drafted earlier comes back to life once its
        // item is offered again.
        let reactivate = existing.as_deref().is_some_and(|product| {
            product.is_draft() && product.vendor.as_deref() == Some(self.options.vendor.as_str())
        });

        let action = decide(
            code,
            existing.as_deref(),
            snapshot.distributor_skus.contains(code),
            snapshot.storefront_skus.contains(code),
        );

        match action {
            Action::Update {
                product_id,
                variant_id,
            } => {
                if self.options.dry_run {
                    tracing::info!(
                        code,
                        product_id,
                        price = %quote.price,
                        reactivate,
                        "dry run: would update"
                    );
                    return ItemOutcome::Updated;
                }
                let update = product_update(&detail, &quote, variant_id);
                if let Err(err) = self.storefront.update(product_id, &update).await {
                    return write_failed(code, "update", &err);
                }
                tracing::info!(
                    code,
                    product_id,
                    price = %quote.price,
                    inventory = detail.available,
                    "updated product"
                );
                if reactivate {
                    if let Err(err) = self
                        .storefront
                        .set_status(product_id, ProductStatus::Active)
                        .await
                    {
                        return write_failed(code, "reactivate", &err);
                    }
                    tracing::info!(code, product_id, "reactivated product offered again upstream");
                }
                ItemOutcome::Updated
            }
            Action::Draft { product_id } => {
                let outcome = self.draft(product_id, code).await;
                if outcome == ItemOutcome::Drafted {
                    snapshot.drafted.insert(product_id);
                }
                outcome
            }
            Action::SkipMissing => {
                tracing::info!(code, "item no longer offered upstream and not on the storefront");
                ItemOutcome::Skipped
            }
            Action::Create if !snapshot.storefront_complete => {
                tracing::warn!(code, "withholding create while the storefront snapshot is partial");
                ItemOutcome::Skipped
            }
            Action::Create => {
                snapshot.storefront_skus.insert(code.to_owned());
                if self.options.dry_run {
                    tracing::info!(code, price = %quote.price, "dry run: would create");
                    return ItemOutcome::Created;
                }
                let product = new_product(&detail, &quote, &self.options.vendor);
                match self.storefront.create(&product).await {
                    Ok(created) => {
                        tracing::info!(code, product_id = created.id, price = %quote.price, "created product");
                        ItemOutcome::Created
                    }
                    Err(err) => write_failed(code, "create", &err),
                }
            }
            Action::AlreadySynced => {
                tracing::debug!(code, "already on the storefront; nothing to do");
                ItemOutcome::Skipped
            }
        }
    }

    /// Drafts this vendor's products none of whose SKUs are offered upstream.
    /// Products without any SKU are left alone.
    async fn sweep_missing(
        &self,
        storefront: &[StorefrontProduct],
        snapshot: &Snapshot<'_>,
        summary: &mut SyncSummary,
    ) {
        let candidates = storefront.iter().filter(|product| {
            product.vendor.as_deref() == Some(self.options.vendor.as_str())
                && !product.is_draft()
                && !snapshot.drafted.contains(&product.id)
                && product.skus().next().is_some()
                && product
                    .skus()
                    .all(|sku| !snapshot.distributor_skus.contains(sku))
        });

        for product in candidates {
            let sku = product.skus().next().unwrap_or_default();
            let outcome = self.draft(product.id, sku).await;
            summary.record(outcome);
        }
    }

    async fn draft(&self, product_id: i64, code: &str) -> ItemOutcome {
        if self.options.dry_run {
            tracing::info!(code, product_id, "dry run: would draft");
            return ItemOutcome::Drafted;
        }
        match self
            .storefront
            .set_status(product_id, ProductStatus::Draft)
            .await
        {
            Ok(()) => {
                tracing::info!(code, product_id, "drafted product no longer offered upstream");
                ItemOutcome::Drafted
            }
            Err(err) => write_failed(code, "draft", &err),
        }
    }
}

fn write_failed(code: &str, operation: &'static str, err: &ClientError) -> ItemOutcome {
    if let ClientError::DuplicateSku { sku } = err {
        tracing::error!(code, %sku, operation, "storefront already holds this SKU");
    } else {
        tracing::error!(code, operation, error = %err, "storefront write failed");
    }
    ItemOutcome::Failed
}
