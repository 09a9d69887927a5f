//! Builds the HTTP clients and reconciler from configuration and runs it.

use std::time::Duration;

use anyhow::Context;
use catsync_clients::{
    ApiClient, ApiConfig, DetailRetryPolicy, DistributorClient, PagePolicy, StorefrontClient,
};
use catsync_core::{load_exclusions, AppConfig};
use catsync_sync::{ReconcileOptions, Reconciler, SyncSummary};
use reqwest::header::{HeaderName, AUTHORIZATION};

/// Header carrying the storefront admin access token.
const STOREFRONT_TOKEN_HEADER: &str = "x-shopify-access-token";

pub(crate) type CatalogReconciler = Reconciler<DistributorClient, StorefrontClient>;

/// Wires both API clients and the exclusion rules into a reconciler.
///
/// # Errors
///
/// Fails if the exclusions file cannot be loaded or either API client cannot
/// be built (bad base URL or credential).
pub(crate) fn build_reconciler(config: &AppConfig, dry_run: bool) -> anyhow::Result<CatalogReconciler> {
    let rules = load_exclusions(&config.exclusions_path).with_context(|| {
        format!(
            "failed to load exclusions from {}",
            config.exclusions_path.display()
        )
    })?;

    let page_policy = PagePolicy {
        max_pages: config.max_pages,
        max_rate_limit_retries: config.max_rate_limit_retries,
        ..PagePolicy::default()
    };
    let min_request_interval = Duration::from_millis(config.min_request_interval_ms);

    let distributor_api = ApiClient::new(ApiConfig {
        name: "distributor",
        base_url: config.distributor_api_url.clone(),
        auth_header: AUTHORIZATION,
        auth_value: config.distributor_auth_value(),
        timeout_secs: config.request_timeout_secs,
        user_agent: config.user_agent.clone(),
        min_request_interval,
    })
    .context("failed to build distributor client")?;

    let storefront_api = ApiClient::new(ApiConfig {
        name: "storefront",
        base_url: config.storefront_api_base(),
        auth_header: HeaderName::from_static(STOREFRONT_TOKEN_HEADER),
        auth_value: config.storefront_access_token.clone(),
        timeout_secs: config.request_timeout_secs,
        user_agent: config.user_agent.clone(),
        min_request_interval,
    })
    .context("failed to build storefront client")?;

    let distributor = DistributorClient::new(
        distributor_api,
        page_policy,
        DetailRetryPolicy {
            max_attempts: config.detail_max_attempts,
            base_delay: Duration::from_secs(config.detail_retry_base_secs),
        },
        rules.suffixes.clone(),
    )?;
    let storefront = StorefrontClient::new(storefront_api, page_policy, config.page_limit);

    Ok(Reconciler::new(
        distributor,
        storefront,
        rules,
        ReconcileOptions {
            vendor: config.vendor.clone(),
            dry_run,
            draft_missing: config.draft_missing,
        },
    ))
}

pub(crate) fn run_timeout(config: &AppConfig) -> Option<Duration> {
    config.run_timeout_secs.map(Duration::from_secs)
}

/// Runs one reconciliation, bounded by `limit` when set.
///
/// # Errors
///
/// Returns an error only when the run exceeds `limit`.
pub(crate) async fn run_once(
    reconciler: &CatalogReconciler,
    limit: Option<Duration>,
) -> anyhow::Result<SyncSummary> {
    let Some(limit) = limit else {
        return Ok(reconciler.run().await);
    };

    tokio::time::timeout(limit, reconciler.run())
        .await
        .map_err(|_| anyhow::anyhow!("sync run exceeded the {}s run timeout", limit.as_secs()))
}
