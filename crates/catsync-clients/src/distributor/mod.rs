//! Client for the distributor catalog API.
//!
//! - `GET /products`: paginated summary list, next page given by the body's
//!   `NextUrl`.
//! - `GET /products/{code}`: full detail for one item code.

mod types;

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};

use crate::api::ApiClient;
use crate::error::{body_snippet, ClientError};
use crate::paged::{Listing, PagePolicy, PagedFetcher};
use crate::pagination::resolve_next_url;
use crate::retry::retry_linear;

pub use types::{DistributorItem, DistributorItemDetail, DistributorProductsPage};

/// Retry budget for detail lookups.
#[derive(Debug, Clone, Copy)]
pub struct DetailRetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// The wait after failed attempt `n` is `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for DetailRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

pub struct DistributorClient {
    api: ApiClient,
    products_url: Url,
    page_policy: PagePolicy,
    detail_retry: DetailRetryPolicy,
    excluded_suffixes: Vec<String>,
}

impl DistributorClient {
    /// Wraps a configured [`ApiClient`]. Items whose code ends with one of
    /// `excluded_suffixes` are dropped from listings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the products endpoint cannot
    /// be derived from the API base URL.
    pub fn new(
        api: ApiClient,
        page_policy: PagePolicy,
        detail_retry: DetailRetryPolicy,
        excluded_suffixes: Vec<String>,
    ) -> Result<Self, ClientError> {
        let products_url = api.endpoint("products")?;
        Ok(Self {
            api,
            products_url,
            page_policy,
            detail_retry,
            excluded_suffixes,
        })
    }

    /// Lists every distributor item, minus suffix-excluded codes and records
    /// without a code.
    ///
    /// A failed page ends the walk early; the items gathered so far are
    /// returned with `complete == false`.
    pub async fn list_products(&self) -> Listing<DistributorItem> {
        let base = self.api.base_url().clone();
        let mut listing = PagedFetcher::new(&self.api, self.page_policy)
            .fetch_all::<DistributorProductsPage, _>(
                self.products_url.clone(),
                move |page: &DistributorProductsPage, _link: Option<&str>| {
                    resolve_next_url(&base, page.next_url.as_deref())
                },
            )
            .await;

        let fetched = listing.items.len();
        listing.items.retain(|item| {
            !item.item.trim().is_empty() && !item.has_excluded_suffix(&self.excluded_suffixes)
        });

        tracing::info!(
            fetched,
            kept = listing.items.len(),
            complete = listing.complete,
            "distributor products listed"
        );
        listing
    }

    /// Fetches the detail record for `code`.
    ///
    /// HTTP 500 and 503 are retried per [`DetailRetryPolicy`]. Any other
    /// failure, an exhausted retry budget, or a record whose code differs
    /// from `code` yields `None` so the caller can skip the item.
    pub async fn fetch_detail(&self, code: &str) -> Option<DistributorItemDetail> {
        let url = match self.detail_url(code) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(code, error = %err, "cannot build detail URL");
                return None;
            }
        };

        let result = retry_linear(
            self.detail_retry.max_attempts,
            self.detail_retry.base_delay,
            |_attempt| self.request_detail(url.clone()),
        )
        .await;

        match result {
            Ok(detail) if detail.item == code => Some(detail),
            Ok(detail) => {
                tracing::warn!(
                    code,
                    returned = %detail.item,
                    "detail record is for a different item code; skipping"
                );
                None
            }
            Err(err) => {
                tracing::error!(code, error = %err, "failed to fetch product detail");
                None
            }
        }
    }

    fn detail_url(&self, code: &str) -> Result<Url, ClientError> {
        let mut url = self.products_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.products_url.to_string(),
                reason: "base URL cannot carry path segments".to_owned(),
            })?
            .push(code);
        Ok(url)
    }

    async fn request_detail(&self, url: Url) -> Result<DistributorItemDetail, ClientError> {
        let response = self
            .api
            .execute(self.api.request(Method::GET, url.clone()))
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: body_snippet(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<DistributorItemDetail>(&body).map_err(|e| ClientError::Deserialize {
            context: format!("product detail {url}"),
            source: e,
        })
    }
}
