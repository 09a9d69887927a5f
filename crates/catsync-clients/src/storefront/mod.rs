//! Client for the storefront admin API.
//!
//! - `GET /products.json`: cursor-paginated through the `Link` header's
//!   `page_info` parameter.
//! - `POST /products.json`: create.
//! - `PUT /products/{id}.json`: variant update or status change.

mod payload;
mod types;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::{body_snippet, ClientError};
use crate::paged::{Listing, PagePolicy, PagedFetcher};
use crate::pagination::extract_next_cursor;

use payload::{Envelope, StatusBody, UpdateBody};
use types::ProductResponse;

pub use payload::{ImagePayload, NewProduct, ProductStatus, ProductUpdate, VariantPayload};
pub use types::{StorefrontImage, StorefrontProduct, StorefrontProductsPage, StorefrontVariant};

/// Fields requested for full listings.
const LIST_FIELDS: &str = "id,vendor,status,variants,images";

/// Fields requested for single-SKU lookups.
const LOOKUP_FIELDS: &str = "id,vendor,status,variants";

pub struct StorefrontClient {
    api: ApiClient,
    page_policy: PagePolicy,
    page_limit: u32,
}

impl StorefrontClient {
    /// `page_limit` is the `limit` query parameter on listings (the API caps
    /// it at 250).
    #[must_use]
    pub fn new(api: ApiClient, page_policy: PagePolicy, page_limit: u32) -> Self {
        Self {
            api,
            page_policy,
            page_limit: page_limit.clamp(1, 250),
        }
    }

    /// Lists every product. A failed page ends the walk early and the result
    /// is returned with `complete == false`.
    pub async fn list_all(&self) -> Listing<StorefrontProduct> {
        let start = match self.products_url(LIST_FIELDS, None) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(error = %err, "cannot build storefront products URL");
                return Listing {
                    items: Vec::new(),
                    pages: 0,
                    complete: false,
                };
            }
        };

        PagedFetcher::new(&self.api, self.page_policy)
            .fetch_all::<StorefrontProductsPage, _>(start, |_page, link| {
                self.next_page_url(LIST_FIELDS, link)
            })
            .await
    }

    /// Scans the catalog page by page and returns the first product with a
    /// variant whose SKU is exactly `sku`. Stops fetching once found.
    pub async fn find_by_sku(&self, sku: &str) -> Option<StorefrontProduct> {
        let start = match self.products_url(LOOKUP_FIELDS, None) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(sku, error = %err, "cannot build storefront products URL");
                return None;
            }
        };

        let fetcher = PagedFetcher::new(&self.api, self.page_policy);
        let mut cursor = fetcher.cursor::<StorefrontProductsPage, _>(start, |_page, link| {
            self.next_page_url(LOOKUP_FIELDS, link)
        });

        while let Some(page) = cursor.next_page().await {
            if let Some(found) = page
                .products
                .into_iter()
                .find(|p| p.variant_by_sku(sku).is_some())
            {
                tracing::debug!(sku, product_id = found.id, pages = cursor.pages_fetched(), "sku found");
                return Some(found);
            }
        }

        if !cursor.is_complete() {
            tracing::warn!(
                sku,
                pages = cursor.pages_fetched(),
                "sku lookup ended before the last page"
            );
        }
        None
    }

    /// Creates a product and returns the stored record.
    ///
    /// # Errors
    ///
    /// - [`ClientError::DuplicateSku`] if the storefront rejects the SKU as taken.
    /// - [`ClientError::UnexpectedStatus`] for any other non-success status.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] on transport or
    ///   decode failures.
    pub async fn create(&self, product: &NewProduct) -> Result<StorefrontProduct, ClientError> {
        let sku = product
            .variants
            .first()
            .map(|v| v.sku.as_str())
            .unwrap_or_default();
        let url = self.api.endpoint("products.json")?;
        let body = self
            .send_write(Method::POST, url.clone(), &Envelope { product }, sku)
            .await?;
        let created = serde_json::from_str::<ProductResponse>(&body).map_err(|e| {
            ClientError::Deserialize {
                context: format!("created product {url}"),
                source: e,
            }
        })?;
        Ok(created.product)
    }

    /// Sends new variant prices and inventory for product `id`.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::create`].
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> Result<(), ClientError> {
        let sku = update
            .variants
            .first()
            .map(|v| v.sku.as_str())
            .unwrap_or_default();
        let url = self.product_url(id)?;
        let body = Envelope {
            product: UpdateBody {
                id,
                variants: &update.variants,
            },
        };
        self.send_write(Method::PUT, url, &body, sku).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] or a transport error.
    pub async fn set_status(&self, id: i64, status: ProductStatus) -> Result<(), ClientError> {
        let url = self.product_url(id)?;
        let body = Envelope {
            product: StatusBody { id, status },
        };
        self.send_write(Method::PUT, url, &body, "").await?;
        Ok(())
    }

    fn product_url(&self, id: i64) -> Result<Url, ClientError> {
        self.api.endpoint(&format!("products/{id}.json"))
    }

    fn products_url(&self, fields: &str, page_info: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.api.endpoint("products.json")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_limit.to_string());
            query.append_pair("fields", fields);
            if let Some(cursor) = page_info {
                query.append_pair("page_info", cursor);
            }
        }
        Ok(url)
    }

    fn next_page_url(&self, fields: &str, link: Option<&str>) -> Option<Url> {
        let cursor = extract_next_cursor(link)?;
        match self.products_url(fields, Some(&cursor)) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::error!(error = %err, "cannot build next page URL");
                None
            }
        }
    }

    /// Sends a JSON write through the throttle. 429 is retried after
    /// `Retry-After`; the response body is returned on success.
    async fn send_write<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        sku: &str,
    ) -> Result<String, ClientError> {
        let mut rate_limit_retries = 0u32;

        loop {
            let response = self
                .api
                .execute(self.api.request(method.clone(), url.clone()).json(body))
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if rate_limit_retries >= self.page_policy.max_rate_limit_retries {
                    return Err(ClientError::RateLimited {
                        api: self.api.name().to_owned(),
                        retries: rate_limit_retries,
                    });
                }
                let delay = self.page_policy.rate_limit_delay(response.headers());
                rate_limit_retries += 1;
                tracing::warn!(
                    method = %method,
                    url = %url,
                    delay_ms = delay.as_millis(),
                    attempt = rate_limit_retries,
                    "rate limited on write; retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let text = response.text().await?;

            if status == StatusCode::UNPROCESSABLE_ENTITY && !sku.is_empty() && mentions_sku(&text)
            {
                return Err(ClientError::DuplicateSku {
                    sku: sku.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body: body_snippet(&text),
                });
            }

            return Ok(text);
        }
    }
}

/// `true` when a 422 body's `errors` refer to the SKU field.
fn mentions_sku(body: &str) -> bool {
    fn walk(value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::Object(map) => map
                .iter()
                .any(|(key, v)| key.to_ascii_lowercase().contains("sku") || walk(v)),
            serde_json::Value::Array(items) => items.iter().any(walk),
            serde_json::Value::String(s) => s.to_ascii_lowercase().contains("sku"),
            _ => false,
        }
    }

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("errors").cloned())
        .is_some_and(|errors| walk(&errors))
}
