//! Generic enumerator for paginated REST collections.
//!
//! A [`PageCursor`] walks one collection lazily, one page per
//! [`PageCursor::next_page`] call. Every request goes through the owning
//! [`ApiClient`]'s throttle. HTTP 429 is retried on the same page after the
//! server-provided `Retry-After` delay; any other failure ends the walk and
//! marks the result as partial instead of returning an error, so callers keep
//! whatever was already enumerated.
//!
//! How the next page is located is up to the caller: the continuation closure
//! sees the decoded page and the raw `Link` header and returns the next URL,
//! or `None` on the last page.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::api::ApiClient;
use crate::error::{body_snippet, ClientError};

/// One decoded page of a collection.
pub trait Page: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Termination bounds for one enumeration.
#[derive(Debug, Clone, Copy)]
pub struct PagePolicy {
    /// Pages fetched before the walk is cut short. Guards against cycling cursors.
    pub max_pages: usize,
    /// Consecutive 429 responses tolerated for a single page.
    pub max_rate_limit_retries: u32,
    /// Delay used when a 429 carries no usable `Retry-After`.
    pub default_retry_after: Duration,
    /// Upper bound on any single rate-limit wait, whatever the server asks for.
    pub max_retry_after: Duration,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            max_pages: 500,
            max_rate_limit_retries: 10,
            default_retry_after: Duration::from_secs(1),
            max_retry_after: Duration::from_secs(60),
        }
    }
}

impl PagePolicy {
    /// How long to wait before retrying a 429: the server's `Retry-After`
    /// capped at `max_retry_after`, or `default_retry_after` without one.
    #[must_use]
    pub fn rate_limit_delay(&self, headers: &HeaderMap) -> Duration {
        retry_after(headers).map_or(self.default_retry_after, |delay| {
            delay.min(self.max_retry_after)
        })
    }
}

/// Items gathered from a collection.
///
/// `complete` is `false` when the walk stopped before the server signalled
/// the last page (error status, network failure, or a policy bound).
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub complete: bool,
}

impl<T> Listing<T> {
    #[must_use]
    pub fn full(items: Vec<T>) -> Self {
        Self {
            items,
            pages: 1,
            complete: true,
        }
    }

    #[must_use]
    pub fn partial(items: Vec<T>) -> Self {
        Self {
            items,
            pages: 1,
            complete: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Running,
    Exhausted,
    Aborted,
}

/// Starts enumerations against one API.
#[derive(Debug, Clone, Copy)]
pub struct PagedFetcher<'a> {
    api: &'a ApiClient,
    policy: PagePolicy,
}

impl<'a> PagedFetcher<'a> {
    #[must_use]
    pub fn new(api: &'a ApiClient, policy: PagePolicy) -> Self {
        Self { api, policy }
    }

    /// Returns a fresh cursor positioned before `start`. Nothing is fetched
    /// until [`PageCursor::next_page`] is awaited.
    pub fn cursor<P, F>(&self, start: Url, continuation: F) -> PageCursor<'a, P, F>
    where
        P: Page,
        F: FnMut(&P, Option<&str>) -> Option<Url>,
    {
        PageCursor {
            api: self.api,
            policy: self.policy,
            next: Some(start),
            continuation,
            pages: 0,
            state: CursorState::Running,
            _page: PhantomData,
        }
    }

    /// Drains a cursor into a [`Listing`].
    pub async fn fetch_all<P, F>(&self, start: Url, continuation: F) -> Listing<P::Item>
    where
        P: Page,
        F: FnMut(&P, Option<&str>) -> Option<Url>,
    {
        let mut cursor = self.cursor(start, continuation);
        let mut items = Vec::new();
        while let Some(page) = cursor.next_page().await {
            items.extend(page.into_items());
        }

        tracing::info!(
            api = self.api.name(),
            pages = cursor.pages_fetched(),
            items = items.len(),
            complete = cursor.is_complete(),
            "listing finished"
        );

        Listing {
            items,
            pages: cursor.pages_fetched(),
            complete: cursor.is_complete(),
        }
    }
}

/// Lazy walk over one collection. See the module docs for failure handling.
pub struct PageCursor<'a, P, F> {
    api: &'a ApiClient,
    policy: PagePolicy,
    next: Option<Url>,
    continuation: F,
    pages: usize,
    state: CursorState,
    _page: PhantomData<fn() -> P>,
}

impl<P, F> PageCursor<'_, P, F>
where
    P: Page,
    F: FnMut(&P, Option<&str>) -> Option<Url>,
{
    /// Fetches the next page, or `None` once the collection is exhausted or
    /// the walk was aborted.
    pub async fn next_page(&mut self) -> Option<P> {
        if self.state != CursorState::Running {
            return None;
        }
        let url = self.next.take()?;

        if self.pages >= self.policy.max_pages {
            tracing::warn!(
                api = self.api.name(),
                max_pages = self.policy.max_pages,
                "pagination limit reached; listing is partial"
            );
            self.state = CursorState::Aborted;
            return None;
        }

        match self.fetch_page(&url).await {
            Ok((page, link_header)) => {
                self.pages += 1;
                match (self.continuation)(&page, link_header.as_deref()) {
                    Some(next) if next == url => {
                        tracing::warn!(
                            api = self.api.name(),
                            url = %url,
                            "next page points back at the current page; stopping"
                        );
                        self.state = CursorState::Aborted;
                    }
                    Some(next) => self.next = Some(next),
                    None => self.state = CursorState::Exhausted,
                }
                Some(page)
            }
            Err(err) => {
                tracing::error!(
                    api = self.api.name(),
                    url = %url,
                    pages = self.pages,
                    error = %err,
                    "page fetch failed; listing is partial"
                );
                self.state = CursorState::Aborted;
                None
            }
        }
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// `true` once the server signalled the last page.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    async fn fetch_page(&self, url: &Url) -> Result<(P, Option<String>), ClientError> {
        let mut rate_limit_retries = 0u32;

        loop {
            let response = self
                .api
                .execute(self.api.request(Method::GET, url.clone()))
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if rate_limit_retries >= self.policy.max_rate_limit_retries {
                    return Err(ClientError::RateLimited {
                        api: self.api.name().to_owned(),
                        retries: rate_limit_retries,
                    });
                }
                let delay = self.policy.rate_limit_delay(response.headers());
                rate_limit_retries += 1;
                tracing::warn!(
                    api = self.api.name(),
                    url = %url,
                    delay_ms = delay.as_millis(),
                    attempt = rate_limit_retries,
                    "rate limited; retrying same page"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body: body_snippet(&body),
                });
            }

            // Read the Link header before the body consumes the response.
            let link_header = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let body = response.text().await?;
            let page = serde_json::from_str::<P>(&body).map_err(|e| ClientError::Deserialize {
                context: format!("{} page {url}", self.api.name()),
                source: e,
            })?;

            return Ok((page, link_header));
        }
    }
}

/// Parses `Retry-After` as whole or fractional seconds. Values too large for
/// a `Duration` saturate to `Duration::MAX`.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    let secs = raw.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, RETRY_AFTER};

    use super::*;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn retry_after_whole_seconds() {
        assert_eq!(
            retry_after(&headers_with_retry_after("3")),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn retry_after_fractional_seconds() {
        assert_eq!(
            retry_after(&headers_with_retry_after("2.0")),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            retry_after(&headers_with_retry_after("0.5")),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn retry_after_missing_or_garbage_is_none() {
        assert!(retry_after(&HeaderMap::new()).is_none());
        assert!(retry_after(&headers_with_retry_after("soon")).is_none());
        assert!(retry_after(&headers_with_retry_after("-1")).is_none());
    }

    #[test]
    fn retry_after_beyond_duration_range_saturates() {
        assert_eq!(
            retry_after(&headers_with_retry_after("99999999999999999999")),
            Some(Duration::MAX)
        );
        assert!(retry_after(&headers_with_retry_after("inf")).is_none());
    }

    #[test]
    fn rate_limit_delay_is_capped() {
        let policy = PagePolicy::default();
        assert_eq!(
            policy.rate_limit_delay(&headers_with_retry_after("86400")),
            Duration::from_secs(60)
        );
        assert_eq!(
            policy.rate_limit_delay(&headers_with_retry_after("99999999999999999999")),
            Duration::from_secs(60)
        );
        assert_eq!(
            policy.rate_limit_delay(&headers_with_retry_after("3")),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn rate_limit_delay_falls_back_to_default() {
        let policy = PagePolicy {
            default_retry_after: Duration::from_millis(250),
            ..PagePolicy::default()
        };
        assert_eq!(
            policy.rate_limit_delay(&HeaderMap::new()),
            Duration::from_millis(250)
        );
        assert_eq!(
            policy.rate_limit_delay(&headers_with_retry_after("soon")),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn listing_constructors_set_completeness() {
        assert!(Listing::full(vec![1, 2]).complete);
        assert!(!Listing::<u8>::partial(Vec::new()).complete);
    }
}
