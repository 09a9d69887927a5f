use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub distributor_api_url: String,
    pub distributor_api_key: String,
    /// Scheme placed before the key in the `Authorization` header.
    pub distributor_auth_scheme: String,
    /// Store host (`shop.example.com`) or full origin URL.
    pub storefront_store_url: String,
    pub storefront_access_token: String,
    pub storefront_api_version: String,
    /// Vendor name written on created products and used to scope the draft sweep.
    pub vendor: String,
    pub exclusions_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub min_request_interval_ms: u64,
    pub page_limit: u32,
    pub max_pages: usize,
    pub max_rate_limit_retries: u32,
    pub detail_max_attempts: u32,
    pub detail_retry_base_secs: u64,
    pub draft_missing: bool,
    pub run_timeout_secs: Option<u64>,
    /// Six-field cron expression used by `catsync schedule`.
    pub schedule: String,
}

impl AppConfig {
    /// Base URL of the storefront admin REST API, e.g.
    /// `https://shop.example.com/admin/api/2024-04`.
    #[must_use]
    pub fn storefront_api_base(&self) -> String {
        storefront_api_base(&self.storefront_store_url, &self.storefront_api_version)
    }

    /// `Authorization` header value for the distributor, e.g. `Bearer <key>`.
    /// An empty scheme sends the bare key.
    #[must_use]
    pub fn distributor_auth_value(&self) -> String {
        let scheme = self.distributor_auth_scheme.trim();
        if scheme.is_empty() {
            self.distributor_api_key.clone()
        } else {
            format!("{scheme} {}", self.distributor_api_key)
        }
    }
}

/// Builds the admin API base from a store host or URL.
///
/// A bare host gets `https://`; an explicit scheme is kept so local mock
/// servers can be targeted.
#[must_use]
pub fn storefront_api_base(store_url: &str, api_version: &str) -> String {
    let trimmed = store_url.trim().trim_end_matches('/');
    let origin = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    format!("{origin}/admin/api/{api_version}")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("distributor_api_url", &self.distributor_api_url)
            .field("distributor_api_key", &"[redacted]")
            .field("distributor_auth_scheme", &self.distributor_auth_scheme)
            .field("storefront_store_url", &self.storefront_store_url)
            .field("storefront_access_token", &"[redacted]")
            .field("storefront_api_version", &self.storefront_api_version)
            .field("vendor", &self.vendor)
            .field("exclusions_path", &self.exclusions_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("page_limit", &self.page_limit)
            .field("max_pages", &self.max_pages)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .field("detail_max_attempts", &self.detail_max_attempts)
            .field("detail_retry_base_secs", &self.detail_retry_base_secs)
            .field("draft_missing", &self.draft_missing)
            .field("run_timeout_secs", &self.run_timeout_secs)
            .field("schedule", &self.schedule)
            .finish()
    }
}
