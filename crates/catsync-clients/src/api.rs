//! Connection object shared by the paged fetcher and the API-specific clients.
//!
//! An [`ApiClient`] is built once per upstream API from explicit
//! configuration: base URL, auth header, timeouts and request pacing. It is
//! passed by reference to everything that talks to that API; there is no
//! global client state.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};

use crate::error::ClientError;
use crate::throttle::RequestThrottle;

/// Construction parameters for an [`ApiClient`].
#[derive(Clone)]
pub struct ApiConfig {
    /// Short label used in logs, e.g. `"distributor"`.
    pub name: &'static str,
    pub base_url: String,
    /// Header carrying the static credential, e.g. `Authorization`.
    pub auth_header: HeaderName,
    pub auth_value: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub min_request_interval: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("auth_header", &self.auth_header)
            .field("auth_value", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("min_request_interval", &self.min_request_interval)
            .finish()
    }
}

#[derive(Debug)]
pub struct ApiClient {
    name: &'static str,
    http: Client,
    base_url: Url,
    throttle: RequestThrottle,
}

impl ApiClient {
    /// Builds the HTTP client with the auth header installed as a sensitive
    /// default header.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` does not parse or has no host.
    /// - [`ClientError::InvalidHeader`] if the credential is not a valid header value.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut auth = HeaderValue::from_str(&config.auth_value).map_err(|e| {
            ClientError::InvalidHeader {
                name: config.auth_header.to_string(),
                reason: e.to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(config.auth_header, auth);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            name: config.name,
            http,
            base_url,
            throttle: RequestThrottle::new(config.min_request_interval),
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL. A leading `/` is ignored so the
    /// base path is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join {path}: {e}"),
            })
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Waits for the throttle, then sends the request.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        self.throttle.wait().await;
        request.send().await
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let normalized = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|e| ClientError::InvalidBaseUrl {
        base_url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(ClientError::InvalidBaseUrl {
            base_url: raw.to_owned(),
            reason: "URL has no host".to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            name: "test",
            base_url: base_url.to_owned(),
            auth_header: reqwest::header::AUTHORIZATION,
            auth_value: "Bearer secret".to_owned(),
            timeout_secs: 5,
            user_agent: "catsync-test/0.1".to_owned(),
            min_request_interval: Duration::ZERO,
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = ApiClient::new(config("https://api.example.com/v1")).unwrap();
        assert_eq!(api.base_url().as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let api = ApiClient::new(config("https://api.example.com/v1/")).unwrap();
        assert_eq!(
            api.endpoint("/products/X100").unwrap().as_str(),
            "https://api.example.com/v1/products/X100"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = ApiClient::new(config("not a url")).unwrap_err();
        assert!(
            matches!(err, ClientError::InvalidBaseUrl { .. }),
            "expected InvalidBaseUrl, got: {err:?}"
        );
    }

    #[test]
    fn rejects_header_value_with_newline() {
        let mut cfg = config("https://api.example.com");
        cfg.auth_value = "Bearer a\nb".to_owned();
        let err = ApiClient::new(cfg).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }

    #[test]
    fn debug_redacts_credential() {
        let rendered = format!("{:?}", config("https://api.example.com"));
        assert!(!rendered.contains("secret"));
    }
}
