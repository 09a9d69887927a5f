//! Integration tests for `DistributorClient` listing and detail lookups.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catsync_clients::{ApiClient, ApiConfig, DetailRetryPolicy, DistributorClient, PagePolicy};

fn test_client(base_url: &str) -> DistributorClient {
    let api = ApiClient::new(ApiConfig {
        name: "distributor",
        base_url: base_url.to_owned(),
        auth_header: reqwest::header::AUTHORIZATION,
        auth_value: "Bearer test-key".to_owned(),
        timeout_secs: 5,
        user_agent: "catsync-test/0.1".to_owned(),
        min_request_interval: Duration::ZERO,
    })
    .expect("failed to build test ApiClient");

    DistributorClient::new(
        api,
        PagePolicy {
            max_pages: 50,
            max_rate_limit_retries: 3,
            default_retry_after: Duration::ZERO,
            max_retry_after: Duration::from_secs(1),
        },
        DetailRetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        },
        vec!["-A".to_owned()],
    )
    .expect("failed to build test DistributorClient")
}

/// `127.0.0.1:PORT` form of the server address, as the distributor sends it.
fn schemeless(server: &MockServer) -> String {
    server
        .uri()
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .to_owned()
}

fn detail_json(code: &str) -> serde_json::Value {
    json!({
        "Item": code,
        "Net": 20.00,
        "Retail": "40.00",
        "Desc": "Eau de Parfum 3.4 oz",
        "Designer": "Maison",
        "ProductLine": "Fragrance",
        "ProductClass": "PERFUME",
        "Available": 12,
        "ImageURL": "https://img.distributor.test/X100.jpg"
    })
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_follows_schemeless_next_url_and_drops_excluded_codes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param_is_missing("page"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"Item": "X100"}, {"Item": "X100-A"}, {"Item": ""}],
            "NextUrl": format!("{}/products?page=2", schemeless(&server)),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"Item": "X200"}],
            "NextUrl": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = test_client(&server.uri()).list_products().await;

    let codes: Vec<&str> = listing.items.iter().map(|i| i.item.as_str()).collect();
    assert_eq!(codes, vec!["X100", "X200"]);
    assert_eq!(listing.pages, 2);
    assert!(listing.complete, "expected a complete listing");
}

#[tokio::test]
async fn list_is_partial_when_a_later_page_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"Item": "X100"}],
            "NextUrl": format!("{}/products?page=2", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let listing = test_client(&server.uri()).list_products().await;

    assert_eq!(listing.items.len(), 1);
    assert!(!listing.complete, "expected a partial listing");
}

#[tokio::test]
async fn list_keeps_base_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Results": [{"Item": "X1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let listing = test_client(&format!("{}/v1", server.uri()))
        .list_products()
        .await;

    assert_eq!(listing.items.len(), 1);
    assert!(listing.complete);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_decodes_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("X100")))
        .expect(1)
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .fetch_detail("X100")
        .await
        .expect("expected a detail record");

    assert_eq!(detail.net, Decimal::from(20));
    assert_eq!(detail.retail, Decimal::from_str("40.00").unwrap());
    assert_eq!(detail.product_class(), Some("PERFUME"));
    assert_eq!(detail.available, 12);
}

#[tokio::test]
async fn detail_retries_503_then_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let detail = test_client(&server.uri()).fetch_detail("X100").await;

    assert!(detail.is_none(), "expected None after exhausting retries");
}

#[tokio::test]
async fn detail_recovers_after_transient_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("X100")))
        .expect(1)
        .mount(&server)
        .await;

    let detail = test_client(&server.uri()).fetch_detail("X100").await;

    assert!(detail.is_some(), "expected the second attempt to succeed");
}

#[tokio::test]
async fn detail_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/GONE"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_client(&server.uri()).fetch_detail("GONE").await.is_none());
}

#[tokio::test]
async fn detail_for_other_code_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("X999")))
        .mount(&server)
        .await;

    assert!(test_client(&server.uri()).fetch_detail("X100").await.is_none());
}

#[tokio::test]
async fn detail_with_unparseable_price_is_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/X100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Item": "X100", "Net": "n/a", "Retail": "40.00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_client(&server.uri()).fetch_detail("X100").await.is_none());
}
