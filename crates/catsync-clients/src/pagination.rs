//! Continuation extraction for the two paging styles in play.
//!
//! ## Storefront: `Link` header (RFC 5988)
//!
//! ```text
//! <https://shop.example.com/admin/api/2024-04/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.example.com/admin/api/2024-04/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! Only the `rel="next"` entry matters. Its `page_info` value is the cursor
//! for the following request; a missing `next` entry means the last page.
//!
//! ## Distributor: `NextUrl` in the response body
//!
//! The distributor returns the next page location in the body. It is
//! usually host-qualified but schemeless (`api.example.com/v1/products?page=2`),
//! so it is resolved against the base URL's scheme.

use reqwest::Url;

/// Returns the target URL of the `rel="next"` entry in a `Link` header.
#[must_use]
pub fn extract_next_link(link_header: Option<&str>) -> Option<&str> {
    let header = link_header?;

    header
        .split(',')
        .map(str::trim)
        .find(|segment| is_next_relation(segment))
        .and_then(extract_angle_bracket_url)
}

/// Parses a `Link` header value and extracts the `page_info` cursor for the
/// next page.
///
/// Returns `None` if there is no header, no `rel="next"` entry, or the next
/// URL carries no `page_info` parameter.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    let url = Url::parse(extract_next_link(link_header)?).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page_info")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Resolves a body-supplied next-page location against `base`.
///
/// Accepts absolute URLs, root-relative paths, and schemeless
/// `host/path` values. Blank input means there is no next page.
#[must_use]
pub fn resolve_next_url(base: &Url, next: Option<&str>) -> Option<Url> {
    let next = next.map(str::trim).filter(|n| !n.is_empty())?;

    if next.contains("://") {
        return Url::parse(next).ok();
    }
    if next.starts_with('/') {
        return base.join(next).ok();
    }
    Url::parse(&format!("{}://{next}", base.scheme())).ok()
}

fn is_next_relation(segment: &str) -> bool {
    segment.split(';').skip(1).any(|param| {
        let param = param.trim();
        param
            .strip_prefix("rel=")
            .map(|value| value.trim_matches('"'))
            .is_some_and(|value| value.split_whitespace().any(|rel| rel == "next"))
    })
}

/// Extracts the URL between `<` and `>` in a link directive segment.
fn extract_angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_when_header_is_none() {
        assert!(extract_next_cursor(None).is_none());
    }

    #[test]
    fn returns_none_when_header_is_empty() {
        assert!(extract_next_cursor(Some("")).is_none());
    }

    #[test]
    fn extracts_cursor_from_single_next_link() {
        let header = r#"<https://shop.example.com/admin/api/2024-04/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ>; rel="next""#;
        assert_eq!(
            extract_next_cursor(Some(header)).as_deref(),
            Some("eyJsYXN0X2lkIjo2fQ")
        );
    }

    #[test]
    fn extracts_cursor_from_combined_prev_next_link() {
        let header = concat!(
            r#"<https://shop.example.com/products.json?limit=250&page_info=PREV_CURSOR>; rel="previous", "#,
            r#"<https://shop.example.com/products.json?limit=250&page_info=NEXT_CURSOR>; rel="next""#
        );
        assert_eq!(
            extract_next_cursor(Some(header)).as_deref(),
            Some("NEXT_CURSOR")
        );
    }

    #[test]
    fn returns_none_when_only_previous_link_present() {
        let header = r#"<https://shop.example.com/products.json?limit=250&page_info=PREV>; rel="previous""#;
        assert!(extract_next_cursor(Some(header)).is_none());
    }

    #[test]
    fn returns_none_when_no_page_info_in_next_url() {
        let header = r#"<https://shop.example.com/products.json?limit=250>; rel="next""#;
        assert!(extract_next_cursor(Some(header)).is_none());
    }

    #[test]
    fn decodes_percent_encoded_cursor() {
        let header = r#"<https://shop.example.com/products.json?page_info=abc%3D%3D>; rel="next""#;
        assert_eq!(extract_next_cursor(Some(header)).as_deref(), Some("abc=="));
    }

    #[test]
    fn accepts_unquoted_rel_value() {
        let header = "<https://shop.example.com/products.json?page_info=XYZ>; rel=next";
        assert_eq!(extract_next_cursor(Some(header)).as_deref(), Some("XYZ"));
    }

    #[test]
    fn next_link_returns_raw_url() {
        let header = r#"<https://x.test/a?page=2>; rel="next""#;
        assert_eq!(extract_next_link(Some(header)), Some("https://x.test/a?page=2"));
    }

    #[test]
    fn angle_bracket_url_without_brackets_is_none() {
        assert!(extract_angle_bracket_url("no brackets here").is_none());
    }

    fn base() -> Url {
        Url::parse("https://api.distributor.test/v1/").unwrap()
    }

    #[test]
    fn resolves_schemeless_host_path() {
        let next = resolve_next_url(&base(), Some("api.distributor.test/v1/products?page=2"));
        assert_eq!(
            next.unwrap().as_str(),
            "https://api.distributor.test/v1/products?page=2"
        );
    }

    #[test]
    fn resolves_root_relative_path() {
        let next = resolve_next_url(&base(), Some("/v1/products?page=3"));
        assert_eq!(
            next.unwrap().as_str(),
            "https://api.distributor.test/v1/products?page=3"
        );
    }

    #[test]
    fn keeps_absolute_url() {
        let next = resolve_next_url(&base(), Some("http://other.test/p?page=4"));
        assert_eq!(next.unwrap().as_str(), "http://other.test/p?page=4");
    }

    #[test]
    fn blank_or_missing_next_ends_paging() {
        assert!(resolve_next_url(&base(), None).is_none());
        assert!(resolve_next_url(&base(), Some("   ")).is_none());
    }
}
