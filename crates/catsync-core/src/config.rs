use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let distributor_api_url = require("DISTRIBUTOR_API_URL")?;
    let distributor_api_key = require("DISTRIBUTOR_API_KEY")?;
    let storefront_store_url = require("STOREFRONT_STORE_URL")?;
    let storefront_access_token = require("STOREFRONT_ACCESS_TOKEN")?;

    let distributor_auth_scheme = or_default("DISTRIBUTOR_AUTH_SCHEME", "Bearer");
    let storefront_api_version = or_default("STOREFRONT_API_VERSION", "2024-04");
    let vendor = or_default("CATSYNC_VENDOR", "Distributor");
    let exclusions_path = PathBuf::from(or_default(
        "CATSYNC_EXCLUSIONS_PATH",
        "./config/exclusions.yaml",
    ));
    let log_level = or_default("CATSYNC_LOG_LEVEL", "info");
    let user_agent = or_default("CATSYNC_USER_AGENT", "catsync/0.1 (catalog-sync)");
    let schedule = or_default("CATSYNC_SCHEDULE", "0 0 3 * * *");

    let request_timeout_secs = parse_u64("CATSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let min_request_interval_ms = parse_u64("CATSYNC_MIN_REQUEST_INTERVAL_MS", "1000")?;
    let page_limit = parse_u32("CATSYNC_PAGE_LIMIT", "250")?;
    let max_pages = parse_usize("CATSYNC_MAX_PAGES", "500")?;
    let max_rate_limit_retries = parse_u32("CATSYNC_MAX_RATE_LIMIT_RETRIES", "10")?;
    let detail_max_attempts = parse_u32("CATSYNC_DETAIL_MAX_ATTEMPTS", "3")?;
    let detail_retry_base_secs = parse_u64("CATSYNC_DETAIL_RETRY_BASE_SECS", "2")?;

    if page_limit == 0 || page_limit > 250 {
        return Err(invalid(
            "CATSYNC_PAGE_LIMIT",
            format!("{page_limit} is outside 1..=250"),
        ));
    }
    if detail_max_attempts == 0 {
        return Err(invalid(
            "CATSYNC_DETAIL_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    let draft_missing = parse_bool(&or_default("CATSYNC_DRAFT_MISSING", "true"))
        .ok_or_else(|| invalid("CATSYNC_DRAFT_MISSING", "expected true or false".into()))?;

    let run_timeout_secs = match lookup("CATSYNC_RUN_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("CATSYNC_RUN_TIMEOUT_SECS", e.to_string()))?,
        ),
        _ => None,
    };

    Ok(AppConfig {
        distributor_api_url,
        distributor_api_key,
        distributor_auth_scheme,
        storefront_store_url,
        storefront_access_token,
        storefront_api_version,
        vendor,
        exclusions_path,
        log_level,
        request_timeout_secs,
        user_agent,
        min_request_interval_ms,
        page_limit,
        max_pages,
        max_rate_limit_retries,
        detail_max_attempts,
        detail_retry_base_secs,
        draft_missing,
        run_timeout_secs,
        schedule,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
