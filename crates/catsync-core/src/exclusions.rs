//! Rules that keep distributor items out of the storefront.
//!
//! Loaded from a YAML file so the list of excluded product lines and classes
//! can change without a rebuild. See `config/exclusions.yaml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionRules {
    /// Item-code suffixes that mark an item as never syncable (e.g. `-A`).
    pub suffixes: Vec<String>,
    /// Product lines excluded wholesale (e.g. `Wellness`).
    #[serde(default)]
    pub product_lines: HashSet<String>,
    /// Product class codes excluded (e.g. `MINLDY`).
    #[serde(default)]
    pub product_classes: HashSet<String>,
}

impl ExclusionRules {
    /// Returns the suffix that excludes `code`, if any.
    #[must_use]
    pub fn excluded_suffix(&self, code: &str) -> Option<&str> {
        self.suffixes
            .iter()
            .map(String::as_str)
            .find(|suffix| code.ends_with(suffix))
    }

    #[must_use]
    pub fn excludes_code(&self, code: &str) -> bool {
        self.excluded_suffix(code).is_some()
    }

    /// Returns `true` when either the product line or the product class is
    /// on the denylist. Comparison is exact.
    #[must_use]
    pub fn excludes_category(&self, product_line: Option<&str>, product_class: Option<&str>) -> bool {
        product_line.is_some_and(|line| self.product_lines.contains(line))
            || product_class.is_some_and(|class| self.product_classes.contains(class))
    }
}

/// Load and validate exclusion rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_exclusions(path: &Path) -> Result<ExclusionRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ExclusionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_exclusions(&content)
}

/// Parse and validate exclusion rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_exclusions(content: &str) -> Result<ExclusionRules, ConfigError> {
    let rules: ExclusionRules = serde_yaml::from_str(content)?;
    validate_exclusions(&rules)?;
    Ok(rules)
}

fn validate_exclusions(rules: &ExclusionRules) -> Result<(), ConfigError> {
    if rules.suffixes.is_empty() {
        return Err(ConfigError::Validation(
            "at least one excluded suffix is required".to_string(),
        ));
    }

    let blank = rules
        .suffixes
        .iter()
        .chain(&rules.product_lines)
        .chain(&rules.product_classes)
        .any(|entry| entry.trim().is_empty());
    if blank {
        return Err(ConfigError::Validation(
            "exclusion entries must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "exclusions_test.rs"]
mod tests;
