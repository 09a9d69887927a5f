pub mod app_config;
pub mod config;
pub mod error;
pub mod exclusions;
pub mod pricing;

pub use app_config::{storefront_api_base, AppConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use exclusions::{load_exclusions, parse_exclusions, ExclusionRules};
pub use pricing::{compute_price, markup_percent, PriceQuote, PricingError};
