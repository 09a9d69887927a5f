pub mod api;
pub mod distributor;
pub mod error;
pub mod paged;
pub mod pagination;
pub(crate) mod retry;
pub mod storefront;
pub mod throttle;

pub use api::{ApiClient, ApiConfig};
pub use distributor::{DetailRetryPolicy, DistributorClient, DistributorItem, DistributorItemDetail};
pub use error::ClientError;
pub use paged::{Listing, Page, PageCursor, PagePolicy, PagedFetcher};
pub use storefront::{
    ImagePayload, NewProduct, ProductStatus, ProductUpdate, StorefrontClient, StorefrontImage,
    StorefrontProduct, StorefrontVariant, VariantPayload,
};
pub use throttle::RequestThrottle;
