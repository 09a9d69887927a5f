//! Catalog reconciliation between the distributor and the storefront.
//!
//! [`Reconciler`] drives any pair of [`DistributorCatalog`] /
//! [`StorefrontCatalog`] implementations; the HTTP clients from
//! `catsync-clients` implement both.

pub mod classify;
pub mod mapping;
pub mod ports;
pub mod reconciler;
pub mod summary;

pub use classify::{classify, decide, Action, Classification, FETCH_FAILED};
pub use ports::{DistributorCatalog, StorefrontCatalog};
pub use reconciler::{ReconcileOptions, Reconciler};
pub use summary::{ItemOutcome, SyncSummary};
