//! Catalog seams the reconciler drives.
//!
//! The HTTP clients implement these directly; tests substitute in-memory
//! catalogs.

use std::future::Future;

use catsync_clients::{
    ClientError, DistributorClient, DistributorItem, DistributorItemDetail, Listing, NewProduct,
    ProductStatus, ProductUpdate, StorefrontClient, StorefrontProduct,
};

pub trait DistributorCatalog {
    /// Full list of syncable item codes.
    fn list_products(&self) -> impl Future<Output = Listing<DistributorItem>> + Send;

    /// Detail for one code, or `None` when it could not be fetched.
    fn fetch_detail(&self, code: &str) -> impl Future<Output = Option<DistributorItemDetail>> + Send;
}

pub trait StorefrontCatalog {
    fn list_all(&self) -> impl Future<Output = Listing<StorefrontProduct>> + Send;

    fn find_by_sku(&self, sku: &str) -> impl Future<Output = Option<StorefrontProduct>> + Send;

    fn create(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<StorefrontProduct, ClientError>> + Send;

    fn update(
        &self,
        id: i64,
        update: &ProductUpdate,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn set_status(
        &self,
        id: i64,
        status: ProductStatus,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl DistributorCatalog for DistributorClient {
    async fn list_products(&self) -> Listing<DistributorItem> {
        DistributorClient::list_products(self).await
    }

    async fn fetch_detail(&self, code: &str) -> Option<DistributorItemDetail> {
        DistributorClient::fetch_detail(self, code).await
    }
}

impl StorefrontCatalog for StorefrontClient {
    async fn list_all(&self) -> Listing<StorefrontProduct> {
        StorefrontClient::list_all(self).await
    }

    async fn find_by_sku(&self, sku: &str) -> Option<StorefrontProduct> {
        StorefrontClient::find_by_sku(self, sku).await
    }

    async fn create(&self, product: &NewProduct) -> Result<StorefrontProduct, ClientError> {
        StorefrontClient::create(self, product).await
    }

    async fn update(&self, id: i64, update: &ProductUpdate) -> Result<(), ClientError> {
        StorefrontClient::update(self, id, update).await
    }

    async fn set_status(&self, id: i64, status: ProductStatus) -> Result<(), ClientError> {
        StorefrontClient::set_status(self, id, status).await
    }
}
