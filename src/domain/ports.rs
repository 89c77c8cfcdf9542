use crate::domain::model::{Acknowledgement, Product, SearchRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Document store capabilities the handlers rely on.
///
/// Implementations must report store-side failures as `ApiError::StoreError`
/// (status + message) and connection/decoding failures as transport or
/// serialization errors, so the HTTP layer can tell them apart.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a search and return the hit envelopes, unmodified.
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<Vec<Value>>;

    async fn count(&self, index: &str) -> Result<u64>;

    /// Fetch a document by id. `None` when the store has no such document.
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>>;

    /// Index a new document; the store assigns the id.
    async fn index(&self, index: &str, product: &Product) -> Result<Acknowledgement>;

    /// Merge the present fields of `product` into document `id`.
    async fn update(&self, index: &str, id: &str, product: &Product) -> Result<Acknowledgement>;

    async fn delete(&self, index: &str, id: &str) -> Result<Acknowledgement>;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn store_url(&self) -> &str;
    fn username(&self) -> &str;
    fn password(&self) -> &str;
    fn accept_invalid_certs(&self) -> bool;
    fn connect_timeout(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn max_idle_per_host(&self) -> usize;
    fn query_passthrough(&self) -> bool;
}
