use crate::domain::{Acknowledgement, DocumentStore, Product, SearchRequest, PRODUCT_INDEX};
use crate::utils::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// CRUD operations on products, independent of which store client backs them.
pub struct ProductService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every document in the index. The store pages by default, so the
    /// current document count is used as the page size.
    pub async fn find_all(&self) -> Result<Vec<Value>> {
        let total = self.store.count(PRODUCT_INDEX).await?;
        tracing::debug!("Fetching all {} products", total);

        self.store
            .search(PRODUCT_INDEX, &SearchRequest::All { size: total })
            .await
    }

    /// First hit of a phrase match on `_id`; `None` when nothing matched.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Value>> {
        let request = SearchRequest::MatchPhrase {
            field: "_id".to_string(),
            value: id.to_string(),
        };
        let hits = self.store.search(PRODUCT_INDEX, &request).await?;
        Ok(hits.into_iter().next())
    }

    pub async fn find_by_query(&self, body: &[u8]) -> Result<Vec<Value>> {
        let query: Value = parse_body(body)?;
        self.store
            .search(PRODUCT_INDEX, &SearchRequest::Raw(query))
            .await
    }

    pub async fn create(&self, body: &[u8]) -> Result<Acknowledgement> {
        let product: Product = parse_body(body)?;
        let ack = self.store.index(PRODUCT_INDEX, &product).await?;
        tracing::info!("Created product {}", ack.id().unwrap_or("<unknown>"));
        Ok(ack)
    }

    /// Partial update: only fields present in the body are merged.
    pub async fn update(&self, id: &str, body: &[u8]) -> Result<Acknowledgement> {
        let product: Product = parse_body(body)?;
        let ack = self.store.update(PRODUCT_INDEX, id, &product).await?;
        tracing::info!("Updated product {} ({})", id, ack.result().unwrap_or("?"));
        Ok(ack)
    }

    /// A structurally successful delete whose result is not `deleted` is a 404.
    pub async fn delete(&self, id: &str) -> Result<Acknowledgement> {
        let ack = self.store.delete(PRODUCT_INDEX, id).await?;

        if ack.result() != Some("deleted") {
            tracing::warn!(
                "Delete of product {} returned result {:?}",
                id,
                ack.result()
            );
            return Err(ApiError::NotFound);
        }

        tracing::info!("Deleted product {}", id);
        Ok(ack)
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::bad_request()
    })
}
