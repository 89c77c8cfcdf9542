use crate::adapters::transport::StoreTransport;
use crate::domain::{Acknowledgement, DocumentStore, Product, SearchRequest};
use crate::utils::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};

/// Schema-flexible store client: requests are built as plain JSON and
/// responses come back as `serde_json::Value`.
#[derive(Debug, Clone)]
pub struct RawStoreClient {
    transport: StoreTransport,
}

impl RawStoreClient {
    pub fn new(transport: StoreTransport) -> Self {
        Self { transport }
    }

    /// Cluster information from the store's root endpoint.
    pub async fn info(&self) -> Result<Value> {
        let request = self.transport.request(Method::GET, &[])?;
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode(response: Response) -> Result<Value> {
        let status = response.status();
        tracing::debug!("Store response status: {}", status);

        if !status.is_success() {
            return Err(ApiError::StoreError {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pull `hits.hits` out of a search response; anything missing means no hits.
pub fn extract_hits(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut root) => match root.remove("hits") {
            Some(Value::Object(mut hits)) => match hits.remove("hits") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn match_phrase_body(field: &str, value: &str) -> Value {
    let mut phrase = Map::new();
    phrase.insert(field.to_string(), Value::String(value.to_string()));
    json!({ "query": { "match_phrase": phrase } })
}

#[async_trait]
impl DocumentStore for RawStoreClient {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<Vec<Value>> {
        let builder = self.transport.request(Method::POST, &[index, "_search"])?;
        let builder = match request {
            SearchRequest::All { size } => builder.query(&[("size", *size)]),
            SearchRequest::MatchPhrase { field, value } => {
                builder.json(&match_phrase_body(field, value))
            }
            SearchRequest::Raw(body) => builder.json(body),
        };

        let body = self.send(builder).await?;
        Ok(extract_hits(body))
    }

    async fn count(&self, index: &str) -> Result<u64> {
        let request = self.transport.request(Method::GET, &[index, "_count"])?;
        let body = self.send(request).await?;

        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::MalformedResponse {
                message: "count response has no numeric `count` field".to_string(),
            })
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let request = self.transport.request(Method::GET, &[index, "_doc", id])?;
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    async fn index(&self, index: &str, product: &Product) -> Result<Acknowledgement> {
        let request = self
            .transport
            .request(Method::POST, &[index, "_doc"])?
            .json(product);
        self.send(request).await.map(Acknowledgement)
    }

    async fn update(&self, index: &str, id: &str, product: &Product) -> Result<Acknowledgement> {
        let request = self
            .transport
            .request(Method::POST, &[index, "_update", id])?
            .json(&json!({ "doc": product }));
        self.send(request).await.map(Acknowledgement)
    }

    async fn delete(&self, index: &str, id: &str) -> Result<Acknowledgement> {
        let request = self.transport.request(Method::DELETE, &[index, "_doc", id])?;
        self.send(request).await.map(Acknowledgement)
    }
}
