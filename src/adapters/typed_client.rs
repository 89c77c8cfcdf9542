use crate::adapters::transport::StoreTransport;
use crate::adapters::typed_api::{
    CountResponse, ErrorResponse, GetResponse, Query, SearchBody, SearchResponse, UpdateRequest,
    WriteResponse,
};
use crate::domain::{Acknowledgement, DocumentStore, Product, SearchRequest};
use crate::utils::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strongly-typed store client: every request and response goes through the
/// structs in `typed_api`, so shape mismatches fail at the client boundary.
#[derive(Debug, Clone)]
pub struct TypedStoreClient {
    transport: StoreTransport,
}

impl TypedStoreClient {
    pub fn new(transport: StoreTransport) -> Self {
        Self { transport }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!("Store response status: {} ({} bytes)", status, bytes.len());

        if !status.is_success() {
            return Err(store_error(status, &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, request: RequestBuilder) -> Result<Acknowledgement> {
        let response: WriteResponse = self.execute(request).await?;
        Ok(Acknowledgement(serde_json::to_value(response)?))
    }
}

/// 優先使用 store 回傳的錯誤原因，解析不了時退回狀態行
fn store_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .map(|err| err.message())
        .unwrap_or_else(|_| status.to_string());

    ApiError::StoreError {
        status: status.as_u16(),
        message,
    }
}

/// Translate a handler search request into the typed search body.
pub fn search_body(request: &SearchRequest) -> Result<SearchBody> {
    match request {
        SearchRequest::All { size } => Ok(SearchBody {
            size: Some(*size),
            ..SearchBody::default()
        }),
        SearchRequest::MatchPhrase { field, value } => Ok(SearchBody {
            query: Some(Query::match_phrase(field, value)),
            ..SearchBody::default()
        }),
        SearchRequest::Raw(body) => serde_json::from_value(body.clone()).map_err(|e| {
            tracing::debug!("Search body does not fit the typed request: {}", e);
            ApiError::bad_request()
        }),
    }
}

#[async_trait]
impl DocumentStore for TypedStoreClient {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<Vec<Value>> {
        let body = search_body(request)?;
        let request = self
            .transport
            .request(Method::POST, &[index, "_search"])?
            .json(&body);

        let response: SearchResponse = self.execute(request).await?;
        if response.timed_out {
            tracing::warn!("Search on {} timed out, returning partial hits", index);
        }
        if let Some(total) = &response.hits.total {
            tracing::debug!(
                "Search matched {} ({}) documents in {}ms",
                total.value,
                total.relation,
                response.took.unwrap_or_default()
            );
        }

        response
            .hits
            .hits
            .into_iter()
            .map(|hit| serde_json::to_value(hit).map_err(ApiError::from))
            .collect()
    }

    async fn count(&self, index: &str) -> Result<u64> {
        let request = self.transport.request(Method::GET, &[index, "_count"])?;
        let response: CountResponse = self.execute(request).await?;
        Ok(response.count)
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let request = self.transport.request(Method::GET, &[index, "_doc", id])?;
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(store_error(status, &bytes));
        }

        let document: GetResponse = serde_json::from_slice(&bytes)?;
        if !document.found {
            return Ok(None);
        }
        Ok(Some(serde_json::to_value(document)?))
    }

    async fn index(&self, index: &str, product: &Product) -> Result<Acknowledgement> {
        let request = self
            .transport
            .request(Method::POST, &[index, "_doc"])?
            .json(product);
        self.write(request).await
    }

    async fn update(&self, index: &str, id: &str, product: &Product) -> Result<Acknowledgement> {
        let request = self
            .transport
            .request(Method::POST, &[index, "_update", id])?
            .json(&UpdateRequest { doc: product });
        self.write(request).await
    }

    async fn delete(&self, index: &str, id: &str) -> Result<Acknowledgement> {
        let request = self.transport.request(Method::DELETE, &[index, "_doc", id])?;
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // 文件不存在時 store 回 404 但 body 仍是一般的寫入回應 (result: not_found)
        if status == StatusCode::NOT_FOUND {
            if let Ok(ack) = serde_json::from_slice::<WriteResponse>(&bytes) {
                return Ok(Acknowledgement(serde_json::to_value(ack)?));
            }
        }
        if !status.is_success() {
            return Err(store_error(status, &bytes));
        }

        let response: WriteResponse = serde_json::from_slice(&bytes)?;
        Ok(Acknowledgement(serde_json::to_value(response)?))
    }
}
