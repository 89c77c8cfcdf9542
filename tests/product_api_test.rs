use async_trait::async_trait;
use product_search_api::domain::{
    Acknowledgement, DocumentStore, Product, SearchRequest,
};
use product_search_api::{build_router, ApiError, ProductService, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// In-memory stand-in for the document store that mimics its result codes
/// and default page size.
#[derive(Default)]
struct MemoryStore {
    docs: Mutex<BTreeMap<String, Map<String, Value>>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl MemoryStore {
    const DEFAULT_PAGE: usize = 10;

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(index: &str, id: &str, source: &Map<String, Value>) -> Value {
        json!({ "_index": index, "_id": id, "_score": 1.0, "_source": source })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let docs = self.docs.lock().unwrap();
        let hits = match request {
            SearchRequest::All { size } => docs
                .iter()
                .take(*size as usize)
                .map(|(id, source)| Self::hit(index, id, source))
                .collect(),
            SearchRequest::MatchPhrase { field, value } if field == "_id" => docs
                .get(value)
                .map(|source| vec![Self::hit(index, value, source)])
                .unwrap_or_default(),
            SearchRequest::MatchPhrase { .. } => Vec::new(),
            SearchRequest::Raw(body) => {
                if !body.is_object() {
                    return Err(ApiError::StoreError {
                        status: 400,
                        message: "400 Bad Request".to_string(),
                    });
                }
                docs.iter()
                    .take(Self::DEFAULT_PAGE)
                    .map(|(id, source)| Self::hit(index, id, source))
                    .collect()
            }
        };
        Ok(hits)
    }

    async fn count(&self, _index: &str) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.docs.lock().unwrap().len() as u64)
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let docs = self.docs.lock().unwrap();
        Ok(docs.get(id).map(|source| Self::hit(index, id, source)))
    }

    async fn index(&self, index: &str, product: &Product) -> Result<Acknowledgement> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("doc-{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let source = match serde_json::to_value(product)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.docs.lock().unwrap().insert(id.clone(), source);
        Ok(Acknowledgement(json!({
            "_index": index, "_id": id, "_version": 1, "result": "created"
        })))
    }

    async fn update(&self, index: &str, id: &str, product: &Product) -> Result<Acknowledgement> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        let source = docs.get_mut(id).ok_or_else(|| ApiError::StoreError {
            status: 404,
            message: "404 Not Found".to_string(),
        })?;
        if let Value::Object(fields) = serde_json::to_value(product)? {
            for (key, value) in fields {
                source.insert(key, value);
            }
        }
        Ok(Acknowledgement(json!({
            "_index": index, "_id": id, "_version": 2, "result": "updated"
        })))
    }

    async fn delete(&self, index: &str, id: &str) -> Result<Acknowledgement> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.docs.lock().unwrap().remove(id) {
            Some(_) => "deleted",
            None => "not_found",
        };
        Ok(Acknowledgement(json!({
            "_index": index, "_id": id, "_version": 1, "result": result
        })))
    }
}

struct TestApp {
    base_url: String,
    v1: Arc<ProductService<MemoryStore>>,
    v2: Arc<ProductService<MemoryStore>>,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(query_passthrough: bool) -> Self {
        let v1 = Arc::new(ProductService::new(MemoryStore::default()));
        let v2 = Arc::new(ProductService::new(MemoryStore::default()));
        let app = build_router(v1.clone(), v2.clone(), query_passthrough);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            v1,
            v2,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, version: &str, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url(&format!("/createProduct/{}", version)))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }
}

#[tokio::test]
async fn test_chair_scenario_on_both_versions() {
    let app = TestApp::spawn(true).await;

    for version in ["v1", "v2"] {
        let ack = app.create(version, json!({ "name": "chair", "qty": 4 })).await;
        assert_eq!(ack["result"], "created");
        let id = ack["_id"].as_str().unwrap().to_string();

        let resp = app
            .client
            .put(app.url(&format!("/updateProduct/{}/{}", version, id)))
            .json(&json!({ "qty": 9 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let ack: Value = resp.json().await.unwrap();
        assert_eq!(ack["result"], "updated");

        let hit: Value = app
            .client
            .get(app.url(&format!("/findById/{}/{}", version, id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(hit["_id"], id.as_str());
        assert_eq!(hit["_source"], json!({ "name": "chair", "qty": 9 }));

        let delete_url = app.url(&format!("/deleteProductById/{}/{}", version, id));
        let resp = app.client.delete(&delete_url).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let ack: Value = resp.json().await.unwrap();
        assert_eq!(ack["result"], "deleted");

        let resp = app.client.delete(&delete_url).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Data not found" }));
    }
}

#[tokio::test]
async fn test_create_then_find_returns_same_source() {
    let app = TestApp::spawn(true).await;

    let ack = app
        .create("v1", json!({ "name": "desk", "ignored": true }))
        .await;
    let id = ack["_id"].as_str().unwrap();

    let hit: Value = app
        .client
        .get(app.url(&format!("/findById/v1/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // 未提供的欄位不會出現在文件中
    assert_eq!(hit["_source"], json!({ "name": "desk" }));
}

#[tokio::test]
async fn test_update_keeps_absent_fields() {
    let app = TestApp::spawn(true).await;
    let ack = app.create("v2", json!({ "name": "shelf", "qty": 2 })).await;
    let id = ack["_id"].as_str().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/updateProduct/v2/{}", id)))
        .json(&json!({ "name": "bookshelf" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let hit: Value = app
        .client
        .get(app.url(&format!("/findById/v2/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hit["_source"], json!({ "name": "bookshelf", "qty": 2 }));
}

#[tokio::test]
async fn test_update_of_missing_document_surfaces_store_error() {
    let app = TestApp::spawn(true).await;

    let resp = app
        .client
        .put(app.url("/updateProduct/v1/nope"))
        .json(&json!({ "qty": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "404 Not Found" }));
}

#[tokio::test]
async fn test_find_by_id_without_match_is_empty_200() {
    let app = TestApp::spawn(true).await;

    let resp = app
        .client
        .get(app.url("/findById/v1/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_all_is_not_truncated_to_default_page() {
    let app = TestApp::spawn(true).await;

    for i in 0..25 {
        app.create("v1", json!({ "name": format!("item-{}", i), "qty": i }))
            .await;
    }

    let count = app.v1.store().count("products").await.unwrap();
    let hits: Vec<Value> = app
        .client
        .get(app.url("/findAll/v1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(count, 25);
    assert_eq!(hits.len() as u64, count);
}

#[tokio::test]
async fn test_find_all_on_empty_index() {
    let app = TestApp::spawn(true).await;

    let resp = app.client.get(app.url("/findAll/v2")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let hits: Vec<Value> = resp.json().await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_find_by_query_forwards_body() {
    let app = TestApp::spawn(true).await;
    app.create("v2", json!({ "name": "stool" })).await;

    let resp = app
        .client
        .post(app.url("/findByQuery/v2"))
        .json(&json!({ "query": { "match": { "name": "stool" } } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let hits: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["_source"]["name"], "stool");
}

#[tokio::test]
async fn test_malformed_query_never_reaches_store() {
    let app = TestApp::spawn(true).await;

    for version in ["v1", "v2"] {
        let resp = app
            .client
            .post(app.url(&format!("/findByQuery/{}", version)))
            .header("content-type", "application/json")
            .body("{\"query\": {")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Failed to parse request body" }));
    }

    assert_eq!(app.v1.store().calls(), 0);
    assert_eq!(app.v2.store().calls(), 0);
}

#[tokio::test]
async fn test_malformed_product_body_is_400() {
    let app = TestApp::spawn(true).await;

    let resp = app
        .client
        .post(app.url("/createProduct/v1"))
        .header("content-type", "application/json")
        .body(r#"{"name": "chair", "qty": "four"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .put(app.url("/updateProduct/v2/any"))
        .body("not json at all")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert_eq!(app.v1.store().calls(), 0);
    assert_eq!(app.v2.store().calls(), 0);
}

#[tokio::test]
async fn test_store_error_status_is_forwarded() {
    let app = TestApp::spawn(true).await;

    let resp = app
        .client
        .post(app.url("/findByQuery/v1"))
        .json(&json!(["not", "a", "query"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "400 Bad Request" }));
    assert_eq!(app.v1.store().calls(), 1);
}

#[tokio::test]
async fn test_versions_use_their_own_store() {
    let app = TestApp::spawn(true).await;
    app.create("v1", json!({ "name": "only-v1" })).await;

    assert_eq!(app.v1.store().count("products").await.unwrap(), 1);
    assert_eq!(app.v2.store().count("products").await.unwrap(), 0);
}

#[tokio::test]
async fn test_query_passthrough_can_be_disabled() {
    let app = TestApp::spawn(false).await;

    let resp = app
        .client
        .post(app.url("/findByQuery/v1"))
        .json(&json!({ "query": { "match_all": {} } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(app.v1.store().calls(), 0);

    let resp = app.client.get(app.url("/findAll/v1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}
