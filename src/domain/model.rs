use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 所有操作固定使用的索引
pub const PRODUCT_INDEX: &str = "products";

/// The only entity the API manages. Identity is the store-assigned document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<i64>,
}

/// What a handler asks the store to search for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    /// Every document, with an explicit page size.
    All { size: u64 },
    /// Phrase match of `value` against `field`, value passed through unescaped.
    MatchPhrase { field: String, value: String },
    /// Caller-supplied search body, forwarded verbatim.
    Raw(Value),
}

/// Write/delete acknowledgement returned by the store, kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acknowledgement(pub Value);

impl Acknowledgement {
    /// The store's result code (`created`, `updated`, `deleted`, `not_found`, `noop`).
    pub fn result(&self) -> Option<&str> {
        self.0.get("result").and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("_id").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
