//! Strongly-typed request and response bodies for the store's REST API.
//!
//! Only the parts the product API touches are modelled. Search bodies keep
//! unmodelled top-level keys and query clauses in a flattened map so that
//! caller-supplied queries survive the round trip through the typed layer,
//! while the modelled keys are still type-checked.

use crate::domain::Product;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_all: Option<MatchAllQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_phrase: Option<HashMap<String, MatchPhraseQuery>>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_: Option<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<HashMap<String, Value>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Query {
    pub fn match_phrase(field: &str, value: &str) -> Self {
        let mut clause = HashMap::new();
        clause.insert(
            field.to_string(),
            MatchPhraseQuery::Full {
                query: Value::String(value.to_string()),
                slop: None,
                analyzer: None,
                extra: Map::new(),
            },
        );
        Self {
            match_phrase: Some(clause),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchAllQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{"field": {"query": "text", ...}}` or the shorthand `{"field": <value>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchPhraseQuery {
    Full {
        query: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slop: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        analyzer: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Shorthand(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: HitsMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitsMetadata {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
    /// `fields`, `inner_hits`, `matched_queries`, `_ignored`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "_seq_no", default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", default, skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
    NotFound,
    Noop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardStatistics {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
}

/// Response to index, update and delete requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    pub result: WriteResult,
    #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardStatistics>,
    #[serde(rename = "_seq_no", default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", default, skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest<'a> {
    pub doc: &'a Product,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Cause(ErrorCause),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.error {
            ErrorBody::Cause(cause) => match &cause.reason {
                Some(reason) => format!("{}: {}", cause.kind, reason),
                None => cause.kind.clone(),
            },
            ErrorBody::Text(text) => text.clone(),
        }
    }
}
