//! `FT.SEARCH` query building and reply decoding.

use std::collections::BTreeMap;

use redis::Value;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Field under which the search module returns the whole JSON document.
const JSON_ROOT_FIELD: &str = "$";

/// A search query string plus its optional `RETURN` and `LIMIT` clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub return_fields: Vec<String>,
    /// `(offset, num)`; `None` leaves paging to the server default.
    pub limit: Option<(usize, usize)>,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            return_fields: Vec::new(),
            limit: None,
        }
    }

    pub fn return_field(mut self, field: &str) -> Self {
        self.return_fields.push(field.to_string());
        self
    }

    pub fn limit(mut self, offset: usize, num: usize) -> Self {
        self.limit = Some((offset, num));
        self
    }

    /// Arguments following `FT.SEARCH`.
    pub fn to_args(&self, index: &str) -> Vec<String> {
        let mut args = vec![index.to_string(), self.query.clone()];
        if !self.return_fields.is_empty() {
            args.push("RETURN".to_string());
            args.push(self.return_fields.len().to_string());
            args.extend(self.return_fields.iter().cloned());
        }
        if let Some((offset, num)) = self.limit {
            args.push("LIMIT".to_string());
            args.push(offset.to_string());
            args.push(num.to_string());
        }
        args
    }
}

/// One matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub id: String,
    /// Decoded document body, present when the `$` field was returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Remaining returned fields, keyed by alias.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Decoded `FT.SEARCH` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total matches on the server, which may exceed `docs.len()` when paged.
    pub total: i64,
    pub docs: Vec<SearchDoc>,
}

impl SearchResult {
    pub fn ids(&self) -> Vec<&str> {
        self.docs.iter().map(|d| d.id.as_str()).collect()
    }
}

fn unexpected(detail: impl Into<String>) -> StoreError {
    StoreError::UnexpectedReply {
        command: "FT.SEARCH".to_string(),
        detail: detail.into(),
    }
}

fn as_string(value: &Value) -> Result<String, StoreError> {
    redis::from_redis_value::<String>(value).map_err(|e| unexpected(e.to_string()))
}

/// Decode a RESP2 search reply: `[total, key, [field, value, ...], key, ...]`.
///
/// The field array is absent for `NOCONTENT` queries, so each key is only
/// paired with the following element when that element is an array.
pub fn parse_search_reply(reply: &Value) -> Result<SearchResult, StoreError> {
    let Value::Array(items) = reply else {
        return Err(unexpected(format!("expected array, got {:?}", reply)));
    };
    let mut iter = items.iter().peekable();

    let total = match iter.next() {
        Some(Value::Int(n)) => *n,
        Some(other) => return Err(unexpected(format!("expected total count, got {:?}", other))),
        None => return Err(unexpected("empty reply")),
    };

    let mut docs = Vec::new();
    while let Some(key) = iter.next() {
        let id = as_string(key)?;
        let mut doc = SearchDoc {
            id,
            json: None,
            fields: BTreeMap::new(),
        };

        if let Some(Value::Array(pairs)) = iter.peek() {
            if pairs.len() % 2 != 0 {
                return Err(unexpected(format!("odd field list for {}", doc.id)));
            }
            for pair in pairs.chunks(2) {
                let name = as_string(&pair[0])?;
                let value = as_string(&pair[1])?;
                if name == JSON_ROOT_FIELD {
                    let parsed = serde_json::from_str(&value)
                        .unwrap_or(serde_json::Value::String(value));
                    doc.json = Some(parsed);
                } else {
                    doc.fields.insert(name, value);
                }
            }
            iter.next();
        }

        docs.push(doc);
    }

    Ok(SearchResult { total, docs })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_query_args_plain() {
        let q = SearchQuery::new("@status:E");
        assert_eq!(q.to_args("inventoryIdx"), vec!["inventoryIdx", "@status:E"]);
    }

    #[test]
    fn test_query_args_return_and_limit() {
        let q = SearchQuery::new("@status:E")
            .return_field("item")
            .return_field("status")
            .limit(0, 50);
        assert_eq!(
            q.to_args("idx"),
            vec!["idx", "@status:E", "RETURN", "2", "item", "status", "LIMIT", "0", "50"]
        );
    }

    #[test]
    fn test_parse_json_docs() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("inventory:1"),
            Value::Array(vec![bulk("$"), bulk(r#"{"item":"journal","qty":25}"#)]),
            bulk("inventory:3"),
            Value::Array(vec![bulk("$"), bulk(r#"{"item":"paper","qty":100}"#)]),
        ]);

        let result = parse_search_reply(&reply).unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.ids(), vec!["inventory:1", "inventory:3"]);
        let body = result.docs[1].json.as_ref().unwrap();
        assert_eq!(body["item"], "paper");
        assert_eq!(body["qty"], 100);
        assert!(result.docs[0].fields.is_empty());
    }

    #[test]
    fn test_parse_returned_fields() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("inventory:5"),
            Value::Array(vec![bulk("item"), bulk("postcard"), bulk("status"), bulk("E")]),
        ]);

        let result = parse_search_reply(&reply).unwrap();
        let doc = &result.docs[0];
        assert!(doc.json.is_none());
        assert_eq!(doc.fields.get("item").map(String::as_str), Some("postcard"));
        assert_eq!(doc.fields.get("status").map(String::as_str), Some("E"));
    }

    #[test]
    fn test_parse_nocontent() {
        let reply = Value::Array(vec![Value::Int(2), bulk("inventory:1"), bulk("inventory:2")]);
        let result = parse_search_reply(&reply).unwrap();
        assert_eq!(result.ids(), vec!["inventory:1", "inventory:2"]);
    }

    #[test]
    fn test_parse_empty_result() {
        let result = parse_search_reply(&Value::Array(vec![Value::Int(0)])).unwrap();
        assert_eq!(result.total, 0);
        assert!(result.docs.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_search_reply(&Value::Okay).unwrap_err();
        assert!(err.to_string().contains("FT.SEARCH"), "unexpected error: {}", err);
    }

    #[test]
    fn test_parse_rejects_odd_fields() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("inventory:1"),
            Value::Array(vec![bulk("item")]),
        ]);
        assert!(parse_search_reply(&reply).is_err());
    }

    #[test]
    fn test_serialized_doc_skips_empty_parts() {
        let doc = SearchDoc {
            id: "inventory:1".to_string(),
            json: None,
            fields: BTreeMap::new(),
        };
        assert_eq!(serde_json::to_value(&doc).unwrap(), serde_json::json!({"id": "inventory:1"}));
    }
}
