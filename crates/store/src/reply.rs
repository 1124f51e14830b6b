//! Conversion of raw command replies into printable JSON.

use redis::Value;
use serde_json::{Map, Value as Json};

/// Render a reply as JSON.
///
/// `OK` becomes `true`; bulk strings that hold JSON text (as returned by the
/// `JSON.*` commands) are decoded, other bulk strings are kept as text.
pub fn reply_to_json(reply: &Value) -> Json {
    match reply {
        Value::Nil => Json::Null,
        Value::Okay => Json::Bool(true),
        Value::Int(n) => Json::from(*n),
        Value::Double(f) => Json::from(*f),
        Value::Boolean(b) => Json::Bool(*b),
        Value::SimpleString(s) => Json::String(s.clone()),
        Value::BulkString(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            serde_json::from_str(&text).unwrap_or_else(|_| Json::String(text.into_owned()))
        }
        Value::Array(items) | Value::Set(items) => {
            Json::Array(items.iter().map(reply_to_json).collect())
        }
        Value::Map(pairs) => {
            let mut map = Map::new();
            for (k, v) in pairs {
                let key = match reply_to_json(k) {
                    Json::String(s) => s,
                    other => other.to_string(),
                };
                map.insert(key, reply_to_json(v));
            }
            Json::Object(map)
        }
        other => Json::String(format!("{:?}", other)),
    }
}

/// Render a batch of pipeline replies.
pub fn replies_to_json(replies: &[Value]) -> Json {
    Json::Array(replies.iter().map(reply_to_json).collect())
}
