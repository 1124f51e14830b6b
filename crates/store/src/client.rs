//! Redis JSON + search client.
//!
//! [`InventoryStore`] holds a single multiplexed connection and exposes the
//! handful of `JSON.*` and `FT.*` commands the demo needs. Every method sends
//! exactly one command (or one pipeline) and hands the reply back; nothing is
//! retried.

use redis::aio::MultiplexedConnection;
use redis::Value;
use serde::Serialize;
use tracing::{debug, info};

use inventory_core::RedisConfig;

use crate::error::StoreError;
use crate::query::{SearchQuery, SearchResult, parse_search_reply};
use crate::schema::IndexDefinition;

/// A single `JSON.*` command, sent alone or queued inside an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// `JSON.NUMINCRBY <key> <path> <by>`
    NumIncrBy { key: String, path: String, by: i64 },
    /// `JSON.SET <key> <path> <json>`
    Set { key: String, path: String, json: String },
    /// `JSON.ARRAPPEND <key> <path> <json>`
    ArrAppend { key: String, path: String, json: String },
    /// `JSON.DEL <key> <path>`
    Del { key: String, path: String },
}

impl BatchOp {
    pub fn set<T: Serialize>(key: &str, path: &str, value: &T) -> Result<Self, StoreError> {
        Ok(BatchOp::Set {
            key: key.to_string(),
            path: path.to_string(),
            json: serde_json::to_string(value)?,
        })
    }

    pub fn num_incr_by(key: &str, path: &str, by: i64) -> Self {
        BatchOp::NumIncrBy {
            key: key.to_string(),
            path: path.to_string(),
            by,
        }
    }

    fn command(&self) -> redis::Cmd {
        match self {
            BatchOp::NumIncrBy { key, path, by } => {
                let mut cmd = redis::cmd("JSON.NUMINCRBY");
                cmd.arg(key).arg(path).arg(*by);
                cmd
            }
            BatchOp::Set { key, path, json } => {
                let mut cmd = redis::cmd("JSON.SET");
                cmd.arg(key).arg(path).arg(json);
                cmd
            }
            BatchOp::ArrAppend { key, path, json } => {
                let mut cmd = redis::cmd("JSON.ARRAPPEND");
                cmd.arg(key).arg(path).arg(json);
                cmd
            }
            BatchOp::Del { key, path } => {
                let mut cmd = redis::cmd("JSON.DEL");
                cmd.arg(key).arg(path);
                cmd
            }
        }
    }
}

/// `ops` wrapped in `MULTI`/`EXEC`, in order.
fn atomic_pipeline(ops: &[BatchOp]) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic();
    for op in ops {
        pipe.add_command(op.command());
    }
    pipe
}

pub struct InventoryStore {
    conn: MultiplexedConnection,
    index_name: String,
    key_prefix: String,
}

impl InventoryStore {
    /// Open a client for the configured URL and establish one connection.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.connection_url())?;
        let conn = client.get_multiplexed_async_connection().await?;

        info!(
            url = %config.redacted_url(),
            index = %config.index_name,
            prefix = %config.key_prefix,
            "connected to redis"
        );

        Ok(Self {
            conn,
            index_name: config.index_name.clone(),
            key_prefix: config.key_prefix.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub async fn ping(&mut self) -> Result<String, StoreError> {
        let pong: String = redis::cmd("PING").query_async(&mut self.conn).await?;
        Ok(pong)
    }

    // ── Documents ───────────────────────────────────────────────

    /// `JSON.SET <key> <path> <value>`
    pub async fn json_set<T: Serialize>(
        &mut self,
        key: &str,
        path: &str,
        value: &T,
    ) -> Result<Value, StoreError> {
        let json = serde_json::to_string(value)?;
        debug!(key, path, "JSON.SET");
        let reply: Value = redis::cmd("JSON.SET")
            .arg(key)
            .arg(path)
            .arg(json)
            .query_async(&mut self.conn)
            .await?;
        Ok(reply)
    }

    /// `JSON.GET <key> <path>`, decoded. `None` when the key does not exist.
    pub async fn json_get(
        &mut self,
        key: &str,
        path: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        debug!(key, path, "JSON.GET");
        let raw: Option<String> = redis::cmd("JSON.GET")
            .arg(key)
            .arg(path)
            .query_async(&mut self.conn)
            .await?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(StoreError::from)
    }

    /// `JSON.NUMINCRBY <key> <path> <by>`
    pub async fn json_num_incr_by(
        &mut self,
        key: &str,
        path: &str,
        by: i64,
    ) -> Result<Value, StoreError> {
        self.run(BatchOp::num_incr_by(key, path, by).command()).await
    }

    /// `JSON.ARRAPPEND <key> <path> <value>`
    pub async fn json_arr_append<T: Serialize>(
        &mut self,
        key: &str,
        path: &str,
        value: &T,
    ) -> Result<Value, StoreError> {
        let op = BatchOp::ArrAppend {
            key: key.to_string(),
            path: path.to_string(),
            json: serde_json::to_string(value)?,
        };
        self.run(op.command()).await
    }

    /// `JSON.DEL <key> <path>`; deletes the whole document when `path` is the root.
    pub async fn json_del(&mut self, key: &str, path: &str) -> Result<Value, StoreError> {
        let op = BatchOp::Del {
            key: key.to_string(),
            path: path.to_string(),
        };
        self.run(op.command()).await
    }

    /// Send `ops` as one `MULTI`/`EXEC` batch and return one reply per op.
    pub async fn atomic_batch(&mut self, ops: &[BatchOp]) -> Result<Vec<Value>, StoreError> {
        let pipe = atomic_pipeline(ops);
        debug!(ops = ops.len(), "MULTI/EXEC");
        let replies: Vec<Value> = pipe.query_async(&mut self.conn).await?;
        Ok(replies)
    }

    async fn run(&mut self, cmd: redis::Cmd) -> Result<Value, StoreError> {
        let reply: Value = cmd.query_async(&mut self.conn).await?;
        Ok(reply)
    }

    // ── Index ───────────────────────────────────────────────────

    /// `FT.CREATE` from an index definition.
    pub async fn create_index(&mut self, def: &IndexDefinition) -> Result<Value, StoreError> {
        info!(index = %def.name, fields = def.fields.len(), "creating search index");
        let mut cmd = redis::cmd("FT.CREATE");
        for arg in def.to_args() {
            cmd.arg(arg);
        }
        self.run(cmd).await
    }

    /// Names of all search indexes on the server (`FT._LIST`).
    pub async fn list_indexes(&mut self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = redis::cmd("FT._LIST").query_async(&mut self.conn).await?;
        Ok(names)
    }

    /// Drop the configured index and the documents it covers, if it exists.
    /// Returns whether anything was dropped.
    pub async fn drop_index_if_exists(&mut self) -> Result<bool, StoreError> {
        let index = self.index_name.clone();
        if !self.list_indexes().await?.iter().any(|n| n == &index) {
            debug!(index = %index, "index absent, nothing to drop");
            return Ok(false);
        }
        info!(index = %index, "dropping existing index and its documents");
        let mut cmd = redis::cmd("FT.DROPINDEX");
        cmd.arg(&index).arg("DD");
        self.run(cmd).await?;
        Ok(true)
    }

    /// `FT.SEARCH` against the configured index.
    pub async fn search(&mut self, query: &SearchQuery) -> Result<SearchResult, StoreError> {
        debug!(query = %query.query, "FT.SEARCH");
        let mut cmd = redis::cmd("FT.SEARCH");
        for arg in query.to_args(&self.index_name) {
            cmd.arg(arg);
        }
        let reply = self.run(cmd).await?;
        parse_search_reply(&reply)
    }
}
