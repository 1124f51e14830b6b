/// Errors surfaced by [`crate::InventoryStore`] and reply decoding.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection or command failure reported by the redis client.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A document could not be encoded for `JSON.SET`.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server replied with a shape the decoder does not understand.
    #[error("Unexpected reply to {command}: {detail}")]
    UnexpectedReply { command: String, detail: String },
}
