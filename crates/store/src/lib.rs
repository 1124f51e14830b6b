//! Typed access to a Redis Stack server's JSON documents and search indexes.

pub mod client;
pub mod error;
pub mod query;
pub mod reply;
pub mod scenario;
pub mod schema;

pub use client::{BatchOp, InventoryStore};
pub use error::StoreError;
pub use query::{SearchDoc, SearchQuery, SearchResult, parse_search_reply};
pub use reply::{replies_to_json, reply_to_json};
pub use scenario::{NamedQuery, read_queries};
pub use schema::{FieldType, IndexDefinition, SchemaField, inventory_index};
