//! The inventory walkthrough: load, index, query, mutate, delete.
//!
//! Each step issues its commands against an [`InventoryStore`] and returns the
//! server's reply unchanged; the caller decides how to print it.

use std::time::Duration;

use redis::Value;
use serde_json::json;
use tracing::{debug, info, warn};

use inventory_core::{InventoryItem, item_key};

use crate::client::{BatchOp, InventoryStore};
use crate::error::StoreError;
use crate::query::{SearchQuery, SearchResult};
use crate::schema::inventory_index;

/// Sequence number of the document the mutation steps operate on.
pub const TARGET_SEQ: usize = 2;

/// Root path in the legacy JSONPath syntax used by the mutation steps.
const ROOT: &str = ".";

const INDEX_POLL_INTERVAL: Duration = Duration::from_millis(50);
const INDEX_POLL_ATTEMPTS: u32 = 40;

/// A predefined read query with a short label for output.
#[derive(Debug, Clone)]
pub struct NamedQuery {
    pub name: &'static str,
    pub query: SearchQuery,
}

fn named(name: &'static str, query: SearchQuery) -> NamedQuery {
    NamedQuery { name, query }
}

/// The eleven read queries, in execution order.
pub fn read_queries() -> Vec<NamedQuery> {
    vec![
        named("read_1", SearchQuery::new("*")),
        named("read_2", SearchQuery::new("@status:E")),
        named("read_3", SearchQuery::new("@status:E|@status:D")),
        named("read_4", SearchQuery::new("(@status:E) (@qty:[-inf (30])")),
        named("read_5", SearchQuery::new("(@status:E) ((@qty:[-inf (30])|(@item:pa*))")),
        named("read_6", SearchQuery::new("@sizeh:[14 14] @sizew:[21 21] @sizeuom:cm")),
        named("read_7", SearchQuery::new("@sizeuom:cm")),
        named("read_8", SearchQuery::new("@sizeh:[-inf (15]")),
        named("read_9", SearchQuery::new("(@dim_cm_0:[(25 +inf])|(@dim_cm_1:[(25 +inf])")),
        named("read_10", SearchQuery::new("(@dim_cm_1:[(25 +inf])")),
        named(
            "read_11",
            SearchQuery::new("@status:E").return_field("item").return_field("status"),
        ),
    ]
}

/// Document written back over the target by [`update_4`].
pub fn replacement_item() -> serde_json::Value {
    json!({
        "item": "notebook",
        "qty": 50,
        "tags": ["red", "blank"],
        "dim_cm": [14, 21],
        "size": {"h": 14, "w": 21, "uom": "cm"},
        "status": "E"
    })
}

fn target_key(store: &InventoryStore) -> String {
    item_key(store.key_prefix(), TARGET_SEQ)
}

// ── Loader ──────────────────────────────────────────────────────────

/// Store every item under `<prefix><n>` (n from 1, in order), then create the
/// search index over that prefix. Returns the number of items stored.
pub async fn create(store: &mut InventoryStore, dataset: &[InventoryItem]) -> Result<usize, StoreError> {
    for (i, item) in dataset.iter().enumerate() {
        let key = item_key(store.key_prefix(), i + 1);
        store.json_set(&key, "$", item).await?;
    }
    info!(count = dataset.len(), prefix = %store.key_prefix(), "documents loaded");

    let def = inventory_index(store.index_name(), store.key_prefix());
    store.create_index(&def).await?;
    Ok(dataset.len())
}

/// Poll until the index reports at least `expected` documents.
///
/// Index creation scans existing keys in the background, so searches issued
/// immediately afterwards can see a partial index. Returns the last observed
/// count; gives up quietly after a bounded number of attempts.
pub async fn wait_for_index(store: &mut InventoryStore, expected: usize) -> Result<i64, StoreError> {
    let count_all = SearchQuery::new("*").limit(0, 0);
    let mut seen = 0;
    for attempt in 0..INDEX_POLL_ATTEMPTS {
        seen = store.search(&count_all).await?.total;
        if seen >= expected as i64 {
            debug!(attempt, indexed = seen, "index ready");
            return Ok(seen);
        }
        tokio::time::sleep(INDEX_POLL_INTERVAL).await;
    }
    warn!(indexed = seen, expected, "index still incomplete, continuing");
    Ok(seen)
}

// ── Query runner ────────────────────────────────────────────────────

/// Run every predefined query in order.
pub async fn run_reads(store: &mut InventoryStore) -> Result<Vec<(&'static str, SearchResult)>, StoreError> {
    let mut results = Vec::new();
    for q in read_queries() {
        let result = store.search(&q.query).await?;
        debug!(query = q.name, total = result.total, "query done");
        results.push((q.name, result));
    }
    Ok(results)
}

// ── Mutator ─────────────────────────────────────────────────────────

/// Bump the target's quantity by 5 and rename it, as one atomic batch.
pub async fn update_1(store: &mut InventoryStore) -> Result<Vec<Value>, StoreError> {
    let key = target_key(store);
    let ops = [
        BatchOp::num_incr_by(&key, ".qty", 5),
        BatchOp::set(&key, ".item", &"spiral notebook")?,
    ];
    store.atomic_batch(&ops).await
}

/// Append the "ruled" tag.
pub async fn update_2(store: &mut InventoryStore) -> Result<Value, StoreError> {
    let key = target_key(store);
    store.json_arr_append(&key, ".tags", &"ruled").await
}

/// Remove the tags field entirely.
pub async fn update_3(store: &mut InventoryStore) -> Result<Value, StoreError> {
    let key = target_key(store);
    store.json_del(&key, ".tags").await
}

/// Overwrite the target with [`replacement_item`].
pub async fn update_4(store: &mut InventoryStore) -> Result<Value, StoreError> {
    let key = target_key(store);
    store.json_set(&key, ROOT, &replacement_item()).await
}

/// Delete the target document.
pub async fn delete(store: &mut InventoryStore) -> Result<Value, StoreError> {
    let key = target_key(store);
    store.json_del(&key, ROOT).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_queries_in_order() {
        let queries = read_queries();
        assert_eq!(queries.len(), 11);
        let names: Vec<&str> = queries.iter().map(|q| q.name).collect();
        assert_eq!(names[0], "read_1");
        assert_eq!(names[10], "read_11");
        assert_eq!(queries[0].query.query, "*");
        assert_eq!(queries[4].query.query, "(@status:E) ((@qty:[-inf (30])|(@item:pa*))");
    }

    #[test]
    fn test_only_last_query_projects_fields() {
        let queries = read_queries();
        for q in &queries[..10] {
            assert!(q.query.return_fields.is_empty(), "{} should return whole docs", q.name);
            assert!(q.query.limit.is_none());
        }
        assert_eq!(queries[10].query.return_fields, vec!["item", "status"]);
        assert_eq!(
            queries[10].query.to_args("inventoryIdx"),
            vec!["inventoryIdx", "@status:E", "RETURN", "2", "item", "status"]
        );
    }

    #[test]
    fn test_replacement_item_keeps_integers() {
        let body = serde_json::to_string(&replacement_item()).unwrap();
        assert!(body.contains(r#""dim_cm":[14,21]"#), "unexpected body: {}", body);
        assert!(body.contains(r#""h":14"#), "unexpected body: {}", body);
        assert!(!body.contains("14.0"), "unexpected body: {}", body);

        // Matches the notebook entry of the bundled dataset.
        let dataset: serde_json::Value =
            serde_json::from_str(include_str!("../../../data.json")).unwrap();
        assert_eq!(replacement_item(), dataset[TARGET_SEQ - 1]);
    }
}
