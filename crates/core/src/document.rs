use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::CoreError;

/// Key of a stored document: `<prefix><seq>`.
pub fn item_key(prefix: &str, seq: usize) -> String {
    format!("{}{}", prefix, seq)
}

/// One inventory record as stored in the JSON document store.
///
/// Measurements are kept as [`Number`] so `14` is written back as `14`, not `14.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub item: String,
    pub qty: i64,
    pub tags: Vec<String>,
    /// Width and height in centimetres.
    pub dim_cm: [Number; 2],
    pub size: Size,
    /// Single-character status code (e.g. "A", "D", "E").
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub h: Number,
    pub w: Number,
    pub uom: String,
}

/// Parse a JSON array of inventory records.
pub fn parse_dataset(json: &str) -> Result<Vec<InventoryItem>, CoreError> {
    serde_json::from_str(json).map_err(|e| CoreError::Serialize(e.to_string()))
}

/// Read and parse the dataset file.
pub fn load_dataset(path: &Path) -> Result<Vec<InventoryItem>, CoreError> {
    if !path.exists() {
        return Err(CoreError::DatasetNotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    let items = parse_dataset(&raw)?;
    tracing::debug!(path = %path.display(), count = items.len(), "dataset parsed");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"item":"journal","qty":25,"tags":["blank","red"],"dim_cm":[14,21],
         "size":{"h":14,"w":21,"uom":"cm"},"status":"A"},
        {"item":"planner","qty":75,"tags":["blank","red"],"dim_cm":[22.85,30],
         "size":{"h":22.85,"w":30,"uom":"cm"},"status":"D"}
    ]"#;

    #[test]
    fn test_item_key() {
        assert_eq!(item_key("inventory:", 1), "inventory:1");
        assert_eq!(item_key("stock:", 42), "stock:42");
    }

    #[test]
    fn test_parse_dataset() {
        let items = parse_dataset(SAMPLE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item, "journal");
        assert_eq!(items[0].qty, 25);
        assert_eq!(items[0].tags, vec!["blank", "red"]);
        assert_eq!(items[1].dim_cm[0].as_f64(), Some(22.85));
        assert_eq!(items[1].dim_cm[1].as_i64(), Some(30));
        assert_eq!(items[1].size.uom, "cm");
        assert_eq!(items[1].status, "D");
    }

    #[test]
    fn test_serialized_items_equal_input() {
        let raw: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        let items = parse_dataset(SAMPLE).unwrap();
        let written = serde_json::to_value(&items).unwrap();
        assert_eq!(written, raw);
        // Whole numbers stay integers on the way back out.
        assert_eq!(serde_json::to_string(&items[0].dim_cm).unwrap(), "[14,21]");
        assert_eq!(serde_json::to_string(&items[1].size.h).unwrap(), "22.85");
    }

    #[test]
    fn test_bundled_dataset_round_trips_unchanged() {
        let text = include_str!("../../../data.json");
        let raw: serde_json::Value = serde_json::from_str(text).unwrap();
        let written = serde_json::to_value(parse_dataset(text).unwrap()).unwrap();
        assert_eq!(written, raw);
    }

    #[test]
    fn test_parse_dataset_rejects_missing_field() {
        let err = parse_dataset(r#"[{"item":"x","qty":1}]"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialize(_)));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let items = load_dataset(file.path()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(matches!(err, CoreError::DatasetNotFound(_)));
    }
}
