//! Scan log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Item;

/// Lightweight record of a scan event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLogItem {
    pub id: String,
    pub barcode: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
}

impl ScanLogItem {
    /// Log row for an item; `now` stands in for a missing timestamp.
    pub fn from_item(item: &Item, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id.clone(),
            barcode: item.display_barcode().to_string(),
            timestamp: item.timestamp.unwrap_or(now),
            item_name: Some(item.name.clone()),
        }
    }
}

/// Puts `entry` into `list`: replaces the row with the same id in place, or
/// prepends it when there is none.
pub fn merge_scan_entry(list: &mut Vec<ScanLogItem>, entry: ScanLogItem) {
    match list.iter_mut().find(|existing| existing.id == entry.id) {
        Some(existing) => *existing = entry,
        None => list.insert(0, entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> ScanLogItem {
        ScanLogItem {
            id: id.to_string(),
            barcode: format!("bc-{}", id),
            timestamp: Utc::now(),
            item_name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_from_item_uses_gtin_when_no_barcode() {
        let item = Item {
            id: "1".to_string(),
            name: "Soda".to_string(),
            gtin: Some("0123".to_string()),
            ..Item::default()
        };
        let now = Utc::now();
        let log = ScanLogItem::from_item(&item, now);

        assert_eq!(log.barcode, "0123");
        assert_eq!(log.timestamp, now);
        assert_eq!(log.item_name.as_deref(), Some("Soda"));
    }

    #[test]
    fn test_merge_replaces_by_id() {
        let mut list = vec![entry("1", "a"), entry("2", "b")];
        merge_scan_entry(&mut list, entry("2", "b2"));

        assert_eq!(list.len(), 2);
        assert_eq!(list[1].item_name.as_deref(), Some("b2"));
    }

    #[test]
    fn test_merge_prepends_new() {
        let mut list = vec![entry("1", "a")];
        merge_scan_entry(&mut list, entry("3", "c"));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "3");
    }

    #[test]
    fn test_wire_format() {
        let json =
            r#"{"id":"1","barcode":"123","timestamp":"2024-05-01T10:00:00Z","itemName":"Chips"}"#;
        let log: ScanLogItem = serde_json::from_str(json).unwrap();
        assert_eq!(log.item_name.as_deref(), Some("Chips"));
    }
}
