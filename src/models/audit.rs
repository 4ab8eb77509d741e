//! Audit log entries and CSV export

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Item Created")]
    ItemCreated,
    #[serde(rename = "Item Updated")]
    ItemUpdated,
    #[serde(rename = "Item Deleted")]
    ItemDeleted,
    #[serde(rename = "Category Created")]
    CategoryCreated,
    #[serde(rename = "Category Updated")]
    CategoryUpdated,
    #[serde(rename = "Category Deleted")]
    CategoryDeleted,
    #[serde(rename = "User Login")]
    UserLogin,
    #[serde(rename = "Settings Changed")]
    SettingsChanged,
    #[serde(rename = "Label Printed")]
    LabelPrinted,
    #[serde(other)]
    Other,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ItemCreated => "Item Created",
            AuditAction::ItemUpdated => "Item Updated",
            AuditAction::ItemDeleted => "Item Deleted",
            AuditAction::CategoryCreated => "Category Created",
            AuditAction::CategoryUpdated => "Category Updated",
            AuditAction::CategoryDeleted => "Category Deleted",
            AuditAction::UserLogin => "User Login",
            AuditAction::SettingsChanged => "Settings Changed",
            AuditAction::LabelPrinted => "Label Printed",
            AuditAction::Other => "Other",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub action: AuditAction,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
}

const CSV_HEADER: &str = "id,action,user,timestamp,details,itemId,itemName";

/// Renders entries as CSV with a header row.
pub fn audit_csv(entries: &[AuditEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339();
        let fields = [
            entry.id.as_str(),
            entry.action.as_str(),
            entry.user.as_str(),
            timestamp.as_str(),
            entry.details.as_str(),
            entry.item_id.as_deref().unwrap_or(""),
            entry.item_name.as_deref().unwrap_or(""),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
