//! Domain models and wire DTOs
//!
//! Types exchanged with the REST backend, serialized as camelCase JSON.

pub mod audit;
pub mod envelope;
pub mod item;
pub mod print;
pub mod requests;
pub mod scan_log;
pub mod status;

// Re-export commonly used types
pub use audit::{audit_csv, AuditAction, AuditEntry};
pub use envelope::ApiResponse;
pub use item::{Item, NEW_ITEM_ID};
pub use print::PrintSettings;
pub use requests::{AuditQuery, CategoryRequest, SearchQuery};
pub use scan_log::{merge_scan_entry, ScanLogItem};
pub use status::SquareStatus;
