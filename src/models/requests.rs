//! Request DTOs for the backend API
//!
//! Bodies and query strings the client sends and the dev backend accepts.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Maximum page size for audit log queries
pub const MAX_AUDIT_PAGE_SIZE: u32 = 500;

/// Request body for POST /categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

impl CategoryRequest {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    /// Returns the trimmed category name, or a validation error if empty.
    pub fn validated(&self) -> Result<&str> {
        validate_category(&self.category)
    }
}

pub fn validate_category(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Category name is required"));
    }
    Ok(name)
}

/// Query string for GET /audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl AuditQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(ApiError::validation("Page must be at least 1"));
        }
        if self.limit == 0 || self.limit > MAX_AUDIT_PAGE_SIZE {
            return Err(ApiError::validation(format!(
                "Limit must be between 1 and {}",
                MAX_AUDIT_PAGE_SIZE
            )));
        }
        Ok(())
    }

    /// Number of entries to skip.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }
}

/// Query string for GET /items/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn validate_search(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::validation("Search query is required"));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_request_validated() {
        assert_eq!(CategoryRequest::new("  Drinks ").validated(), Ok("Drinks"));
        assert!(CategoryRequest::new("   ").validated().is_err());
    }

    #[test]
    fn test_audit_query_defaults() {
        let query: AuditQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, AuditQuery::new(1, 50));
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_audit_query_validate() {
        assert!(AuditQuery::new(0, 10).validate().is_err());
        assert!(AuditQuery::new(1, 0).validate().is_err());
        assert!(AuditQuery::new(1, MAX_AUDIT_PAGE_SIZE + 1).validate().is_err());
        assert!(AuditQuery::new(3, 20).validate().is_ok());
        assert_eq!(AuditQuery::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_validate_search() {
        assert_eq!(validate_search(" soda "), Ok("soda"));
        assert!(validate_search("").is_err());
    }
}
