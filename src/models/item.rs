//! Item model
//!
//! A catalog entry as exchanged with the backend (camelCase JSON), plus the
//! normalization applied to partial backend payloads and the validation run
//! before any create or update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Id the UI uses for an item that has not been saved yet.
pub const NEW_ITEM_ID: &str = "new";

/// Name given to backend items that arrive without one.
pub const UNNAMED_ITEM: &str = "Unnamed Item";

// == Item ==
/// A catalog entry.
///
/// Missing fields deserialize to their defaults: flags false, except
/// `sellable` and `stockable` which default to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    /// Backend id; empty or `"new"` for an unsaved draft
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub tax: bool,
    pub tax_redondo: bool,
    pub tax_torrance: bool,
    pub crv: bool,
    pub crv5: bool,
    pub crv10: bool,
    pub track_inventory: bool,
    pub sellable: bool,
    pub stockable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            sku: None,
            gtin: None,
            barcode: None,
            category: None,
            price: None,
            location_price: None,
            quantity: None,
            tax: false,
            tax_redondo: false,
            tax_torrance: false,
            crv: false,
            crv5: false,
            crv10: false,
            track_inventory: false,
            sellable: true,
            stockable: true,
            timestamp: None,
        }
    }
}

impl Item {
    /// Unsaved draft for a barcode that matched nothing.
    pub fn draft(barcode: &str) -> Self {
        Self {
            gtin: Some(barcode.to_string()),
            barcode: Some(barcode.to_string()),
            ..Self::default()
        }
    }

    /// True for drafts the backend has not assigned an id to yet.
    pub fn is_new(&self) -> bool {
        self.id.is_empty() || self.id == NEW_ITEM_ID
    }

    /// True if `code` equals this item's barcode or GTIN.
    pub fn matches_barcode(&self, code: &str) -> bool {
        self.barcode.as_deref() == Some(code) || self.gtin.as_deref() == Some(code)
    }

    /// Barcode shown in scan logs: barcode, then GTIN, then empty.
    pub fn display_barcode(&self) -> &str {
        self.barcode
            .as_deref()
            .filter(|b| !b.is_empty())
            .or(self.gtin.as_deref())
            .unwrap_or("")
    }

    // == Validation ==
    /// Checks the invariants that must hold before persisting.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("Item name is required"));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(ApiError::validation("Price must be a non-negative number"));
            }
        }
        if let Some(price) = self.location_price {
            if !price.is_finite() || price < 0.0 {
                return Err(ApiError::validation(
                    "Location price must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    // == Normalization ==
    /// Fills fields a partial backend payload left out.
    pub fn normalized(mut self, now: DateTime<Utc>) -> Self {
        if self.name.trim().is_empty() {
            self.name = UNNAMED_ITEM.to_string();
        }
        if self.barcode.as_deref().map_or(true, str::is_empty) {
            self.barcode = self.gtin.clone().filter(|g| !g.is_empty());
        }
        self.sku.get_or_insert_with(String::new);
        self.timestamp.get_or_insert(now);
        self
    }

    /// Normalization for a barcode lookup: the scanned code becomes the
    /// barcode, and the GTIN when the backend sent none.
    pub fn normalized_for_barcode(mut self, scanned: &str, now: DateTime<Utc>) -> Self {
        if self.gtin.as_deref().map_or(true, str::is_empty) {
            self.gtin = Some(scanned.to_string());
        }
        self.barcode = Some(scanned.to_string());
        self.normalized(now)
    }

    /// Merges a backend create/update reply into the submitted item: the
    /// backend id (when sent) and timestamp win; everything else is kept
    /// from the submission.
    pub fn confirmed_by(mut self, reply: &Item, now: DateTime<Utc>) -> Self {
        if !reply.id.is_empty() {
            self.id = reply.id.clone();
        }
        self.timestamp = Some(reply.timestamp.unwrap_or(now));
        self
    }

    /// Content equality ignoring the modification timestamp.
    pub fn same_content(&self, other: &Item) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.timestamp = None;
        b.timestamp = None;
        a == b
    }

    // == Display ==
    /// CRV label, most specific tier first: CRV5, then CRV10, then generic.
    pub fn crv_label(&self) -> &'static str {
        if self.crv5 {
            "+CRV (CRV5)"
        } else if self.crv10 {
            "+CRV (CRV10)"
        } else if self.crv {
            "+CRV"
        } else {
            "No CRV"
        }
    }

    /// Tax label with the taxing locations, e.g. `+TAX (RB, TOR)`.
    pub fn tax_label(&self) -> String {
        if !self.tax {
            return "No Tax".to_string();
        }
        let locations: Vec<&str> = [(self.tax_redondo, "RB"), (self.tax_torrance, "TOR")]
            .into_iter()
            .filter_map(|(on, code)| on.then_some(code))
            .collect();

        if locations.is_empty() {
            "+TAX".to_string()
        } else {
            format!("+TAX ({})", locations.join(", "))
        }
    }
}
