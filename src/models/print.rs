//! Label printer settings

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Label printer configuration. Dimensions are in millimetres, font size in
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintSettings {
    pub enabled: bool,
    pub printer_name: String,
    pub paper_width: u32,
    pub paper_height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub show_logo: bool,
    pub logo_url: String,
    pub show_barcode: bool,
    pub show_price: bool,
    pub show_sku: bool,
    pub show_category: bool,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            printer_name: "EPSON TM-T20III".to_string(),
            paper_width: 80,
            paper_height: 297,
            margin_top: 5,
            margin_right: 5,
            margin_bottom: 5,
            margin_left: 5,
            show_logo: true,
            logo_url: String::new(),
            show_barcode: true,
            show_price: true,
            show_sku: false,
            show_category: true,
            font_size: 12,
            font_family: "Arial".to_string(),
        }
    }
}

impl PrintSettings {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.printer_name.trim().is_empty() {
            return Err(ApiError::validation("Printer name is required"));
        }
        if self.paper_width == 0 || self.paper_height == 0 {
            return Err(ApiError::validation("Paper size must be positive"));
        }
        if self.margin_left + self.margin_right >= self.paper_width
            || self.margin_top + self.margin_bottom >= self.paper_height
        {
            return Err(ApiError::validation("Margins exceed the paper size"));
        }
        if self.font_size == 0 {
            return Err(ApiError::validation("Font size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PrintSettings::default().validate().is_ok());
    }

    #[test]
    fn test_margins_exceeding_paper() {
        let settings = PrintSettings {
            margin_left: 40,
            margin_right: 40,
            ..PrintSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ApiError::validation("Margins exceed the paper size"))
        );
    }

    #[test]
    fn test_partial_payload_uses_defaults() {
        let settings: PrintSettings =
            serde_json::from_str(r#"{"printerName":"Zebra","showSku":true}"#).unwrap();
        assert_eq!(settings.printer_name, "Zebra");
        assert!(settings.show_sku);
        assert_eq!(settings.paper_width, 80);
    }
}
