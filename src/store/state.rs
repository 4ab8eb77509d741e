//! UI-visible application state

use crate::models::{Item, ScanLogItem, SquareStatus};

/// What the store is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
        }
    }
}

/// Snapshot published to subscribers on every change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Recent scans, newest first
    pub scanned_items: Vec<ScanLogItem>,
    /// Item open in the editor
    pub selected_item: Option<Item>,
    pub phase: Phase,
    pub square_status: SquareStatus,
    pub is_checking_square: bool,
    pub toast: Option<Toast>,
    pub square_access_token: Option<String>,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_saving(&self) -> bool {
        self.phase == Phase::Saving
    }
}
