//! Application State Store
//!
//! Owns [`AppState`] and runs the user-facing workflows on top of the API
//! client. Every change is published through a watch channel. API failures
//! become toasts; validation failures are handed back to the caller.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{AppState, Phase, Scope, Toast};
use crate::client::ApiClient;
use crate::models::{merge_scan_entry, ApiResponse, Item, ScanLogItem, SquareStatus};

/// How a workflow ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The result was applied to state
    Applied(T),
    /// The request failed; the error was shown as a toast
    Failed(String),
    /// Invalid input; nothing was sent and state is unchanged
    Rejected(String),
    /// The scope was cancelled; the result was dropped
    Discarded,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

// == App Store ==
/// Handle to the shared state. Clones refer to the same store.
#[derive(Debug, Clone)]
pub struct AppStore {
    client: ApiClient,
    state: Arc<watch::Sender<AppState>>,
    root: Scope,
}

impl AppStore {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            client,
            state: Arc::new(state),
            root: Scope::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // == Subscriptions ==

    /// Receiver that observes every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    fn update(&self, change: impl FnOnce(&mut AppState)) {
        self.state.send_modify(change);
    }

    // == Scopes ==

    /// New scope for a screen. Cancelled by [`AppStore::shutdown`].
    pub fn scope(&self) -> Scope {
        self.root.child()
    }

    /// Cancels every scope handed out by this store.
    pub fn shutdown(&self) {
        info!("Store shutting down, cancelling all scopes");
        self.root.cancel();
    }

    // == Scan / Search ==

    /// Looks up a scanned barcode and opens the result in the editor.
    ///
    /// A barcode the backend does not know opens a new draft for it.
    pub async fn search_barcode(&self, scope: &Scope, barcode: &str) -> Outcome<Item> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Outcome::Rejected("Barcode is required".to_string());
        }
        if scope.is_cancelled() {
            return Outcome::Discarded;
        }

        self.update(|s| s.phase = Phase::Loading);
        let Some(resp) = scope.run(self.client.get_item_by_barcode(barcode)).await else {
            self.finish_discarded();
            return Outcome::Discarded;
        };

        if resp.is_not_found() {
            let draft = Item::draft(barcode);
            debug!("Barcode {} not found, opening draft", barcode);
            self.update(|s| {
                s.selected_item = Some(draft.clone());
                s.toast = Some(Toast::info("Item not found. Creating a new item."));
                s.phase = Phase::Idle;
            });
            return Outcome::Applied(draft);
        }
        self.apply_found(resp)
    }

    /// Opens an item picked from the scan list.
    pub async fn handle_item_found(&self, scope: &Scope, id: &str) -> Outcome<Item> {
        let id = id.trim();
        if id.is_empty() {
            return Outcome::Rejected("Item ID is required".to_string());
        }
        if scope.is_cancelled() {
            return Outcome::Discarded;
        }

        self.update(|s| s.phase = Phase::Loading);
        match scope.run(self.client.get_item_by_id(id)).await {
            Some(resp) => self.apply_found(resp),
            None => {
                self.finish_discarded();
                Outcome::Discarded
            }
        }
    }

    fn apply_found(&self, resp: ApiResponse<Item>) -> Outcome<Item> {
        match resp.into_result() {
            Ok(item) => {
                let message = format!("Found item: {}", item.name);
                self.update(|s| {
                    s.selected_item = Some(item.clone());
                    s.toast = Some(Toast::success(message));
                    s.phase = Phase::Idle;
                });
                Outcome::Applied(item)
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    // == Editing ==

    /// Applies a form edit to the selected item, if any.
    pub fn edit_selected(&self, edit: impl FnOnce(&mut Item)) {
        self.update(|s| {
            if let Some(item) = s.selected_item.as_mut() {
                edit(item);
            }
        });
    }

    /// Closes the editor.
    pub fn handle_cancel(&self) {
        self.update(|s| s.selected_item = None);
    }

    // == Save ==

    /// Persists `item` and folds it into the scan list.
    ///
    /// The request always runs to completion; if `scope` is cancelled
    /// meanwhile the result is not applied.
    pub async fn save_item(&self, scope: &Scope, item: Item) -> Outcome<Item> {
        if let Err(err) = item.validate() {
            return Outcome::Rejected(err.to_string());
        }

        let creating = item.is_new();
        self.update(|s| s.phase = Phase::Saving);
        let resp = self.client.save_item(&item).await;

        if scope.is_cancelled() {
            debug!("Save of {} finished after its scope was cancelled", item.name);
            self.finish_discarded();
            return Outcome::Discarded;
        }

        let saved = match resp.into_result() {
            Ok(saved) => saved,
            Err(err) => return self.fail(err.to_string()),
        };

        let message = if creating {
            "Item created successfully"
        } else {
            "Item updated successfully"
        };
        let entry = ScanLogItem::from_item(&saved, Utc::now());
        self.update(|s| {
            s.selected_item = None;
            merge_scan_entry(&mut s.scanned_items, entry);
            s.toast = Some(Toast::success(message));
            s.phase = Phase::Idle;
        });

        let store = self.clone();
        let scope = scope.clone();
        tokio::spawn(async move { store.refresh_logs_quietly(&scope).await });

        Outcome::Applied(saved)
    }

    // == Recent Logs ==

    /// Replaces the scan list with the backend's recent logs.
    pub async fn fetch_recent_logs(&self, scope: &Scope) -> Outcome<Vec<ScanLogItem>> {
        if scope.is_cancelled() {
            return Outcome::Discarded;
        }

        self.update(|s| s.phase = Phase::Loading);
        let Some(resp) = scope.run(self.client.get_recent_logs()).await else {
            self.finish_discarded();
            return Outcome::Discarded;
        };

        match resp.into_result() {
            Ok(logs) => {
                self.update(|s| {
                    s.scanned_items = logs.clone();
                    s.phase = Phase::Idle;
                });
                Outcome::Applied(logs)
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    /// Background reconciliation after a save: no phase change, no toast.
    async fn refresh_logs_quietly(&self, scope: &Scope) {
        match scope.run(self.client.get_recent_logs()).await {
            Some(resp) => match resp.into_result() {
                Ok(logs) => self.update(|s| s.scanned_items = logs),
                Err(err) => warn!("Background log refresh failed: {}", err),
            },
            None => debug!("Background log refresh cancelled"),
        }
    }

    // == Square Status ==

    /// Refreshes the connection status. Runs independently of the phase and
    /// does not toast; a failure is recorded as a disconnected status.
    pub async fn check_square_status(
        &self,
        scope: &Scope,
        force_refresh: bool,
    ) -> Outcome<SquareStatus> {
        if scope.is_cancelled() {
            return Outcome::Discarded;
        }

        self.update(|s| s.is_checking_square = true);
        let Some(resp) = scope.run(self.client.get_square_status(force_refresh)).await else {
            self.update(|s| s.is_checking_square = false);
            return Outcome::Discarded;
        };

        let message = match resp.into_result() {
            Ok(status) => {
                self.update(|s| {
                    s.square_status = status.clone();
                    s.is_checking_square = false;
                });
                return Outcome::Applied(status);
            }
            Err(err) => err.to_string(),
        };
        warn!("Square status check failed: {}", message);
        self.update(|s| {
            s.square_status = SquareStatus::disconnected(message.clone());
            s.is_checking_square = false;
        });
        Outcome::Failed(message)
    }

    // == Misc ==

    pub fn clear_toast(&self) {
        self.update(|s| s.toast = None);
    }

    pub fn clear_scan_log(&self) {
        self.update(|s| s.scanned_items.clear());
    }

    pub fn set_square_access_token(&self, token: Option<String>) {
        self.update(|s| s.square_access_token = token);
    }

    fn fail<T>(&self, message: String) -> Outcome<T> {
        warn!("Request failed: {}", message);
        self.update(|s| {
            s.toast = Some(Toast::error(message.clone()));
            s.phase = Phase::Idle;
        });
        Outcome::Failed(message)
    }

    fn finish_discarded(&self) {
        self.update(|s| s.phase = Phase::Idle);
    }
}
