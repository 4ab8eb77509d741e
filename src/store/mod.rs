//! Store Module
//!
//! Application state, the workflows that change it, and the cancellation
//! scopes those workflows run under.

mod app_store;
mod scope;
mod state;

pub use app_store::{AppStore, Outcome};
pub use scope::Scope;
pub use state::{AppState, Phase, Toast, ToastKind};
