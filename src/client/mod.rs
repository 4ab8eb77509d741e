//! Client Module
//!
//! The API client every screen and workflow goes through. Public operations
//! return the `{ success, data?, error? }` envelope and never fail otherwise.

mod api_client;

pub use api_client::{ApiClient, CacheTtls};
