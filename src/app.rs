//! Composition root
//!
//! Wires configuration, data sources, the API client and the store together,
//! and owns the status poller for as long as the app is mounted.

use tokio::task::JoinHandle;
use tracing::info;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::store::AppStore;
use crate::tasks::spawn_status_poller;

/// A mounted application: the store plus its background poller.
#[derive(Debug)]
pub struct App {
    store: AppStore,
    poller: Option<JoinHandle<()>>,
}

impl App {
    /// Builds everything from `config`, loads the scan list and status, and
    /// starts polling.
    pub async fn mount(config: &Config) -> Result<Self> {
        let client = ApiClient::from_config(config)?;
        Ok(Self::mount_with(client, config.status_poll_interval_secs).await)
    }

    /// Mounts over an already configured client.
    pub async fn mount_with(client: ApiClient, poll_interval_secs: u64) -> Self {
        info!("Mounting app over {} data source", client.source_name());
        let store = AppStore::new(client);

        let scope = store.scope();
        store.fetch_recent_logs(&scope).await;
        store.check_square_status(&scope, false).await;

        let poller = spawn_status_poller(store.clone(), poll_interval_secs);
        Self {
            store,
            poller: Some(poller),
        }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Stops the poller and cancels every outstanding scope.
    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
            info!("Status poller aborted");
        }
        self.store.shutdown();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}
