use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{RestStore, Store, StoreError};

/// Per-process dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub bearer_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, bearer_token: Option<String>) -> Self {
        Self {
            store,
            bearer_token: bearer_token.map(Arc::from),
        }
    }

    /// Open the hosted store described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store = RestStore::new(&config.store)?;
        Ok(Self::new(Arc::new(store), config.auth.bearer_token.clone()))
    }
}
