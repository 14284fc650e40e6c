use snip_core::Store;
use std::sync::Arc;

/// Shared handler state: the URL store and the public base URL that short
/// codes are appended to.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    base_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: public_base_url.into(),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
