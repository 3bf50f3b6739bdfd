//! Shared application state for all routes.

use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Upper bound applied to `pageSize` on list requests.
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(store: RecordStore, max_page_size: u32) -> Self {
        AppState { store, max_page_size }
    }
}
