//! Catalog operations behind the HTTP handlers.

use crate::error::AppError;
use crate::query::ListQuery;
use crate::record::Record;
use crate::service::RequestValidator;
use crate::store::RecordStore;
use serde_json::Value;
use std::collections::HashMap;

pub struct CatalogService;

impl CatalogService {
    /// Filtered, sorted page of records. Malformed parameters fall back to defaults.
    pub async fn list(
        store: &RecordStore,
        params: &HashMap<String, String>,
        max_page_size: u32,
    ) -> Result<Vec<Record>, AppError> {
        let query = ListQuery::from_params(params, max_page_size);
        store.query(&query.to_sql()).await
    }

    /// Validate then insert. Invalid bodies never reach the store.
    pub async fn create(store: &RecordStore, body: Value) -> Result<Record, AppError> {
        let record = RequestValidator::validate_create(body)?;
        let stored = store.insert(&record).await?;
        tracing::info!(id = stored.id, name = %stored.name, "demon created");
        Ok(stored)
    }

    pub async fn read(store: &RecordStore, id: i64) -> Result<Record, AppError> {
        store
            .fetch(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("demon {}", id)))
    }
}
