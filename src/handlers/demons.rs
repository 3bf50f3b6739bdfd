//! Demon handlers: list, create, read.

use crate::error::AppError;
use crate::response::{created, ok};
use crate::service::CatalogService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// `GET /demons?filter=&sort=&page=&pageSize=`. Never rejects on query parameters.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, axum::extract::rejection::QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let rows = CatalogService::list(&state.store, &params, state.max_page_size).await?;
    Ok(ok(rows))
}

/// `POST /demons`. Malformed or mistyped JSON is 400, duplicate names 409. Other body
/// rejections keep their own status (413 over the size limit, 415 without a JSON content type).
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.map_err(|e| match e {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => AppError::BadRequest(e.body_text()),
        other => AppError::Body(other),
    })?;
    let row = CatalogService::create(&state.store, body).await?;
    Ok(created(row))
}

/// `GET /demons/:id`.
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id: i64 = id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))?;
    let row = CatalogService::read(&state.store, id).await?;
    Ok(ok(row))
}
