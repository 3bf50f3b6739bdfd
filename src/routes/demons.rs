//! Demon routes: list and create on the collection, read by id.

use crate::handlers::demons::{create, list, read};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn demon_routes(state: AppState) -> Router {
    Router::new()
        .route("/demons", get(list).post(create))
        .route("/demons/:id", get(read))
        .with_state(state)
}
