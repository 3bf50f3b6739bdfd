//! Demon catalog: list/filter/sort/paginate and create over a single SQLite table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod rate_limit;
pub mod record;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{from_env, ServerConfig};
pub use error::{AppError, ConfigError, SeedError};
pub use query::ListQuery;
pub use record::{Alignment, NewRecord, Record};
pub use routes::{app_router, common_routes, demon_routes};
pub use seed::{load_dir, SeedReport};
pub use service::CatalogService;
pub use state::AppState;
pub use store::RecordStore;
