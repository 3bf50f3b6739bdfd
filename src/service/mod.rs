//! CatalogService: list/create/read over the record store.

mod catalog;
mod validation;
pub use catalog::CatalogService;
pub use validation::{create_rules, Format, RequestValidator, ValidationRule};
