//! HTTP handlers for the demon catalog.

pub mod demons;
pub use demons::*;
