//! Catalog access and the content controller

pub mod catalog;
pub mod controller;

pub use catalog::{CatalogClient, CatalogResult, HttpCatalog};
pub use controller::{ContentController, FetchOutcome, LoadMore, SkipReason};
