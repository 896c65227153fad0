//! px-gallery library
//!
//! Core functionality for the px-gallery CLI: a catalog client and the
//! controller that pages photos and videos out of it.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
