//! Shared helpers

pub mod paths;
