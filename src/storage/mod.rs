//! Storage modules: user configuration

pub mod config;
