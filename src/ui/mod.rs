//! Terminal presentation: menus and snapshot rendering

pub mod dialoguer_selector;
pub mod fzf;
pub mod render;
pub mod selector;
