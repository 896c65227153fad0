//! Selector enum and factory

use crate::types::{MenuItem, SelectorType};
use super::fzf::FzfSelector;
use super::dialoguer_selector::DialoguerSelector;

/// Selector for interactive menus
pub enum Selector {
    Fzf(FzfSelector),
    Dialoguer(DialoguerSelector),
}

impl Selector {
    /// Select an item from the menu.
    ///
    /// `header` is shown above the entries (the current browse status).
    pub fn select<T: Clone>(
        &self,
        items: &[MenuItem<T>],
        prompt: &str,
        header: Option<&str>,
    ) -> Option<T> {
        match self {
            Selector::Fzf(s) => s.select(items, prompt, header),
            Selector::Dialoguer(s) => s.select(items, prompt, header),
        }
    }
}

/// Create a selector based on type, falling back to dialoguer when fzf is missing
pub fn create_selector(selector_type: SelectorType) -> Selector {
    match selector_type {
        SelectorType::Fzf if FzfSelector::is_available() => Selector::Fzf(FzfSelector),
        _ => Selector::Dialoguer(DialoguerSelector),
    }
}
