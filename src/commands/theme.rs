//! Theme command handler.

use crate::error::Result;
use crate::output::{BOLD, CYAN, RESET};
use crate::theme::{PreferenceFile, PreferenceStorage, ThemePreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeAction {
    #[default]
    Show,
    Toggle,
}

/// Show or toggle the persisted theme preference.
pub fn theme_command(action: ThemeAction) -> Result<()> {
    let store = ThemePreferenceStore::load(PreferenceFile::default_location()?);
    println!("{}", apply(store, action)?);
    Ok(())
}

fn apply<S: PreferenceStorage>(mut store: ThemePreferenceStore<S>, action: ThemeAction) -> Result<String> {
    Ok(match action {
        ThemeAction::Show => format!("{BOLD}Theme:{RESET} {CYAN}{}{RESET}", store.current()),
        ThemeAction::Toggle => {
            let previous = store.current();
            let current = store.toggle()?;
            format!("{BOLD}Theme:{RESET} {} \u{2192} {CYAN}{}{RESET}", previous, current)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MemoryStorage;

    #[test]
    fn test_show_reports_current_theme() {
        let store = ThemePreferenceStore::load(MemoryStorage::default());
        assert!(apply(store, ThemeAction::Show).unwrap().contains("light"));
    }

    #[test]
    fn test_toggle_reports_transition() {
        let store = ThemePreferenceStore::load(MemoryStorage::default());
        let line = apply(store, ThemeAction::Toggle).unwrap();
        assert!(line.contains("light"));
        assert!(line.contains("dark"));
    }
}
