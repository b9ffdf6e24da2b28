//! Key bindings.
//!
//! Every user intent is an [`Action`]; the event loop only translates keys
//! through [`action_for`] and hands the result to the app. Tests dispatch
//! actions directly.

use super::app::{LoginField, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    // Login screen
    NextField,
    PreviousField,
    Input(char),
    Backspace,
    SubmitLogin,
    // Workspace screen
    Compile,
    EditSource,
    ToggleTheme,
    NextTab,
}

/// Translate a key press on `screen` into an action.
///
/// `focus` is the focused login control and only matters on the login screen.
pub fn action_for(screen: Screen, focus: LoginField, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') if screen == Screen::Workspace => Some(Action::Compile),
            _ => None,
        };
    }

    match screen {
        Screen::Login => login_action(focus, key.code),
        Screen::Workspace => workspace_action(key.code),
    }
}

fn login_action(focus: LoginField, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PreviousField),
        // Enter submits from either field and from the button.
        KeyCode::Enter => Some(Action::SubmitLogin),
        KeyCode::Backspace if focus != LoginField::Button => Some(Action::Backspace),
        KeyCode::Char(' ') if focus == LoginField::Button => Some(Action::SubmitLogin),
        KeyCode::Char(c) if focus != LoginField::Button => Some(Action::Input(c)),
        _ => None,
    }
}

fn workspace_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::F(5) => Some(Action::Compile),
        KeyCode::Char('e') => Some(Action::EditSource),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
