//! Key-to-action mapping for the booking manager.
//!
//! Kept free of terminal state so the bindings can be tested directly.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NextTab,
    PreviousTab,
    ToggleMode,
    ClearNotice,
    Submit,
    InsertChar(char),
    DeleteChar,
    ClearInput,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToEnd,
}

const PAGE: u16 = 10;

pub fn action_for(key: &KeyEvent) -> Option<KeyAction> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    let action = match key.code {
        KeyCode::Char('c') if control => KeyAction::Quit,
        KeyCode::Char('t') if control => KeyAction::ToggleMode,
        KeyCode::Char('l') if control => KeyAction::ClearNotice,
        KeyCode::Char(_) if control || key.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) => KeyAction::InsertChar(c),
        KeyCode::Tab => KeyAction::NextTab,
        KeyCode::BackTab => KeyAction::PreviousTab,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::DeleteChar,
        KeyCode::Esc => KeyAction::ClearInput,
        KeyCode::Up => KeyAction::ScrollUp(1),
        KeyCode::Down => KeyAction::ScrollDown(1),
        KeyCode::PageUp => KeyAction::ScrollUp(PAGE),
        KeyCode::PageDown => KeyAction::ScrollDown(PAGE),
        KeyCode::End => KeyAction::ScrollToEnd,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn control_chords_map_to_commands() {
        assert_eq!(action_for(&ctrl('c')), Some(KeyAction::Quit));
        assert_eq!(action_for(&ctrl('t')), Some(KeyAction::ToggleMode));
        assert_eq!(action_for(&ctrl('l')), Some(KeyAction::ClearNotice));
        assert_eq!(action_for(&ctrl('x')), None);
    }

    #[test]
    fn plain_and_shifted_characters_are_typed() {
        assert_eq!(
            action_for(&key(KeyCode::Char('a'))),
            Some(KeyAction::InsertChar('a'))
        );
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(action_for(&shifted), Some(KeyAction::InsertChar('A')));
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(action_for(&key(KeyCode::Tab)), Some(KeyAction::NextTab));
        assert_eq!(
            action_for(&key(KeyCode::BackTab)),
            Some(KeyAction::PreviousTab)
        );
        assert_eq!(
            action_for(&key(KeyCode::PageUp)),
            Some(KeyAction::ScrollUp(PAGE))
        );
        assert_eq!(action_for(&key(KeyCode::F(1))), None);
    }
}
