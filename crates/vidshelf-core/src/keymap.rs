//! Keyboard shortcuts.
//!
//! Maps `KeyboardEvent.key` values to browser actions. Any modifier disables
//! the shortcuts so browser and OS bindings keep working.

use crate::focus::FocusMove;

/// Modifier keys held during a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.alt || self.shift
    }
}

/// Action bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move(FocusMove),
    Back,
    /// Activate the focused folder or card.
    Activate,
    Reload,
}

/// Action for `key`, if any.
pub fn key_action(key: &str, modifiers: Modifiers) -> Option<KeyAction> {
    if modifiers.any() {
        return None;
    }

    match key.to_lowercase().as_str() {
        "arrowup" => Some(KeyAction::Move(FocusMove::By(-1))),
        "arrowdown" => Some(KeyAction::Move(FocusMove::By(1))),
        "home" => Some(KeyAction::Move(FocusMove::First)),
        "end" => Some(KeyAction::Move(FocusMove::Last)),
        "arrowleft" => Some(KeyAction::Back),
        "enter" | " " | "arrowright" => Some(KeyAction::Activate),
        "i" => Some(KeyAction::Reload),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys() {
        let none = Modifiers::default();
        assert_eq!(
            key_action("ArrowDown", none),
            Some(KeyAction::Move(FocusMove::By(1)))
        );
        assert_eq!(
            key_action("ArrowUp", none),
            Some(KeyAction::Move(FocusMove::By(-1)))
        );
        assert_eq!(key_action("Home", none), Some(KeyAction::Move(FocusMove::First)));
        assert_eq!(key_action("End", none), Some(KeyAction::Move(FocusMove::Last)));
        assert_eq!(key_action("ArrowLeft", none), Some(KeyAction::Back));
    }

    #[test]
    fn test_activation_and_reload() {
        let none = Modifiers::default();
        for key in ["Enter", " ", "ArrowRight"] {
            assert_eq!(key_action(key, none), Some(KeyAction::Activate));
        }
        assert_eq!(key_action("I", none), Some(KeyAction::Reload));
        assert_eq!(key_action("x", none), None);
    }

    #[test]
    fn test_modifiers_disable_shortcuts() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(key_action("ArrowDown", ctrl), None);
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(key_action("i", shift), None);
    }
}
