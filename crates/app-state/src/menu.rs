//! Main menu visibility and the platform back signal
//!
//! | State  | Event | Next   | Side effect        |
//! |--------|-------|--------|--------------------|
//! | Open   | back  | Closed | none               |
//! | Closed | back  | Closed | terminate the app  |

use serde::{Deserialize, Serialize};

/// Visibility of the main menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuState {
    /// Menu overlay shown
    Open,
    /// Menu overlay hidden
    #[default]
    Closed,
}

/// What the host must do after a back signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The menu was closed; nothing else to do
    MenuClosed,
    /// Nothing left to close; terminate the application
    ExitApp,
}

impl MenuState {
    /// Whether the menu is visible
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Show the menu
    pub fn open(&mut self) {
        *self = MenuState::Open;
    }

    /// Hide the menu
    pub fn close(&mut self) {
        *self = MenuState::Closed;
    }

    /// Flip visibility
    pub fn toggle(&mut self) {
        *self = match self {
            MenuState::Open => MenuState::Closed,
            MenuState::Closed => MenuState::Open,
        };
    }

    /// Apply the back signal
    pub fn on_back(&mut self) -> BackAction {
        match self {
            MenuState::Open => {
                *self = MenuState::Closed;
                BackAction::MenuClosed
            }
            MenuState::Closed => BackAction::ExitApp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_closes_open_menu() {
        let mut menu = MenuState::Open;
        assert_eq!(menu.on_back(), BackAction::MenuClosed);
        assert_eq!(menu, MenuState::Closed);
    }

    #[test]
    fn test_back_on_closed_menu_exits() {
        let mut menu = MenuState::Closed;
        assert_eq!(menu.on_back(), BackAction::ExitApp);
        assert_eq!(menu, MenuState::Closed);
    }

    #[test]
    fn test_toggle() {
        let mut menu = MenuState::default();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.is_open());
        menu.toggle();
        assert!(!menu.is_open());

        menu.open();
        menu.close();
        assert_eq!(menu, MenuState::Closed);
    }
}
