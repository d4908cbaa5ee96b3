//! Terminal-independent key events.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! the handler never depends on the terminal library.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Plain character (letters, digits, symbols)
    Char(char),
    /// Character with Ctrl held
    CharCtrl(char),

    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
}
