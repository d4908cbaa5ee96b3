//! Key event handlers for different UI modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match state.ui_mode {
        UiMode::Normal => handle_key_normal(key),
        UiMode::InstallPrompt => handle_key_install_prompt(key),
        UiMode::Configure => handle_key_configure(key),
    }
}

/// Log view and control bar.
///
/// Control keys are mapped unconditionally; the update function re-checks
/// enablement so a disabled control ignores its key.
fn handle_key_normal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::Esc | InputKey::CharCtrl('c') => Some(Message::Quit),

        // Time filter presets
        InputKey::Char('c') => Some(Message::ClearLog),
        InputKey::Char('a') => Some(Message::ShowAllLog),
        InputKey::Char('d') => Some(Message::BackOneDay),
        InputKey::Char('h') => Some(Message::BackOneHour),

        // Controls
        InputKey::Char('s') => Some(Message::StartService),
        InputKey::Char('x') => Some(Message::StopService),
        InputKey::Char('g') => Some(Message::OpenConfigure),
        InputKey::Char('e') => Some(Message::Elevate),

        // Scrolling
        InputKey::Up | InputKey::Char('k') => Some(Message::ScrollUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ScrollDown),
        InputKey::PageUp => Some(Message::PageUp),
        InputKey::PageDown => Some(Message::PageDown),
        InputKey::Home => Some(Message::ScrollToTop),
        InputKey::End | InputKey::Char('G') => Some(Message::ScrollToBottom),

        _ => None,
    }
}

fn handle_key_install_prompt(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y' | 'Y') | InputKey::Enter => Some(Message::ConfirmInstall),
        InputKey::Char('n' | 'N') | InputKey::Esc => Some(Message::DismissInstall),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_configure(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Enter | InputKey::Char('q' | 'g') => {
            Some(Message::CloseConfigure)
        }
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}
