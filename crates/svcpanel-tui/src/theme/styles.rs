//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use svcpanel_core::{PrivilegeLevel, ServiceState, Severity};

use super::palette;

pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Containers ---

/// Rounded bordered block used by every panel
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            palette::BORDER_ACTIVE
        } else {
            palette::BORDER_DIM
        }))
}

pub fn modal_block(title: &str) -> Block<'_> {
    glass_block(true)
        .title(title)
        .title_style(accent_bold())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Domain styles ---

pub fn severity(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::default().fg(palette::LOG_ERROR),
        Severity::Warning => Style::default().fg(palette::LOG_WARNING),
        Severity::Info => Style::default().fg(palette::LOG_INFO),
    }
}

/// Status dot and its style for a service state
pub fn service_state_indicator(state: ServiceState) -> (&'static str, Style) {
    match state {
        ServiceState::Running => ("●", Style::default().fg(palette::STATUS_GREEN)),
        ServiceState::StartPending | ServiceState::StopPending => {
            ("◐", Style::default().fg(palette::STATUS_YELLOW))
        }
        ServiceState::Stopped => ("○", Style::default().fg(palette::STATUS_RED)),
        ServiceState::NotInstalled | ServiceState::Other => ("○", text_muted()),
    }
}

pub fn privilege(level: PrivilegeLevel) -> Style {
    match level {
        PrivilegeLevel::Elevated => Style::default()
            .fg(palette::STATUS_YELLOW)
            .add_modifier(Modifier::BOLD),
        PrivilegeLevel::Standard => text_secondary(),
    }
}

/// Control button: accent when enabled, dimmed when not
pub fn button(enabled: bool) -> Style {
    if enabled {
        accent_bold()
    } else {
        text_muted().add_modifier(Modifier::DIM)
    }
}
