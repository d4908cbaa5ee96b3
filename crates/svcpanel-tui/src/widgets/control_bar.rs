//! Control bar: start, stop, configure and elevate buttons

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use svcpanel_core::ControlEnablement;

use crate::theme::{palette, styles};

pub struct ControlBar {
    enablement: ControlEnablement,
}

impl ControlBar {
    pub fn new(enablement: ControlEnablement) -> Self {
        Self { enablement }
    }

    fn buttons(&self) -> [(&'static str, &'static str, bool); 4] {
        let e = self.enablement;
        [
            ("s", "Start", e.start),
            ("x", "Stop", e.stop),
            ("g", "Configure", e.configure),
            ("e", "Elevate", e.elevate),
        ]
    }
}

impl Widget for ControlBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        for (key, label, enabled) in self.buttons() {
            let style = styles::button(enabled);
            spans.push(Span::styled(format!("[{key}] {label}"), style));
            spans.push(Span::raw("   "));
        }
        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);

        let quit = Line::from(vec![
            Span::styled("[q]", styles::accent()),
            Span::styled(" Quit ", styles::text_muted()),
        ]);
        let quit_width = quit.width() as u16;
        if quit_width < inner.width {
            buf.set_line(inner.x + inner.width - quit_width, inner.y, &quit, quit_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_text, render_widget};
    use ratatui::buffer::Buffer;
    use svcpanel_core::{PrivilegeLevel, ServiceState};

    fn cell_fg_of(buf: &Buffer, needle: &str) -> ratatui::style::Color {
        let text = buffer_text(buf);
        let row = text.lines().nth(1).unwrap();
        let byte = row.find(needle).unwrap();
        // The border glyph is multi-byte, so count cells not bytes
        let col = row[..byte].chars().count();
        buf[(col as u16, 1)].fg
    }

    #[test]
    fn test_all_buttons_rendered() {
        let enablement = ControlEnablement::compute(ServiceState::Stopped, PrivilegeLevel::Standard);
        let text = buffer_text(&render_widget(ControlBar::new(enablement), 90, 3));
        for label in ["[s] Start", "[x] Stop", "[g] Configure", "[e] Elevate", "[q] Quit"] {
            assert!(text.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_disabled_buttons_are_muted() {
        // Stopped + standard: only elevate is enabled
        let enablement = ControlEnablement::compute(ServiceState::Stopped, PrivilegeLevel::Standard);
        let buf = render_widget(ControlBar::new(enablement), 90, 3);

        assert_eq!(cell_fg_of(&buf, "[s] Start"), palette::TEXT_MUTED);
        assert_eq!(cell_fg_of(&buf, "[e] Elevate"), palette::ACCENT);
    }

    #[test]
    fn test_running_elevated_enables_stop_and_configure() {
        let enablement = ControlEnablement::compute(ServiceState::Running, PrivilegeLevel::Elevated);
        let buf = render_widget(ControlBar::new(enablement), 90, 3);

        assert_eq!(cell_fg_of(&buf, "[x] Stop"), palette::ACCENT);
        assert_eq!(cell_fg_of(&buf, "[g] Configure"), palette::ACCENT);
        assert_eq!(cell_fg_of(&buf, "[s] Start"), palette::TEXT_MUTED);
        assert_eq!(cell_fg_of(&buf, "[e] Elevate"), palette::TEXT_MUTED);
    }
}
