//! Header: service name, status text and privilege level

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use svcpanel_core::{PrivilegeLevel, ServiceState};

use crate::theme::{palette, styles};

pub struct StatusHeader<'a> {
    service: &'a str,
    status_label: String,
    state: ServiceState,
    level: PrivilegeLevel,
}

impl<'a> StatusHeader<'a> {
    pub fn new(
        service: &'a str,
        status_label: String,
        state: ServiceState,
        level: PrivilegeLevel,
    ) -> Self {
        Self {
            service,
            status_label,
            state,
            level,
        }
    }

    fn privilege_text(&self) -> &'static str {
        match self.level {
            PrivilegeLevel::Elevated => "elevated",
            PrivilegeLevel::Standard => "standard user",
        }
    }
}

impl Widget for StatusHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (icon, icon_style) = styles::service_state_indicator(self.state);
        let title = Line::from(vec![
            Span::styled(format!(" {icon} "), icon_style),
            Span::styled("svcpanel", styles::accent_bold()),
            Span::styled(" / ", styles::text_muted()),
            Span::styled(self.service, styles::text_primary()),
            Span::raw("  "),
            Span::styled(self.status_label.clone(), styles::text_secondary()),
        ]);
        let title_width = title.width() as u16;
        buf.set_line(inner.x, inner.y, &title, inner.width);

        // Privilege pill, right-aligned when it fits beside the title
        let privilege = Line::from(vec![
            Span::styled(self.privilege_text(), styles::privilege(self.level)),
            Span::raw(" "),
        ]);
        let privilege_width = privilege.width() as u16;
        if title_width + privilege_width + 2 <= inner.width {
            let x = inner.x + inner.width - privilege_width;
            buf.set_line(x, inner.y, &privilege, privilege_width);
        }
    }
}
