//! Read-only panel listing the effective settings.
//!
//! Opened with the Configure control, which is only enabled while elevated.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use svcpanel_app::Settings;

use super::modal_overlay;
use crate::theme::styles;

const WIDTH: u16 = 64;
const HEIGHT: u16 = 11;
const LABEL_WIDTH: usize = 16;

pub struct ConfigPanel<'a> {
    settings: &'a Settings,
}

impl<'a> ConfigPanel<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let source = self
            .settings
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string());

        vec![
            ("Service", self.settings.service.name.clone()),
            ("Log channel", self.settings.log_channel().to_string()),
            (
                "Status poll",
                format!("{} ms", self.settings.tick_interval().as_millis()),
            ),
            ("Max lines", self.settings.ui.max_lines.to_string()),
            ("Loaded from", source),
        ]
    }
}

impl Widget for ConfigPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(WIDTH, HEIGHT, area);
        modal_overlay::prepare(buf, area, modal);

        let block = styles::modal_block(" Configuration ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let mut lines = vec![Line::default()];
        for (label, value) in self.rows() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<LABEL_WIDTH$}"), styles::text_muted()),
                Span::styled(value, styles::text_primary()),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  [Esc] close",
            styles::text_secondary(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
