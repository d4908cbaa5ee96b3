//! Yes/No dialog shown when the supervised service is not installed

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay;
use crate::theme::styles;

const WIDTH: u16 = 52;
const HEIGHT: u16 = 7;

pub struct InstallPrompt<'a> {
    service: &'a str,
}

impl<'a> InstallPrompt<'a> {
    pub fn new(service: &'a str) -> Self {
        Self { service }
    }
}

impl Widget for InstallPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(WIDTH, HEIGHT, area);
        modal_overlay::prepare(buf, area, modal);

        let title = format!(" {} ", self.service);
        let block = styles::modal_block(&title);
        let inner = block.inner(modal);
        block.render(modal, buf);

        let body = vec![
            Line::default(),
            Line::from(Span::styled(
                "Service has not been installed yet, install?",
                styles::text_primary(),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", styles::accent_bold()),
                Span::styled(" Yes    ", styles::text_secondary()),
                Span::styled("[n]", styles::accent_bold()),
                Span::styled(" No", styles::text_secondary()),
            ]),
        ];
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
