//! Scrollable log view over the rendered lines of the log feed

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use svcpanel_app::LogViewState;
use svcpanel_core::RenderedLine;

use crate::theme::{palette, styles};

pub struct LogView<'a> {
    lines: &'a VecDeque<RenderedLine>,
    title: &'a str,
}

impl<'a> LogView<'a> {
    pub fn new(lines: &'a VecDeque<RenderedLine>) -> Self {
        Self {
            lines,
            title: " Log ",
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn render_empty(area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        Paragraph::new(Line::from(Span::styled(
            "No log entries after the current filter",
            styles::text_muted(),
        )))
        .alignment(Alignment::Center)
        .render(Rect::new(area.x, y, area.width, 1), buf);
    }
}

impl StatefulWidget for LogView<'_> {
    type State = LogViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = styles::glass_block(true)
            .title(self.title)
            .title_style(styles::accent_bold())
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        let total_lines = self.lines.len();
        let visible_lines = inner.height as usize;
        state.update_content_size(total_lines, visible_lines);

        if total_lines == 0 {
            Self::render_empty(inner, buf);
            return;
        }

        let (start, end) = state.visible_range();
        let rows: Vec<Line> = self
            .lines
            .range(start..end)
            .map(|line| Line::from(Span::styled(line.as_str(), styles::severity(line.severity()))))
            .collect();
        Paragraph::new(rows).render(inner, buf);

        if total_lines > visible_lines {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");
            let mut scrollbar_state = ScrollbarState::new(total_lines).position(state.offset);
            scrollbar.render(area, buf, &mut scrollbar_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_text, render_stateful};
    use svcpanel_core::Severity;
    use svcpanel_platform::test_utils::test_entry;

    fn lines(count: u32) -> VecDeque<RenderedLine> {
        (0..count)
            .map(|i| test_entry(9, i, Severity::Info, &format!("line {i}")).render())
            .collect()
    }

    #[test]
    fn test_empty_feed_shows_placeholder() {
        let feed = VecDeque::new();
        let mut state = LogViewState::new();
        let text = buffer_text(&render_stateful(LogView::new(&feed), &mut state, 60, 8));
        assert!(text.contains("No log entries after the current filter"));
    }

    #[test]
    fn test_follows_tail_when_auto_scrolling() {
        let feed = lines(20);
        let mut state = LogViewState::new();
        let text = buffer_text(&render_stateful(LogView::new(&feed), &mut state, 80, 7));

        // 5 visible rows inside the border
        assert_eq!(state.visible_lines, 5);
        assert_eq!(state.offset, 15);
        assert!(text.contains("line 19"));
        assert!(text.contains("line 15"));
        assert!(!text.contains("line 14"));
    }

    #[test]
    fn test_scrolled_view_shows_from_offset() {
        let feed = lines(20);
        let mut state = LogViewState::new();
        state.update_content_size(20, 5);
        state.scroll_to_top();

        let text = buffer_text(&render_stateful(LogView::new(&feed), &mut state, 80, 7));
        assert!(text.contains("line 0"));
        assert!(!text.contains("line 19"));
        assert!(!state.auto_scroll);
    }

    #[test]
    fn test_lines_are_coloured_by_severity() {
        let feed: VecDeque<RenderedLine> =
            [test_entry(9, 0, Severity::Error, "boom").render()].into();
        let mut state = LogViewState::new();
        let buf = render_stateful(LogView::new(&feed), &mut state, 80, 3);

        // First content cell inside the border
        assert_eq!(buf[(1, 1)].fg, palette::LOG_ERROR);
    }
}
