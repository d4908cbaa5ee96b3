//! Filter bar: active time threshold, preset keys and channel health

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::styles;

const PRESETS: [(&str, &str); 4] = [
    ("c", "clear"),
    ("a", "all"),
    ("d", "-1 day"),
    ("h", "-1 hour"),
];

pub struct FilterBar<'a> {
    label: String,
    rebuilding: bool,
    evicted: usize,
    degraded: Option<&'a str>,
}

impl<'a> FilterBar<'a> {
    pub fn new(label: String) -> Self {
        Self {
            label,
            rebuilding: false,
            evicted: 0,
            degraded: None,
        }
    }

    pub fn rebuilding(mut self, rebuilding: bool) -> Self {
        self.rebuilding = rebuilding;
        self
    }

    /// Oldest lines dropped by the line cap
    pub fn evicted(mut self, evicted: usize) -> Self {
        self.evicted = evicted;
        self
    }

    pub fn degraded(mut self, reason: Option<&'a str>) -> Self {
        self.degraded = reason;
        self
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut left = vec![Span::raw(" "), Span::styled(self.label, styles::accent())];
        if self.rebuilding {
            left.push(Span::styled("  loading…", styles::text_muted()));
        }
        if self.evicted > 0 {
            left.push(Span::styled(
                format!("  ({} oldest lines dropped)", self.evicted),
                styles::warning(),
            ));
        }
        if let Some(reason) = self.degraded {
            left.push(Span::styled(format!("  ⚠ {reason}"), styles::warning()));
        }
        let left = Line::from(left);
        let left_width = left.width() as u16;
        buf.set_line(area.x, area.y, &left, area.width);

        let mut right = Vec::new();
        for (key, name) in PRESETS {
            right.push(Span::styled(format!("[{key}]"), styles::accent()));
            right.push(Span::styled(format!(" {name}  "), styles::text_secondary()));
        }
        let right = Line::from(right);
        let right_width = right.width() as u16;

        // Preset hints only when they fit beside the label
        if left_width + right_width + 2 <= area.width {
            let x = area.x + area.width - right_width;
            buf.set_line(x, area.y, &right, right_width);
        }
    }
}
