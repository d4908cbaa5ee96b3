//! Log view scroll state.
//!
//! Shared by the handler (scroll commands) and the TUI (which reports the
//! content and viewport sizes while rendering).

/// Vertical scroll position over the rendered log lines
#[derive(Debug, Clone)]
pub struct LogViewState {
    /// First visible line
    pub offset: usize,
    /// Follow new lines as they arrive
    pub auto_scroll: bool,
    /// Total number of lines (set during render)
    pub total_lines: usize,
    /// Visible lines (set during render)
    pub visible_lines: usize,
}

impl Default for LogViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogViewState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
            total_lines: 0,
            visible_lines: 0,
        }
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_lines)
    }

    /// `(start, end)` line indices to render, end exclusive
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset.min(self.total_lines);
        let end = (start + self.visible_lines).min(self.total_lines);
        (start, end)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());

        // Back at the bottom: follow again
        if self.offset >= self.max_offset() {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_scroll = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_scroll = true;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_lines.saturating_sub(2).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_lines.saturating_sub(2).max(1));
    }

    /// Record new content/viewport sizes; keeps following when auto-scrolling
    pub fn update_content_size(&mut self, total: usize, visible: usize) {
        self.total_lines = total;
        self.visible_lines = visible;

        if self.auto_scroll {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }
}
