//! Screen layout for the control panel

use ratatui::layout::{Constraint, Layout, Rect};

const HEADER_HEIGHT: u16 = 3;
const FILTER_BAR_HEIGHT: u16 = 1;
const CONTROL_BAR_HEIGHT: u16 = 3;

/// Screen areas, top to bottom
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,
    pub filter_bar: Rect,
    pub logs: Rect,
    pub controls: Rect,
}

impl ScreenAreas {
    pub fn new(area: Rect) -> Self {
        let [header, filter_bar, logs, controls] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(CONTROL_BAR_HEIGHT),
        ])
        .areas(area);

        Self {
            header,
            filter_bar,
            logs,
            controls,
        }
    }
}
