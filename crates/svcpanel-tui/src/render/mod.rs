//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use svcpanel_app::{AppState, UiMode};

use crate::layout::ScreenAreas;
use crate::theme::palette;
use crate::widgets;

/// Render the whole screen.
///
/// Only the log view's scroll state is written back, as it tracks the
/// viewport size.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = ScreenAreas::new(area);

    let header = widgets::StatusHeader::new(
        state.supervisor.name(),
        state.supervisor.status_label(),
        state.service_state(),
        state.privilege_level(),
    );
    frame.render_widget(header, areas.header);

    let filter_bar = widgets::FilterBar::new(state.log_feed.filter_label())
        .rebuilding(state.log_feed.is_rebuilding())
        .evicted(state.log_feed.evicted())
        .degraded(state.log_feed.degraded());
    frame.render_widget(filter_bar, areas.filter_bar);

    let log_view = widgets::LogView::new(state.log_feed.lines());
    frame.render_stateful_widget(log_view, areas.logs, &mut state.log_view_state);

    frame.render_widget(widgets::ControlBar::new(state.enablement()), areas.controls);

    match state.ui_mode {
        UiMode::Normal => {}
        UiMode::InstallPrompt => {
            frame.render_widget(widgets::InstallPrompt::new(state.supervisor.name()), area);
        }
        UiMode::Configure => {
            frame.render_widget(widgets::ConfigPanel::new(&state.settings), area);
        }
    }
}
