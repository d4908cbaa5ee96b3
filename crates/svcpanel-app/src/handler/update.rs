//! Main update function - handles state transitions (TEA pattern)

use chrono::Duration;
use svcpanel_core::prelude::*;

use crate::log_feed::RebuildRequest;
use crate::message::Message;
use crate::state::{AppState, ExitReason, UiMode};
use crate::supervisor::ServiceCommand;

use super::{keys, UpdateAction, UpdateResult};

/// Process a message and update state.
/// Returns an optional follow-up message and an optional action.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match keys::handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            if state.poll_in_flight {
                trace!("Status poll still running, skipping tick");
                return UpdateResult::none();
            }
            poll_status(state)
        }

        Message::Quit => {
            state.request_quit(ExitReason::Quit);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Scroll Messages
        // ─────────────────────────────────────────────────────────
        Message::ScrollUp => {
            state.log_view_state.scroll_up(1);
            UpdateResult::none()
        }
        Message::ScrollDown => {
            state.log_view_state.scroll_down(1);
            UpdateResult::none()
        }
        Message::ScrollToTop => {
            state.log_view_state.scroll_to_top();
            UpdateResult::none()
        }
        Message::ScrollToBottom => {
            state.log_view_state.scroll_to_bottom();
            UpdateResult::none()
        }
        Message::PageUp => {
            state.log_view_state.page_up();
            UpdateResult::none()
        }
        Message::PageDown => {
            state.log_view_state.page_down();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Log Feed Messages
        // ─────────────────────────────────────────────────────────
        Message::ClearLog => rebuild(state.log_feed.clear()),
        Message::ShowAllLog => rebuild(state.log_feed.show_all()),
        Message::BackOneDay => match state.log_feed.back_by(Duration::days(1)) {
            Some(request) => rebuild(request),
            None => UpdateResult::none(),
        },
        Message::BackOneHour => match state.log_feed.back_by(Duration::hours(1)) {
            Some(request) => rebuild(request),
            None => UpdateResult::none(),
        },
        Message::SetThreshold(threshold) => rebuild(state.log_feed.set_threshold(threshold)),

        Message::EntryPushed(entry) => {
            state.log_feed.on_entry_pushed(entry);
            UpdateResult::none()
        }

        Message::LogRebuilt { generation, view } => {
            if state.log_feed.complete_rebuild(generation, view) {
                state.log_view_state.scroll_to_bottom();
            }
            UpdateResult::none()
        }

        Message::LogChannelLost { reason } => {
            warn!("Log subscription unavailable: {}", reason);
            state.log_feed.mark_degraded(reason);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Service Messages
        // ─────────────────────────────────────────────────────────
        Message::StartService => service_command(state, ServiceCommand::Start),
        Message::StopService => service_command(state, ServiceCommand::Stop),

        Message::StatusPolled {
            seq,
            state: service_state,
            level,
        } => {
            if seq != state.poll_seq {
                debug!("Dropping stale status poll #{} (latest #{})", seq, state.poll_seq);
                return UpdateResult::none();
            }
            state.poll_in_flight = false;
            state.supervisor.apply_status(service_state);
            state.gate.apply_level(level);

            // Losing privileges closes the panel that requires them
            if state.ui_mode == UiMode::Configure && !state.enablement().configure {
                state.ui_mode = UiMode::Normal;
            }
            UpdateResult::none()
        }

        Message::StatusPollFailed { seq, reason } => {
            if seq != state.poll_seq {
                return UpdateResult::none();
            }
            state.poll_in_flight = false;
            warn!("Status poll failed: {}", reason);
            UpdateResult::none()
        }

        Message::ServiceCommandFinished { command, outcome } => {
            debug!("{} finished: {:?}", command.verb(), outcome);
            poll_status(state)
        }

        // ─────────────────────────────────────────────────────────
        // Install Prompt Messages
        // ─────────────────────────────────────────────────────────
        Message::ShowInstallPrompt => {
            state.ui_mode = UiMode::InstallPrompt;
            UpdateResult::none()
        }
        Message::ConfirmInstall => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::action(UpdateAction::InstallService {
                name: state.supervisor.name().to_string(),
            })
        }
        Message::DismissInstall => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Privilege Messages
        // ─────────────────────────────────────────────────────────
        Message::OpenConfigure => {
            if state.enablement().configure {
                state.ui_mode = UiMode::Configure;
            } else {
                debug!("Configure is disabled");
            }
            UpdateResult::none()
        }
        Message::CloseConfigure => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }

        Message::Elevate => {
            if state.enablement().elevate {
                state.elevation_requested = true;
            } else {
                debug!("Elevate is disabled");
            }
            UpdateResult::none()
        }

        Message::ElevationFinished(outcome) => {
            state.elevation_requested = false;
            if outcome.is_success() {
                info!("Elevated instance launched, shutting down");
                state.request_quit(ExitReason::Elevated);
            } else {
                debug!("Elevation did not happen, continuing unprivileged");
            }
            UpdateResult::none()
        }
    }
}

/// Start a new status poll; it supersedes any poll still running
fn poll_status(state: &mut AppState) -> UpdateResult {
    state.poll_seq += 1;
    state.poll_in_flight = true;
    UpdateResult::action(UpdateAction::PollStatus {
        seq: state.poll_seq,
    })
}

fn rebuild(request: RebuildRequest) -> UpdateResult {
    UpdateResult::action(UpdateAction::RebuildLog(request))
}

fn service_command(state: &AppState, command: ServiceCommand) -> UpdateResult {
    let enablement = state.enablement();
    let enabled = match command {
        ServiceCommand::Start => enablement.start,
        ServiceCommand::Stop => enablement.stop,
    };

    if !enabled {
        debug!(
            "{} is disabled ({}, {:?})",
            command.verb(),
            state.service_state(),
            state.privilege_level()
        );
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::RunServiceCommand(command))
}
