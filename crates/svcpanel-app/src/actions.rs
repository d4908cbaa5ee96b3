//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action that touches the OS runs on `spawn_blocking` and reports back
//! to the event loop as a [`Message`].
//!
//! Log rebuilds wait a short settle period before scanning so a burst of
//! threshold changes costs one scan. A superseded rebuild is cancelled through
//! its watch channel, which also stops a scan already running on the blocking
//! pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use svcpanel_core::prelude::*;
use svcpanel_core::CommandOutcome;
use svcpanel_platform::{HistoryScan, LogChannel};

use crate::handler::UpdateAction;
use crate::log_feed::{RebuildRequest, RebuiltView};
use crate::message::Message;
use crate::privilege_gate::PrivilegeGate;
use crate::state::AppState;
use crate::supervisor::{ServiceCommand, ServiceHandle};

/// Delay before a rebuild scans, absorbing rapid threshold changes
const REBUILD_SETTLE: Duration = Duration::from_millis(50);

/// A running rebuild and the sender that cancels its scan
struct RebuildTask {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl RebuildTask {
    fn cancel(self) {
        let _ = self.cancel.send(true);
        self.handle.abort();
    }
}

/// What actions need beyond the state: the message channel, the log channel
/// and the tasks they have spawned
pub struct ActionContext {
    msg_tx: mpsc::Sender<Message>,
    channel: Arc<dyn LogChannel>,
    rebuild: Option<RebuildTask>,
    tasks: Vec<JoinHandle<()>>,
}

impl ActionContext {
    pub fn new(msg_tx: mpsc::Sender<Message>, channel: Arc<dyn LogChannel>) -> Self {
        Self {
            msg_tx,
            channel,
            rebuild: None,
            tasks: Vec::new(),
        }
    }

    /// Abort everything still running
    pub fn abort_all(&mut self) {
        if let Some(rebuild) = self.rebuild.take() {
            rebuild.cancel();
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }
}

/// Execute an action by spawning a background task
pub fn handle_action(action: UpdateAction, state: &AppState, ctx: &mut ActionContext) {
    match action {
        UpdateAction::RebuildLog(request) => {
            // A newer threshold supersedes whatever scan is running
            if let Some(stale) = ctx.rebuild.take() {
                trace!("Cancelling superseded log rebuild");
                stale.cancel();
            }
            let (cancel, cancelled) = watch::channel(false);
            let handle = spawn_rebuild(request, ctx.channel.clone(), cancelled, ctx.msg_tx.clone());
            ctx.rebuild = Some(RebuildTask { handle, cancel });
        }

        UpdateAction::PollStatus { seq } => {
            let task = spawn_status_poll(
                seq,
                state.supervisor.handle(),
                state.gate.clone(),
                ctx.msg_tx.clone(),
            );
            ctx.track(task);
        }

        UpdateAction::RunServiceCommand(command) => {
            let task = spawn_service_command(command, state.supervisor.handle(), ctx.msg_tx.clone());
            ctx.track(task);
        }

        UpdateAction::InstallService { name } => {
            warn!(
                "Installing services is not supported; install '{}' with the system package manager",
                name
            );
        }
    }
}

fn spawn_rebuild(
    request: RebuildRequest,
    channel: Arc<dyn LogChannel>,
    cancelled: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(REBUILD_SETTLE).await;

        let name = channel.name().to_string();
        let scan = tokio::task::spawn_blocking(move || {
            RebuiltView::build(channel.read_history(&cancelled), request.threshold)
        })
        .await;

        let view = match scan {
            Ok(view) => view,
            Err(e) => {
                error!("Log scan task failed: {}", e);
                RebuiltView::build(
                    HistoryScan::failed(Error::channel_unavailable(name, e.to_string())),
                    request.threshold,
                )
            }
        };

        let _ = msg_tx
            .send(Message::LogRebuilt {
                generation: request.generation,
                view,
            })
            .await;
    })
}

fn spawn_status_poll(
    seq: u64,
    service: ServiceHandle,
    gate: PrivilegeGate,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let polled =
            tokio::task::spawn_blocking(move || (service.query(), gate.current_level())).await;

        let msg = match polled {
            Ok((state, level)) => Message::StatusPolled { seq, state, level },
            Err(e) => Message::StatusPollFailed {
                seq,
                reason: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    })
}

fn spawn_service_command(
    command: ServiceCommand,
    service: ServiceHandle,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || service.run(command))
            .await
            .unwrap_or_else(|e| CommandOutcome::unknown(e.to_string()));

        let _ = msg_tx
            .send(Message::ServiceCommandFinished { command, outcome })
            .await;
    })
}
