//! Engine - owns the state, the message channel and the background tasks
//!
//! The engine is the single serialized context: every input arrives as a
//! [`Message`] on one mpsc channel and is applied through the TEA update
//! function. Background work (the log subscription bridge, the tick
//! scheduler, signal handling, OS calls) only ever sends messages.
//!
//! Front ends drive it with [`Engine::next_message`] / [`Engine::drain_pending`]
//! and perform an elevation through [`Engine::elevate`] once they have released
//! the terminal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use svcpanel_core::prelude::*;
use svcpanel_core::{CommandOutcome, LogEntry};
use svcpanel_platform::{LogChannel, PrivilegeOracle, ProcessLauncher, ServiceManager, Subscription};

use crate::actions::ActionContext;
use crate::config::Settings;
use crate::message::Message;
use crate::privilege_gate::{PrivilegeGate, Relaunch};
use crate::process::process_message;
use crate::signals::spawn_signal_handler;
use crate::state::{AppState, ExitReason};
use crate::supervisor::ServiceSupervisor;

/// Capacity of the main message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the queue between the log subscription and the event loop
const ENTRY_QUEUE_CAPACITY: usize = 1024;

/// The OS-facing collaborators the engine works with
#[derive(Clone)]
pub struct Collaborators {
    pub channel: Arc<dyn LogChannel>,
    pub services: Arc<dyn ServiceManager>,
    pub oracle: Arc<dyn PrivilegeOracle>,
    pub launcher: Arc<dyn ProcessLauncher>,
    /// How to start the elevated instance
    pub relaunch: Relaunch,
}

pub struct Engine {
    pub state: AppState,
    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,
    actions: ActionContext,
    subscription: Option<Subscription>,
    bridge_task: Option<JoinHandle<()>>,
    ticker_task: Option<JoinHandle<()>>,
    signal_task: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    relaunch: Relaunch,
}

impl Engine {
    /// Build the engine and start its background tasks.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(settings: Settings, collaborators: Collaborators) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let Collaborators {
            channel,
            services,
            oracle,
            launcher,
            relaunch,
        } = collaborators;

        let name = settings.service.name.clone();
        let (supervisor, missing) = match ServiceSupervisor::locate(services.clone(), &name) {
            Ok(supervisor) => (supervisor, false),
            Err(e) => {
                warn!("{}", e);
                (ServiceSupervisor::not_installed(services, &name), true)
            }
        };
        let gate = PrivilegeGate::new(oracle, launcher);
        let tick_interval = settings.tick_interval();
        let state = AppState::new(settings, supervisor, gate);

        let mut engine = Self {
            state,
            actions: ActionContext::new(msg_tx.clone(), channel.clone()),
            msg_tx: msg_tx.clone(),
            msg_rx,
            subscription: None,
            bridge_task: None,
            ticker_task: None,
            signal_task: None,
            shutdown_tx,
            relaunch,
        };

        if missing {
            engine.process_message(Message::ShowInstallPrompt);
        }

        // Subscribe before the first scan; entries racing the scan are de-duplicated
        engine.subscribe(channel);
        engine.process_message(Message::ClearLog);

        engine.ticker_task = Some(spawn_ticker(msg_tx.clone(), tick_interval, shutdown_rx));
        engine.signal_task = Some(spawn_signal_handler(msg_tx));

        info!(
            "Engine started for service '{}' (log channel '{}')",
            engine.state.supervisor.name(),
            engine.state.settings.log_channel()
        );
        engine
    }

    fn subscribe(&mut self, channel: Arc<dyn LogChannel>) {
        let (entry_tx, entry_rx) = mpsc::channel(ENTRY_QUEUE_CAPACITY);
        match channel.subscribe(entry_tx) {
            Ok(subscription) => {
                debug!("Subscribed to log channel '{}'", subscription.channel());
                self.subscription = Some(subscription);
                self.bridge_task = Some(spawn_entry_bridge(entry_rx, self.msg_tx.clone()));
            }
            Err(e) => {
                self.process_message(Message::LogChannelLost {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Sender for injecting messages (tests, front ends)
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Apply one message and dispatch the actions it produces
    pub fn process_message(&mut self, msg: Message) {
        process_message(&mut self.state, msg, &mut self.actions);
    }

    /// Apply every message already queued, without waiting
    pub fn drain_pending(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            if self.should_quit() {
                break;
            }
        }
    }

    /// Wait for the next message and apply it. Returns false if the channel closed.
    pub async fn next_message(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.state.exit
    }

    /// True once if the operator asked to elevate
    pub fn take_elevation_request(&mut self) -> bool {
        std::mem::take(&mut self.state.elevation_requested)
    }

    /// Run the elevated relaunch and apply its outcome.
    ///
    /// The front end must have released the terminal: the OS may prompt.
    pub async fn elevate(&mut self) -> CommandOutcome {
        let gate = self.state.gate.clone();
        let relaunch = self.relaunch.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            gate.elevate_and_restart(&relaunch.exe, &relaunch.args)
        })
        .await
        .unwrap_or_else(|e| CommandOutcome::unknown(e.to_string()));

        self.process_message(Message::ElevationFinished(outcome.clone()));
        outcome
    }

    /// Stop the ticker, drop the log subscription and abort in-flight work
    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);

        for task in [
            self.ticker_task.take(),
            self.signal_task.take(),
            self.bridge_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }

        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.actions.abort_all();

        info!("Engine shut down ({:?})", self.state.exit);
    }

    /// Exit code after a confirmed elevation (waits for the elevated instance)
    pub fn terminate_current(&self) -> i32 {
        self.state.gate.terminate_current()
    }
}

/// Forward pushed entries into the main channel as messages
fn spawn_entry_bridge(
    mut entry_rx: mpsc::Receiver<LogEntry>,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(entry) = entry_rx.recv().await {
            if msg_tx.send(Message::EntryPushed(entry)).await.is_err() {
                return;
            }
        }
        let _ = msg_tx
            .send(Message::LogChannelLost {
                reason: "log subscription ended".to_string(),
            })
            .await;
    })
}

/// Send `Message::Tick` every `period` until shutdown
fn spawn_ticker(
    msg_tx: mpsc::Sender<Message>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::Tick).await.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        trace!("Tick scheduler stopped");
    })
}
