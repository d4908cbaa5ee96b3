//! OS signal handling: SIGINT/SIGTERM become [`Message::Quit`]

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use svcpanel_core::prelude::*;

use crate::message::Message;

/// Spawn a task that sends `Message::Quit` when a termination signal arrives
pub fn spawn_signal_handler(msg_tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Termination signal received, shutting down");
        let _ = msg_tx.send(Message::Quit).await;
    })
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}", e);
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}
