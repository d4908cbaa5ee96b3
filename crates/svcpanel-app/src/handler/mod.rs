//! Handler module - TEA update function and key mapping
//!
//! - `update`: main update() function and message dispatch
//! - `keys`: key events to messages, per UI mode

pub(crate) mod keys;
pub(crate) mod update;


use crate::log_feed::RebuildRequest;
use crate::message::Message;
use crate::supervisor::ServiceCommand;

pub use update::update;

// Re-export functions used by internal tests
#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Rescan the log channel and rebuild the view off the event loop
    RebuildLog(RebuildRequest),

    /// Query service state and privilege level; the result carries `seq`
    PollStatus { seq: u64 },

    /// Issue a start/stop command
    RunServiceCommand(ServiceCommand),

    /// Install the missing service
    InstallService { name: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
