//! Message types for the application (TEA pattern)

use svcpanel_core::{CommandOutcome, LogEntry, PrivilegeLevel, ServiceState, TimeThreshold};

use crate::input_key::InputKey;
use crate::log_feed::RebuiltView;
use crate::supervisor::ServiceCommand;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Periodic status poll
    Tick,

    /// Quit (keys, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Scroll Messages
    // ─────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────
    // Log Feed Messages
    // ─────────────────────────────────────────────────────────
    /// Hide everything written up to now
    ClearLog,
    /// Remove the threshold
    ShowAllLog,
    /// Move the threshold back by one day
    BackOneDay,
    /// Move the threshold back by one hour
    BackOneHour,
    /// Replace the threshold
    SetThreshold(TimeThreshold),
    /// New entry delivered by the channel subscription
    EntryPushed(LogEntry),
    /// A rebuild finished off the event loop
    LogRebuilt { generation: u64, view: RebuiltView },
    /// The channel subscription could not be established or ended
    LogChannelLost { reason: String },

    // ─────────────────────────────────────────────────────────
    // Service Messages
    // ─────────────────────────────────────────────────────────
    StartService,
    StopService,
    /// Result of the status poll numbered `seq`
    StatusPolled {
        seq: u64,
        state: ServiceState,
        level: PrivilegeLevel,
    },
    /// The status poll task numbered `seq` died before reporting
    StatusPollFailed { seq: u64, reason: String },
    /// A start/stop command returned
    ServiceCommandFinished {
        command: ServiceCommand,
        outcome: CommandOutcome,
    },

    // ─────────────────────────────────────────────────────────
    // Install Prompt Messages
    // ─────────────────────────────────────────────────────────
    /// The service was not found; ask whether to install it
    ShowInstallPrompt,
    ConfirmInstall,
    DismissInstall,

    // ─────────────────────────────────────────────────────────
    // Privilege Messages
    // ─────────────────────────────────────────────────────────
    /// Open the (read-only) settings panel
    OpenConfigure,
    CloseConfigure,
    /// Relaunch elevated
    Elevate,
    /// The elevation request returned
    ElevationFinished(CommandOutcome),
}
