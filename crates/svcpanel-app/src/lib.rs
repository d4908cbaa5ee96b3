//! svcpanel-app - Application state and orchestration for svcpanel
//!
//! This crate implements the TEA (The Elm Architecture) pattern: a single
//! [`Engine`] owns the [`AppState`], applies every [`Message`] through the
//! update function and turns [`UpdateAction`]s into background tasks.
//!
//! The three stateful components live inside the state:
//! - [`LogFeed`]: the filtered, live-updating log view
//! - [`ServiceSupervisor`]: the supervised service and its last polled state
//! - [`PrivilegeGate`]: privilege level, control enablement and elevation

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod log_feed;
pub mod log_view_state;
pub mod message;
pub mod privilege_gate;
pub mod process;
pub mod signals;
pub mod state;
pub mod supervisor;

// Re-export primary types
pub use config::{load_settings, Settings};
pub use engine::{Collaborators, Engine};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use log_feed::{LogFeed, RebuildRequest, RebuiltView};
pub use log_view_state::LogViewState;
pub use message::Message;
pub use privilege_gate::{PrivilegeGate, Relaunch};
pub use state::{AppState, ExitReason, UiMode};
pub use supervisor::{ServiceCommand, ServiceHandle, ServiceSupervisor};
