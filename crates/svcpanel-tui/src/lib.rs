//! svcpanel-tui - Terminal UI for svcpanel
//!
//! Creates an [`svcpanel_app::Engine`] and adds terminal rendering, key
//! polling and the control panel widgets on top of it.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::{run, RunOutcome};
