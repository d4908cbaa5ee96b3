//! Control panel widgets

mod config_panel;
mod control_bar;
mod filter_bar;
mod header;
mod install_prompt;
mod log_view;
pub mod modal_overlay;

pub use config_panel::ConfigPanel;
pub use control_bar::ControlBar;
pub use filter_bar::FilterBar;
pub use header::StatusHeader;
pub use install_prompt::InstallPrompt;
pub use log_view::LogView;
