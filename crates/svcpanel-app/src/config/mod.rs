//! Configuration for svcpanel
//!
//! Supports an optional read-only `config.toml` under the user's config
//! directory, overridden by command-line flags.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings, CONFIG_FILENAME};
pub use types::*;
