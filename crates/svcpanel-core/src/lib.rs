//! # svcpanel-core - Core Domain Types
//!
//! Foundation crate for svcpanel. Provides the log and service domain types,
//! error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LogEntry`] - A single structured log record with severity and timestamp
//! - [`Severity`] - Log severity (Info, Warning, Error)
//! - [`TimeThreshold`] - Instant below which log entries are hidden
//! - [`RenderedLine`] - Display projection of a log entry
//! - [`ServiceState`] - OS service lifecycle state
//! - [`PrivilegeLevel`] - Whether the process runs with administrative rights
//! - [`ControlEnablement`] - Derived on/off state of the operator controls
//! - [`CommandOutcome`] - Internal result of a suppressed OS command
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum organized by layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use svcpanel_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    format_timestamp, CommandOutcome, ControlEnablement, EntryId, LogEntry, PrivilegeLevel,
    RenderedLine, ServiceState, Severity, TimeThreshold, TIMESTAMP_FORMAT,
};
