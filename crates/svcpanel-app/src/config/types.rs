//! Configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lower bound for the status poll interval
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Effective settings (file values with command-line overrides applied)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub ui: UiSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Which service to supervise and where its log lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    /// Service name as known to the service manager
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Log channel to display; defaults to the service name
    #[serde(default)]
    pub log_channel: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_channel: None,
        }
    }
}

fn default_service_name() -> String {
    "dhcpd".to_string()
}

/// Presentation and polling settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Status poll interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of rendered log lines kept
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_lines: default_max_lines(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_max_lines() -> usize {
    crate::log_feed::DEFAULT_MAX_LINES
}

impl Settings {
    /// Name of the log channel to display
    pub fn log_channel(&self) -> &str {
        self.service
            .log_channel
            .as_deref()
            .unwrap_or(&self.service.name)
    }

    /// Status poll interval, clamped to [`MIN_TICK_INTERVAL_MS`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ui.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        service: Option<String>,
        log_channel: Option<String>,
        tick_interval_ms: Option<u64>,
    ) -> Self {
        if let Some(name) = service {
            self.service.name = name;
        }
        if let Some(channel) = log_channel {
            self.service.log_channel = Some(channel);
        }
        if let Some(ms) = tick_interval_ms {
            self.ui.tick_interval_ms = ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.service.name, "dhcpd");
        assert_eq!(settings.log_channel(), "dhcpd");
        assert_eq!(settings.tick_interval(), Duration::from_secs(1));
        assert_eq!(settings.ui.max_lines, 50_000);
    }

    #[test]
    fn test_tick_interval_is_clamped() {
        let settings = Settings::default().with_overrides(None, None, Some(5));
        assert_eq!(settings.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let settings = Settings::default().with_overrides(
            Some("kea-dhcp4".to_string()),
            Some("kea-dhcp4.service".to_string()),
            None,
        );
        assert_eq!(settings.service.name, "kea-dhcp4");
        assert_eq!(settings.log_channel(), "kea-dhcp4.service");
        assert_eq!(settings.ui.tick_interval_ms, 1000);
    }
}
