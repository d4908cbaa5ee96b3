//! Settings loader for `config.toml`

use std::path::{Path, PathBuf};

use svcpanel_core::prelude::*;

use super::types::Settings;

pub const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "svcpanel";

/// `<config dir>/svcpanel/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// Never fails: a missing file yields defaults, an unreadable or malformed
/// one is logged and yields defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            debug!("No config directory available, using defaults");
            return Settings::default();
        }
    };

    if !config_path.exists() {
        if path.is_some() {
            warn!("Config file {:?} not found, using defaults", config_path);
        } else {
            debug!("No config file at {:?}, using defaults", config_path);
        }
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings.source = Some(config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_missing_file() {
        let temp = tempdir().unwrap();
        let settings = load_settings(Some(&temp.path().join(CONFIG_FILENAME)));

        assert_eq!(settings.service.name, "dhcpd");
        assert!(settings.source.is_none());
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        let config = r#"
[service]
name = "kea-dhcp4"
log_channel = "kea-dhcp4.service"

[ui]
tick_interval_ms = 500
"#;
        std::fs::write(&path, config).unwrap();

        let settings = load_settings(Some(&path));

        assert_eq!(settings.service.name, "kea-dhcp4");
        assert_eq!(settings.log_channel(), "kea-dhcp4.service");
        assert_eq!(settings.ui.tick_interval_ms, 500);
        assert_eq!(settings.ui.max_lines, 50_000);
        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_settings_malformed_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[service\nname = ").unwrap();

        let settings = load_settings(Some(&path));

        assert_eq!(settings.service.name, "dhcpd");
        assert!(settings.source.is_none());
    }

    #[test]
    fn test_load_settings_partial_section() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[ui]\nmax_lines = 10\n").unwrap();

        let settings = load_settings(Some(&path));

        assert_eq!(settings.service.name, "dhcpd");
        assert_eq!(settings.ui.max_lines, 10);
        assert_eq!(settings.ui.tick_interval_ms, 1000);
    }
}
