//! Device settings
//!
//! Persistent configuration read once at startup from a TOML file in the
//! user config directory. Loading is fail-safe: a missing or unreadable
//! file degrades to defaults so the device always comes up.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::platform::wifi::NetworkCredentials;

const SETTINGS_DIR: &str = "event-notifier";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// MQTT broker, `host` or `host:port` with an optional `mqtt://` scheme.
    pub broker_url: String,
    /// Topic used for both the inbound subscription and outbound events.
    pub device_topic: String,
    /// Candidate networks, tried in order during association.
    pub networks: Vec<NetworkCredentials>,
    /// Clock offset for the idle view, e.g. `+02:00`. Invalid or missing
    /// values fall back to local time.
    pub timezone: Option<String>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            broker_url: "mqtt://broker.hivemq.com".to_string(),
            device_topic: "/esp32/coffee".to_string(),
            networks: Vec::new(),
            timezone: None,
        }
    }
}

impl DeviceSettings {
    /// Loads settings from the default location, falling back to defaults
    /// on any failure.
    pub fn load_or_default() -> Self {
        match default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("no config directory available, using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(settings) => {
                    info!(path = %path.display(), "loaded device settings");
                    settings
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                info!(path = %path.display(), error = %e, "no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Parses the configured timezone into a fixed offset, e.g. `+02:00`
    /// or `-05:30`. Invalid entries are logged and ignored.
    pub fn clock_offset(&self) -> Option<FixedOffset> {
        let tz = self.timezone.as_deref()?;
        match parse_offset(tz) {
            Some(offset) => Some(offset),
            None => {
                warn!(timezone = tz, "unparseable timezone, using local time");
                None
            }
        }
    }

    /// Broker host and port, defaulting to 1883.
    pub fn broker_host_port(&self) -> (String, u16) {
        let trimmed = self
            .broker_url
            .strip_prefix("mqtt://")
            .unwrap_or(&self.broker_url);
        let mut parts = trimmed.splitn(2, ':');
        let host = parts.next().unwrap_or_default().to_string();
        let port = parts
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1883);
        (host, port)
    }
}

fn default_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, rest) = match *tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => (1, tz),
    };
    let mut parts = rest.splitn(2, ':');
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = parts.next().unwrap_or("0").parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = DeviceSettings::load_from(Path::new("/nonexistent/settings.toml"));
        assert_eq!(settings.device_topic, "/esp32/coffee");
        assert!(settings.networks.is_empty());
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "broker_url = [not toml").unwrap();
        let settings = DeviceSettings::load_from(file.path());
        assert_eq!(settings.broker_url, "mqtt://broker.hivemq.com");
    }

    #[test]
    fn settings_file_round_trips() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
broker_url = "mqtt://example.org:8883"
device_topic = "/office/door"
timezone = "+02:00"

[[networks]]
ssid = "office"
psk = "hunter2"
"#
        )
        .unwrap();
        let settings = DeviceSettings::load_from(file.path());
        assert_eq!(settings.broker_host_port(), ("example.org".to_string(), 8883));
        assert_eq!(settings.device_topic, "/office/door");
        assert_eq!(settings.networks.len(), 1);
        assert_eq!(settings.networks[0].ssid, "office");
        assert_eq!(
            settings.clock_offset(),
            FixedOffset::east_opt(2 * 3600)
        );
    }

    #[test]
    fn bad_timezone_is_non_fatal() {
        let settings = DeviceSettings {
            timezone: Some("Mars/Olympus".to_string()),
            ..DeviceSettings::default()
        };
        assert!(settings.clock_offset().is_none());
    }

    #[test]
    fn negative_offsets_parse() {
        let settings = DeviceSettings {
            timezone: Some("-05:30".to_string()),
            ..DeviceSettings::default()
        };
        assert_eq!(
            settings.clock_offset(),
            FixedOffset::east_opt(-(5 * 3600 + 30 * 60))
        );
    }
}
