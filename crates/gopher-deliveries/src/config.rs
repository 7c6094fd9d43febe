//! Delivery configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Identifiers and switches for the delivery subsystem, loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Button signal identifiers
    pub buttons: ButtonConfig,

    /// Outbound topic identifiers
    pub topics: TopicConfig,

    /// Skip the confirmation gate at every location
    pub dont_wait_for_humans: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Confirms the current stop and lets the delivery continue
    #[serde(default = "default_go_button")]
    pub go: String,

    /// Cancels the delivery and sends the robot home
    #[serde(default = "default_stop_button")]
    pub stop: String,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            go: default_go_button(),
            stop: default_stop_button(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_display_notification")]
    pub display_notification: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            display_notification: default_display_notification(),
        }
    }
}

fn default_go_button() -> String {
    "go".to_string()
}
fn default_stop_button() -> String {
    "stop".to_string()
}
fn default_display_notification() -> String {
    "display_notification".to_string()
}

impl DeliveryConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: DeliveryConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = DeliveryConfig::from_yaml_str("dont_wait_for_humans: true\n").unwrap();
        assert!(config.dont_wait_for_humans);
        assert_eq!(config.buttons.go, "go");
        assert_eq!(config.buttons.stop, "stop");
        assert_eq!(config.topics.display_notification, "display_notification");
    }

    #[test]
    fn load_reads_button_ids_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "buttons:\n  go: /gopher/buttons/go\n  stop: /gopher/buttons/stop\ntopics:\n  display_notification: /gopher/notify"
        )
        .unwrap();

        let config = DeliveryConfig::load(file.path()).unwrap();
        assert_eq!(config.buttons.go, "/gopher/buttons/go");
        assert_eq!(config.buttons.stop, "/gopher/buttons/stop");
        assert_eq!(config.topics.display_notification, "/gopher/notify");
        assert!(!config.dont_wait_for_humans);
    }

    #[test]
    fn load_reports_the_offending_path() {
        let err = DeliveryConfig::load(Path::new("/nonexistent/delivery.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/delivery.yaml"));
    }
}
