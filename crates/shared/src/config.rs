//! Configuration types for OpsDesk

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `data_dir`
pub const DATA_DIR_ENV: &str = "OPSDESK_DATA_DIR";

/// Application configuration (opsdesk.yaml / opsdesk.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Directory holding one JSON file per collection plus accounts.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Fallback log filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum retained audit entries
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,

    /// Maximum queued user notifications
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Per-page role overrides, e.g. `orders: [admin, manager]`
    #[serde(default)]
    pub page_access: HashMap<String, Vec<String>>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_audit_capacity() -> usize {
    10_000
}

fn default_notification_capacity() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            audit_capacity: default_audit_capacity(),
            notification_capacity: default_notification_capacity(),
            page_access: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML or JSON file (chosen by extension)
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment overrides (`OPSDESK_DATA_DIR`)
    pub fn with_env_overrides(self) -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        self.with_data_dir_override(dir)
    }

    pub fn with_data_dir_override(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    /// Serialize to YAML, used by `opsdesk init`
    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_yaml() {
        let yaml = r#"
dataDir: /var/lib/opsdesk
pageAccess:
  orders: [admin, manager]
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/opsdesk"));
        assert_eq!(config.page_access["orders"], vec!["admin", "manager"]);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.audit_capacity, 10_000);
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("opsdesk.json");
        std::fs::write(&json_path, r#"{ "logLevel": "debug" }"#).unwrap();
        assert_eq!(AppConfig::from_file(&json_path).unwrap().log_level, "debug");

        let yaml_path = dir.path().join("opsdesk.yaml");
        std::fs::write(&yaml_path, "notificationCapacity: 5\n").unwrap();
        assert_eq!(
            AppConfig::from_file(&yaml_path).unwrap().notification_capacity,
            5
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_data_dir_override() {
        let config = AppConfig::default().with_data_dir_override(Some(PathBuf::from("/tmp/x")));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));

        let config = AppConfig::default().with_data_dir_override(None);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_yaml_round_trip_keeps_overrides() {
        let mut config = AppConfig::default();
        config
            .page_access
            .insert("rewards".to_string(), vec!["admin".to_string()]);
        let parsed: AppConfig = serde_yaml::from_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed.page_access["rewards"], vec!["admin"]);
    }
}
