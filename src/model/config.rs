use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Settings read from `.notedown/task.toml` inside the workspace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub ui: UiConfig,
    /// Key binding overrides: action name -> key identifiers
    #[serde(default)]
    pub keys: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// File new tasks go to when added outside a project, relative to the root
    #[serde(default = "default_inbox")]
    pub inbox: PathBuf,
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            inbox: default_inbox(),
        }
    }
}

fn default_inbox() -> PathBuf {
    PathBuf::from("README.md")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme overrides, e.g. `red = "#F38BA8"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// How long status bar messages stay visible
    #[serde(default = "default_message_secs")]
    pub message_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            message_secs: default_message_secs(),
        }
    }
}

/// Default: ten seconds, long enough to read an error
fn default_message_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file location. Relative paths resolve against the workspace root.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory
    pub root: PathBuf,
    /// Agenda date override; `None` means today
    pub date: Option<NaiveDate>,
    pub file: FileConfig,
}

impl Config {
    /// Resolved path of the log file
    pub fn log_file(&self) -> PathBuf {
        match &self.file.log.file {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => self.root.join(".notedown").join("logs").join("task.log"),
        }
    }

    /// The agenda's starting date
    pub fn today(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_defaults_on_empty_document() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.ui.colors.is_empty());
        assert_eq!(config.ui.message_secs, 10);
        assert!(config.keys.is_empty());
        assert_eq!(config.log.level, "info");
        assert!(config.log.file.is_none());
        assert_eq!(config.tasks.inbox, PathBuf::from("README.md"));
    }

    #[test]
    fn inbox_can_be_moved() {
        let config: FileConfig = toml::from_str("[tasks]\ninbox = \"inbox/today.md\"\n").unwrap();
        assert_eq!(config.tasks.inbox, PathBuf::from("inbox/today.md"));
    }

    #[test]
    fn log_file_resolves_against_root() {
        let mut config = Config {
            root: PathBuf::from("/notes"),
            date: None,
            file: FileConfig::default(),
        };
        assert_eq!(
            config.log_file(),
            PathBuf::from("/notes/.notedown/logs/task.log")
        );

        config.file.log.file = Some(PathBuf::from("debug.log"));
        assert_eq!(config.log_file(), PathBuf::from("/notes/debug.log"));

        config.file.log.file = Some(PathBuf::from("/var/log/nt.log"));
        assert_eq!(config.log_file(), PathBuf::from("/var/log/nt.log"));
    }
}
