use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::model::config::{Config, FileConfig};

/// Error type for reading the workspace config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Location of the optional config file inside a workspace
pub fn config_path(root: &Path) -> PathBuf {
    root.join(".notedown").join("task.toml")
}

/// Load `<root>/.notedown/task.toml`. A missing file yields defaults.
pub fn load_config(root: &Path, date: Option<NaiveDate>) -> Result<Config, ConfigError> {
    let path = config_path(root);
    let file = if path.exists() {
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str::<FileConfig>(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        FileConfig::default()
    };
    Ok(Config {
        root: root.to_path_buf(),
        date,
        file,
    })
}
